// SPDX-License-Identifier: MIT OR Apache-2.0
//! Concrete node sets built on the generic graph framework.

pub mod mix;
