// SPDX-License-Identifier: MIT OR Apache-2.0
//! Mix graph node set: the node types available in audio-mixing documents.

use crate::schema::{DataType, NodeRegistry, NodeSchema, PortSpec, PropertySpec, Value};

/// Create the mix graph node registry with all available node types
pub fn create_mix_registry() -> NodeRegistry {
    let mut registry = NodeRegistry::new();

    // ========================================================================
    // Audio
    // ========================================================================

    registry.register(
        NodeSchema::new(
            "track",
            "Track",
            "Audio track - sources from a sound file",
            "Audio",
        )
        .with_property(PropertySpec::new("Track", Value::Text(String::new())))
        .with_port(PortSpec::output("Output", DataType::Audio)),
    );

    registry.register(
        NodeSchema::new(
            "output",
            "Output",
            "Audio output - corresponds to a single in-game sound stream",
            "Audio",
        )
        .with_port(PortSpec::input("Input", DataType::Audio)),
    );

    // ========================================================================
    // Inputs
    // ========================================================================

    registry.register(
        NodeSchema::new(
            "float_constant",
            "Constant Float",
            "Constant float input",
            "Inputs",
        )
        .with_port(PortSpec::constant("Value", Value::Float(0.0))),
    );

    registry.register(
        NodeSchema::new(
            "vec3_constant",
            "Constant Vector3",
            "Constant vector input",
            "Inputs",
        )
        .with_port(PortSpec::constant("Value", Value::Vec3([0.0, 0.0, 0.0]))),
    );

    // ========================================================================
    // Operations
    // ========================================================================

    registry.register(
        NodeSchema::new("float_add", "Add Float", "Add two floats together", "Operations")
            .with_port(PortSpec::input("X", DataType::Float))
            .with_port(PortSpec::input("Y", DataType::Float))
            .with_port(PortSpec::output("Result", DataType::Float)),
    );

    registry.register(
        NodeSchema::new(
            "float_sub",
            "Subtract Float",
            "Subtract one float from another",
            "Operations",
        )
        .with_port(PortSpec::input("X", DataType::Float))
        .with_port(PortSpec::input("Y", DataType::Float))
        .with_port(PortSpec::output("Result", DataType::Float)),
    );

    registry.register(
        NodeSchema::new("vec3_add", "Add Vector3", "Add two vectors together", "Operations")
            .with_port(PortSpec::input("X", DataType::Vec3))
            .with_port(PortSpec::input("Y", DataType::Vec3))
            .with_port(PortSpec::output("Result", DataType::Vec3)),
    );

    // ========================================================================
    // Generic
    // ========================================================================

    registry.register(
        NodeSchema::new(
            "float_passthrough",
            "Float Input",
            "Forwards a float from elsewhere in the graph",
            "Generic",
        )
        .with_port(PortSpec::input("Float", DataType::Float))
        .with_port(PortSpec::output("Out", DataType::Float)),
    );

    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_has_expected_types() {
        let registry = create_mix_registry();
        for id in [
            "track",
            "output",
            "float_constant",
            "vec3_constant",
            "float_add",
            "float_sub",
            "vec3_add",
            "float_passthrough",
        ] {
            assert!(registry.get(id).is_some(), "missing schema `{id}`");
        }
    }

    #[test]
    fn test_groups_cover_menu_sections() {
        let registry = create_mix_registry();
        assert_eq!(registry.schemas_in_group("Audio").count(), 2);
        assert_eq!(registry.schemas_in_group("Inputs").count(), 2);
        assert_eq!(registry.schemas_in_group("Operations").count(), 3);
    }

    #[test]
    fn test_track_output_types_line_up() {
        let registry = create_mix_registry();
        let track = registry.get("track").unwrap();
        let output = registry.get("output").unwrap();

        assert_eq!(track.port("Output").unwrap().data_type, DataType::Audio);
        assert_eq!(output.port("Input").unwrap().data_type, DataType::Audio);
    }
}
