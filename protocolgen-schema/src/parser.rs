//! Protocol JSON schema loader.
//!
//! This module turns a protocol JSON document into the typed records of
//! [`crate::types`]. All shape checking of the input happens here.

use crate::error::ParseError;
use crate::types::Protocol;
use std::path::Path;

/// Parses a protocol schema from a JSON string.
///
/// # Arguments
/// * `json` - Schema content
///
/// # Returns
/// Parsed protocol or parse error.
///
/// # Errors
/// Returns `ParseError` if the JSON is malformed or a record has an
/// unexpected shape.
pub fn parse_protocol(json: &str) -> Result<Protocol, ParseError> {
    let value: serde_json::Value = serde_json::from_str(json)?;

    if value.get("domains").is_none_or(|d| !d.is_array()) {
        return Err(ParseError::invalid_structure(
            "top-level 'domains' array not found",
        ));
    }

    let protocol: Protocol = serde_json::from_value(value)?;
    tracing::debug!(domains = protocol.domains.len(), "parsed protocol schema");
    Ok(protocol)
}

/// Parses a protocol schema from a file.
///
/// # Errors
/// Returns `ParseError` if the file cannot be read or parsed.
pub fn parse_protocol_file(path: &Path) -> Result<Protocol, ParseError> {
    let json = std::fs::read_to_string(path)?;
    parse_protocol(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PrimitiveKind, PropertyKind, TypeKind};

    const SIMPLE_SCHEMA: &str = r#"{
    "version": {"major": "1", "minor": "1"},
    "domains": [
        {
            "domain": "Page",
            "description": "Actions and events related to the inspected page.",
            "types": [
                {"id": "FrameId", "type": "string"},
                {
                    "id": "Frame",
                    "type": "object",
                    "properties": [
                        {"name": "id", "$ref": "FrameId"},
                        {"name": "url", "type": "string"}
                    ]
                }
            ],
            "commands": [
                {"name": "enable"},
                {
                    "name": "navigate",
                    "parameters": [{"name": "url", "type": "string"}],
                    "returns": [{"name": "frameId", "$ref": "FrameId"}]
                }
            ],
            "events": [
                {"name": "frameNavigated", "parameters": [{"name": "frame", "$ref": "Frame"}]}
            ]
        },
        {"domain": "Inspector"}
    ]
}"#;

    #[test]
    fn test_parse_simple_schema() {
        let protocol = parse_protocol(SIMPLE_SCHEMA).expect("Failed to parse schema");

        assert_eq!(protocol.domains.len(), 2);
        assert_eq!(protocol.domains[0].name, "Page");
        assert_eq!(protocol.domains[1].name, "Inspector");
        assert!(protocol.extra.contains_key("version"));
    }

    #[test]
    fn test_parse_types() {
        let protocol = parse_protocol(SIMPLE_SCHEMA).expect("Failed to parse schema");
        let page = &protocol.domains[0];

        assert_eq!(page.types.len(), 2);
        assert_eq!(page.types[0].kind, TypeKind::Scalar(PrimitiveKind::String));
        assert!(page.types[1].is_object());
        assert_eq!(page.types[1].properties[0].type_ref(), Some("FrameId"));
    }

    #[test]
    fn test_parse_commands_and_events() {
        let protocol = parse_protocol(SIMPLE_SCHEMA).expect("Failed to parse schema");
        let page = &protocol.domains[0];

        assert_eq!(page.commands.len(), 2);
        assert!(page.commands[0].parameters.is_empty());
        assert_eq!(page.commands[1].returns.len(), 1);
        assert_eq!(
            page.commands[1].parameters[0].kind,
            PropertyKind::Primitive(PrimitiveKind::String)
        );
        assert_eq!(page.events[0].parameters[0].type_ref(), Some("Frame"));
    }

    #[test]
    fn test_parse_empty_domain() {
        let protocol = parse_protocol(SIMPLE_SCHEMA).expect("Failed to parse schema");
        let inspector = &protocol.domains[1];

        assert!(inspector.types.is_empty());
        assert!(inspector.commands.is_empty());
        assert!(inspector.events.is_empty());
    }

    #[test]
    fn test_parse_missing_domains() {
        let result = parse_protocol(r#"{"version": {}}"#);
        assert!(matches!(result, Err(ParseError::InvalidStructure { .. })));
    }

    #[test]
    fn test_parse_malformed_json() {
        let result = parse_protocol(r#"{"domains": ["#);
        assert!(matches!(result, Err(ParseError::Json(_))));
    }

    #[test]
    fn test_parse_domain_without_name() {
        let result = parse_protocol(r#"{"domains": [{"types": []}]}"#);
        assert!(matches!(result, Err(ParseError::Json(_))));
    }

    #[test]
    fn test_parse_bad_property_shape() {
        let result = parse_protocol(
            r#"{"domains": [{"domain": "A", "commands": [{"name": "c", "parameters": [{"name": "p"}]}]}]}"#,
        );
        assert!(result.is_err());
    }
}
