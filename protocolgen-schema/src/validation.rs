//! Schema validation utilities.
//!
//! Only structural checks live here: unique domain names, unique type ids
//! within a domain, and the `domain.type` shape of normalized references.
//! Whether a reference points at an existing type is decided by the
//! registry when it is resolved.

use crate::error::SchemaError;
use crate::types::{Domain, Property, PropertyKind, Protocol};
use std::collections::HashSet;

/// Validates a parsed and normalized protocol.
///
/// # Arguments
/// * `protocol` - The protocol to validate
///
/// # Returns
/// Ok(()) if valid, or SchemaError describing the issue.
///
/// # Errors
/// Returns `SchemaError` if validation fails.
pub fn validate_protocol(protocol: &Protocol) -> Result<(), SchemaError> {
    validate_domains(protocol)?;
    validate_references(protocol)?;
    Ok(())
}

/// Validates domain names and the type ids declared in each domain.
fn validate_domains(protocol: &Protocol) -> Result<(), SchemaError> {
    let mut seen_domains = HashSet::new();

    for domain in &protocol.domains {
        if !seen_domains.insert(domain.name.as_str()) {
            return Err(SchemaError::duplicate("domain", &domain.name));
        }

        let mut seen_types = HashSet::new();
        for decl in &domain.types {
            if !seen_types.insert(decl.id.as_str()) {
                return Err(SchemaError::duplicate("type", domain.qualify(&decl.id)));
            }
        }
    }

    Ok(())
}

/// Validates that every reference has exactly one `.` separating a
/// non-empty domain from a non-empty type id.
///
/// # Errors
/// Returns `SchemaError::MalformedReference` for the first offending
/// reference, in declaration order.
pub fn validate_references(protocol: &Protocol) -> Result<(), SchemaError> {
    for domain in &protocol.domains {
        let mut refs = Vec::new();
        collect_references(domain, &mut refs);

        for reference in refs {
            let well_formed = reference
                .split_once('.')
                .is_some_and(|(d, t)| !d.is_empty() && !t.is_empty() && !t.contains('.'));
            if !well_formed {
                return Err(SchemaError::MalformedReference {
                    domain: domain.name.clone(),
                    reference,
                });
            }
        }
    }

    Ok(())
}

/// Collects every `$ref` in a domain, including those nested in array items
/// and inline object members.
pub(crate) fn collect_references(domain: &Domain, refs: &mut Vec<String>) {
    for property in domain.properties() {
        collect_property_references(property, refs);
    }
}

fn collect_property_references(property: &Property, refs: &mut Vec<String>) {
    match &property.kind {
        PropertyKind::Reference(r) => refs.push(r.clone()),
        PropertyKind::Array(items) => collect_property_references(items, refs),
        PropertyKind::Primitive(_) => {}
    }
    for member in &property.properties {
        collect_property_references(member, refs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use crate::parser::parse_protocol;

    #[test]
    fn test_validate_valid_protocol() {
        let mut protocol = parse_protocol(
            r#"{"domains": [
                {"domain": "Page", "types": [{"id": "Frame", "type": "object"}],
                 "events": [{"name": "frameAttached", "parameters": [{"name": "frame", "$ref": "Frame"}]}]},
                {"domain": "DOM", "types": [{"id": "Frame", "type": "string"}]}
            ]}"#,
        )
        .expect("Failed to parse");
        normalize(&mut protocol);

        assert!(validate_protocol(&protocol).is_ok());
    }

    #[test]
    fn test_validate_duplicate_domain() {
        let protocol = parse_protocol(r#"{"domains": [{"domain": "Page"}, {"domain": "Page"}]}"#)
            .expect("Failed to parse");

        let result = validate_protocol(&protocol);
        assert!(matches!(
            result,
            Err(SchemaError::DuplicateDefinition { ref kind, ref name })
                if kind == "domain" && name == "Page"
        ));
    }

    #[test]
    fn test_validate_duplicate_type() {
        let protocol = parse_protocol(
            r#"{"domains": [{"domain": "Page", "types": [
                {"id": "Frame", "type": "object"},
                {"id": "Frame", "type": "string"}
            ]}]}"#,
        )
        .expect("Failed to parse");

        let result = validate_protocol(&protocol);
        assert!(matches!(
            result,
            Err(SchemaError::DuplicateDefinition { ref name, .. }) if name == "Page.Frame"
        ));
    }

    #[test]
    fn test_validate_malformed_reference() {
        let mut protocol = parse_protocol(
            r#"{"domains": [{"domain": "Page", "commands": [
                {"name": "c", "parameters": [{"name": "p", "type": "array", "items": {"$ref": "A.B.C"}}]}
            ]}]}"#,
        )
        .expect("Failed to parse");
        normalize(&mut protocol);

        let result = validate_protocol(&protocol);
        assert!(matches!(
            result,
            Err(SchemaError::MalformedReference { ref reference, .. }) if reference == "A.B.C"
        ));
    }

    #[test]
    fn test_validate_unnormalized_reference() {
        let protocol = parse_protocol(
            r#"{"domains": [{"domain": "Page", "events": [
                {"name": "e", "parameters": [{"name": "p", "$ref": "Frame"}]}
            ]}]}"#,
        )
        .expect("Failed to parse");

        assert!(validate_references(&protocol).is_err());
    }

    #[test]
    fn test_validate_malformed_reference_in_inline_object() {
        let protocol = parse_protocol(
            r#"{"domains": [{"domain": "Page", "commands": [
                {"name": "c", "parameters": [{"name": "opts", "type": "object", "properties": [
                    {"name": "p", "$ref": ".Frame"}
                ]}]}
            ]}]}"#,
        )
        .expect("Failed to parse");

        let result = validate_protocol(&protocol);
        assert!(matches!(
            result,
            Err(SchemaError::MalformedReference { ref reference, .. }) if reference == ".Frame"
        ));
    }
}
