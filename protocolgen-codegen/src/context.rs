//! Emission context handed to renderers.

use crate::artifact::Artifact;
use protocolgen_schema::{
    Property, Protocol, SchemaError, TypeDescriptor, TypeDescriptorRegistry,
};
use serde::Serialize;
use serde_json::Value;
use std::borrow::Cow;

/// Everything a template may consult while rendering one artifact.
#[derive(Debug, Clone, Copy)]
pub struct EmissionContext<'a> {
    artifact: Artifact,
    protocol: &'a Protocol,
    registry: &'a TypeDescriptorRegistry,
}

impl<'a> EmissionContext<'a> {
    /// Creates a context for `artifact`.
    #[must_use]
    pub fn new(
        artifact: Artifact,
        protocol: &'a Protocol,
        registry: &'a TypeDescriptorRegistry,
    ) -> Self {
        Self {
            artifact,
            protocol,
            registry,
        }
    }

    /// Returns the artifact being rendered.
    #[must_use]
    pub const fn artifact(&self) -> Artifact {
        self.artifact
    }

    /// Returns the artifact class name.
    #[must_use]
    pub const fn class_name(&self) -> &'static str {
        self.artifact.name()
    }

    /// Returns the normalized protocol.
    #[must_use]
    pub const fn protocol(&self) -> &'a Protocol {
        self.protocol
    }

    /// Resolves a property to its descriptor.
    ///
    /// # Errors
    /// Returns `SchemaError::UnresolvedType` if a referenced type is unknown.
    pub fn resolve_type(
        &self,
        property: &Property,
    ) -> Result<Cow<'a, TypeDescriptor>, SchemaError> {
        self.registry.resolve(property)
    }

    /// Looks up a descriptor by primitive or qualified name.
    ///
    /// # Errors
    /// Returns `SchemaError::UnresolvedType` if `name` is not registered.
    pub fn type_definition(&self, name: &str) -> Result<&'a TypeDescriptor, SchemaError> {
        self.registry.type_definition(name)
    }

    /// Returns the data templates render against.
    #[must_use]
    pub fn template_data(&self) -> TemplateData<'a> {
        TemplateData {
            class_name: self.class_name(),
            api: self.protocol,
        }
    }
}

/// Root object of every template.
#[derive(Debug, Serialize)]
pub struct TemplateData<'a> {
    /// Artifact class name (`Dispatcher`, `Frontend`, `TypeBuilder`).
    pub class_name: &'static str,
    /// The normalized protocol.
    pub api: &'a Protocol,
}

/// Concatenates the list-valued fields of `mapping` named by `keys`.
///
/// Keys are taken in order; absent keys and non-list values are skipped.
#[must_use]
pub fn join_arrays(mapping: &Value, keys: &[&str]) -> Vec<Value> {
    keys.iter()
        .filter_map(|key| mapping.get(key).and_then(Value::as_array))
        .flat_map(|items| items.iter().cloned())
        .collect()
}

/// Upper-cases the first character of `name`.
#[must_use]
pub fn to_title_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Converts a dash-separated word to CamelCase.
///
/// Empty pieces (from leading, trailing or doubled dashes) are kept as `-`.
#[must_use]
pub fn dash_to_camelcase(word: &str) -> String {
    word.split('-')
        .map(|piece| {
            if piece.is_empty() {
                "-".to_string()
            } else {
                to_title_case(piece)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use protocolgen_schema::{PrimitiveKind, load_protocol};
    use serde_json::json;

    #[test]
    fn test_join_arrays() {
        let command = json!({
            "name": "navigate",
            "parameters": [{"name": "url"}],
            "returns": [{"name": "frameId"}, {"name": "loaderId"}]
        });

        let joined = join_arrays(&command, &["parameters", "returns"]);
        let names: Vec<_> = joined.iter().map(|p| p["name"].as_str()).collect();
        assert_eq!(names, vec![Some("url"), Some("frameId"), Some("loaderId")]);
    }

    #[test]
    fn test_join_arrays_skips_missing_keys() {
        let event = json!({"name": "loaded", "parameters": [{"name": "timestamp"}], "name2": 1});

        assert_eq!(join_arrays(&event, &["returns", "parameters", "name2"]).len(), 1);
        assert!(join_arrays(&event, &[]).is_empty());
        assert!(join_arrays(&json!([1, 2]), &["parameters"]).is_empty());
    }

    #[test]
    fn test_to_title_case() {
        assert_eq!(to_title_case("dispatcher"), "Dispatcher");
        assert_eq!(to_title_case("DOM"), "DOM");
        assert_eq!(to_title_case(""), "");
    }

    #[test]
    fn test_dash_to_camelcase() {
        assert_eq!(dash_to_camelcase("after-load"), "AfterLoad");
        assert_eq!(dash_to_camelcase("shadow-root-type"), "ShadowRootType");
        assert_eq!(dash_to_camelcase("plain"), "Plain");
        assert_eq!(dash_to_camelcase("-webkit-box"), "-WebkitBox");
    }

    #[test]
    fn test_context_lookups() {
        let loaded = load_protocol(
            r#"{"domains": [{"domain": "Page", "types": [{"id": "Frame", "type": "object"}]}]}"#,
        )
        .expect("Failed to load");
        let context = EmissionContext::new(Artifact::Frontend, &loaded.protocol, &loaded.registry);

        assert_eq!(context.class_name(), "Frontend");
        assert_eq!(
            context.type_definition("Page.Frame").expect("Frame").raw_type,
            "protocol::Page::Frame"
        );
        assert!(context.type_definition("Frame").is_err());
        assert_eq!(
            context
                .resolve_type(&Property::primitive(PrimitiveKind::Number))
                .expect("Failed to resolve")
                .pass_type,
            "double"
        );

        let data = serde_json::to_value(context.template_data()).expect("Failed to serialize");
        assert_eq!(data["class_name"], "Frontend");
        assert_eq!(data["api"]["domains"][0]["domain"], "Page");
    }
}
