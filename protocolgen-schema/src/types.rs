//! Schema type definitions.
//!
//! This module contains the typed records a protocol schema is loaded into:
//! domains, type declarations, commands, events and properties. Keys the
//! generator does not interpret (descriptions, `optional`, `enum`, handler
//! hints, ...) are kept in each record's `extra` map so that templates still
//! see the complete document.

use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Complete protocol schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Protocol {
    /// Domains in declaration order.
    pub domains: Vec<Domain>,
    /// Other top-level keys (e.g. `version`).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Protocol {
    /// Creates a protocol from a list of domains.
    #[must_use]
    pub fn new(domains: Vec<Domain>) -> Self {
        Self {
            domains,
            extra: Map::new(),
        }
    }

    /// Looks up a domain by name.
    #[must_use]
    pub fn domain(&self, name: &str) -> Option<&Domain> {
        self.domains.iter().find(|d| d.name == name)
    }

    /// Looks up a type declaration by its qualified `domain.id` name.
    #[must_use]
    pub fn get_type(&self, qualified: &str) -> Option<&TypeDeclaration> {
        let (domain, id) = qualified.split_once('.')?;
        self.domain(domain)?.types.iter().find(|t| t.id == id)
    }
}

/// A named group of type, command and event declarations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    /// Domain name, the namespace of its own types.
    #[serde(rename = "domain")]
    pub name: String,
    /// Type declarations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<TypeDeclaration>,
    /// Command declarations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<Command>,
    /// Event declarations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<Event>,
    /// Other keys.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Domain {
    /// Creates an empty domain.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            types: Vec::new(),
            commands: Vec::new(),
            events: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Returns the qualified name of a type declared in this domain.
    #[must_use]
    pub fn qualify(&self, id: &str) -> String {
        format!("{}.{}", self.name, id)
    }

    /// Iterates over the top-level properties of every declaration, in
    /// declaration order: type items and members, then command parameters
    /// and returns, then event parameters. Nested array items are not
    /// included.
    pub fn properties(&self) -> impl Iterator<Item = &Property> {
        let types = self.types.iter().flat_map(|t| {
            let items = match &t.kind {
                TypeKind::Array(items) => Some(items.as_ref()),
                _ => None,
            };
            items.into_iter().chain(t.properties.iter())
        });
        let commands = self
            .commands
            .iter()
            .flat_map(|c| c.parameters.iter().chain(c.returns.iter()));
        let events = self.events.iter().flat_map(|e| e.parameters.iter());
        types.chain(commands).chain(events)
    }
}

/// A command with its parameters and return values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    /// Command name.
    pub name: String,
    /// Parameters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Property>,
    /// Return values.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub returns: Vec<Property>,
    /// Other keys.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Command {
    /// Creates a command without parameters or return values.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            returns: Vec::new(),
            extra: Map::new(),
        }
    }
}

/// An event with its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Event name.
    pub name: String,
    /// Parameters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Property>,
    /// Other keys.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Event {
    /// Creates an event without parameters.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            extra: Map::new(),
        }
    }
}

/// A type declared by a domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTypeDeclaration", into = "RawTypeDeclaration")]
pub struct TypeDeclaration {
    /// Identifier, unique within its domain.
    pub id: String,
    /// Declared kind.
    pub kind: TypeKind,
    /// Object members.
    pub properties: Vec<Property>,
    /// Other keys.
    pub extra: Map<String, Value>,
}

impl TypeDeclaration {
    /// Creates a declaration of the given kind.
    #[must_use]
    pub fn new(id: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            id: id.into(),
            kind,
            properties: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Returns true if this declares an object type.
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self.kind, TypeKind::Object)
    }

    /// Returns true if this declares an array type.
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self.kind, TypeKind::Array(_))
    }
}

/// Kind of a domain type declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    /// Named composite type.
    Object,
    /// Array of the given item property.
    Array(Box<Property>),
    /// Alias of a scalar primitive kind.
    Scalar(PrimitiveKind),
}

/// A property of an object type, command or event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawProperty", into = "RawProperty")]
pub struct Property {
    /// Property name; absent for array `items`.
    pub name: Option<String>,
    /// Referenced or inline type.
    pub kind: PropertyKind,
    /// Members of an inline object.
    pub properties: Vec<Property>,
    /// Other keys (`optional`, `description`, `enum`, ...).
    pub extra: Map<String, Value>,
}

impl Property {
    /// Creates an unnamed property referencing a type.
    #[must_use]
    pub fn reference(name: impl Into<String>) -> Self {
        Self::unnamed(PropertyKind::Reference(name.into()))
    }

    /// Creates an unnamed property of a primitive kind.
    #[must_use]
    pub fn primitive(kind: PrimitiveKind) -> Self {
        Self::unnamed(PropertyKind::Primitive(kind))
    }

    /// Creates an unnamed inline array property.
    #[must_use]
    pub fn array(items: Property) -> Self {
        Self::unnamed(PropertyKind::Array(Box::new(items)))
    }

    fn unnamed(kind: PropertyKind) -> Self {
        Self {
            name: None,
            kind,
            properties: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Sets the property name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the members of an inline object.
    #[must_use]
    pub fn with_properties(mut self, properties: Vec<Property>) -> Self {
        self.properties = properties;
        self
    }

    /// Returns the type reference, if this property carries one.
    #[must_use]
    pub fn type_ref(&self) -> Option<&str> {
        match &self.kind {
            PropertyKind::Reference(r) => Some(r),
            _ => None,
        }
    }
}

/// How a property names its type.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyKind {
    /// `$ref` to a declared type, qualified after normalization.
    Reference(String),
    /// Inline `array` with nested `items`.
    Array(Box<Property>),
    /// Inline primitive kind.
    Primitive(PrimitiveKind),
}

/// Primitive and pseudo kinds known to every schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// UTF-16 string.
    String,
    /// Floating point number.
    Number,
    /// 32-bit integer.
    Integer,
    /// Boolean.
    Boolean,
    /// Untyped JSON object.
    Object,
    /// Any JSON value.
    Any,
}

impl PrimitiveKind {
    /// All primitive kinds, in registry seeding order.
    pub const ALL: [Self; 6] = [
        Self::String,
        Self::Number,
        Self::Integer,
        Self::Boolean,
        Self::Object,
        Self::Any,
    ];

    /// Returns the schema name of this kind.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Any => "any",
        }
    }

    /// Parses a primitive kind from its schema name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(Self::String),
            "number" => Some(Self::Number),
            "integer" => Some(Self::Integer),
            "boolean" => Some(Self::Boolean),
            "object" => Some(Self::Object),
            "any" => Some(Self::Any),
            _ => None,
        }
    }
}

/// Wire form of [`Property`].
#[derive(Serialize, Deserialize)]
struct RawProperty {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    reference: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    items: Option<Box<Property>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    properties: Vec<Property>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl TryFrom<RawProperty> for Property {
    type Error = ParseError;

    fn try_from(mut raw: RawProperty) -> Result<Self, Self::Error> {
        let kind = match (raw.reference, raw.kind.as_deref()) {
            (Some(reference), shadowed) => {
                // `$ref` decides the kind; a `type` next to it is passed through.
                if let Some(kind) = shadowed {
                    raw.extra
                        .insert("type".to_string(), Value::String(kind.to_string()));
                }
                PropertyKind::Reference(reference)
            }
            (None, Some("array")) => {
                let items = raw.items.ok_or_else(|| {
                    ParseError::invalid_structure(format!(
                        "array property '{}' has no items",
                        raw.name.as_deref().unwrap_or("<items>")
                    ))
                })?;
                PropertyKind::Array(items)
            }
            (None, Some(name)) => PropertyKind::Primitive(
                PrimitiveKind::from_name(name).ok_or_else(|| {
                    ParseError::invalid_structure(format!("unknown property type '{name}'"))
                })?,
            ),
            (None, None) => {
                return Err(ParseError::invalid_structure(format!(
                    "property '{}' has neither $ref nor type",
                    raw.name.as_deref().unwrap_or("<items>")
                )));
            }
        };

        Ok(Self {
            name: raw.name,
            kind,
            properties: raw.properties,
            extra: raw.extra,
        })
    }
}

impl From<Property> for RawProperty {
    fn from(property: Property) -> Self {
        let (reference, kind, items) = match property.kind {
            PropertyKind::Reference(r) => (Some(r), None, None),
            PropertyKind::Array(items) => (None, Some("array".to_string()), Some(items)),
            PropertyKind::Primitive(p) => (None, Some(p.name().to_string()), None),
        };
        Self {
            name: property.name,
            reference,
            kind,
            items,
            properties: property.properties,
            extra: property.extra,
        }
    }
}

/// Wire form of [`TypeDeclaration`].
#[derive(Serialize, Deserialize)]
struct RawTypeDeclaration {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    items: Option<Box<Property>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    properties: Vec<Property>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl TryFrom<RawTypeDeclaration> for TypeDeclaration {
    type Error = ParseError;

    fn try_from(raw: RawTypeDeclaration) -> Result<Self, Self::Error> {
        let kind = match raw.kind.as_str() {
            "object" => TypeKind::Object,
            "array" => TypeKind::Array(raw.items.ok_or_else(|| {
                ParseError::invalid_structure(format!("array type '{}' has no items", raw.id))
            })?),
            other => TypeKind::Scalar(PrimitiveKind::from_name(other).ok_or_else(|| {
                ParseError::invalid_structure(format!(
                    "unknown kind '{other}' for type '{}'",
                    raw.id
                ))
            })?),
        };

        Ok(Self {
            id: raw.id,
            kind,
            properties: raw.properties,
            extra: raw.extra,
        })
    }
}

impl From<TypeDeclaration> for RawTypeDeclaration {
    fn from(decl: TypeDeclaration) -> Self {
        let (kind, items) = match decl.kind {
            TypeKind::Object => ("object".to_string(), None),
            TypeKind::Array(items) => ("array".to_string(), Some(items)),
            TypeKind::Scalar(p) => (p.name().to_string(), None),
        };
        Self {
            id: decl.id,
            kind,
            items,
            properties: decl.properties,
            extra: decl.extra,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_primitive_kind_from_name() {
        assert_eq!(PrimitiveKind::from_name("string"), Some(PrimitiveKind::String));
        assert_eq!(PrimitiveKind::from_name("any"), Some(PrimitiveKind::Any));
        assert_eq!(PrimitiveKind::from_name("array"), None);
        assert_eq!(PrimitiveKind::from_name("String"), None);
    }

    #[test]
    fn test_primitive_kind_name() {
        for kind in PrimitiveKind::ALL {
            assert_eq!(PrimitiveKind::from_name(kind.name()), Some(kind));
        }
    }

    #[test]
    fn test_property_reference_wins_over_type() {
        let p: Property =
            serde_json::from_value(json!({"name": "x", "$ref": "Frame", "type": "string"}))
                .expect("Failed to parse");
        assert_eq!(p.type_ref(), Some("Frame"));
        assert_eq!(p.name.as_deref(), Some("x"));
    }

    #[test]
    fn test_property_reference_keeps_shadowed_type() {
        let input = json!({"name": "x", "$ref": "Frame", "type": "string"});
        let p: Property = serde_json::from_value(input.clone()).expect("Failed to parse");

        assert_eq!(p.type_ref(), Some("Frame"));
        assert_eq!(serde_json::to_value(&p).expect("Failed to serialize"), input);
    }

    #[test]
    fn test_property_inline_object_members() {
        let input = json!({
            "name": "options",
            "type": "object",
            "properties": [
                {"name": "frame", "$ref": "Frame"},
                {"name": "depth", "type": "integer", "optional": true}
            ]
        });
        let p: Property = serde_json::from_value(input.clone()).expect("Failed to parse");

        assert_eq!(p.kind, PropertyKind::Primitive(PrimitiveKind::Object));
        assert_eq!(p.properties.len(), 2);
        assert_eq!(p.properties[0].type_ref(), Some("Frame"));
        assert_eq!(serde_json::to_value(&p).expect("Failed to serialize"), input);
    }

    #[test]
    fn test_property_inline_object_member_errors_surface() {
        let result = serde_json::from_value::<Property>(json!({
            "type": "object",
            "properties": [{"name": "broken"}]
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_property_nested_array() {
        let p: Property = serde_json::from_value(json!({
            "type": "array",
            "items": {"type": "array", "items": {"type": "integer"}}
        }))
        .expect("Failed to parse");

        let PropertyKind::Array(outer) = &p.kind else {
            panic!("expected array, got {:?}", p.kind);
        };
        let PropertyKind::Array(inner) = &outer.kind else {
            panic!("expected nested array, got {:?}", outer.kind);
        };
        assert_eq!(inner.kind, PropertyKind::Primitive(PrimitiveKind::Integer));
    }

    #[test]
    fn test_property_array_without_items() {
        let result = serde_json::from_value::<Property>(json!({"name": "xs", "type": "array"}));
        let err = result.unwrap_err().to_string();
        assert!(err.contains("has no items"), "{err}");
    }

    #[test]
    fn test_property_without_kind() {
        let result = serde_json::from_value::<Property>(json!({"name": "x"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_property_unknown_type() {
        let result = serde_json::from_value::<Property>(json!({"type": "float"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_property_keeps_extra_keys() {
        let input = json!({
            "name": "nodeId",
            "$ref": "DOM.NodeId",
            "optional": true,
            "description": "Node to highlight."
        });
        let p: Property = serde_json::from_value(input.clone()).expect("Failed to parse");
        assert_eq!(p.extra.get("optional"), Some(&json!(true)));
        assert_eq!(serde_json::to_value(&p).expect("Failed to serialize"), input);
    }

    #[test]
    fn test_type_declaration_kinds() {
        let object: TypeDeclaration = serde_json::from_value(json!({
            "id": "Frame",
            "type": "object",
            "properties": [{"name": "id", "type": "string"}]
        }))
        .expect("Failed to parse");
        assert!(object.is_object());
        assert_eq!(object.properties.len(), 1);

        let array: TypeDeclaration = serde_json::from_value(json!({
            "id": "Quad",
            "type": "array",
            "items": {"type": "number"}
        }))
        .expect("Failed to parse");
        assert!(array.is_array());

        let scalar: TypeDeclaration =
            serde_json::from_value(json!({"id": "NodeId", "type": "integer"}))
                .expect("Failed to parse");
        assert_eq!(scalar.kind, TypeKind::Scalar(PrimitiveKind::Integer));
    }

    #[test]
    fn test_type_declaration_unknown_kind() {
        let result =
            serde_json::from_value::<TypeDeclaration>(json!({"id": "X", "type": "tuple"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_protocol_type_lookup() {
        let mut domain = Domain::new("Page");
        domain
            .types
            .push(TypeDeclaration::new("Frame", TypeKind::Object));
        let protocol = Protocol::new(vec![domain]);

        assert!(protocol.get_type("Page.Frame").is_some());
        assert!(protocol.get_type("Page.Missing").is_none());
        assert!(protocol.get_type("Frame").is_none());
        assert_eq!(
            protocol.domain("Page").map(|d| d.qualify("Frame")),
            Some("Page.Frame".to_string())
        );
    }
}
