//! Type descriptors.
//!
//! A [`TypeDescriptor`] bundles the C++ code shapes a protocol type takes in
//! generated sources: how it is returned, passed, stored, and how a stored
//! value is converted to its raw or passed form. Conversions are templates
//! with a single `%s` placeholder applied to an expression.

use crate::types::PrimitiveKind;
use serde::Serialize;

/// Placeholder substituted by [`apply_template`].
pub const PLACEHOLDER: &str = "%s";

/// Code shapes of one protocol type.
///
/// Serialized field names are the ones templates use; `storage_type` is
/// exposed as `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeDescriptor {
    /// Type returned from getters and builders.
    pub return_type: String,
    /// Type of a function argument.
    pub pass_type: String,
    /// Type of a member holding the value.
    #[serde(rename = "type")]
    pub storage_type: String,
    /// Unwrapped value type.
    pub raw_type: String,
    /// Unwrapped argument type.
    pub raw_pass_type: String,
    /// Unwrapped return type.
    pub raw_return_type: String,
    /// Converts a stored value to its raw form.
    pub to_raw_type: String,
    /// Converts a stored value to its passed form.
    pub to_pass_type: String,
    /// Expression creating an empty array (arrays only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_type: Option<String>,
    /// Output parameter type (arrays only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_type: Option<String>,
}

impl TypeDescriptor {
    /// Builds a descriptor whose every role uses the same value type.
    fn by_value(value: &str, pass: &str) -> Self {
        Self {
            return_type: value.to_string(),
            pass_type: pass.to_string(),
            storage_type: value.to_string(),
            raw_type: value.to_string(),
            raw_pass_type: pass.to_string(),
            raw_return_type: value.to_string(),
            to_raw_type: PLACEHOLDER.to_string(),
            to_pass_type: PLACEHOLDER.to_string(),
            create_type: None,
            out_type: None,
        }
    }

    /// Builds a descriptor for a ref-counted protocol value class.
    fn ref_counted(class: &str) -> Self {
        let pass = format!("PassRefPtr<{class}>");
        let stored = format!("RefPtr<{class}>");
        Self {
            return_type: pass.clone(),
            pass_type: pass.clone(),
            storage_type: stored.clone(),
            raw_type: stored.clone(),
            raw_pass_type: pass,
            raw_return_type: stored,
            to_raw_type: PLACEHOLDER.to_string(),
            to_pass_type: "%s.release()".to_string(),
            create_type: None,
            out_type: None,
        }
    }

    /// Builds a descriptor for an owned class `raw`.
    fn owned(raw: String) -> Self {
        Self {
            return_type: format!("PassOwnPtr<{raw}>"),
            pass_type: format!("PassOwnPtr<{raw}>"),
            storage_type: format!("OwnPtr<{raw}>"),
            raw_pass_type: format!("{raw}*"),
            raw_return_type: format!("{raw}*"),
            raw_type: raw,
            to_raw_type: "%s.get()".to_string(),
            to_pass_type: "%s.release()".to_string(),
            create_type: None,
            out_type: None,
        }
    }

    /// Returns the descriptor of a primitive or pseudo kind.
    #[must_use]
    pub fn primitive(kind: PrimitiveKind) -> Self {
        match kind {
            PrimitiveKind::String => Self::by_value("String", "const String&"),
            PrimitiveKind::Number => Self::by_value("double", "double"),
            PrimitiveKind::Integer => Self::by_value("int", "int"),
            PrimitiveKind::Boolean => Self::by_value("bool", "bool"),
            PrimitiveKind::Object => Self::ref_counted("protocol::DictionaryValue"),
            PrimitiveKind::Any => Self::ref_counted("protocol::Value"),
        }
    }

    /// Returns the descriptor of a named object type declared in `domain`.
    ///
    /// Only the qualified name is embedded; the type's members do not
    /// affect its shapes.
    #[must_use]
    pub fn user_type(domain: &str, id: &str) -> Self {
        Self::owned(format!("protocol::{domain}::{id}"))
    }

    /// Returns the descriptor of an array of `item`.
    ///
    /// This is a pure function of the item descriptor: equal items yield
    /// equal arrays.
    #[must_use]
    pub fn array_of(item: &Self) -> Self {
        let raw = format!("protocol::Array<{}>", item.raw_type);
        let create_type = Some(format!("adoptPtr(new {raw}())"));
        let out_type = Some(format!("{raw}&"));
        Self {
            create_type,
            out_type,
            ..Self::owned(raw)
        }
    }

    /// Returns true if this descriptor describes an array.
    #[must_use]
    pub const fn is_array(&self) -> bool {
        self.create_type.is_some()
    }

    /// Applies the raw conversion to an expression.
    #[must_use]
    pub fn to_raw(&self, expr: &str) -> String {
        apply_template(&self.to_raw_type, expr)
    }

    /// Applies the pass conversion to an expression.
    #[must_use]
    pub fn to_pass(&self, expr: &str) -> String {
        apply_template(&self.to_pass_type, expr)
    }
}

/// Substitutes `expr` for the first `%s` in `template`.
#[must_use]
pub fn apply_template(template: &str, expr: &str) -> String {
    template.replacen(PLACEHOLDER, expr, 1)
}
