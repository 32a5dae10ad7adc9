//! Property type resolution.

use crate::descriptor::TypeDescriptor;
use crate::error::SchemaError;
use crate::registry::TypeDescriptorRegistry;
use crate::types::{Property, PropertyKind, Protocol};
use std::borrow::Cow;
use std::collections::HashMap;

/// Resolves properties against a frozen registry.
#[derive(Debug, Clone, Copy)]
pub struct TypeResolver<'a> {
    registry: &'a TypeDescriptorRegistry,
}

impl<'a> TypeResolver<'a> {
    /// Creates a resolver over `registry`.
    #[must_use]
    pub fn new(registry: &'a TypeDescriptorRegistry) -> Self {
        Self { registry }
    }

    /// Returns the underlying registry.
    #[must_use]
    pub fn registry(&self) -> &'a TypeDescriptorRegistry {
        self.registry
    }

    /// Resolves a property to its descriptor.
    ///
    /// References and primitive kinds borrow the registered descriptor.
    /// Inline arrays are synthesized from their resolved items on every
    /// call and never stored.
    ///
    /// # Errors
    /// Returns `SchemaError::UnresolvedType` if a referenced type is unknown.
    pub fn resolve(
        &self,
        property: &Property,
    ) -> Result<Cow<'a, TypeDescriptor>, SchemaError> {
        self.registry.resolve(property)
    }

    /// Resolves every property declared anywhere in the protocol.
    ///
    /// Array items and inline object members are resolved on their own as
    /// well. Returns the number of properties resolved.
    ///
    /// # Errors
    /// Returns the first resolution failure, in declaration order.
    pub fn verify_references(&self, protocol: &Protocol) -> Result<usize, SchemaError> {
        let mut resolved = 0;
        for domain in &protocol.domains {
            for property in domain.properties() {
                resolved += self.verify_property(property)?;
            }
        }
        tracing::debug!(resolved, "verified type references");
        Ok(resolved)
    }

    fn verify_property(&self, property: &Property) -> Result<usize, SchemaError> {
        self.resolve(property)?;
        let mut resolved = 1;
        if let PropertyKind::Array(items) = &property.kind {
            resolved += self.verify_property(items)?;
        }
        for member in &property.properties {
            resolved += self.verify_property(member)?;
        }
        Ok(resolved)
    }
}

/// Resolves a property against a descriptor table.
pub(crate) fn resolve_in<'a>(
    table: &'a HashMap<String, TypeDescriptor>,
    property: &Property,
) -> Result<Cow<'a, TypeDescriptor>, SchemaError> {
    let name = match &property.kind {
        PropertyKind::Reference(name) => name.as_str(),
        PropertyKind::Array(items) => {
            let item = resolve_in(table, items)?;
            return Ok(Cow::Owned(TypeDescriptor::array_of(&item)));
        }
        PropertyKind::Primitive(kind) => kind.name(),
    };

    table
        .get(name)
        .map(Cow::Borrowed)
        .ok_or_else(|| SchemaError::unresolved(name))
}
