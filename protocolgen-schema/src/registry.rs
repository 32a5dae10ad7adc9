//! Type descriptor registry.
//!
//! The registry maps primitive kind names (`string`, `integer`, ...) and
//! qualified type names (`Page.Frame`) to their [`TypeDescriptor`]. It is
//! populated once through a [`RegistryBuilder`] and is read-only afterwards.

use crate::descriptor::TypeDescriptor;
use crate::error::SchemaError;
use crate::resolver::{TypeResolver, resolve_in};
use crate::types::{Domain, PrimitiveKind, Property, Protocol, TypeDeclaration, TypeKind};
use std::borrow::Cow;
use std::collections::HashMap;

/// Frozen table of type descriptors for one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptorRegistry {
    descriptors: HashMap<String, TypeDescriptor>,
}

impl TypeDescriptorRegistry {
    /// Builds the registry for a normalized protocol.
    ///
    /// Primitive kinds are seeded first. Declarations are then registered
    /// domain by domain in declaration order; an array declaration resolves
    /// its items against what has been registered so far, so an item type
    /// declared later in the schema is not found.
    ///
    /// # Errors
    /// Returns `SchemaError::UnresolvedType` if an array item type is not
    /// registered yet, or `SchemaError::DuplicateDefinition` if a qualified
    /// name is declared twice.
    pub fn bootstrap(protocol: &Protocol) -> Result<Self, SchemaError> {
        let mut builder = RegistryBuilder::with_primitives();

        for domain in &protocol.domains {
            for decl in &domain.types {
                builder.register_declaration(domain, decl)?;
            }
        }

        let registry = builder.build();
        tracing::debug!(
            descriptors = registry.len(),
            "type descriptor registry bootstrapped"
        );
        Ok(registry)
    }

    /// Looks up a descriptor by primitive or qualified name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TypeDescriptor> {
        self.descriptors.get(name)
    }

    /// Looks up a descriptor that must exist.
    ///
    /// # Errors
    /// Returns `SchemaError::UnresolvedType` if `name` is not registered.
    pub fn type_definition(&self, name: &str) -> Result<&TypeDescriptor, SchemaError> {
        self.get(name).ok_or_else(|| SchemaError::unresolved(name))
    }

    /// Returns true if a descriptor is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.descriptors.contains_key(name)
    }

    /// Returns the number of registered descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns true if no descriptor is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Returns all registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.descriptors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns a resolver over this registry.
    #[must_use]
    pub fn resolver(&self) -> TypeResolver<'_> {
        TypeResolver::new(self)
    }

    /// Resolves a property to its descriptor.
    ///
    /// # Errors
    /// Returns `SchemaError::UnresolvedType` if a referenced type is unknown.
    pub fn resolve<'a>(
        &'a self,
        property: &Property,
    ) -> Result<Cow<'a, TypeDescriptor>, SchemaError> {
        resolve_in(&self.descriptors, property)
    }
}

/// Append-only builder for a [`TypeDescriptorRegistry`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    descriptors: HashMap<String, TypeDescriptor>,
}

impl RegistryBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder seeded with the six primitive kinds.
    #[must_use]
    pub fn with_primitives() -> Self {
        let descriptors = PrimitiveKind::ALL
            .into_iter()
            .map(|kind| (kind.name().to_string(), TypeDescriptor::primitive(kind)))
            .collect();
        Self { descriptors }
    }

    /// Registers a descriptor under a new name.
    ///
    /// # Errors
    /// Returns `SchemaError::DuplicateDefinition` if `name` is taken.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        descriptor: TypeDescriptor,
    ) -> Result<(), SchemaError> {
        let name = name.into();
        if self.descriptors.contains_key(&name) {
            return Err(SchemaError::duplicate("type", name));
        }
        self.descriptors.insert(name, descriptor);
        Ok(())
    }

    /// Registers the descriptor of a domain type declaration.
    ///
    /// # Errors
    /// Returns `SchemaError::UnresolvedType` if an array item type is not
    /// registered yet, or `SchemaError::DuplicateDefinition` on a repeated
    /// qualified name.
    pub fn register_declaration(
        &mut self,
        domain: &Domain,
        decl: &TypeDeclaration,
    ) -> Result<(), SchemaError> {
        let descriptor = match &decl.kind {
            TypeKind::Object => TypeDescriptor::user_type(&domain.name, &decl.id),
            TypeKind::Array(items) => {
                let item = resolve_in(&self.descriptors, items)?;
                TypeDescriptor::array_of(&item)
            }
            TypeKind::Scalar(kind) => TypeDescriptor::primitive(*kind),
        };
        self.register(domain.qualify(&decl.id), descriptor)
    }

    /// Freezes the table.
    #[must_use]
    pub fn build(self) -> TypeDescriptorRegistry {
        TypeDescriptorRegistry {
            descriptors: self.descriptors,
        }
    }
}
