//! # protocolgen Schema
//!
//! Protocol JSON schema loading and type resolution.
//!
//! This crate provides:
//! - Typed records for protocol domains, types, commands and events
//! - Qualification of relative type references
//! - Structural validation
//! - The type descriptor registry and property resolver used by code emission

pub mod descriptor;
pub mod error;
pub mod normalize;
pub mod parser;
pub mod registry;
pub mod resolver;
pub mod types;
pub mod validation;

pub use descriptor::TypeDescriptor;
pub use error::{ParseError, SchemaError};
pub use normalize::normalize;
pub use parser::{parse_protocol, parse_protocol_file};
pub use registry::{RegistryBuilder, TypeDescriptorRegistry};
pub use resolver::TypeResolver;
pub use types::{
    Command, Domain, Event, PrimitiveKind, Property, PropertyKind, Protocol, TypeDeclaration,
    TypeKind,
};
pub use validation::validate_protocol;

/// A normalized protocol together with its descriptor registry.
#[derive(Debug, Clone)]
pub struct LoadedProtocol {
    /// Protocol with every reference qualified.
    pub protocol: Protocol,
    /// Frozen descriptor registry.
    pub registry: TypeDescriptorRegistry,
}

/// Loads a protocol from JSON and prepares it for emission.
///
/// Parses, qualifies references, validates structure, bootstraps the
/// registry and resolves every declared property once.
///
/// # Errors
/// Returns `SchemaError` if any stage fails.
pub fn load_protocol(json: &str) -> Result<LoadedProtocol, SchemaError> {
    let mut protocol = parse_protocol(json)?;
    normalize(&mut protocol);
    validate_protocol(&protocol)?;
    let registry = TypeDescriptorRegistry::bootstrap(&protocol)?;
    registry.resolver().verify_references(&protocol)?;
    Ok(LoadedProtocol { protocol, registry })
}
