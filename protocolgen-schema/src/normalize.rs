//! Reference qualification.
//!
//! Schemas refer to sibling types by bare name (`"$ref": "Frame"`). Before
//! descriptors can be looked up every reference is rewritten to its
//! qualified `domain.type` form, using the enclosing domain as qualifier.
//! References that already carry a qualifier are left as they are.

use crate::types::{
    Command, Domain, Event, Property, PropertyKind, Protocol, TypeDeclaration, TypeKind,
};

/// Mutable visitor over the typed schema tree.
///
/// Only the known container fields are walked: declaration `items` and
/// `properties`, command `parameters` and `returns`, event `parameters`,
/// nested array `items` and inline object `properties`.
pub trait VisitMut {
    /// Visits a domain.
    fn visit_domain_mut(&mut self, domain: &mut Domain) {
        walk_domain_mut(self, domain);
    }

    /// Visits a type declaration.
    fn visit_type_mut(&mut self, decl: &mut TypeDeclaration) {
        walk_type_mut(self, decl);
    }

    /// Visits a command.
    fn visit_command_mut(&mut self, command: &mut Command) {
        for p in &mut command.parameters {
            self.visit_property_mut(p);
        }
        for p in &mut command.returns {
            self.visit_property_mut(p);
        }
    }

    /// Visits an event.
    fn visit_event_mut(&mut self, event: &mut Event) {
        for p in &mut event.parameters {
            self.visit_property_mut(p);
        }
    }

    /// Visits a property.
    fn visit_property_mut(&mut self, property: &mut Property) {
        walk_property_mut(self, property);
    }
}

/// Walks the declarations of a domain.
pub fn walk_domain_mut<V: VisitMut + ?Sized>(visitor: &mut V, domain: &mut Domain) {
    for decl in &mut domain.types {
        visitor.visit_type_mut(decl);
    }
    for command in &mut domain.commands {
        visitor.visit_command_mut(command);
    }
    for event in &mut domain.events {
        visitor.visit_event_mut(event);
    }
}

/// Walks the item and member properties of a type declaration.
pub fn walk_type_mut<V: VisitMut + ?Sized>(visitor: &mut V, decl: &mut TypeDeclaration) {
    if let TypeKind::Array(items) = &mut decl.kind {
        visitor.visit_property_mut(items);
    }
    for p in &mut decl.properties {
        visitor.visit_property_mut(p);
    }
}

/// Walks into the items of an inline array and the members of an inline
/// object.
pub fn walk_property_mut<V: VisitMut + ?Sized>(visitor: &mut V, property: &mut Property) {
    if let PropertyKind::Array(items) = &mut property.kind {
        visitor.visit_property_mut(items);
    }
    for p in &mut property.properties {
        visitor.visit_property_mut(p);
    }
}

/// Qualifies bare references with one domain's name.
struct Qualifier<'a> {
    domain: &'a str,
    rewritten: usize,
}

impl VisitMut for Qualifier<'_> {
    fn visit_property_mut(&mut self, property: &mut Property) {
        if let PropertyKind::Reference(reference) = &mut property.kind {
            if !reference.contains('.') {
                *reference = format!("{}.{}", self.domain, reference);
                self.rewritten += 1;
            }
        }
        walk_property_mut(self, property);
    }
}

/// Rewrites every bare `$ref` in the protocol to `domain.type`.
///
/// Running it again on an already normalized protocol changes nothing.
pub fn normalize(protocol: &mut Protocol) {
    for domain in &mut protocol.domains {
        let name = domain.name.clone();
        let mut qualifier = Qualifier {
            domain: &name,
            rewritten: 0,
        };
        qualifier.visit_domain_mut(domain);
        tracing::debug!(
            domain = %name,
            rewritten = qualifier.rewritten,
            "qualified type references"
        );
    }
}

/// Returns true if every `$ref` in the protocol carries a qualifier.
#[must_use]
pub fn is_normalized(protocol: &Protocol) -> bool {
    let mut refs = Vec::new();
    for domain in &protocol.domains {
        crate::validation::collect_references(domain, &mut refs);
    }
    refs.iter().all(|r| r.contains('.'))
}
