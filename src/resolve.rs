//! The slow path behind the access cache.
use crate::{
    error::MemberResolutionError,
    types::{
        members::{FieldDescription, MethodDescription, PropertyDescription},
        TypeDescription,
    },
};
use tracing::debug;

/// Authoritative member search against a type's own declared members.
///
/// `Ok(None)` means the member does not exist and is cached as such;
/// `Err` is a fault and is never cached.
pub trait MemberResolver: Send + Sync {
    fn resolve_declared_field(
        &self,
        ty: TypeDescription,
        name: &str,
    ) -> Result<Option<FieldDescription>, MemberResolutionError>;

    fn resolve_declared_property(
        &self,
        ty: TypeDescription,
        name: &str,
    ) -> Result<Option<PropertyDescription>, MemberResolutionError>;

    /// Finds the method (or constructor) named `name` whose parameter types
    /// match `argument_types` exactly, in order and count.
    fn resolve_declared_method(
        &self,
        ty: TypeDescription,
        name: &str,
        argument_types: &[TypeDescription],
    ) -> Result<Option<MethodDescription>, MemberResolutionError>;
}

/// Resolves members by scanning the declared metadata of the queried type.
/// Inherited members are not considered.
#[derive(Debug, Default, Clone, Copy)]
pub struct DeclaredMemberResolver;

impl DeclaredMemberResolver {
    pub fn new() -> Self {
        Self
    }
}

/// Returns the only candidate; zero or several matches yield `None`.
fn single_match<T>(
    ty: TypeDescription,
    kind: &str,
    name: &str,
    mut candidates: impl Iterator<Item = T>,
) -> Option<T> {
    let first = candidates.next()?;
    if candidates.next().is_some() {
        debug!(
            "ambiguous {} {} on {}, treating as not found",
            kind,
            name,
            ty.type_name()
        );
        return None;
    }
    Some(first)
}

impl MemberResolver for DeclaredMemberResolver {
    fn resolve_declared_field(
        &self,
        ty: TypeDescription,
        name: &str,
    ) -> Result<Option<FieldDescription>, MemberResolutionError> {
        let candidates = ty.definition().fields.iter().filter(|f| f.name == name);
        Ok(single_match(ty, "field", name, candidates)
            .map(|field| FieldDescription { parent: ty, field }))
    }

    fn resolve_declared_property(
        &self,
        ty: TypeDescription,
        name: &str,
    ) -> Result<Option<PropertyDescription>, MemberResolutionError> {
        let candidates = ty
            .definition()
            .properties
            .iter()
            .filter(|p| p.name == name);
        Ok(single_match(ty, "property", name, candidates)
            .map(|property| PropertyDescription { parent: ty, property }))
    }

    fn resolve_declared_method(
        &self,
        ty: TypeDescription,
        name: &str,
        argument_types: &[TypeDescription],
    ) -> Result<Option<MethodDescription>, MemberResolutionError> {
        let candidates = ty
            .definition()
            .methods
            .iter()
            .filter(|m| m.name == name && m.parameters.as_slice() == argument_types);
        Ok(single_match(ty, "method", name, candidates)
            .map(|method| MethodDescription { parent: ty, method }))
    }
}
