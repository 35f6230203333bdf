//! Runtime representation of types and their declared members.
//!
//! ## Core Types
//!
//! - **[`TypeDefinition`]**: declared metadata of one type, leaked to `'static`.
//! - **[`TypeDescription`]**: copyable identity handle to a loaded definition.
//! - **[`FieldDescription`](members::FieldDescription)**,
//!   **[`PropertyDescription`](members::PropertyDescription)**,
//!   **[`MethodDescription`](members::MethodDescription)**: handles to resolved members.
use crate::types::members::{Field, Method, MethodDescription, Property, CONSTRUCTOR_NAME};
use std::{
    fmt::{Debug, Formatter},
    hash::{Hash, Hasher},
    ptr,
};

pub mod members;

/// Declared metadata of a single type.
///
/// Definitions are immutable once leaked; every handle into them
/// (types and members alike) is a `'static` borrow.
#[derive(Debug, Default)]
pub struct TypeDefinition {
    pub namespace: Option<String>,
    pub name: String,
    pub value_type: bool,
    /// The type this one extends. Its members are not declared here.
    pub base_type: Option<TypeDescription>,
    pub fields: Vec<Field>,
    pub properties: Vec<Property>,
    pub methods: Vec<Method>,
}

impl TypeDefinition {
    pub fn new(namespace: Option<&str>, name: &str) -> Self {
        Self {
            namespace: namespace.map(str::to_string),
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn value_type(mut self) -> Self {
        self.value_type = true;
        self
    }

    pub fn extends(mut self, base: TypeDescription) -> Self {
        self.base_type = Some(base);
        self
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    pub fn method(mut self, method: Method) -> Self {
        self.methods.push(method);
        self
    }

    pub fn type_name(&self) -> String {
        match self.namespace.as_deref() {
            None | Some("") => self.name.clone(),
            Some(ns) => format!("{ns}.{}", self.name),
        }
    }

    /// Moves the definition into process-lifetime storage and returns its identity.
    pub fn leak(self) -> TypeDescription {
        TypeDescription::new(Box::leak(Box::new(self)))
    }
}

/// Identity of a loaded type.
///
/// Two descriptions are equal only if they point at the same definition;
/// structurally identical definitions leaked separately never alias.
#[derive(Clone, Copy)]
pub struct TypeDescription {
    definition: &'static TypeDefinition,
}

impl TypeDescription {
    pub const fn new(definition: &'static TypeDefinition) -> Self {
        Self { definition }
    }

    pub const fn definition(&self) -> &'static TypeDefinition {
        self.definition
    }

    pub fn type_name(&self) -> String {
        self.definition.type_name()
    }

    pub fn base_type(&self) -> Option<TypeDescription> {
        self.definition.base_type
    }

    /// 32-bit hash of the type's identity, stable for the lifetime of the process.
    pub fn identity_hash(&self) -> u32 {
        let addr = ptr::from_ref(self.definition) as usize as u64;
        (addr ^ (addr >> 32)) as u32
    }

    pub fn constructors(&self) -> impl Iterator<Item = MethodDescription> + '_ {
        let parent = *self;
        self.definition
            .methods
            .iter()
            .filter(|m| m.runtime_special_name && m.instance && m.name == CONSTRUCTOR_NAME)
            .map(move |method| MethodDescription { parent, method })
    }
}

impl Debug for TypeDescription {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

impl PartialEq for TypeDescription {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.definition, other.definition)
    }
}

impl Eq for TypeDescription {}

impl Hash for TypeDescription {
    fn hash<H: Hasher>(&self, state: &mut H) {
        ptr::hash(self.definition, state);
    }
}
