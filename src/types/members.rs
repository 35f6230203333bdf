use crate::types::TypeDescription;
use std::{
    fmt::{Debug, Formatter},
    hash::{Hash, Hasher},
    ptr,
};

pub const CONSTRUCTOR_NAME: &str = ".ctor";
pub const STATIC_INITIALIZER_NAME: &str = ".cctor";

#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub field_type: TypeDescription,
    pub static_member: bool,
}

impl Field {
    pub fn new(name: &str, field_type: TypeDescription) -> Self {
        Self {
            name: name.to_string(),
            field_type,
            static_member: false,
        }
    }

    pub fn new_static(name: &str, field_type: TypeDescription) -> Self {
        Self {
            static_member: true,
            ..Self::new(name, field_type)
        }
    }
}

#[derive(Debug, Clone)]
pub struct Property {
    pub name: String,
    pub property_type: TypeDescription,
    pub has_getter: bool,
    pub has_setter: bool,
}

impl Property {
    pub fn new(name: &str, property_type: TypeDescription) -> Self {
        Self {
            name: name.to_string(),
            property_type,
            has_getter: true,
            has_setter: true,
        }
    }

    pub fn read_only(name: &str, property_type: TypeDescription) -> Self {
        Self {
            has_setter: false,
            ..Self::new(name, property_type)
        }
    }
}

#[derive(Debug, Clone)]
pub struct Method {
    pub name: String,
    pub parameters: Vec<TypeDescription>,
    /// `None` for `void`.
    pub return_type: Option<TypeDescription>,
    pub instance: bool,
    pub runtime_special_name: bool,
}

impl Method {
    pub fn new(
        name: &str,
        parameters: Vec<TypeDescription>,
        return_type: Option<TypeDescription>,
    ) -> Self {
        Self {
            name: name.to_string(),
            parameters,
            return_type,
            instance: true,
            runtime_special_name: false,
        }
    }

    pub fn new_static(
        name: &str,
        parameters: Vec<TypeDescription>,
        return_type: Option<TypeDescription>,
    ) -> Self {
        Self {
            instance: false,
            ..Self::new(name, parameters, return_type)
        }
    }

    pub fn constructor(parameters: Vec<TypeDescription>) -> Self {
        Self {
            runtime_special_name: true,
            ..Self::new(CONSTRUCTOR_NAME, parameters, None)
        }
    }

    pub fn static_initializer() -> Self {
        Self {
            runtime_special_name: true,
            ..Self::new_static(STATIC_INITIALIZER_NAME, vec![], None)
        }
    }

    pub fn is_constructor(&self) -> bool {
        self.runtime_special_name && self.name == CONSTRUCTOR_NAME
    }
}

#[derive(Clone, Copy)]
pub struct FieldDescription {
    pub parent: TypeDescription,
    pub field: &'static Field,
}

impl Debug for FieldDescription {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.field.static_member {
            write!(f, "static ")?;
        }

        write!(
            f,
            "{} {}::{}",
            self.field.field_type.type_name(),
            self.parent.type_name(),
            self.field.name
        )
    }
}

impl PartialEq for FieldDescription {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.field, other.field)
    }
}

impl Eq for FieldDescription {}

impl Hash for FieldDescription {
    fn hash<H: Hasher>(&self, state: &mut H) {
        ptr::hash(self.field, state);
    }
}

#[derive(Clone, Copy)]
pub struct PropertyDescription {
    pub parent: TypeDescription,
    pub property: &'static Property,
}

impl Debug for PropertyDescription {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let accessors = match (self.property.has_getter, self.property.has_setter) {
            (true, true) => "{ get; set; }",
            (true, false) => "{ get; }",
            (false, true) => "{ set; }",
            (false, false) => "{ }",
        };
        write!(
            f,
            "{} {}::{} {}",
            self.property.property_type.type_name(),
            self.parent.type_name(),
            self.property.name,
            accessors
        )
    }
}

impl PartialEq for PropertyDescription {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.property, other.property)
    }
}

impl Eq for PropertyDescription {}

impl Hash for PropertyDescription {
    fn hash<H: Hasher>(&self, state: &mut H) {
        ptr::hash(self.property, state);
    }
}

#[derive(Clone, Copy)]
pub struct MethodDescription {
    pub parent: TypeDescription,
    pub method: &'static Method,
}

impl MethodDescription {
    pub fn is_constructor(&self) -> bool {
        self.method.is_constructor()
    }
}

impl Debug for MethodDescription {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if !self.method.instance {
            write!(f, "static ")?;
        }
        let return_type = self
            .method
            .return_type
            .map_or_else(|| "void".to_string(), |t| t.type_name());
        let parameters: Vec<_> = self.method.parameters.iter().map(|p| p.type_name()).collect();
        write!(
            f,
            "{} {}::{}({})",
            return_type,
            self.parent.type_name(),
            self.method.name,
            parameters.join(", ")
        )
    }
}

impl PartialEq for MethodDescription {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.method, other.method)
    }
}

impl Eq for MethodDescription {}

impl Hash for MethodDescription {
    fn hash<H: Hasher>(&self, state: &mut H) {
        ptr::hash(self.method, state);
    }
}
