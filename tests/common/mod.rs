#![allow(dead_code)]

use dotnet_access_cache::{
    resolve::{DeclaredMemberResolver, MemberResolver},
    types::{
        members::{Field, FieldDescription, Method, MethodDescription, Property, PropertyDescription},
        TypeDefinition, TypeDescription,
    },
    MemberResolutionError,
};
use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Barrier,
    },
    thread,
    time::Duration,
};

pub struct Corlib {
    pub object: TypeDescription,
    pub int: TypeDescription,
    pub string: TypeDescription,
}

pub fn corlib() -> Corlib {
    Corlib {
        object: TypeDefinition::new(Some("System"), "Object").leak(),
        int: TypeDefinition::new(Some("System"), "Int32").value_type().leak(),
        string: TypeDefinition::new(Some("System"), "String").leak(),
    }
}

/// `App.Counter` with a field and a property that share the name `Value`,
/// plus overloads of `Add` and two constructors.
pub fn counter_type(c: &Corlib) -> TypeDescription {
    TypeDefinition::new(Some("App"), "Counter")
        .field(Field::new("count", c.int))
        .field(Field::new("Value", c.int))
        .property(Property::new("Value", c.string))
        .method(Method::new("Add", vec![c.int, c.int], Some(c.int)))
        .method(Method::new("Add", vec![c.int, c.string], Some(c.string)))
        .method(Method::new("Reset", vec![], None))
        .method(Method::constructor(vec![]))
        .method(Method::constructor(vec![c.int]))
        .leak()
}

/// `App.Shape` declaring `id`, `Area` and `Scale(int)`, and `App.Circle`
/// extending it with its own `radius`.
pub fn shape_types(c: &Corlib) -> (TypeDescription, TypeDescription) {
    let shape = TypeDefinition::new(Some("App"), "Shape")
        .extends(c.object)
        .field(Field::new("id", c.int))
        .property(Property::new("Area", c.int))
        .method(Method::new("Scale", vec![c.int], None))
        .leak();
    let circle = TypeDefinition::new(Some("App"), "Circle")
        .extends(shape)
        .field(Field::new("radius", c.int))
        .leak();
    (shape, circle)
}

/// Holds resolutions of one member name until the test releases them.
struct Gate {
    member: String,
    entered: Barrier,
    release: Barrier,
}

/// Wraps [`DeclaredMemberResolver`], counting calls and optionally failing or
/// stalling them.
#[derive(Default)]
pub struct CountingResolver {
    inner: DeclaredMemberResolver,
    pub field_calls: AtomicUsize,
    pub property_calls: AtomicUsize,
    pub method_calls: AtomicUsize,
    failures_left: AtomicUsize,
    delay: Option<Duration>,
    gate: Option<Gate>,
}

impl CountingResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next `count` resolver calls fail with an access error.
    pub fn failing(count: usize) -> Self {
        Self {
            failures_left: AtomicUsize::new(count),
            ..Self::default()
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    /// Resolving `member` blocks until [`release`](Self::release) is called.
    /// Other members resolve normally.
    pub fn gated(member: &str) -> Self {
        Self {
            gate: Some(Gate {
                member: member.to_string(),
                entered: Barrier::new(2),
                release: Barrier::new(2),
            }),
            ..Self::default()
        }
    }

    /// Returns once a resolution of the gated member is in progress.
    pub fn wait_until_entered(&self) {
        if let Some(gate) = &self.gate {
            gate.entered.wait();
        }
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.release.wait();
        }
    }

    pub fn field_calls(&self) -> usize {
        self.field_calls.load(Ordering::SeqCst)
    }

    pub fn property_calls(&self) -> usize {
        self.property_calls.load(Ordering::SeqCst)
    }

    pub fn method_calls(&self) -> usize {
        self.method_calls.load(Ordering::SeqCst)
    }

    fn enter(&self, ty: TypeDescription, member: &str) -> Result<(), MemberResolutionError> {
        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }
        if let Some(gate) = self.gate.as_ref().filter(|g| g.member == member) {
            gate.entered.wait();
            gate.release.wait();
        }
        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(MemberResolutionError::AccessDenied {
                type_name: ty.type_name(),
                member: member.to_string(),
            });
        }
        Ok(())
    }
}

impl MemberResolver for CountingResolver {
    fn resolve_declared_field(
        &self,
        ty: TypeDescription,
        name: &str,
    ) -> Result<Option<FieldDescription>, MemberResolutionError> {
        self.field_calls.fetch_add(1, Ordering::SeqCst);
        self.enter(ty, name)?;
        self.inner.resolve_declared_field(ty, name)
    }

    fn resolve_declared_property(
        &self,
        ty: TypeDescription,
        name: &str,
    ) -> Result<Option<PropertyDescription>, MemberResolutionError> {
        self.property_calls.fetch_add(1, Ordering::SeqCst);
        self.enter(ty, name)?;
        self.inner.resolve_declared_property(ty, name)
    }

    fn resolve_declared_method(
        &self,
        ty: TypeDescription,
        name: &str,
        argument_types: &[TypeDescription],
    ) -> Result<Option<MethodDescription>, MemberResolutionError> {
        self.method_calls.fetch_add(1, Ordering::SeqCst);
        self.enter(ty, name)?;
        self.inner.resolve_declared_method(ty, name, argument_types)
    }
}
