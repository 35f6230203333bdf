//! Memoizing member lookups.
//!
//! [`AccessCache`] answers "give me member `name` of type `T`" by asking a
//! [`MemberResolver`] once per unique key and remembering the answer,
//! including the answer "no such member". Fields and properties are keyed by
//! type then name; methods and constructors additionally by their argument
//! types, either as a [`signature_fingerprint`] or as the full sequence.
//!
//! Entries are never evicted. A cache is meant to live as long as the
//! metadata it describes, but nothing ties it to a global: create as many
//! independent instances as needed.
use crate::{
    config::{AccessCacheConfig, SignatureKeying},
    error::MemberResolutionError,
    metrics::{AccessCacheStats, CacheCounters},
    resolve::{DeclaredMemberResolver, MemberResolver},
    types::{
        members::{FieldDescription, MethodDescription, PropertyDescription, CONSTRUCTOR_NAME},
        TypeDescription,
    },
    utils::sync::Arc,
};
use dashmap::DashMap;
use std::{borrow::Borrow, hash::Hash};
use tracing::trace;

mod signature;
mod slot;

pub use signature::{combined_hash, signature_fingerprint, FINGERPRINT_MULTIPLIER, FINGERPRINT_SEED};
use slot::ResolvedSlot;

type Slots<K, T> = DashMap<K, Arc<ResolvedSlot<Option<T>>>>;
type ByType<V> = DashMap<TypeDescription, Arc<V>>;

/// Overloads of one method name. Only the map matching the cache's
/// [`SignatureKeying`] is populated.
#[derive(Default)]
struct Overloads {
    by_fingerprint: Slots<u32, MethodDescription>,
    by_signature: Slots<Vec<TypeDescription>, MethodDescription>,
}

impl Overloads {
    fn resolved_count(&self) -> usize {
        resolved_count(&self.by_fingerprint) + resolved_count(&self.by_signature)
    }
}

pub struct AccessCache<R: MemberResolver = DeclaredMemberResolver> {
    resolver: R,
    config: AccessCacheConfig,
    fields: ByType<Slots<String, FieldDescription>>,
    properties: ByType<Slots<String, PropertyDescription>>,
    methods: ByType<DashMap<String, Arc<Overloads>>>,
    field_counters: CacheCounters,
    property_counters: CacheCounters,
    method_counters: CacheCounters,
}

impl Default for AccessCache<DeclaredMemberResolver> {
    fn default() -> Self {
        Self::new(DeclaredMemberResolver)
    }
}

/// Returns the child map or slot stored under `key`, creating an empty one first if needed.
///
/// The shard guard is dropped before returning, so callers never hold a map
/// lock while resolving. `key` is only copied when the entry is new.
fn child<K, Q, V>(map: &DashMap<K, Arc<V>>, key: &Q) -> Arc<V>
where
    K: Borrow<Q> + Eq + Hash,
    Q: ToOwned<Owned = K> + Eq + Hash + ?Sized,
    V: Default,
{
    if let Some(existing) = map.get(key) {
        return Arc::clone(existing.value());
    }
    Arc::clone(map.entry(key.to_owned()).or_default().value())
}

/// Reads each slot's resolved flag without taking its lock, so an in-flight
/// resolution never stalls the shard guards held here.
fn resolved_count<K: Eq + Hash, T: Copy>(slots: &Slots<K, T>) -> usize {
    slots.iter().filter(|s| s.value().is_resolved()).count()
}

impl<R: MemberResolver> AccessCache<R> {
    pub fn new(resolver: R) -> Self {
        Self::with_config(resolver, AccessCacheConfig::default())
    }

    pub fn with_config(resolver: R, config: AccessCacheConfig) -> Self {
        Self {
            resolver,
            config,
            fields: DashMap::new(),
            properties: DashMap::new(),
            methods: DashMap::new(),
            field_counters: CacheCounters::new(),
            property_counters: CacheCounters::new(),
            method_counters: CacheCounters::new(),
        }
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    pub fn config(&self) -> &AccessCacheConfig {
        &self.config
    }

    fn lookup<T: Copy>(
        slot: &ResolvedSlot<Option<T>>,
        counters: &CacheCounters,
        resolve: impl FnOnce() -> Result<Option<T>, MemberResolutionError>,
    ) -> Result<Option<T>, MemberResolutionError> {
        let (value, resolved_now) = slot.get_or_try_resolve(|| {
            counters.record_miss();
            resolve()
        })?;
        if !resolved_now {
            counters.record_hit();
        }
        Ok(value)
    }

    /// Looks up a field declared directly on `ty`.
    pub fn lookup_field(
        &self,
        ty: TypeDescription,
        name: &str,
    ) -> Result<Option<FieldDescription>, MemberResolutionError> {
        let slot = child(&*child(&self.fields, &ty), name);
        Self::lookup(&slot, &self.field_counters, || {
            let field = self.resolver.resolve_declared_field(ty, name)?;
            if self.config.trace_misses {
                trace!("resolved field {}::{} -> {:?}", ty.type_name(), name, field);
            }
            Ok(field)
        })
    }

    /// Looks up a property declared directly on `ty`. Properties and fields
    /// live in separate namespaces.
    pub fn lookup_property(
        &self,
        ty: TypeDescription,
        name: &str,
    ) -> Result<Option<PropertyDescription>, MemberResolutionError> {
        let slot = child(&*child(&self.properties, &ty), name);
        Self::lookup(&slot, &self.property_counters, || {
            let property = self.resolver.resolve_declared_property(ty, name)?;
            if self.config.trace_misses {
                trace!("resolved property {}::{} -> {:?}", ty.type_name(), name, property);
            }
            Ok(property)
        })
    }

    /// Looks up a method or constructor declared on `ty` by name and ordered
    /// argument types.
    ///
    /// With [`SignatureKeying::Fingerprint`](crate::config::SignatureKeying)
    /// two argument lists whose fingerprints collide share one entry, and the
    /// later query receives the earlier query's result.
    pub fn lookup_method(
        &self,
        ty: TypeDescription,
        name: &str,
        argument_types: &[TypeDescription],
    ) -> Result<Option<MethodDescription>, MemberResolutionError> {
        let overloads = child(&*child(&self.methods, &ty), name);
        let slot = match self.config.signature_keying {
            SignatureKeying::Fingerprint => child(
                &overloads.by_fingerprint,
                &signature_fingerprint(argument_types),
            ),
            SignatureKeying::Exact => child(&overloads.by_signature, argument_types),
        };
        Self::lookup(&slot, &self.method_counters, || {
            let method = self
                .resolver
                .resolve_declared_method(ty, name, argument_types)?;
            if self.config.trace_misses {
                trace!(
                    "resolved method {}::{}{:?} -> {:?}",
                    ty.type_name(),
                    name,
                    argument_types,
                    method
                );
            }
            Ok(method)
        })
    }

    pub fn lookup_constructor(
        &self,
        ty: TypeDescription,
        argument_types: &[TypeDescription],
    ) -> Result<Option<MethodDescription>, MemberResolutionError> {
        self.lookup_method(ty, CONSTRUCTOR_NAME, argument_types)
    }

    pub fn stats(&self) -> AccessCacheStats {
        let field_size: usize = self.fields.iter().map(|e| resolved_count(e.value())).sum();
        let property_size: usize = self
            .properties
            .iter()
            .map(|e| resolved_count(e.value()))
            .sum();
        let method_size: usize = self
            .methods
            .iter()
            .map(|by_name| {
                by_name
                    .value()
                    .iter()
                    .map(|e| e.value().resolved_count())
                    .sum::<usize>()
            })
            .sum();
        AccessCacheStats {
            field: self.field_counters.stat(field_size),
            property: self.property_counters.stat(property_size),
            method: self.method_counters.stat(method_size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        members::{Field, Method, Property},
        TypeDefinition,
    };
    use super::signature::{colliding_hash_pairs, force_element_hash};

    /// A type with `Pick(a, b)` and `Pick(c, d)`, where the two argument
    /// lists share a fingerprint on the current thread.
    fn colliding_overloads() -> (TypeDescription, [TypeDescription; 2], [TypeDescription; 2]) {
        let args: Vec<_> = ["A", "B", "C", "D"]
            .iter()
            .map(|name| TypeDefinition::new(Some("App"), name).leak())
            .collect();
        let (first_hashes, second_hashes) = colliding_hash_pairs();
        for (ty, hash) in args.iter().zip(first_hashes.iter().chain(&second_hashes)) {
            force_element_hash(*ty, *hash);
        }
        let first = [args[0], args[1]];
        let second = [args[2], args[3]];
        let t = TypeDefinition::new(Some("App"), "Picker")
            .method(Method::new("Pick", first.to_vec(), Some(args[0])))
            .method(Method::new("Pick", second.to_vec(), Some(args[2])))
            .leak();
        assert_eq!(signature_fingerprint(&first), signature_fingerprint(&second));
        (t, first, second)
    }

    #[test]
    fn test_fingerprint_collisions_share_an_entry() {
        let (t, first, second) = colliding_overloads();
        let cache: AccessCache = AccessCache::default();

        let picked = cache.lookup_method(t, "Pick", &first).unwrap().unwrap();
        assert_eq!(picked.method.parameters, first);
        // the colliding list is answered from the first entry
        assert_eq!(cache.lookup_method(t, "Pick", &second).unwrap(), Some(picked));

        let stats = cache.stats();
        assert_eq!((stats.method.hits, stats.method.misses, stats.method.size), (1, 1, 1));
    }

    #[test]
    fn test_exact_keying_separates_collisions() {
        let (t, first, second) = colliding_overloads();
        let config = AccessCacheConfig::new().signature_keying(SignatureKeying::Exact);
        let cache = AccessCache::with_config(DeclaredMemberResolver, config);

        let a = cache.lookup_method(t, "Pick", &first).unwrap().unwrap();
        let b = cache.lookup_method(t, "Pick", &second).unwrap().unwrap();
        assert_eq!(a.method.parameters, first);
        assert_eq!(b.method.parameters, second);
        assert_ne!(a, b);
        assert_eq!(cache.lookup_method(t, "Pick", &second).unwrap(), Some(b));

        let stats = cache.stats();
        assert_eq!((stats.method.hits, stats.method.misses, stats.method.size), (1, 2, 2));
    }

    #[test]
    fn test_default_uses_declared_members() {
        let int = TypeDefinition::new(Some("System"), "Int32").value_type().leak();
        let t = TypeDefinition::new(Some("App"), "Point")
            .field(Field::new("x", int))
            .property(Property::new("X", int))
            .method(Method::constructor(vec![int, int]))
            .leak();
        let cache: AccessCache = AccessCache::default();

        assert!(cache.lookup_field(t, "x").unwrap().is_some());
        assert!(cache.lookup_property(t, "X").unwrap().is_some());
        assert!(cache.lookup_constructor(t, &[int, int]).unwrap().unwrap().is_constructor());
        assert!(cache.lookup_constructor(t, &[]).unwrap().is_none());
    }

    #[test]
    fn test_stats_count_entries_and_hits() {
        let int = TypeDefinition::new(Some("System"), "Int32").value_type().leak();
        let t = TypeDefinition::new(Some("App"), "Point")
            .field(Field::new("x", int))
            .method(Method::new("Len", vec![], Some(int)))
            .leak();
        let cache: AccessCache = AccessCache::default();

        cache.lookup_field(t, "x").unwrap();
        cache.lookup_field(t, "x").unwrap();
        cache.lookup_field(t, "missing").unwrap();
        cache.lookup_method(t, "Len", &[]).unwrap();
        cache.lookup_method(t, "Len", &[int]).unwrap();

        let stats = cache.stats();
        assert_eq!((stats.field.hits, stats.field.misses, stats.field.size), (1, 2, 2));
        assert_eq!((stats.property.hits, stats.property.misses, stats.property.size), (0, 0, 0));
        assert_eq!((stats.method.hits, stats.method.misses, stats.method.size), (0, 2, 2));
    }
}
