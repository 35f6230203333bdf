//! # dotnet-access-cache
//!
//! Memoizing lookups of declared fields, properties, methods and
//! constructors on .NET-style type metadata. The expensive name and
//! signature search runs at most once per unique key; the answer, including
//! "not found", is kept for the lifetime of the cache.
//!
//! ```
//! use dotnet_access_cache::{
//!     access::AccessCache,
//!     types::{members::Field, TypeDefinition},
//! };
//!
//! let int = TypeDefinition::new(Some("System"), "Int32").value_type().leak();
//! let point = TypeDefinition::new(Some("App"), "Point")
//!     .field(Field::new("x", int))
//!     .leak();
//!
//! let cache: AccessCache = AccessCache::default();
//! let x = cache.lookup_field(point, "x").unwrap().unwrap();
//! assert_eq!(x.field.field_type, int);
//! assert!(cache.lookup_field(point, "y").unwrap().is_none());
//! ```
pub mod access;
pub mod config;
pub mod error;
pub mod log;
pub mod metrics;
pub mod resolve;
pub mod types;
pub mod utils;

pub use access::AccessCache;
pub use config::{AccessCacheConfig, SignatureKeying};
pub use error::{ConfigError, MemberResolutionError};
pub use resolve::{DeclaredMemberResolver, MemberResolver};
