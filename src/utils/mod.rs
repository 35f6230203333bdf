//! Utility types shared by the cache, the resolver boundary and the file log.

pub mod sync;
