//! Basic synchronization primitives.
//!
//! Provides one lock interface for both build configurations. With the
//! `multithreading` feature the locks come from `parking_lot`; without it a
//! thin std-backed shim with the same non-poisoning surface is used.
#[cfg(not(feature = "multithreading"))]
pub mod compat {
    use std::sync::{self, PoisonError};

    pub use std::sync::MutexGuard;

    #[derive(Debug, Default)]
    pub struct Mutex<T>(sync::Mutex<T>);
    impl<T> Mutex<T> {
        pub fn new(t: T) -> Self {
            Self(sync::Mutex::new(t))
        }
        pub fn lock(&self) -> MutexGuard<'_, T> {
            // a panicking resolver must not poison every later lookup of the slot
            self.0.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }
}

pub use std::sync::{
    atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering},
    Arc,
};

#[cfg(feature = "multithreading")]
pub use parking_lot::{Mutex, MutexGuard};

#[cfg(not(feature = "multithreading"))]
pub use compat::*;
