use crate::utils::sync::{AtomicBool, Mutex, Ordering};

#[derive(Debug)]
enum SlotState<T> {
    Unresolved,
    Resolved(T),
}

/// A memoized value that moves from unresolved to resolved exactly once.
///
/// The slot's own mutex is held across the resolver call, so concurrent
/// first queries for one key run the resolver once while other keys proceed.
/// A resolver must not look up the key it is resolving.
///
/// `resolved` mirrors the state for readers that must not wait on an
/// in-flight resolution.
#[derive(Debug)]
pub(crate) struct ResolvedSlot<T> {
    state: Mutex<SlotState<T>>,
    resolved: AtomicBool,
}

impl<T> Default for ResolvedSlot<T> {
    fn default() -> Self {
        Self {
            state: Mutex::new(SlotState::Unresolved),
            resolved: AtomicBool::new(false),
        }
    }
}

impl<T: Copy> ResolvedSlot<T> {
    /// Returns the stored value, or runs `resolve` and stores its result.
    ///
    /// The flag is `true` when this call performed the resolution. An error
    /// leaves the slot unresolved so the next call tries again.
    pub fn get_or_try_resolve<E>(
        &self,
        resolve: impl FnOnce() -> Result<T, E>,
    ) -> Result<(T, bool), E> {
        let mut state = self.state.lock();
        if let SlotState::Resolved(value) = &*state {
            return Ok((*value, false));
        }
        let value = resolve()?;
        *state = SlotState::Resolved(value);
        self.resolved.store(true, Ordering::Release);
        Ok((value, true))
    }

    /// Never takes the slot lock.
    pub fn is_resolved(&self) -> bool {
        self.resolved.load(Ordering::Acquire)
    }
}
