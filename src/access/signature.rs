//! Argument-signature keys for the method cache.
use crate::types::TypeDescription;

pub const FINGERPRINT_SEED: u32 = (5381 << 16) + 5381;
pub const FINGERPRINT_MULTIPLIER: u32 = 1566083941;

#[inline]
fn fold(acc: u32, element: u32) -> u32 {
    (acc.rotate_left(5).wrapping_add(acc).wrapping_add(acc.rotate_right(27))) ^ element
}

/// Combines an ordered sequence of element hashes into one 32-bit value.
///
/// Even positions feed the first accumulator and odd positions the second,
/// so swapping neighbours changes the result.
pub fn combined_hash(hashes: impl IntoIterator<Item = u32>) -> u32 {
    let mut even = FINGERPRINT_SEED;
    let mut odd = FINGERPRINT_SEED;
    for (i, hash) in hashes.into_iter().enumerate() {
        if i % 2 == 0 {
            even = fold(even, hash);
        } else {
            odd = fold(odd, hash);
        }
    }
    even.wrapping_add(odd.wrapping_mul(FINGERPRINT_MULTIPLIER))
}

/// Fingerprint of an argument-type list. Stable within one process only.
pub fn signature_fingerprint(argument_types: &[TypeDescription]) -> u32 {
    combined_hash(argument_types.iter().map(element_hash))
}

#[cfg(not(test))]
fn element_hash(ty: &TypeDescription) -> u32 {
    ty.identity_hash()
}

#[cfg(test)]
thread_local! {
    static FORCED_HASHES: std::cell::RefCell<std::collections::HashMap<TypeDescription, u32>> =
        Default::default();
}

#[cfg(test)]
fn element_hash(ty: &TypeDescription) -> u32 {
    FORCED_HASHES
        .with(|forced| forced.borrow().get(ty).copied())
        .unwrap_or_else(|| ty.identity_hash())
}

/// Makes `ty` hash to `hash` in fingerprints computed on the current thread.
#[cfg(test)]
pub(crate) fn force_element_hash(ty: TypeDescription, hash: u32) {
    FORCED_HASHES.with(|forced| {
        forced.borrow_mut().insert(ty, hash);
    });
}

/// Two distinct two-element hash sequences with the same combined hash.
///
/// `(g ^ a) + (g ^ b) * K == (g ^ a') + (g ^ b') * K` when the first term
/// drops by `K` and the second rises by one.
#[cfg(test)]
pub(crate) fn colliding_hash_pairs() -> ([u32; 2], [u32; 2]) {
    let g = fold(FINGERPRINT_SEED, 0);
    (
        [g ^ 1000, g ^ 7],
        [g ^ 1000u32.wrapping_sub(FINGERPRINT_MULTIPLIER), g ^ 8],
    )
}
