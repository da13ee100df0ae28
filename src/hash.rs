use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::data::Example;

fn stable_hash_with(f: impl FnOnce(&mut DefaultHasher)) -> u64 {
    let mut hasher = DefaultHasher::new();
    f(&mut hasher);
    hasher.finish()
}

/// Order-sensitive hash over a sequence of examples.
///
/// Labels hash by bit pattern so `NaN` payloads stay distinguishable.
pub fn examples_fingerprint<'a>(examples: impl ExactSizeIterator<Item = Example<'a>>) -> u64 {
    stable_hash_with(|hasher| {
        examples.len().hash(hasher);
        for example in examples {
            example.text.hash(hasher);
            example.label.map(f64::to_bits).hash(hasher);
            example.group_key.hash(hasher);
        }
    })
}
