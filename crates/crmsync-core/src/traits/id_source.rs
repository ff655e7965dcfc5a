// # External ID Source Trait
//
// Defines the interface for minting correlation keys.
//
// The insert path of the dispatcher assigns a key to any record that
// arrives without one. The policy is pluggable; the bundled implementation
// is intentionally coarse and demo-grade.

use rand::Rng;

/// Trait for correlation-key generation
///
/// Implementations must produce a string-encoded non-negative integer and
/// must be safe to call from the synchronous dispatch path (no I/O, no
/// blocking).
pub trait ExternalIdSource: Send + Sync {
    /// Produce the next correlation key
    fn next_id(&self) -> String;
}

/// Random key source producing values in `[0, 100]` inclusive
///
/// Demo-grade: the narrow range makes every generated key land in the
/// fetch-eligible band. Replace with a real allocation policy for anything
/// beyond demos.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdSource;

impl RandomIdSource {
    pub fn new() -> Self {
        Self
    }
}

impl ExternalIdSource for RandomIdSource {
    fn next_id(&self) -> String {
        rand::thread_rng().gen_range(0..=100).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_source_stays_in_range() {
        let source = RandomIdSource::new();
        for _ in 0..500 {
            let key: i64 = source.next_id().parse().unwrap();
            assert!((0..=100).contains(&key), "key {} out of range", key);
        }
    }
}
