// src/common/id_generator.rs
//! Crockford Base32 ID Generator
//!
//! Generates human-readable, prefixed IDs using Crockford Base32 encoding.
//! Format: PREFIX_XXXXXX (e.g., I_K7NP3X for interviews)

use rand::Rng;

/// Crockford Base32 alphabet (excludes I, L, O, U to avoid confusion)
const CROCKFORD_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Entity type prefixes for ID generation
#[derive(Debug, Clone, Copy)]
pub enum EntityPrefix {
    /// Interview (I_)
    Interview,
    /// Single transport call, used to correlate delivery logs (D_)
    Delivery,
}

impl EntityPrefix {
    /// Get the string prefix for this entity type
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityPrefix::Interview => "I",
            EntityPrefix::Delivery => "D",
        }
    }
}

/// Generate a random Crockford Base32 string of specified length
fn generate_crockford_string(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..32);
            CROCKFORD_ALPHABET[idx] as char
        })
        .collect()
}

/// Generate a prefixed ID using Crockford Base32 encoding
///
/// Returns a string in format "PREFIX_XXXXXX" (e.g., "I_K7NP3X")
pub fn generate_id(prefix: EntityPrefix) -> String {
    format!("{}_{}", prefix.as_str(), generate_crockford_string(6))
}

/// Generate an Interview ID (I_XXXXXX)
pub fn generate_interview_id() -> String {
    generate_id(EntityPrefix::Interview)
}

/// Generate a Delivery ID (D_XXXXXX)
pub fn generate_delivery_id() -> String {
    generate_id(EntityPrefix::Delivery)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_id_format() {
        let interview_id = generate_interview_id();
        assert!(interview_id.starts_with("I_"));
        assert_eq!(interview_id.len(), 8); // "I_" + 6 chars

        let delivery_id = generate_delivery_id();
        assert!(delivery_id.starts_with("D_"));
        assert_eq!(delivery_id.len(), 8);
    }

    #[test]
    fn test_crockford_alphabet_only() {
        let id = generate_interview_id();
        let random_part = &id[2..];

        for c in random_part.chars() {
            assert!(
                CROCKFORD_ALPHABET.contains(&(c as u8)),
                "Character '{}' not in Crockford alphabet",
                c
            );
        }

        assert!(!random_part.contains('I'));
        assert!(!random_part.contains('L'));
        assert!(!random_part.contains('O'));
        assert!(!random_part.contains('U'));
    }

    #[test]
    fn test_uniqueness() {
        let mut ids = HashSet::new();
        for _ in 0..1000 {
            let id = generate_interview_id();
            assert!(ids.insert(id), "Duplicate ID generated");
        }
    }
}
