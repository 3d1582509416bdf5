//! Account identifier generation.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Random patient identifier: `P` followed by six digits.
///
/// Callers must check the store for collisions.
#[must_use]
pub fn patient_id() -> String {
    let mut rng = ChaCha20Rng::from_entropy();
    format!("P{}", rng.gen_range(100_000..1_000_000))
}

/// Random UUID v4 string, used for staff accounts.
///
/// Uses ChaCha20Rng seeded from OS entropy so ids are not predictable.
#[must_use]
pub fn uuid_v4() -> String {
    let mut rng = ChaCha20Rng::from_entropy();
    let bytes: [u8; 16] = rng.gen();

    format!(
        "{:02x}{:02x}{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
        bytes[0], bytes[1], bytes[2], bytes[3],
        bytes[4], bytes[5],
        (bytes[6] & 0x0f) | 0x40, bytes[7],
        (bytes[8] & 0x3f) | 0x80, bytes[9],
        bytes[10], bytes[11], bytes[12], bytes[13], bytes[14], bytes[15]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patient_id_shape() {
        let id = patient_id();
        assert_eq!(id.len(), 7);
        assert!(id.starts_with('P'));
        assert!(id[1..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_uuid_generation() {
        let id1 = uuid_v4();
        let id2 = uuid_v4();
        assert_ne!(id1, id2);
        assert_eq!(id1.len(), 36);
        assert_eq!(&id1[14..15], "4");
    }
}
