use chrono::Utc;
use rand::Rng;

const SUFFIX_LEN: usize = 10;
const SUFFIX_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const BASE36_DIGITS: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const MAX_ID_LEN: usize = 64;

/// Millisecond timestamp in base 36 followed by a random `[A-Z0-9]` suffix.
pub fn generate_file_id() -> String {
    let millis = Utc::now().timestamp_millis().max(0) as u64;
    let mut rng = rand::thread_rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| SUFFIX_CHARSET[rng.gen_range(0..SUFFIX_CHARSET.len())] as char)
        .collect();

    format!("{}{}", to_base36(millis), suffix)
}

/// Cheap shape check for identifiers typed by users or carried in deep links.
pub fn is_well_formed(file_id: &str) -> bool {
    !file_id.is_empty()
        && file_id.len() <= MAX_ID_LEN
        && file_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36_DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    digits.iter().rev().map(|&d| d as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn identifiers_have_expected_shape() {
        let id = generate_file_id();
        assert!(is_well_formed(&id));
        assert!(id.len() > SUFFIX_LEN);
        assert!(id.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn no_duplicates_in_100k_generations() {
        let mut seen = HashSet::with_capacity(100_000);
        for _ in 0..100_000 {
            assert!(seen.insert(generate_file_id()));
        }
    }

    #[test]
    fn base36_encoding() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "Z");
        assert_eq!(to_base36(36), "10");
    }

    #[test]
    fn rejects_malformed_identifiers() {
        assert!(!is_well_formed(""));
        assert!(!is_well_formed("abc def"));
        assert!(!is_well_formed(&"A".repeat(65)));
        assert!(is_well_formed("LZ3K9Q1AB2C3D4E5F6"));
    }
}
