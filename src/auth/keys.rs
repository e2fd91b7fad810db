//! API key generation. Keys are long-lived bearer tokens, one per user,
//! shaped `lk_` + 32 alphanumeric characters.

use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};

pub const KEY_PREFIX: &str = "lk_";
const KEY_RANDOM_LEN: usize = 32;

pub fn generate_api_key() -> String {
    let random: String = thread_rng()
        .sample_iter(&Alphanumeric)
        .take(KEY_RANDOM_LEN)
        .map(char::from)
        .collect();
    format!("{KEY_PREFIX}{random}")
}

/// Cheap shape check used before hitting the database with an arbitrary
/// bearer token.
pub fn looks_like_api_key(candidate: &str) -> bool {
    candidate.len() == KEY_PREFIX.len() + KEY_RANDOM_LEN
        && candidate.starts_with(KEY_PREFIX)
        && candidate[KEY_PREFIX.len()..]
            .chars()
            .all(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_keys_have_the_expected_shape() {
        let key = generate_api_key();
        assert!(looks_like_api_key(&key), "bad key: {key}");
    }

    #[test]
    fn generated_keys_differ() {
        assert_ne!(generate_api_key(), generate_api_key());
    }

    #[test]
    fn rejects_foreign_tokens() {
        assert!(!looks_like_api_key(""));
        assert!(!looks_like_api_key("lk_short"));
        assert!(!looks_like_api_key("pk_live_abcdefghijklmnopqrstuvwxyz123456"));
        let almost = format!("lk_{}", "a".repeat(31));
        assert!(!looks_like_api_key(&almost));
        let non_alnum = format!("lk_{}!", "a".repeat(31));
        assert!(!looks_like_api_key(&non_alnum));
    }
}
