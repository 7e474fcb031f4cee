//! Input validation
//!
//! Screens claimed usernames and passwords before they reach a backend.
//! Usernames are exact, case-sensitive keys: nothing is trimmed or folded.

/// Length bounds applied to incoming credentials
#[derive(Debug, Clone, Copy)]
pub struct InputLimits {
    pub max_username_length: usize,
    pub max_password_length: usize,
}

/// Rejects empty, over-long, or control-character usernames.
pub fn is_valid_username(username: &str, limits: &InputLimits) -> bool {
    !username.is_empty()
        && username.len() <= limits.max_username_length
        && !username.contains(['\r', '\n', '\0'])
}

/// Passwords are accepted as-is apart from the length bound.
pub fn is_valid_password(password: &str, limits: &InputLimits) -> bool {
    password.len() <= limits.max_password_length
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMITS: InputLimits = InputLimits {
        max_username_length: 16,
        max_password_length: 32,
    };

    #[test]
    fn usernames_are_checked_without_normalisation() {
        assert!(is_valid_username("alice", &LIMITS));
        assert!(is_valid_username(" Alice ", &LIMITS));
        assert!(!is_valid_username("", &LIMITS));
        assert!(!is_valid_username("alice\r\nPASS x", &LIMITS));
        assert!(!is_valid_username(&"a".repeat(17), &LIMITS));
    }

    #[test]
    fn passwords_only_have_a_length_bound() {
        assert!(is_valid_password("", &LIMITS));
        assert!(is_valid_password("p\0ss\nword", &LIMITS));
        assert!(!is_valid_password(&"x".repeat(33), &LIMITS));
    }
}
