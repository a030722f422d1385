//! Password rules for signup. Pure functions: the three predicates depend on
//! nothing but the candidate string.

const SPECIAL_CHARS: &str = "!@#$%^&*()_+-=[]{};':\"\\|,.<>/?";

/// The three independently displayed requirements. Signup is allowed only
/// when all of them hold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PasswordChecks {
    /// At least 8 characters. There is no upper bound.
    pub length: bool,
    /// At least one character from the fixed punctuation set and at least
    /// one digit.
    pub special_and_number: bool,
    /// At least one uppercase and one lowercase letter.
    pub cases: bool,
}

impl PasswordChecks {
    pub fn satisfied(&self) -> bool {
        self.length && self.special_and_number && self.cases
    }
}

pub fn check(password: &str) -> PasswordChecks {
    let has_special = password.chars().any(|c| SPECIAL_CHARS.contains(c));
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    PasswordChecks {
        length: password.chars().count() >= 8,
        special_and_number: has_special && has_digit,
        cases: has_upper && has_lower,
    }
}
