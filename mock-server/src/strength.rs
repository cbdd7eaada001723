//! Password strength scoring served by `/check_password_strength`.

use serde::{Deserialize, Serialize};

pub const MAX_PASSWORD_LENGTH: usize = 50;
const MIN_PASSWORD_LENGTH: usize = 8;
const LEVELS: [&str; 5] = ["very_weak", "weak", "medium", "strong", "very_strong"];
const SYMBOLS: &str = "!@#$%^&*(),.?\":{}|<>";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PasswordStrength {
    pub password: String,
    pub strength: String,
    pub score: u8,
    pub suggestions: Vec<String>,
}

pub fn check_password_strength(password: &str) -> PasswordStrength {
    let len = password.chars().count();

    if len > MAX_PASSWORD_LENGTH {
        let prefix: String = password.chars().take(10).collect();
        return PasswordStrength {
            password: format!("{prefix}..."),
            strength: "invalid".to_string(),
            score: 0,
            suggestions: vec![format!(
                "Password is too long. Maximum length is {MAX_PASSWORD_LENGTH} characters."
            )],
        };
    }

    if len < MIN_PASSWORD_LENGTH {
        return PasswordStrength {
            password: password.to_string(),
            strength: LEVELS[0].to_string(),
            score: 0,
            suggestions: vec![
                format!("Password must be at least {MIN_PASSWORD_LENGTH} characters long."),
                "Password must contain at least one uppercase letter, one lowercase letter, \
                 one number, and one special character."
                    .to_string(),
            ],
        };
    }

    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password.chars().any(|c| SYMBOLS.contains(c));

    let mut suggestions = Vec::new();
    if !has_upper {
        suggestions.push("Add at least one uppercase letter.".to_string());
    }
    if !has_lower {
        suggestions.push("Add at least one lowercase letter.".to_string());
    }
    if !has_digit {
        suggestions.push("Add at least one number.".to_string());
    }
    if !has_symbol {
        suggestions.push("Add at least one special character (e.g., !@#$%).".to_string());
    }

    let classes = [has_upper, has_lower, has_digit, has_symbol]
        .into_iter()
        .filter(|present| *present)
        .count() as u8;

    let mut score = match len {
        8 if classes == 4 => 4,
        8 | 9 => 0,
        _ => (classes + u8::from(len >= 12)).min(4),
    };
    if classes <= 2 {
        score = 1;
    }

    PasswordStrength {
        password: password.to_string(),
        strength: LEVELS[score as usize].to_string(),
        score,
        suggestions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_long_is_invalid_and_truncated() {
        let result = check_password_strength(&"a".repeat(51));
        assert_eq!(result.strength, "invalid");
        assert_eq!(result.password, "aaaaaaaaaa...");
    }

    #[test]
    fn too_short_is_very_weak() {
        let result = check_password_strength("Ab1!");
        assert_eq!(result.strength, "very_weak");
        assert_eq!(result.suggestions.len(), 2);
    }

    #[test]
    fn eight_chars_all_classes_is_very_strong() {
        assert_eq!(check_password_strength("Abcdef1!").score, 4);
    }

    #[test]
    fn nine_chars_all_classes_scores_zero() {
        assert_eq!(check_password_strength("Abcdefg1!").strength, "very_weak");
    }

    #[test]
    fn long_passwords_score_by_classes() {
        assert_eq!(check_password_strength("Abcdefghi1").score, 3);
        assert_eq!(check_password_strength("Abcdefghij1!").score, 4);
        assert_eq!(check_password_strength("Password123!").strength, "very_strong");
    }

    #[test]
    fn two_classes_or_fewer_forces_weak() {
        let result = check_password_strength("abcdefghijklmnop1");
        assert_eq!(result.score, 1);
        assert_eq!(result.strength, "weak");
        assert_eq!(result.suggestions.len(), 2);
    }
}
