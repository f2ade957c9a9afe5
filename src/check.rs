use serde::Serialize;

/// Outcome of a config-form style check, serialized straight to the api.
/// Warnings let the form submit anyway; errors do not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CheckResult {
    Ok(String),
    Warning(String),
    Error(String),
}

/// instance names are display-only, keep them to letters and spaces
pub fn check_name(value: &str) -> CheckResult {
    if value.trim().is_empty() {
        return CheckResult::Warning("name should not be empty".to_string());
    }
    if !value.chars().all(|c| c.is_ascii_alphabetic() || c == ' ') {
        return CheckResult::Warning("only letters and spaces are allowed".to_string());
    }
    CheckResult::Ok(String::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_name_warns() {
        assert!(matches!(check_name(""), CheckResult::Warning(_)));
        assert!(matches!(check_name("   "), CheckResult::Warning(_)));
    }

    #[test]
    fn letters_and_spaces_pass() {
        assert!(matches!(check_name("Platform Team"), CheckResult::Ok(_)));
    }

    #[test]
    fn other_characters_warn() {
        assert!(matches!(check_name("team-1"), CheckResult::Warning(_)));
        assert!(matches!(check_name("kiln!"), CheckResult::Warning(_)));
    }
}
