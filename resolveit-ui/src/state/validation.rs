//! Form Checks
//!
//! Required-field checks run before a form is sent. Everything else is
//! validated by the API.

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub fn validate_login(email: &str, password: &str) -> Result<(), String> {
    if blank(email) || password.is_empty() {
        return Err("Please enter your email and password".to_string());
    }
    Ok(())
}

pub fn validate_register(
    name: &str,
    email: &str,
    password: &str,
    confirm: &str,
) -> Result<(), String> {
    if blank(name) || blank(email) || password.is_empty() || confirm.is_empty() {
        return Err("Please fill in all fields".to_string());
    }
    if password != confirm {
        return Err("Passwords do not match".to_string());
    }
    Ok(())
}

pub fn validate_complaint(subject: &str, description: &str) -> Result<(), String> {
    if blank(subject) || blank(description) {
        return Err("Please fill in both subject and description".to_string());
    }
    Ok(())
}

pub fn validate_student(name: &str, email: &str, department: &str) -> Result<(), String> {
    if blank(name) || blank(email) || blank(department) {
        return Err("Name, email and department are required".to_string());
    }
    Ok(())
}

pub fn validate_resolution(comment: &str) -> Result<(), String> {
    if blank(comment) {
        return Err("Please provide a resolution comment".to_string());
    }
    Ok(())
}

pub fn validate_reopen(reason: &str) -> Result<(), String> {
    if blank(reason) {
        return Err("Please provide a reason for reopening".to_string());
    }
    Ok(())
}

/// Empty input means "no value"
pub fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login() {
        assert!(validate_login("a@b.c", "pw").is_ok());
        assert!(validate_login(" ", "pw").is_err());
        assert!(validate_login("a@b.c", "").is_err());
    }

    #[test]
    fn test_register() {
        assert!(validate_register("Ann", "a@b.c", "pw", "pw").is_ok());
        assert_eq!(
            validate_register("Ann", "a@b.c", "pw", "px"),
            Err("Passwords do not match".to_string())
        );
        assert!(validate_register("", "a@b.c", "pw", "pw").is_err());
    }

    #[test]
    fn test_complaint() {
        assert!(validate_complaint("Wifi", "Down since Monday").is_ok());
        assert_eq!(
            validate_complaint("Wifi", "  "),
            Err("Please fill in both subject and description".to_string())
        );
    }

    #[test]
    fn test_student_and_actions() {
        assert!(validate_student("Ann", "a@b.c", "CSE").is_ok());
        assert!(validate_student("Ann", "a@b.c", "").is_err());
        assert!(validate_resolution("").is_err());
        assert!(validate_resolution("Fixed").is_ok());
        assert!(validate_reopen("\n").is_err());
    }

    #[test]
    fn test_optional() {
        assert_eq!(optional("  "), None);
        assert_eq!(optional(" 123 "), Some("123".to_string()));
    }
}
