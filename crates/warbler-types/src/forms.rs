//! Form payloads posted by the HTML pages.
//!
//! Every field deserializes with a default so a missing input becomes a
//! validation error rather than a deserialization rejection.

use serde::Deserialize;

pub const PASSWORD_MIN_LEN: usize = 6;
pub const MESSAGE_MAX_LEN: usize = 140;

#[derive(Debug, Clone)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Accumulated validation failures, in field order.
#[derive(Debug, Default, Clone)]
pub struct FieldErrors {
    errors: Vec<FieldError>,
}

impl FieldErrors {
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub image_url: String,
}

impl SignupForm {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        require(&mut errors, "username", &self.username);
        require(&mut errors, "email", &self.email);
        check_email(&mut errors, "email", &self.email);
        check_password_len(&mut errors, &self.password);
        require(&mut errors, "location", &self.location);
        errors
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        require(&mut errors, "username", &self.username);
        check_password_len(&mut errors, &self.password);
        errors
    }
}

/// Profile edit. The password field is the user's current password,
/// re-verified before any change is applied.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct UserEditForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub header_image_url: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub password: String,
}

impl UserEditForm {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        check_email(&mut errors, "email", &self.email);
        require(&mut errors, "password", &self.password);
        errors
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct MessageForm {
    #[serde(default)]
    pub text: String,
}

impl MessageForm {
    // The 140-char upper bound is deliberately not checked here: the
    // storage layer rejects over-long text and the handler surfaces that
    // as a field error.
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        require(&mut errors, "text", &self.text);
        errors
    }
}

fn require(errors: &mut FieldErrors, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        errors.push(field, "This field is required.");
    }
}

fn check_password_len(errors: &mut FieldErrors, password: &str) {
    if password.len() < PASSWORD_MIN_LEN {
        errors.push(
            "password",
            format!("Password must be at least {PASSWORD_MIN_LEN} characters."),
        );
    }
}

fn check_email(errors: &mut FieldErrors, field: &'static str, value: &str) {
    let value = value.trim();
    if !value.is_empty() && !looks_like_email(value) {
        errors.push(field, "Invalid email.");
    }
}

fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signup_requires_username_email_and_location() {
        let form = SignupForm {
            password: "password".into(),
            ..Default::default()
        };
        let errors = form.validate();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["username", "email", "location"]);
    }

    #[test]
    fn signup_rejects_short_password() {
        let form = SignupForm {
            username: "bird".into(),
            email: "bird@test.com".into(),
            password: "abc".into(),
            location: "nest".into(),
            ..Default::default()
        };
        let errors = form.validate();
        assert!(errors.iter().any(|e| e.field == "password"));
    }

    #[test]
    fn signup_rejects_malformed_email() {
        for bad in ["no-at-sign", "@nolocal.com", "bird@nodot", "bird@.com"] {
            let form = SignupForm {
                username: "bird".into(),
                email: bad.into(),
                password: "password".into(),
                location: "nest".into(),
                ..Default::default()
            };
            assert!(
                form.validate().iter().any(|e| e.field == "email"),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn message_form_requires_text() {
        assert!(!MessageForm::default().validate().is_empty());
        let form = MessageForm {
            text: "hello".into(),
        };
        assert!(form.validate().is_empty());
    }

    #[test]
    fn edit_form_requires_password_confirmation() {
        let form = UserEditForm {
            username: "bird".into(),
            ..Default::default()
        };
        assert!(form.validate().iter().any(|e| e.field == "password"));
    }
}
