use serde::{Serialize, Serializer};
use std::fmt;

/// Placeholder reported for a role nothing matched
pub const NOT_FOUND: &str = "N/A";

/// Functional category of a login form field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldRole {
    Username,
    Password,
    Totp,
    Submit,
}

impl FieldRole {
    /// Evaluation order used by the classifier
    pub const ALL: [FieldRole; 4] = [
        FieldRole::Username,
        FieldRole::Password,
        FieldRole::Totp,
        FieldRole::Submit,
    ];
}

impl fmt::Display for FieldRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldRole::Username => "username",
            FieldRole::Password => "password",
            FieldRole::Totp => "TOTP/2FA",
            FieldRole::Submit => "submit button",
        };
        f.write_str(name)
    }
}

/// Winning selector per role for one document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldSet {
    #[serde(rename = "username-field", serialize_with = "or_not_found")]
    pub username: Option<String>,
    #[serde(rename = "password-field", serialize_with = "or_not_found")]
    pub password: Option<String>,
    #[serde(rename = "totp-code-field", serialize_with = "or_not_found")]
    pub totp: Option<String>,
    #[serde(rename = "submit-button", serialize_with = "or_not_found")]
    pub submit: Option<String>,
}

impl FieldSet {
    pub fn get(&self, role: FieldRole) -> Option<&str> {
        match role {
            FieldRole::Username => self.username.as_deref(),
            FieldRole::Password => self.password.as_deref(),
            FieldRole::Totp => self.totp.as_deref(),
            FieldRole::Submit => self.submit.as_deref(),
        }
    }

    pub fn set(&mut self, role: FieldRole, selector: impl Into<String>) {
        let slot = match role {
            FieldRole::Username => &mut self.username,
            FieldRole::Password => &mut self.password,
            FieldRole::Totp => &mut self.totp,
            FieldRole::Submit => &mut self.submit,
        };
        *slot = Some(selector.into());
    }

    /// A frame is adopted only when it exposes a username or password field
    pub fn has_credentials(&self) -> bool {
        self.username.is_some() || self.password.is_some()
    }

    /// Report value for a role, `N/A` when nothing matched
    pub fn display(&self, role: FieldRole) -> &str {
        self.get(role).unwrap_or(NOT_FOUND)
    }
}

fn or_not_found<S: Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(value.as_deref().unwrap_or(NOT_FOUND))
}

/// Page URL plus the detected fields; the only output artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageResult {
    pub page: String,
    #[serde(flatten)]
    pub fields: FieldSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PageResult {
    pub fn new(page: impl Into<String>, fields: FieldSet) -> Self {
        Self {
            page: page.into(),
            fields,
            error: None,
        }
    }

    /// Every field unavailable, with the reason attached
    pub fn failed(page: impl Into<String>, error: impl fmt::Display) -> Self {
        Self {
            page: page.into(),
            fields: FieldSet::default(),
            error: Some(error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut fields = FieldSet::default();
        fields.set(FieldRole::Password, "input[name='passwd']");

        assert_eq!(fields.get(FieldRole::Password), Some("input[name='passwd']"));
        assert_eq!(fields.display(FieldRole::Username), NOT_FOUND);
        assert!(fields.has_credentials());
    }

    #[test]
    fn test_totp_and_submit_are_not_credentials() {
        let mut fields = FieldSet::default();
        fields.set(FieldRole::Totp, "input[name*='otp']");
        fields.set(FieldRole::Submit, "button[type='submit']");
        assert!(!fields.has_credentials());
    }

    #[test]
    fn test_serialized_keys_and_order() {
        let mut fields = FieldSet::default();
        fields.set(FieldRole::Username, "input[type='email']");
        let result = PageResult::new("https://example.com/login", fields);

        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(
            json,
            r#"{"page":"https://example.com/login","username-field":"input[type='email']","password-field":"N/A","totp-code-field":"N/A","submit-button":"N/A"}"#
        );
    }

    #[test]
    fn test_failed_result_carries_error() {
        let result = PageResult::failed("https://example.com", "browser error: crashed");
        let value = serde_json::to_value(&result).unwrap();

        assert_eq!(value["username-field"], "N/A");
        assert_eq!(value["submit-button"], "N/A");
        assert_eq!(value["error"], "browser error: crashed");
    }
}
