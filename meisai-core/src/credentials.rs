use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("username and password must both be non-empty")]
pub struct CredentialError;

/// Vpass member credentials. Validated at construction, before any network
/// traffic happens.
#[derive(Debug, Clone)]
pub struct Credentials {
    user_id: String,
    password: String,
}

impl Credentials {
    pub fn new(
        user_id: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, CredentialError> {
        let user_id = user_id.into();
        let password = password.into();
        if user_id.is_empty() || password.is_empty() {
            return Err(CredentialError);
        }
        Ok(Self { user_id, password })
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}
