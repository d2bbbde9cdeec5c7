use std::fmt;

use condo_config::Config;

/// Cross-cutting values of the signed-in operator, handed to every wizard
/// explicitly instead of being read from ambient storage.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    pub organization_id: Option<String>,
    pub auth_token: Option<String>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            organization_id: config.organization_id.clone(),
            auth_token: None,
        }
    }

    pub fn with_organization(mut self, organization_id: impl Into<String>) -> Self {
        self.organization_id = Some(organization_id.into());
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn organization_id(&self) -> Option<&str> {
        self.organization_id.as_deref()
    }

    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("organization_id", &self.organization_id)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "***"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_redacts_token() {
        let session = SessionContext::new()
            .with_organization("org-1")
            .with_token("secret-token");
        let debug = format!("{:?}", session);
        assert!(debug.contains("org-1"));
        assert!(!debug.contains("secret-token"));
    }

    #[test]
    fn organization_comes_from_config() {
        let config = Config {
            organization_id: Some("org-9".into()),
            ..Config::default()
        };
        assert_eq!(SessionContext::from_config(&config).organization_id(), Some("org-9"));
    }
}
