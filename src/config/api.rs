//! API behaviour configuration

use secrecy::SecretString;
use serde::Deserialize;

use super::error::ValidationError;

/// API configuration (paging and client tokens)
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Rows per page on paginated listings
    #[serde(default = "default_page_size")]
    pub page_size: u64,

    /// Accepted bearer tokens (comma-separated). Empty disables auth.
    pub auth_tokens: Option<SecretString>,
}

impl ApiConfig {
    /// Get auth tokens as a vector
    pub fn auth_tokens_list(&self) -> Vec<SecretString> {
        use secrecy::ExposeSecret;

        self.auth_tokens
            .as_ref()
            .map(|s| {
                s.expose_secret()
                    .split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(|t| SecretString::new(t.to_string()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Validate API configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.page_size == 0 || self.page_size > 1000 {
            return Err(ValidationError::InvalidPageSize);
        }
        Ok(())
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            auth_tokens: None,
        }
    }
}

fn default_page_size() -> u64 {
    100
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_api_config_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.page_size, 100);
        assert!(config.auth_tokens_list().is_empty());
    }

    #[test]
    fn test_auth_tokens_parsing() {
        let config = ApiConfig {
            auth_tokens: Some(SecretString::new("alpha, beta,,".to_string())),
            ..Default::default()
        };
        let tokens = config.auth_tokens_list();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].expose_secret(), "beta");
    }

    #[test]
    fn test_validation_page_size() {
        let config = ApiConfig {
            page_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
