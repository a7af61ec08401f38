//! Configuration constants and utilities for bluebook
//!
//! Environment-driven settings for the persistence backend. Credential
//! storage is deliberately out of scope: the token is ambient input only
//! and never written anywhere by this crate.

/// Default base URL of the persistence API.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";

/// Environment variable overriding the API base URL.
pub const API_URL_ENV_VAR: &str = "BLUEBOOK_API_URL";

/// Environment variable carrying the session token, if any.
pub const API_TOKEN_ENV_VAR: &str = "BLUEBOOK_API_TOKEN";

/// Environment variable selecting the log level for the binary.
pub const LOG_LEVEL_ENV_VAR: &str = "BLUEBOOK_LOG_LEVEL";

/// Get the API base URL, checking the environment first and falling back to
/// the default.
pub fn get_api_base_url() -> String {
    std::env::var_os(API_URL_ENV_VAR)
        .and_then(|val| val.into_string().ok())
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
}

/// Get the session token from the environment, if set.
pub fn get_api_token() -> Option<String> {
    std::env::var_os(API_TOKEN_ENV_VAR).and_then(|val| val.into_string().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_api_base_url() {
        assert_eq!(DEFAULT_API_BASE_URL, "http://localhost:5000/api");
    }

    #[test]
    fn test_get_api_base_url_default() {
        // Save current env var state
        let original = std::env::var_os(API_URL_ENV_VAR);

        std::env::remove_var(API_URL_ENV_VAR);
        assert_eq!(get_api_base_url(), DEFAULT_API_BASE_URL);

        // Restore original state
        if let Some(val) = original {
            std::env::set_var(API_URL_ENV_VAR, val);
        }
    }

    #[test]
    fn test_get_api_base_url_env_override() {
        // Save current env var state
        let original = std::env::var_os(API_URL_ENV_VAR);

        let test_url = "http://api.example.com/v1";
        std::env::set_var(API_URL_ENV_VAR, test_url);
        assert_eq!(get_api_base_url(), test_url);

        // Restore original state
        match original {
            Some(val) => std::env::set_var(API_URL_ENV_VAR, val),
            None => std::env::remove_var(API_URL_ENV_VAR),
        }
    }
}
