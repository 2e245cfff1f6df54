//! Auth service options

use crate::auth::password::HashParams;
use crate::config::AuthConfig;

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Email and password credential settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailPasswordOptions {
    pub enabled: bool,
    pub disable_sign_up: bool,
    pub require_email_verification: bool,
    pub min_password_length: usize,
    pub max_password_length: usize,
    pub auto_sign_in: bool,
}

impl EmailPasswordOptions {
    /// Settings for a service backed by a database
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            disable_sign_up: false,
            require_email_verification: false,
            min_password_length: MIN_PASSWORD_LENGTH,
            max_password_length: MAX_PASSWORD_LENGTH,
            auto_sign_in: true,
        }
    }

    /// Settings for a degraded service
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            disable_sign_up: true,
            ..Self::enabled()
        }
    }
}

/// Options every auth service carries, backed or not
#[derive(Debug, Clone)]
pub struct AuthOptions {
    pub secret: String,
    pub base_url: String,
    pub session_expires_in_secs: i64,
    pub hash_params: HashParams,
    pub email_and_password: EmailPasswordOptions,
}

impl AuthOptions {
    pub fn backed(config: &AuthConfig) -> Self {
        Self::from_config(config, EmailPasswordOptions::enabled())
    }

    pub fn degraded(config: &AuthConfig) -> Self {
        Self::from_config(config, EmailPasswordOptions::disabled())
    }

    fn from_config(config: &AuthConfig, email_and_password: EmailPasswordOptions) -> Self {
        Self {
            secret: config.secret.clone(),
            base_url: config.base_url.clone(),
            session_expires_in_secs: config.session_expires_in_secs,
            hash_params: HashParams {
                memory_kib: config.password_memory_kib,
                iterations: config.password_iterations,
            },
            email_and_password,
        }
    }

    /// Secure cookies only make sense when served over https
    pub fn secure_cookies(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backed_options() {
        let options = AuthOptions::backed(&AuthConfig::default());
        let email = &options.email_and_password;
        assert!(email.enabled);
        assert!(!email.disable_sign_up);
        assert!(!email.require_email_verification);
        assert!(email.auto_sign_in);
        assert_eq!(email.min_password_length, 8);
        assert_eq!(email.max_password_length, 128);
    }

    #[test]
    fn test_degraded_options_keep_secret_and_url() {
        let options = AuthOptions::degraded(&AuthConfig::default());
        assert!(!options.email_and_password.enabled);
        assert_eq!(options.secret, "fallback-secret");
        assert_eq!(options.base_url, "http://localhost:3000");
        assert!(!options.secure_cookies());
    }
}
