//! Configuration loading from the process environment
//!
//! Every option is optional at load time. Missing store or email credentials
//! switch the corresponding client into its degraded mode (built-in guest list,
//! console email) instead of failing startup.

use std::time::Duration;

use tracing::{info, warn};

pub const DEFAULT_FROM_NAME: &str = "Jemima & Marko Wedding";
pub const DEFAULT_FROM_EMAIL: &str = "wedding@jemarko.com";
pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:8080";

/// Client-side timeout applied to every store and email request
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Hosted store connection settings
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    pub url: Option<String>,
    pub api_key: Option<String>,
}

impl StoreConfig {
    /// Both URL and credential present
    pub fn is_configured(&self) -> bool {
        self.url.is_some() && self.api_key.is_some()
    }
}

/// Transactional email provider settings
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// Provider credential; `None` logs emails to the console instead
    pub api_key: Option<String>,
    pub from_name: String,
    pub from_email: String,
}

/// Service configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub store: StoreConfig,
    pub email: EmailConfig,
    /// Recipient of unlisted-guest and unverified-RSVP notifications
    pub admin_email: Option<String>,
    /// Privileged credential for the admin verification endpoint
    pub admin_api_key: Option<String>,
    /// Public base URL used to build verification links
    pub public_base_url: String,
    pub request_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    ///
    /// Blank values are treated the same as missing ones.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let store = StoreConfig {
            url: get("SUPABASE_URL").map(|url| url.trim_end_matches('/').to_string()),
            api_key: get("SUPABASE_API_KEY"),
        };
        if !store.is_configured() {
            warn!("SUPABASE_URL/SUPABASE_API_KEY not set, using built-in guest list");
        }

        let email = EmailConfig {
            api_key: get("RESEND_API_KEY"),
            from_name: or_default(get("FROM_NAME"), "FROM_NAME", DEFAULT_FROM_NAME),
            from_email: or_default(get("FROM_EMAIL"), "FROM_EMAIL", DEFAULT_FROM_EMAIL),
        };
        if email.api_key.is_none() {
            warn!("RESEND_API_KEY not set, emails will be logged to console");
        }

        let admin_email = get("ADMIN_EMAIL");
        if admin_email.is_none() {
            warn!("ADMIN_EMAIL not set, admin notifications will be skipped");
        }

        let admin_api_key = get("ADMIN_API_KEY");
        if admin_api_key.is_none() {
            warn!("ADMIN_API_KEY not set, RSVP verification endpoint is disabled");
        }

        let public_base_url = or_default(
            get("PUBLIC_BASE_URL"),
            "PUBLIC_BASE_URL",
            DEFAULT_PUBLIC_BASE_URL,
        )
        .trim_end_matches('/')
        .to_string();

        Self {
            store,
            email,
            admin_email,
            admin_api_key,
            public_base_url,
            request_timeout: REQUEST_TIMEOUT,
        }
    }
}

fn or_default(value: Option<String>, key: &str, default: &str) -> String {
    value.unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = Config::from_lookup(|_| None);

        assert!(!config.store.is_configured());
        assert!(config.email.api_key.is_none());
        assert_eq!(config.email.from_name, DEFAULT_FROM_NAME);
        assert_eq!(config.email.from_email, DEFAULT_FROM_EMAIL);
        assert!(config.admin_email.is_none());
        assert!(config.admin_api_key.is_none());
        assert_eq!(config.public_base_url, DEFAULT_PUBLIC_BASE_URL);
        assert_eq!(config.request_timeout, REQUEST_TIMEOUT);
    }

    #[test]
    fn test_blank_values_count_as_missing() {
        let config = Config::from_lookup(lookup(&[
            ("SUPABASE_URL", "   "),
            ("SUPABASE_API_KEY", "key"),
            ("ADMIN_API_KEY", ""),
        ]));

        assert!(config.store.url.is_none());
        assert!(!config.store.is_configured());
        assert!(config.admin_api_key.is_none());
    }

    #[test]
    fn test_trailing_slashes_stripped() {
        let config = Config::from_lookup(lookup(&[
            ("SUPABASE_URL", "https://db.example.com/"),
            ("SUPABASE_API_KEY", "key"),
            ("PUBLIC_BASE_URL", "https://rsvp.example.com/"),
        ]));

        assert!(config.store.is_configured());
        assert_eq!(config.store.url.as_deref(), Some("https://db.example.com"));
        assert_eq!(config.public_base_url, "https://rsvp.example.com");
    }

    #[test]
    fn test_store_requires_both_url_and_key() {
        let config = Config::from_lookup(lookup(&[("SUPABASE_URL", "https://db.example.com")]));
        assert!(!config.store.is_configured());
    }
}
