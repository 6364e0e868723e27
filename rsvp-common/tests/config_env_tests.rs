//! Configuration loading from the real process environment
//!
//! Tests that set environment variables are marked #[serial] so they do not
//! race each other.

use serial_test::serial;
use rsvp_common::config::{DEFAULT_FROM_NAME, DEFAULT_PUBLIC_BASE_URL};
use rsvp_common::Config;

const KEYS: [&str; 8] = [
    "SUPABASE_URL",
    "SUPABASE_API_KEY",
    "RESEND_API_KEY",
    "FROM_NAME",
    "FROM_EMAIL",
    "ADMIN_EMAIL",
    "ADMIN_API_KEY",
    "PUBLIC_BASE_URL",
];

fn clear_env() {
    for key in KEYS {
        std::env::remove_var(key);
    }
}

#[test]
#[serial]
fn test_from_env_reads_variables() {
    clear_env();
    std::env::set_var("SUPABASE_URL", "https://project.supabase.co/");
    std::env::set_var("SUPABASE_API_KEY", "service-key");
    std::env::set_var("ADMIN_API_KEY", "s3cret");

    let config = Config::from_env();
    assert!(config.store.is_configured());
    assert_eq!(config.store.url.as_deref(), Some("https://project.supabase.co"));
    assert_eq!(config.admin_api_key.as_deref(), Some("s3cret"));
    assert_eq!(config.email.from_name, DEFAULT_FROM_NAME);

    clear_env();
}

#[test]
#[serial]
fn test_from_env_defaults_when_unset() {
    clear_env();

    let config = Config::from_env();
    assert!(!config.store.is_configured());
    assert!(config.email.api_key.is_none());
    assert!(config.admin_email.is_none());
    assert_eq!(config.public_base_url, DEFAULT_PUBLIC_BASE_URL);
}
