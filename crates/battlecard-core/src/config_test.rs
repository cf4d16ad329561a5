use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

/// Returns a map with all required env vars populated with valid defaults.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("GEMINI_API_KEY", "test-key");
    m
}

#[test]
fn parse_environment_development() {
    assert_eq!(parse_environment("development"), Environment::Development);
}

#[test]
fn parse_environment_production() {
    assert_eq!(parse_environment("production"), Environment::Production);
}

#[test]
fn parse_environment_unknown_defaults_to_development() {
    assert_eq!(parse_environment("staging"), Environment::Development);
}

#[test]
fn build_app_config_fails_without_api_key() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "GEMINI_API_KEY"),
        "expected MissingEnvVar(GEMINI_API_KEY), got: {result:?}"
    );
}

#[test]
fn build_app_config_treats_blank_api_key_as_missing() {
    let mut map = HashMap::new();
    map.insert("GEMINI_API_KEY", "   ");
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(result, Err(ConfigError::MissingEnvVar(_))));
}

#[test]
fn build_app_config_succeeds_with_defaults() {
    let map = full_env();
    let cfg = build_app_config(lookup_from_map(&map)).expect("valid config");
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.bind_addr.to_string(), "127.0.0.1:3000");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.data_dir, std::path::PathBuf::from("./data"));
    assert_eq!(cfg.gemini_base_url, "https://generativelanguage.googleapis.com");
    assert_eq!(cfg.gemini_model, "gemini-2.5-flash");
    assert_eq!(cfg.ai_timeout_secs, 120);
    assert_eq!(cfg.brand, BrandContext::default());
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let mut map = full_env();
    map.insert("BATTLECARD_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "BATTLECARD_BIND_ADDR"),
        "expected InvalidEnvVar(BATTLECARD_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn ai_timeout_override() {
    let mut map = full_env();
    map.insert("BATTLECARD_AI_TIMEOUT_SECS", "30");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.ai_timeout_secs, 30);
}

#[test]
fn ai_timeout_invalid() {
    let mut map = full_env();
    map.insert("BATTLECARD_AI_TIMEOUT_SECS", "soon");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "BATTLECARD_AI_TIMEOUT_SECS"),
        "expected InvalidEnvVar(BATTLECARD_AI_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn ai_timeout_zero_is_rejected() {
    let mut map = full_env();
    map.insert("BATTLECARD_AI_TIMEOUT_SECS", "0");
    assert!(build_app_config(lookup_from_map(&map)).is_err());
}

#[test]
fn brand_overrides_apply_individually() {
    let mut map = full_env();
    map.insert("BATTLECARD_BRAND_NAME", "Acme Social");
    map.insert("BATTLECARD_OUTPUT_LANGUAGE", "German");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.brand.name, "Acme Social");
    assert_eq!(cfg.brand.output_language, "German");
    assert_eq!(cfg.brand.usp, BrandContext::default().usp);
}

#[test]
fn debug_redacts_api_key() {
    let map = full_env();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("test-key"));
    assert!(rendered.contains("[redacted]"));
}
