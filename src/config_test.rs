use super::*;
use std::sync::Mutex;

// from_env reads shared process variables; serialize the tests that touch them.
static ENV_LOCK: Mutex<()> = Mutex::new(());

const VARS: &[&str] = &[
    "APP_ENV",
    "PORT",
    "SUPABASE_URL",
    "SUPABASE_KEY",
    "STORAGE_BUCKET",
    "WHATSAPP_PHONE",
    "DISPLAY_UTC_OFFSET_HOURS",
    "COOKIE_SECURE",
    "SUPABASE_REQUEST_TIMEOUT_SECS",
    "SUPABASE_CONNECT_TIMEOUT_SECS",
    "STATIC_DIR",
];

/// # Safety
/// Callers hold `ENV_LOCK`.
unsafe fn clear_site_env() {
    for var in VARS {
        unsafe { std::env::remove_var(var) };
    }
}

unsafe fn set_required() {
    unsafe {
        std::env::set_var("SUPABASE_URL", "https://demo.supabase.co/");
        std::env::set_var("SUPABASE_KEY", "anon-key");
    }
}

#[test]
fn from_env_applies_defaults() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_site_env();
        set_required();
    }

    let cfg = SiteConfig::from_env().unwrap();
    assert!(!cfg.production);
    assert_eq!(cfg.port, DEFAULT_PORT);
    assert_eq!(cfg.supabase.url, "https://demo.supabase.co");
    assert_eq!(cfg.supabase.key, "anon-key");
    assert_eq!(cfg.supabase.storage_bucket, DEFAULT_STORAGE_BUCKET);
    assert_eq!(
        cfg.supabase.timeouts,
        SupabaseTimeouts { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    );
    assert_eq!(cfg.whatsapp_phone, DEFAULT_WHATSAPP_PHONE);
    assert_eq!(cfg.display_utc_offset_hours, -3);
    assert!(!cfg.cookie_secure);
    assert_eq!(cfg.static_dir, default_static_dir());

    unsafe { clear_site_env() };
}

#[test]
fn from_env_static_dir_override() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_site_env();
        set_required();
        std::env::set_var("STATIC_DIR", "/srv/vitrine/static");
    }

    let cfg = SiteConfig::from_env().unwrap();
    assert_eq!(cfg.static_dir, PathBuf::from("/srv/vitrine/static"));

    unsafe { clear_site_env() };
}

#[test]
fn from_env_production_overrides() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_site_env();
        set_required();
        std::env::set_var("APP_ENV", "Production");
        std::env::set_var("PORT", "8080");
        std::env::set_var("STORAGE_BUCKET", "fotos");
        std::env::set_var("WHATSAPP_PHONE", "+55 (21) 98888-7777");
        std::env::set_var("DISPLAY_UTC_OFFSET_HOURS", "0");
        std::env::set_var("SUPABASE_REQUEST_TIMEOUT_SECS", "5");
    }

    let cfg = SiteConfig::from_env().unwrap();
    assert!(cfg.production);
    assert!(cfg.cookie_secure);
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.supabase.storage_bucket, "fotos");
    assert_eq!(cfg.whatsapp_phone, "5521988887777");
    assert_eq!(cfg.display_utc_offset_hours, 0);
    assert_eq!(cfg.supabase.timeouts.request_secs, 5);

    unsafe { clear_site_env() };
}

#[test]
fn from_env_cookie_secure_can_be_disabled_in_production() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_site_env();
        set_required();
        std::env::set_var("APP_ENV", "production");
        std::env::set_var("COOKIE_SECURE", "off");
    }

    let cfg = SiteConfig::from_env().unwrap();
    assert!(!cfg.cookie_secure);

    unsafe { clear_site_env() };
}

#[test]
fn from_env_missing_url_errors() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_site_env();
        std::env::set_var("SUPABASE_KEY", "anon-key");
    }

    let err = SiteConfig::from_env().unwrap_err();
    assert!(matches!(err, ConfigError::Missing("SUPABASE_URL")));

    unsafe { clear_site_env() };
}

#[test]
fn from_env_blank_key_counts_as_missing() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_site_env();
        std::env::set_var("SUPABASE_URL", "https://demo.supabase.co");
        std::env::set_var("SUPABASE_KEY", "   ");
    }

    let err = SiteConfig::from_env().unwrap_err();
    assert!(matches!(err, ConfigError::Missing("SUPABASE_KEY")));

    unsafe { clear_site_env() };
}

#[test]
fn from_env_bad_port_errors() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_site_env();
        set_required();
        std::env::set_var("PORT", "eighty");
    }

    let err = SiteConfig::from_env().unwrap_err().to_string();
    assert!(err.contains("PORT"));
    assert!(err.contains("eighty"));

    unsafe { clear_site_env() };
}

#[test]
fn from_env_out_of_range_offset_errors() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_site_env();
        set_required();
        std::env::set_var("DISPLAY_UTC_OFFSET_HOURS", "30");
    }

    let err = SiteConfig::from_env().unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { var: "DISPLAY_UTC_OFFSET_HOURS", .. }));

    unsafe { clear_site_env() };
}

#[test]
fn env_file_name_picks_production_file() {
    assert_eq!(env_file_name(Some("production")), ".env.production");
    assert_eq!(env_file_name(Some(" PRODUCTION ")), ".env.production");
    assert_eq!(env_file_name(Some("development")), ".env");
    assert_eq!(env_file_name(None), ".env");
}

// env_bool uses unique variable names so it can run alongside the tests above.

#[test]
fn env_bool_true_and_false_variants() {
    for (i, (val, expected)) in [("1", true), ("YES", true), (" on ", true), ("0", false), ("Off", false)]
        .iter()
        .enumerate()
    {
        let key = format!("__VITRINE_TEST_EB_{i}__");
        unsafe { std::env::set_var(&key, val) };
        assert_eq!(env_bool(&key), Some(*expected), "unexpected result for {val:?}");
        unsafe { std::env::remove_var(&key) };
    }
}

#[test]
fn env_bool_invalid_or_unset_returns_none() {
    let key = "__VITRINE_TEST_EB_INVALID__";
    unsafe { std::env::set_var(key, "maybe") };
    assert_eq!(env_bool(key), None);
    unsafe { std::env::remove_var(key) };
    assert_eq!(env_bool("__VITRINE_TEST_EB_SURELY_UNSET__"), None);
}
