use seattle_info_admin::{AppConfig, config::Env};
use serial_test::serial;
use std::{env, panic, time::Duration};

const CONFIG_VARS: [&str; 5] = [
    "APP_ENV",
    "BIND_ADDR",
    "ADMIN_STATIC_DIR",
    "REQUEST_TIMEOUT_SECS",
    "SEED_MOCK_DATA",
];

// --- Setup/Teardown Utilities ---

/// Utility to run a test function and restore environment variables afterward
fn run_with_env<T, R>(test: T, cleanup_vars: Vec<&'static str>) -> R
where
    T: FnOnce() -> R + panic::UnwindSafe,
{
    // Save current environment variables
    let originals: Vec<(String, Option<String>)> = cleanup_vars
        .iter()
        .map(|&var| (var.to_string(), env::var(var).ok()))
        .collect();

    // Run the test
    let result = panic::catch_unwind(test);

    // Restore original environment variables
    for (key, original_value) in originals.into_iter().rev() {
        unsafe {
            if let Some(val) = original_value {
                env::set_var(&key, val);
            } else {
                env::remove_var(&key);
            }
        }
    }

    // Re-panic if the test failed
    match result {
        Ok(value) => value,
        Err(e) => panic::resume_unwind(e),
    }
}

fn clear_config_vars() {
    unsafe {
        for var in CONFIG_VARS {
            env::remove_var(var);
        }
    }
}

// --- Tests ---

#[test]
#[serial]
fn test_app_config_production_fail_fast() {
    // BIND_ADDR is mandatory in production
    let result = run_with_env(
        || {
            panic::catch_unwind(|| {
                clear_config_vars();
                unsafe {
                    env::set_var("APP_ENV", "production");
                }
                AppConfig::load()
            })
        },
        CONFIG_VARS.to_vec(),
    );

    assert!(
        result.is_err(),
        "Production config loading should panic without BIND_ADDR"
    );
}

#[test]
#[serial]
fn test_app_config_production_with_bind_addr() {
    let config = run_with_env(
        || {
            clear_config_vars();
            unsafe {
                env::set_var("APP_ENV", "production");
                env::set_var("BIND_ADDR", "0.0.0.0:9090");
            }
            AppConfig::load()
        },
        CONFIG_VARS.to_vec(),
    );

    assert_eq!(config.env, Env::Production);
    assert_eq!(config.bind_addr, "0.0.0.0:9090");
}

#[test]
#[serial]
fn test_app_config_local_env_defaults() {
    // Local mode should not panic, and should use hardcoded defaults
    let config = run_with_env(
        || {
            clear_config_vars();
            AppConfig::load()
        },
        CONFIG_VARS.to_vec(),
    );

    assert_eq!(config.env, Env::Local);
    assert_eq!(config.bind_addr, "0.0.0.0:8080");
    assert_eq!(config.static_dir, "./web/admin");
    assert_eq!(config.request_timeout(), Duration::from_secs(10));
    assert!(config.seed_mock_data);
}

#[test]
#[serial]
fn test_app_config_local_overrides() {
    let config = run_with_env(
        || {
            clear_config_vars();
            unsafe {
                env::set_var("APP_ENV", "staging");
                env::set_var("BIND_ADDR", "127.0.0.1:3000");
                env::set_var("ADMIN_STATIC_DIR", "/srv/admin");
                env::set_var("REQUEST_TIMEOUT_SECS", "30");
                env::set_var("SEED_MOCK_DATA", "false");
            }
            AppConfig::load()
        },
        CONFIG_VARS.to_vec(),
    );

    // Unknown environments fall back to local
    assert_eq!(config.env, Env::Local);
    assert_eq!(config.bind_addr, "127.0.0.1:3000");
    assert_eq!(config.static_dir, "/srv/admin");
    assert_eq!(config.request_timeout_secs, 30);
    assert!(!config.seed_mock_data);
}

#[test]
#[serial]
fn test_app_config_lenient_parsing() {
    for (timeout, seed, expected_timeout, expected_seed) in [
        ("abc", "OFF", 10, false),
        ("0", "0", 10, false),
        ("-5", "yes", 10, true),
        ("15", "", 15, true),
    ] {
        let config = run_with_env(
            || {
                clear_config_vars();
                unsafe {
                    env::set_var("REQUEST_TIMEOUT_SECS", timeout);
                    env::set_var("SEED_MOCK_DATA", seed);
                }
                AppConfig::load()
            },
            CONFIG_VARS.to_vec(),
        );

        assert_eq!(config.request_timeout_secs, expected_timeout, "timeout {timeout:?}");
        assert_eq!(config.seed_mock_data, expected_seed, "seed {seed:?}");
    }
}
