//! Environment variable utilities
//!
//! Typed lookups with defaults, used by the config layer.
//!
//! ```ignore
//! use abbey_core::env::{env_get, env_get_bool};
//!
//! let workers: usize = env_get("ABBEY_NUM_WORKERS", 2);
//! let debug: bool = env_get_bool("ABBEY_DEBUG", false);
//! ```

use std::str::FromStr;

/// Get environment variable parsed as type T, or return default
///
/// A set-but-unparseable value also falls back to the default.
#[inline]
pub fn env_get<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    env_get_opt(key).unwrap_or(default)
}

/// Get environment variable as boolean
///
/// Accepts "1", "true", "yes", "on" (case-insensitive) as true.
/// Any other set value is false; unset returns the default.
#[inline]
pub fn env_get_bool(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(val) => matches!(val.to_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        Err(_) => default,
    }
}

/// Get environment variable as optional value
#[inline]
pub fn env_get_opt<T>(key: &str) -> Option<T>
where
    T: FromStr,
{
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test owns its variable names; cargo runs tests in parallel.

    #[test]
    fn test_env_get_default() {
        let val: u64 = env_get("__ABBEY_TEST_UNSET_1__", 8);
        assert_eq!(val, 8);
        assert_eq!(env_get_opt::<usize>("__ABBEY_TEST_UNSET_1__"), None);
    }

    #[test]
    fn test_env_get_set_and_trimmed() {
        std::env::set_var("__ABBEY_TEST_NUM__", " 12 ");
        let val: usize = env_get("__ABBEY_TEST_NUM__", 0);
        assert_eq!(val, 12);
        std::env::remove_var("__ABBEY_TEST_NUM__");
    }

    #[test]
    fn test_env_get_invalid_parse() {
        std::env::set_var("__ABBEY_TEST_BAD__", "many");
        let val: usize = env_get("__ABBEY_TEST_BAD__", 4);
        assert_eq!(val, 4);
        std::env::remove_var("__ABBEY_TEST_BAD__");
    }

    #[test]
    fn test_env_get_bool_variants() {
        for (raw, expected) in [
            ("1", true),
            ("TRUE", true),
            ("yes", true),
            ("on", true),
            ("0", false),
            ("off", false),
            ("garbage", false),
        ] {
            std::env::set_var("__ABBEY_TEST_BOOL__", raw);
            assert_eq!(env_get_bool("__ABBEY_TEST_BOOL__", !expected), expected, "{}", raw);
        }
        std::env::remove_var("__ABBEY_TEST_BOOL__");
        assert!(env_get_bool("__ABBEY_TEST_BOOL__", true));
    }
}
