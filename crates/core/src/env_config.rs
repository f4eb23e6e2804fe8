//! Environment variable parsing with warn-level logging for invalid values.
//!
//! Every reader takes a lookup function instead of touching the process
//! environment directly, so configuration can be parsed from a fixed map in
//! tests. [`process_env`] is the lookup used in production.

/// Lookup backed by the process environment.
pub fn process_env(var: &str) -> Option<String> {
    std::env::var(var).ok()
}

/// Parse a variable with a default fallback.
///
/// - If the variable is not set: returns `default` silently (expected case).
/// - If the variable is set but cannot be parsed: logs a warning and returns `default`.
pub fn env_parse_with_default<T, F>(lookup: F, var: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        Some(v) => match v.trim().parse() {
            Ok(n) => n,
            Err(_) => {
                tracing::warn!(
                    var,
                    value = %v,
                    default = %default,
                    "invalid env var value, using default"
                );
                default
            },
        },
        None => default,
    }
}

/// Read a string variable, treating blank values as unset.
pub fn env_string<F>(lookup: F, var: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(var).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}
