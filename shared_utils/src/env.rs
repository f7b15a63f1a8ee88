use thiserror::Error;

/// An environment variable required by the application is not set.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Missing environment variable: {0}")]
pub struct MissingEnvVarError(pub String);

/// Reads an environment variable, returning a structured error if it's missing.
///
/// A variable that is set but empty (e.g. `DB_PASSWORD=` in a `.env` file) is
/// treated as missing.
///
/// # Arguments
/// * `name` - The name of the environment variable to read.
pub fn get_env_var(name: &str) -> Result<String, MissingEnvVarError> {
    get_env_var_opt(name).ok_or_else(|| MissingEnvVarError(name.to_string()))
}

/// Reads an optional environment variable. Unset and empty both yield `None`.
pub fn get_env_var_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Reads and parses an optional environment variable, falling back to `default`
/// when it is unset or does not parse.
pub fn get_env_var_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    get_env_var_opt(name)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
