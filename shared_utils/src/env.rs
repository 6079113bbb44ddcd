use thiserror::Error;

/// An environment variable required by the application is not set.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Missing environment variable: {0}")]
pub struct MissingEnvVarError(pub String);

/// Reads an environment variable, returning a structured error if it's missing
/// or blank.
///
/// # Arguments
/// * `name` - The name of the environment variable to read.
pub fn get_env_var(name: &str) -> Result<String, MissingEnvVarError> {
    get_env_var_opt(name).ok_or_else(|| MissingEnvVarError(name.to_string()))
}

/// Like [`get_env_var`], but treats an unset or blank variable as `None`.
pub fn get_env_var_opt(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
