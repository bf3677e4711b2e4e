//! Hooks built from configuration entries

use crate::ConfigError;
use regex::Regex;
use std::path::Path;

fn compile(pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|e| ConfigError::InvalidPattern(format!("'{}': {}", pattern, e)))
}

/// Filter rejecting every URL that matches `pattern`
pub fn exclude_filter(
    pattern: &str,
) -> Result<impl Fn(&str, &Path) -> bool + Send + Sync + 'static, ConfigError> {
    let regex = compile(pattern)?;
    Ok(move |url: &str, _: &Path| !regex.is_match(url))
}

/// Rewrite hook replacing every match of `pattern` with `replacement`
///
/// URLs without a match are left unchanged. `replacement` may refer to
/// capture groups as `$1` or `${name}`.
pub fn regex_rewrite(
    pattern: &str,
    replacement: &str,
) -> Result<impl Fn(&str) -> Option<String> + Send + Sync + 'static, ConfigError> {
    let regex = compile(pattern)?;
    let replacement = replacement.to_string();

    Ok(move |url: &str| {
        regex
            .is_match(url)
            .then(|| regex.replace_all(url, replacement.as_str()).into_owned())
    })
}
