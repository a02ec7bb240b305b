// Client configuration: where the results box lives and how to authenticate.
// Built once at startup from the environment (optionally seeded from a
// `.env` file) and handed to `ApiClient::new`.

use crate::error::ConfigError;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

pub const TOKEN_VAR: &str = "TOKEN";
pub const BOX_IP_VAR: &str = "BOX_IP";
pub const TIMEOUT_VAR: &str = "BOX_TIMEOUT_SECS";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Path of the API on the box, appended to `BOX_IP`.
const API_PATH: &str = "/api/v2";

#[derive(Clone)]
pub struct ClientConfig {
    api_root: String,
    token: String,
    timeout: Duration,
}

impl ClientConfig {
    /// Validate `box_ip` and `token` and derive the API root from them.
    pub fn new(box_ip: &str, token: &str) -> Result<Self, ConfigError> {
        let box_ip = box_ip.trim().trim_end_matches('/');
        if box_ip.is_empty() {
            return Err(ConfigError::Missing(BOX_IP_VAR));
        }
        let token = token.trim();
        if token.is_empty() {
            return Err(ConfigError::Missing(TOKEN_VAR));
        }

        let parsed = url::Url::parse(box_ip).map_err(|e| ConfigError::InvalidBoxIp {
            value: box_ip.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBoxIp {
                value: box_ip.to_string(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        Ok(ClientConfig {
            api_root: format!("{box_ip}{API_PATH}"),
            token: token.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load `.env` (see [`load_dotenv`]) and read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        load_dotenv()?;
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let box_ip = lookup(BOX_IP_VAR).ok_or(ConfigError::Missing(BOX_IP_VAR))?;
        let token = lookup(TOKEN_VAR).ok_or(ConfigError::Missing(TOKEN_VAR))?;
        let config = Self::new(&box_ip, &token)?;

        match lookup(TIMEOUT_VAR) {
            Some(raw) => {
                let secs = raw
                    .trim()
                    .parse::<u64>()
                    .ok()
                    .filter(|s| *s > 0)
                    .ok_or(ConfigError::InvalidTimeout(raw))?;
                Ok(config.with_timeout(Duration::from_secs(secs)))
            }
            None => Ok(config),
        }
    }

    /// `{BOX_IP}/api/v2`
    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Full URL of an endpoint under the API root, e.g. `endpoint("series")`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_root, path.trim_start_matches('/'))
    }
}

// Keep the token out of logs and error reports.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_root", &self.api_root)
            .field("token", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Fallback `.env` location in the user's config directory.
pub fn user_dotenv_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("cad4tb-results").join(".env"))
}

/// Load variables from the nearest `.env` (working directory or an ancestor),
/// falling back to [`user_dotenv_path`]. Variables already set in the process
/// win. Returns the file that was loaded, if any.
pub fn load_dotenv() -> Result<Option<PathBuf>, ConfigError> {
    match dotenv::dotenv() {
        Ok(path) => {
            debug!(path = %path.display(), "loaded .env");
            return Ok(Some(path));
        }
        Err(e) if e.not_found() => {}
        Err(source) => {
            return Err(ConfigError::Dotenv {
                path: ".env".to_string(),
                source,
            })
        }
    }

    let Some(path) = user_dotenv_path().filter(|p| p.is_file()) else {
        return Ok(None);
    };
    dotenv::from_path(&path).map_err(|source| ConfigError::Dotenv {
        path: path.display().to_string(),
        source,
    })?;
    debug!(path = %path.display(), "loaded .env");
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[rstest]
    #[case("http://10.0.0.5", "http://10.0.0.5/api/v2")]
    #[case("http://10.0.0.5/", "http://10.0.0.5/api/v2")]
    #[case("  https://box.local:8443 ", "https://box.local:8443/api/v2")]
    fn test_api_root(#[case] box_ip: &str, #[case] expected: &str) {
        let config = ClientConfig::new(box_ip, "secret").unwrap();
        assert_eq!(config.api_root(), expected);
    }

    #[test]
    fn test_endpoint() {
        let config = ClientConfig::new("http://10.0.0.5", "secret").unwrap();
        assert_eq!(config.endpoint("series"), "http://10.0.0.5/api/v2/series");
        assert_eq!(config.endpoint("/results"), "http://10.0.0.5/api/v2/results");
    }

    #[rstest]
    #[case(&[("TOKEN", "secret")], BOX_IP_VAR)]
    #[case(&[("BOX_IP", "http://10.0.0.5")], TOKEN_VAR)]
    #[case(&[("BOX_IP", "   "), ("TOKEN", "secret")], BOX_IP_VAR)]
    #[case(&[("BOX_IP", "http://10.0.0.5"), ("TOKEN", "")], TOKEN_VAR)]
    fn test_missing(#[case] pairs: &[(&str, &str)], #[case] expected: &str) {
        match ClientConfig::from_lookup(lookup_from(pairs)) {
            Err(ConfigError::Missing(name)) => assert_eq!(name, expected),
            other => panic!("expected Missing({expected}), got {other:?}"),
        }
    }

    #[rstest]
    #[case("10.0.0.5")]
    #[case("localhost:8000")]
    #[case("ftp://10.0.0.5")]
    fn test_invalid_box_ip(#[case] box_ip: &str) {
        let result = ClientConfig::new(box_ip, "secret");
        assert!(matches!(result, Err(ConfigError::InvalidBoxIp { .. })));
    }

    #[test]
    fn test_timeout_default_and_override() {
        let base = [("BOX_IP", "http://10.0.0.5"), ("TOKEN", "secret")];
        let config = ClientConfig::from_lookup(lookup_from(&base)).unwrap();
        assert_eq!(config.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));

        let with_timeout = [base[0], base[1], ("BOX_TIMEOUT_SECS", "5")];
        let config = ClientConfig::from_lookup(lookup_from(&with_timeout)).unwrap();
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }

    #[rstest]
    #[case("0")]
    #[case("-3")]
    #[case("soon")]
    fn test_invalid_timeout(#[case] raw: &str) {
        let pairs = [("BOX_IP", "http://10.0.0.5"), ("TOKEN", "secret"), ("BOX_TIMEOUT_SECS", raw)];
        let result = ClientConfig::from_lookup(lookup_from(&pairs));
        assert!(matches!(result, Err(ConfigError::InvalidTimeout(v)) if v == raw));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = ClientConfig::new("http://10.0.0.5", "super-secret-token").unwrap();
        let printed = format!("{config:?}");
        assert!(!printed.contains("super-secret-token"));
        assert!(printed.contains("http://10.0.0.5/api/v2"));
    }
}
