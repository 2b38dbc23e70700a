use std::path::Path;

use ::config::{Config, Environment, Map};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

/// Variables look like `APP_AUTH__JWT_SECRET`.
pub const ENV_PREFIX: &str = "APP";
const NESTING_SEPARATOR: &str = "__";
const LIST_KEYS: &[&str] = &["auth.previous_jwt_secrets"];

/// Pulls `.env` into the process environment. The file beside the manifest
/// is tried first, then the working directory. A missing file is fine.
pub fn load_dotenv() {
    let manifest_env = Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
    if dotenvy::from_filename(&manifest_env).is_err() {
        let _ = dotenvy::dotenv();
    }
}

pub(super) fn environment(vars: Option<Map<String, String>>) -> Environment {
    LIST_KEYS
        .iter()
        .fold(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator(NESTING_SEPARATOR)
                .list_separator(",")
                .try_parsing(true),
            |env, key| env.with_list_parse_key(key),
        )
        .source(vars)
}

pub(super) fn deserialize<T: DeserializeOwned>(env: Environment) -> Result<T> {
    Config::builder()
        .add_source(env)
        .build()
        .context("failed to read configuration from the environment")?
        .try_deserialize()
        .context("environment does not match the configuration shape")
}

#[cfg(test)]
mod tests {
    use ::config::Map;

    use super::{deserialize, environment};
    use crate::config::AppConfig;

    fn vars(pairs: &[(&str, &str)]) -> Map<String, String> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn nested_keys_and_lists_are_parsed() {
        let cfg: AppConfig = deserialize(environment(Some(vars(&[
            ("APP_GENERAL__PORT", "8081"),
            ("APP_AUTH__JWT_SECRET", "from-env"),
            ("APP_AUTH__PREVIOUS_JWT_SECRETS", "old-one,old-two"),
        ]))))
        .expect("config should deserialize");

        assert_eq!(cfg.general.port, 8081);
        assert_eq!(cfg.auth.jwt_secret, "from-env");
        assert_eq!(cfg.auth.previous_jwt_secrets, vec!["old-one", "old-two"]);
    }

    #[test]
    fn unset_sections_fall_back_to_defaults() {
        let cfg: AppConfig =
            deserialize(environment(Some(Map::new()))).expect("config should deserialize");
        assert_eq!(cfg.general.port, AppConfig::default().general.port);
    }
}
