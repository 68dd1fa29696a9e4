pub mod duration;
pub mod generate;
pub mod parse;
pub mod types;

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub use parse::{load_config, load_or_default, ConfigError};
pub use types::{BackendConfig, Config, DecodeErrorStrategy, ExtractionConfig, SearchConfig};

const USER_CONFIG: &str = ".config/escli/config.yml";
const SYSTEM_CONFIG: &str = "/etc/escli/config.yml";

/// Matches `$env{VAR_NAME}` where VAR_NAME starts with a letter or underscore.
pub(crate) fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$env\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("env var pattern is valid")
    })
}

/// Expands environment variables in a string.
/// Supports $env{VAR_NAME} syntax.
/// If an environment variable is not set, it's left unchanged.
pub fn expand_env_vars(text: &str) -> String {
    env_var_pattern()
        .replace_all(text, |caps: &regex::Captures| {
            let whole = caps.get(0).map_or("", |m| m.as_str());
            caps.get(1)
                .and_then(|name| std::env::var(name.as_str()).ok())
                .unwrap_or_else(|| whole.to_string())
        })
        .to_string()
}

/// Expands tilde (~) in paths to the user's home directory.
/// Returns the path unchanged if it doesn't start with tilde or home directory cannot be determined.
pub fn expand_tilde(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();

    if let Some(rest) = path_str.strip_prefix("~/") {
        if let Some(home_dir) = dirs::home_dir() {
            return home_dir.join(rest);
        }
    } else if path_str == "~" {
        if let Some(home_dir) = dirs::home_dir() {
            return home_dir;
        }
    }

    path.to_path_buf()
}

/// Default location `config init` writes to.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(USER_CONFIG))
}

/// Resolves the config file path based on explicit argument or default locations.
/// Returns the first existing path from:
/// 1. Explicit path (if provided, with tilde expansion)
/// 2. ~/.config/escli/config.yml
/// 3. /etc/escli/config.yml
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(expand_tilde(path));
    }

    if let Some(user_config) = user_config_path() {
        if user_config.exists() {
            return Some(user_config);
        }
    }

    let system_config = PathBuf::from(SYSTEM_CONFIG);
    if system_config.exists() {
        return Some(system_config);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_expand_env_vars_single() {
        std::env::set_var("ESCLI_TEST_VAR", "test_value");
        let result = expand_env_vars("password: $env{ESCLI_TEST_VAR}");
        assert_eq!(result, "password: test_value");
        std::env::remove_var("ESCLI_TEST_VAR");
    }

    #[test]
    fn test_expand_env_vars_multiple() {
        std::env::set_var("ESCLI_VAR1", "value1");
        std::env::set_var("ESCLI_VAR2", "value2");
        let result = expand_env_vars("$env{ESCLI_VAR1}/middle/$env{ESCLI_VAR2}");
        assert_eq!(result, "value1/middle/value2");
        std::env::remove_var("ESCLI_VAR1");
        std::env::remove_var("ESCLI_VAR2");
    }

    #[test]
    fn test_expand_env_vars_unset() {
        let result = expand_env_vars("path/$env{ESCLI_NONEXISTENT_VAR}/file");
        // Unset variables are left unchanged
        assert_eq!(result, "path/$env{ESCLI_NONEXISTENT_VAR}/file");
    }

    #[test]
    fn test_expand_env_vars_no_expansion() {
        let result = expand_env_vars("http://localhost:9200");
        assert_eq!(result, "http://localhost:9200");
    }

    #[test]
    fn test_expand_tilde_with_path() {
        let expanded = expand_tilde(Path::new("~/queries/waf.json"));

        if let Some(home) = dirs::home_dir() {
            assert_eq!(expanded, home.join("queries/waf.json"));
        }
    }

    #[test]
    fn test_expand_tilde_no_expansion() {
        let expanded = expand_tilde(Path::new("/absolute/path"));
        assert_eq!(expanded, Path::new("/absolute/path"));
    }

    #[test]
    fn test_resolve_explicit_path_wins() {
        let resolved = resolve_config_path(Some(Path::new("/tmp/escli.yml")));
        assert_eq!(resolved, Some(PathBuf::from("/tmp/escli.yml")));
    }
}
