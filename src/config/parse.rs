use super::types::*;
use crate::config::{env_var_pattern, expand_env_vars, expand_tilde};
use std::fs::File;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation failed:\n{}", .0.join("\n"))]
    ValidationList(Vec<String>),

    #[error("validation failed: {0}")]
    Validation(String),
}

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    use std::io::Read;

    let mut file = File::open(path).map_err(|e| {
        ConfigError::Io(std::io::Error::new(
            e.kind(),
            format!("failed to open config file '{}': {}", path.display(), e),
        ))
    })?;

    let mut yaml_string = String::new();
    file.read_to_string(&mut yaml_string).map_err(|e| {
        ConfigError::Io(std::io::Error::new(
            e.kind(),
            format!("failed to read config file '{}': {}", path.display(), e),
        ))
    })?;

    let config = parse_config(&yaml_string).map_err(|e| match e {
        ConfigError::YamlParse(e) => ConfigError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("in file '{}': {}", path.display(), e),
        )),
        other => other,
    })?;

    Ok(config)
}

/// Loads the config at `path`, or the built-in defaults when there is none.
pub fn load_or_default(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => Ok(Config::default()),
    }
}

/// Parses and validates a YAML config document.
pub fn parse_config(yaml: &str) -> Result<Config, ConfigError> {
    // Expand environment variables in the YAML string before parsing
    let yaml_string = expand_env_vars(yaml);

    check_unexpanded_vars(&yaml_string)?;

    // An empty document means "all defaults"
    let mut config: Config = if yaml_string.trim().is_empty() {
        Config::default()
    } else {
        serde_yaml::from_str(&yaml_string)?
    };

    if let Some(query_file) = config.search.query_file.as_mut() {
        *query_file = expand_tilde(query_file);
    }

    validate_config(&config)?;

    Ok(config)
}

/// Checks for unexpanded environment variables and returns a helpful error
fn check_unexpanded_vars(yaml_string: &str) -> Result<(), ConfigError> {
    let mut unexpanded_vars: Vec<String> = yaml_string
        .lines()
        .map(strip_comment)
        .flat_map(|line| env_var_pattern().captures_iter(line))
        .filter_map(|cap| cap.get(1).map(|m| m.as_str().to_string()))
        .collect();

    if unexpanded_vars.is_empty() {
        return Ok(());
    }

    unexpanded_vars.sort();
    unexpanded_vars.dedup();

    let error_msg = if let [var] = unexpanded_vars.as_slice() {
        format!(
            "Environment variable $env{{{0}}} is not set.\n\
             \n\
             To fix this, either:\n\
             1. Set the environment variable: export {0}=...\n\
             2. Replace $env{{{0}}} in the config file with an actual value",
            var
        )
    } else {
        format!(
            "Environment variables are not set: {}\n\
             \n\
             To fix this, either:\n\
             1. Set the environment variables\n\
             2. Replace the variables in the config file with actual values",
            unexpanded_vars.join(", ")
        )
    };

    Err(ConfigError::Validation(error_msg))
}

/// Drops a trailing YAML comment: `#` at line start or after whitespace.
fn strip_comment(line: &str) -> &str {
    let mut prev_is_space = true;
    for (idx, ch) in line.char_indices() {
        if ch == '#' && prev_is_space {
            return &line[..idx];
        }
        prev_is_space = ch.is_whitespace();
    }
    line
}

pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    validate_backend(&config.backend, &mut errors);
    validate_search(&config.search, &mut errors);
    validate_extraction(&config.extraction, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationList(errors))
    }
}

fn validate_backend(backend: &BackendConfig, errors: &mut Vec<String>) {
    if backend.address.trim().is_empty() {
        errors.push("backend.address must not be empty".to_string());
    } else if !backend.address.starts_with("http://")
        && !backend.address.starts_with("https://")
    {
        errors.push(format!(
            "backend.address '{}' must start with http:// or https://",
            backend.address
        ));
    }

    if backend.timeout.is_zero() {
        errors.push("backend.timeout must be greater than zero".to_string());
    }
}

fn validate_search(search: &SearchConfig, errors: &mut Vec<String>) {
    if search.index.trim().is_empty() {
        errors.push("search.index must not be empty".to_string());
    }

    if search.page_size == 0 {
        errors.push("search.page_size must be greater than zero".to_string());
    }

    if search.scroll.is_zero() {
        errors.push("search.scroll must be greater than zero".to_string());
    }

    if let Some(fields) = &search.source_filter {
        if fields.iter().any(|f| f.trim().is_empty()) {
            errors.push("search.source_filter must not contain empty field names".to_string());
        }
    }
}

fn validate_extraction(extraction: &ExtractionConfig, errors: &mut Vec<String>) {
    if !extraction.headers_pointer.starts_with('/') {
        errors.push(format!(
            "extraction.headers_pointer '{}' must be a JSON pointer starting with '/'",
            extraction.headers_pointer
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let config = parse_config(
            r#"
search:
  page_size: 500
extraction:
  on_decode_error: lenient
"#,
        )
        .unwrap();

        assert_eq!(config.search.page_size, 500);
        assert_eq!(config.search.index, "log-aws-waf-*");
        assert_eq!(config.search.scroll, Duration::from_secs(300));
        assert_eq!(
            config.extraction.on_decode_error,
            DecodeErrorStrategy::Lenient
        );
        assert_eq!(config.backend.address, "http://localhost:9200");
    }

    #[test]
    fn test_null_source_filter_disables_projection() {
        let config = parse_config("search:\n  source_filter: ~\n").unwrap();
        assert!(config.search.source_filter.is_none());
    }

    #[test]
    fn test_validation_collects_every_error() {
        let result = parse_config(
            r#"
backend:
  address: localhost:9200
search:
  index: ""
  page_size: 0
extraction:
  headers_pointer: _source.httpRequest.headers
"#,
        );

        match result {
            Err(ConfigError::ValidationList(errors)) => {
                assert_eq!(errors.len(), 4);
                assert!(errors[0].contains("backend.address"));
            }
            other => panic!("expected validation list, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_duration_is_parse_error() {
        let result = parse_config("search:\n  scroll: five minutes\n");
        assert!(matches!(result, Err(ConfigError::YamlParse(_))));
    }

    #[test]
    fn test_unknown_strategy_is_parse_error() {
        let result = parse_config("extraction:\n  on_decode_error: ignore\n");
        assert!(matches!(result, Err(ConfigError::YamlParse(_))));
    }

    #[test]
    fn test_env_var_in_comment_is_ignored() {
        let yaml = r#"
# password: $env{ESCLI_PARSE_TEST_COMMENTED}
backend:
  username: reader # or $env{ESCLI_PARSE_TEST_INLINE}
"#;
        let config = parse_config(yaml).unwrap();
        assert_eq!(config.backend.username, "reader");
    }

    #[test]
    fn test_strip_comment() {
        assert_eq!(strip_comment("# whole line"), "");
        assert_eq!(strip_comment("  key: value # note"), "  key: value ");
        assert_eq!(
            strip_comment("address: http://host/#anchor"),
            "address: http://host/#anchor"
        );
        assert_eq!(strip_comment("plain: value"), "plain: value");
    }

    #[test]
    fn test_unset_env_var_is_reported() {
        let result = parse_config("backend:\n  password: $env{ESCLI_PARSE_TEST_UNSET}\n");
        match result {
            Err(ConfigError::Validation(msg)) => {
                assert!(msg.contains("ESCLI_PARSE_TEST_UNSET"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
