pub mod config;
pub mod info;
pub mod search;

use crate::config::types::BackendConfig;
use crate::config::ConfigError;
use crate::pipeline::PipelineError;
use crate::query::QueryError;
use crate::search::SearchError;
use clap::Args;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("query error: {0}")]
    Query(#[from] QueryError),

    #[error("search error: {0}")]
    Search(#[from] SearchError),

    #[error("{0}")]
    Pipeline(#[from] PipelineError),

    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Usage(String),
}

/// Connection flags shared by every command.
#[derive(Debug, Clone, Default, Args)]
pub struct BackendArgs {
    /// Elasticsearch url
    #[arg(
        long,
        short = 'a',
        global = true,
        env = "ELASTICSEARCH_URL",
        visible_aliases = ["host", "url"]
    )]
    pub address: Option<String>,

    /// Elasticsearch username
    #[arg(long, short = 'u', global = true, env = "ELASTICSEARCH_USERNAME")]
    pub username: Option<String>,

    /// Elasticsearch password
    #[arg(
        long,
        short = 'p',
        global = true,
        env = "ELASTICSEARCH_PASSWORD",
        hide_env_values = true
    )]
    pub password: Option<String>,
}

impl BackendArgs {
    pub fn apply(&self, backend: &mut BackendConfig) {
        if let Some(address) = &self.address {
            backend.address = address.clone();
        }
        if let Some(username) = &self.username {
            backend.username = username.clone();
        }
        if let Some(password) = &self.password {
            backend.password = password.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_args_override_only_given_values() {
        let mut backend = BackendConfig::default();
        let args = BackendArgs {
            address: Some("https://es.example.com:9243".to_string()),
            username: None,
            password: Some("hunter2".to_string()),
        };

        args.apply(&mut backend);
        assert_eq!(backend.address, "https://es.example.com:9243");
        assert_eq!(backend.username, "elasticsearch");
        assert_eq!(backend.password, "hunter2");
    }
}
