use super::backend::{ClusterInfo, SearchBackend};
use super::page::{parse_error_body, parse_search_response, CursorToken, Result, ResultPage};
use crate::config::duration::format_duration;
use crate::config::types::BackendConfig;
use crate::query::QueryRequest;
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

/// HTTP client for an Elasticsearch cluster
#[derive(Debug)]
pub struct ElasticsearchClient {
    base_url: String,
    username: String,
    password: String,
    client: reqwest::Client,
}

impl ElasticsearchClient {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            base_url: config.address.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if self.username.is_empty() {
            request
        } else {
            request.basic_auth(&self.username, Some(&self.password))
        }
    }

    async fn read_page(response: reqwest::Response) -> Result<ResultPage> {
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        parse_search_response(status, &body)
    }
}

#[async_trait]
impl SearchBackend for ElasticsearchClient {
    async fn open_scroll(&self, request: &QueryRequest) -> Result<ResultPage> {
        let url = format!("{}/{}/_search", self.base_url, request.index);

        let mut params = vec![
            ("scroll", format_duration(request.scroll)),
            ("size", request.page_size.to_string()),
        ];
        if request.pretty {
            params.push(("pretty", "true".to_string()));
        }
        if let Some(fields) = &request.source_filter {
            params.push(("_source", fields.join(",")));
        }

        tracing::debug!(
            url = %url,
            index = %request.index,
            size = request.page_size,
            "Opening scroll"
        );

        let response = self
            .authorize(self.client.post(&url))
            .query(&params)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(request.body.clone())
            .send()
            .await?;

        Self::read_page(response).await
    }

    async fn continue_scroll(
        &self,
        cursor: &CursorToken,
        keep_alive: Duration,
    ) -> Result<ResultPage> {
        let url = format!("{}/_search/scroll", self.base_url);
        let request_body = ScrollRequest {
            scroll: format_duration(keep_alive),
            scroll_id: cursor.as_str(),
        };

        let response = self
            .authorize(self.client.post(&url))
            .json(&request_body)
            .send()
            .await?;

        Self::read_page(response).await
    }

    async fn cluster_info(&self) -> Result<ClusterInfo> {
        let url = format!("{}/", self.base_url);
        let response = self.authorize(self.client.get(&url)).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.bytes().await?;
            return Err(parse_error_body(status, &body));
        }

        let info = response.json().await?;
        Ok(info)
    }
}

// ===== Request Types =====

#[derive(Debug, Serialize)]
struct ScrollRequest<'a> {
    scroll: String,
    scroll_id: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend_config(address: &str) -> BackendConfig {
        BackendConfig {
            address: address.to_string(),
            username: "elastic".to_string(),
            password: "secret".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = ElasticsearchClient::new(&backend_config("http://localhost:9200/")).unwrap();
        assert_eq!(client.base_url(), "http://localhost:9200");
    }

    #[test]
    fn test_scroll_request_body() {
        let cursor = CursorToken::new("DXF1ZXJ5QW5kRmV0Y2g");
        let body = ScrollRequest {
            scroll: format_duration(Duration::from_secs(300)),
            scroll_id: cursor.as_str(),
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["scroll"], "5m");
        assert_eq!(json["scroll_id"], "DXF1ZXJ5QW5kRmV0Y2g");
    }
}
