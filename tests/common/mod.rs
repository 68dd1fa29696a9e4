//! Scripted in-memory search backend shared by the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use escli::query::QueryRequest;
use escli::search::backend::{ClusterInfo, VersionInfo};
use escli::search::{CursorToken, ResultPage, SearchBackend, SearchError};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// One scripted response, with the cursor the request must carry.
pub struct Step {
    /// `None` for the opening search request.
    pub expect_cursor: Option<String>,
    pub response: Response,
}

pub enum Response {
    Page(ResultPage),
    Fail { status: u16, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Open { index: String, page_size: u32 },
    Continue { cursor: String, keep_alive: Duration },
}

#[derive(Default)]
pub struct ScriptedBackend {
    steps: Mutex<VecDeque<Step>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedBackend {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn next_step(&self, cursor: Option<&CursorToken>) -> Result<ResultPage, SearchError> {
        let step = self
            .steps
            .lock()
            .unwrap()
            .pop_front()
            .expect("backend called more times than scripted");

        assert_eq!(
            step.expect_cursor.as_deref(),
            cursor.map(CursorToken::as_str),
            "request carried the wrong cursor"
        );

        match step.response {
            Response::Page(page) => Ok(page),
            Response::Fail { status, reason } => Err(SearchError::Backend {
                status,
                kind: "mock_exception".to_string(),
                reason,
            }),
        }
    }
}

#[async_trait]
impl SearchBackend for ScriptedBackend {
    async fn open_scroll(&self, request: &QueryRequest) -> Result<ResultPage, SearchError> {
        self.calls.lock().unwrap().push(Call::Open {
            index: request.index.clone(),
            page_size: request.page_size,
        });
        self.next_step(None)
    }

    async fn continue_scroll(
        &self,
        cursor: &CursorToken,
        keep_alive: Duration,
    ) -> Result<ResultPage, SearchError> {
        self.calls.lock().unwrap().push(Call::Continue {
            cursor: cursor.as_str().to_string(),
            keep_alive,
        });
        self.next_step(Some(cursor))
    }

    async fn cluster_info(&self) -> Result<ClusterInfo, SearchError> {
        Ok(ClusterInfo {
            name: "mock".to_string(),
            cluster_name: "mock-cluster".to_string(),
            cluster_uuid: "uuid".to_string(),
            version: VersionInfo {
                number: "7.10.2".to_string(),
                ..Default::default()
            },
            tagline: "You Know, for Search".to_string(),
        })
    }
}

pub fn page(documents: Vec<Value>, cursor: &str, took_ms: u64, total_hits: u64) -> ResultPage {
    ResultPage {
        documents,
        cursor: CursorToken::new(cursor),
        took: Duration::from_millis(took_ms),
        total_hits,
    }
}

pub fn open(response: ResultPage) -> Step {
    Step {
        expect_cursor: None,
        response: Response::Page(response),
    }
}

pub fn next(expect_cursor: &str, response: ResultPage) -> Step {
    Step {
        expect_cursor: Some(expect_cursor.to_string()),
        response: Response::Page(response),
    }
}

pub fn fail(expect_cursor: Option<&str>, status: u16, reason: &str) -> Step {
    Step {
        expect_cursor: expect_cursor.map(str::to_string),
        response: Response::Fail {
            status,
            reason: reason.to_string(),
        },
    }
}

/// A WAF log hit whose request carried `cookie`.
pub fn hit_with_cookie(cookie: &str) -> Value {
    json!({
        "_index": "log-aws-waf-2020.12.23",
        "_id": "1",
        "_source": {
            "httpRequest": {
                "headers": [
                    {"name": "Host", "value": "www.example.com"},
                    {"name": "user-agent", "value": "curl"},
                    {"name": "cookie", "value": cookie}
                ]
            }
        }
    })
}

pub fn amplitude_cookie(payload_json: &str) -> String {
    format!(
        "amplitude_id_X={}; _ga=GA1.2.123456789.1234567890",
        general_purpose::STANDARD.encode(payload_json)
    )
}

pub fn hit_for_user(user_id: &str) -> Value {
    hit_with_cookie(&amplitude_cookie(&format!(
        r#"{{"deviceId":"device-{0}","userId":"{0}","sessionId":1}}"#,
        user_id
    )))
}
