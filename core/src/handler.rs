use std::sync::Arc;
use chrono::{SecondsFormat, Utc};
use http::{
    header::{
        ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
        CACHE_CONTROL, CONTENT_TYPE,
    },
    HeaderValue, Method, Response, StatusCode,
};
use serde::Serialize;
use tracing::{error, warn};

use crate::{
    aggregate::aggregate,
    config::Config,
    error::CountsError,
    notion::NotionClient,
    status::StatusCounts,
};


pub const CACHE_DIRECTIVE: &str = "s-maxage=10, stale-while-revalidate=30";


#[derive(Serialize, Debug, Clone)]
pub struct CountsSummary {
    pub counts: StatusCounts,
    pub total: u64,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}


/// Shared per-process state handed to every request: the read-only config and
/// one pooled HTTP client.
#[derive(Debug, Clone)]
pub struct CountsService {
    config: Arc<Config>,
    client: reqwest::Client,
}

impl CountsService {
    pub fn new_w_client(client: reqwest::Client, config: Config) -> Self {
        Self { config: Arc::new(config), client }
    }

    pub fn new(config: Config) -> Self {
        Self::new_w_client(reqwest::Client::new(), config)
    }

    pub async fn handle(&self, method: &Method, key: Option<&str>) -> Response<String> {
        handle(&self.config, &self.client, method, key).await
    }
}


/// The whole endpoint: CORS, method gate, shared key, cache header, config check,
/// then aggregation. Checks run in that order, so a bad key is reported before
/// missing credentials.
pub async fn handle(config: &Config, client: &reqwest::Client, method: &Method, key: Option<&str>) -> Response<String> {
    if method == Method::OPTIONS {
        return with_cors(Response::new(String::new()));
    }

    let res = match run(config, client, method, key).await {
        Ok(summary) => json_response(StatusCode::OK, &summary, true),
        Err(e) => {
            match &e {
                CountsError::Unauthorized => warn!("rejected request with a bad shared key"),
                CountsError::Upstream { status, .. } => warn!(status, "notion query failed"),
                CountsError::Request(_) | CountsError::Json(_) => error!(error = %e, "unexpected failure"),
                _ => warn!(error = %e, "request failed"),
            }
            let cacheable = !matches!(e, CountsError::MethodNotAllowed | CountsError::Unauthorized);
            json_response(e.status_code(), &e.body(), cacheable)
        }
    };

    with_cors(res)
}

async fn run(config: &Config, client: &reqwest::Client, method: &Method, key: Option<&str>) -> Result<CountsSummary, CountsError> {
    if method != Method::GET {
        return Err(CountsError::MethodNotAllowed);
    }

    if let Some(expected) = &config.shared_key {
        let supplied = key.unwrap_or_default();
        if !constant_time_eq(supplied.as_bytes(), expected.as_bytes()) {
            return Err(CountsError::Unauthorized);
        }
    }

    let (token, database_id) = config.credentials().ok_or(CountsError::MissingConfiguration)?;
    let notion = NotionClient::new_w_client(client.clone(), &config.api_url, &config.notion_version, token, database_id);

    let counts = aggregate(&notion, config).await?;
    let total = counts.total();

    Ok(CountsSummary {
        counts,
        total,
        updated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

// everything past the method and key checks is cacheable
fn json_response<T: Serialize>(status: StatusCode, body: &T, cacheable: bool) -> Response<String> {
    let (status, body) = match serde_json::to_string(body) {
        Ok(body) => (status, body),
        Err(e) => {
            error!(error = %e, "failed to serialize response body");
            (StatusCode::INTERNAL_SERVER_ERROR, r#"{"error":"Server error"}"#.to_string())
        }
    };

    let mut res = Response::new(body);
    *res.status_mut() = status;
    let headers = res.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json; charset=utf-8"));
    if cacheable {
        headers.insert(CACHE_CONTROL, HeaderValue::from_static(CACHE_DIRECTIVE));
    }
    res
}

fn with_cors(mut res: Response<String>) -> Response<String> {
    let headers = res.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static("GET,OPTIONS"));
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("Content-Type"));
    res
}
