use crate::config::Config;
use anyhow::Result;
use axum::body::Bytes;
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::{Client, Url};
use serde_json::Value;
use std::time::{Duration, Instant};

const JSON: &str = "application/json";

/// Forwards requests to the search engine, adding credentials server-side.
#[derive(Clone)]
pub struct Upstream {
    client: Client,
    base: Url,
    credentials: Option<(String, String)>,
}

impl Upstream {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.search_engine.timeout_ms))
            .build()?;
        let base = Url::parse(&config.search_engine.url)?;
        Ok(Self { client, base, credentials: config.credentials() })
    }

    fn url(&self, path: &str, query: Option<&str>) -> Url {
        let mut url = self.base.clone();
        let joined = format!("{}/{}", self.base.path().trim_end_matches('/'), path.trim_start_matches('/'));
        url.set_path(&joined);
        url.set_query(query.filter(|q| !q.is_empty()));
        url
    }

    /// Send one request and relay the response. Never fails: upstream and transport
    /// errors become `{error, message}` responses.
    pub async fn forward(&self, method: Method, path: &str, query: Option<&str>, body: Bytes) -> Response {
        let url = self.url(path, query);
        let mut req = self.client.request(method.clone(), url.clone()).header(header::CONTENT_TYPE, JSON);
        if !body.is_empty() {
            req = req.body(body);
        }
        if let Some((username, password)) = &self.credentials {
            req = req.basic_auth(username, Some(password));
        }

        let start = Instant::now();
        let result = match req.send().await {
            Ok(resp) => {
                let status = resp.status();
                resp.bytes().await.map(|bytes| (status, bytes))
            }
            Err(err) => Err(err),
        };
        match result {
            Ok((status, bytes)) => {
                tracing::debug!(%method, path = url.path(), status = status.as_u16(), took_ms = start.elapsed().as_millis() as u64, "search engine responded");
                if status.is_success() {
                    (status, [(header::CONTENT_TYPE, JSON)], bytes).into_response()
                } else {
                    upstream_error(status, &bytes)
                }
            }
            Err(err) => {
                tracing::error!(%method, path = url.path(), error = %err, "search engine request failed");
                transport_error(&err)
            }
        }
    }
}

fn upstream_error(status: StatusCode, bytes: &[u8]) -> Response {
    // Raw upstream body, never parsed.
    let message = Value::String(String::from_utf8_lossy(bytes).into_owned());
    let body = serde_json::json!({
        "error": status.canonical_reason().unwrap_or("Unknown error"),
        "message": message,
    });
    (status, Json(body)).into_response()
}

fn transport_error(err: &reqwest::Error) -> Response {
    let kind = if err.is_timeout() {
        "Timeout"
    } else if err.is_connect() {
        "Connection error"
    } else if err.is_body() || err.is_decode() {
        "Body error"
    } else {
        "Request error"
    };
    let message = format!("This error occurred when the server sent a request to the search engine:\n\n{kind}\n{err}");
    let body = serde_json::json!({ "error": "Server error", "message": message });
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upstream(url: &str) -> Upstream {
        let mut cfg = Config::default();
        cfg.search_engine.url = url.into();
        Upstream::new(&cfg).unwrap()
    }

    #[test]
    fn joins_paths_and_queries() {
        let u = upstream("http://es:9200");
        assert_eq!(u.url("/_cat/indices", Some("v=true")).as_str(), "http://es:9200/_cat/indices?v=true");
        assert_eq!(u.url("", None).as_str(), "http://es:9200/");
        let prefixed = upstream("http://es:9200/cluster/");
        assert_eq!(prefixed.url("/a/b", Some("")).as_str(), "http://es:9200/cluster/a/b");
    }
}
