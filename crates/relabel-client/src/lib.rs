// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use relabel_app::{
    API_PATH, Request, SearchRequest, SearchResponse, Transport, UpdateRecord, UpdateResponse,
};
use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

/// Talks to a `relabel serve` instance over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    endpoint: Url,
    timeout: Duration,
    http: HttpClient,
}

impl HttpTransport {
    pub fn new(server_url: &str, timeout: Duration) -> Result<Self> {
        let endpoint = endpoint_url(server_url)?;
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            endpoint,
            timeout,
            http,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn post<T: DeserializeOwned>(&self, request: &Request) -> Result<T> {
        tracing::debug!(
            target: "relabel",
            action = request.action(),
            endpoint = %self.endpoint,
            "posting request"
        );
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .map_err(|error| connection_error(&self.endpoint, error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }

        response
            .json()
            .with_context(|| format!("decode {} response", request.action()))
    }
}

impl Transport for HttpTransport {
    fn search(&mut self, request: &SearchRequest) -> Result<SearchResponse> {
        self.post(&Request::Search(request.clone()))
    }

    fn update(&mut self, record: &UpdateRecord) -> Result<UpdateResponse> {
        self.post(&Request::Update {
            record: record.clone(),
        })
    }
}

/// Resolves the request endpoint under `server_url`, keeping any path prefix
/// it carries.
pub fn endpoint_url(server_url: &str) -> Result<Url> {
    let trimmed = server_url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        bail!("client.server_url must not be empty");
    }

    let base = Url::parse(trimmed).with_context(|| format!("parse server url {trimmed:?}"))?;
    match base.scheme() {
        "http" | "https" => {}
        other => bail!("server url {trimmed:?} must use http or https, not {other}"),
    }
    if base.host_str().is_none() {
        bail!("server url {trimmed:?} has no host");
    }

    Url::parse(&format!("{trimmed}{API_PATH}"))
        .with_context(|| format!("build endpoint under {trimmed:?}"))
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(rename = "serverError")]
    server_error: Option<String>,
}

fn connection_error(endpoint: &Url, error: reqwest::Error) -> anyhow::Error {
    if error.is_timeout() {
        return anyhow!("request to {endpoint} timed out ({error})");
    }
    anyhow!("cannot reach {endpoint} -- is `relabel serve` running? ({error})")
}

fn clean_error_response(status: StatusCode, body: &str) -> anyhow::Error {
    if let Ok(parsed) = serde_json::from_str::<ErrorEnvelope>(body)
        && let Some(message) = parsed.server_error
        && !message.is_empty()
    {
        return anyhow!("server error ({}): {}", status.as_u16(), message);
    }

    if body.len() < 100 && !body.contains('{') && !body.trim().is_empty() {
        return anyhow!("server error ({}): {}", status.as_u16(), body.trim());
    }

    anyhow!("server returned {}", status.as_u16())
}

#[cfg(test)]
mod tests {
    use super::{clean_error_response, endpoint_url};
    use reqwest::StatusCode;

    #[test]
    fn endpoint_keeps_path_prefix() -> anyhow::Result<()> {
        assert_eq!(
            endpoint_url("http://127.0.0.1:8787")?.as_str(),
            "http://127.0.0.1:8787/api/translations"
        );
        assert_eq!(
            endpoint_url("https://tools.example.com/relabel/")?.as_str(),
            "https://tools.example.com/relabel/api/translations"
        );
        Ok(())
    }

    #[test]
    fn endpoint_rejects_other_schemes() {
        assert!(endpoint_url("ftp://example.com").is_err());
        assert!(endpoint_url("").is_err());
        assert!(endpoint_url("not a url").is_err());
    }

    #[test]
    fn error_body_prefers_server_error() {
        let error = clean_error_response(
            StatusCode::BAD_REQUEST,
            r#"{"serverError":"Malformed request: EOF"}"#,
        );
        assert_eq!(
            error.to_string(),
            "server error (400): Malformed request: EOF"
        );

        let error = clean_error_response(StatusCode::BAD_GATEWAY, "");
        assert_eq!(error.to_string(), "server returned 502");
    }
}
