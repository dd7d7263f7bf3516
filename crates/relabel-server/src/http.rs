// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use relabel_app::{API_PATH, Request};
use serde_json::json;
use std::net::SocketAddr;
use tiny_http::{Header, Method, Response, Server, StatusCode};

use crate::{Handler, RecordStore};

/// Serves the handler over HTTP. Requests are handled one at a time on the
/// calling thread.
pub struct HttpServer {
    server: Server,
}

impl HttpServer {
    pub fn bind(addr: &str) -> Result<Self> {
        let server = Server::http(addr).map_err(|error| anyhow!("listen on {addr}: {error}"))?;
        Ok(Self { server })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.server
            .server_addr()
            .to_ip()
            .context("resolve listening address")
    }

    pub fn serve<S: RecordStore>(&self, handler: &Handler<S>) -> Result<()> {
        loop {
            self.handle_next(handler)?;
        }
    }

    /// Blocks for one request and answers it.
    pub fn handle_next<S: RecordStore>(&self, handler: &Handler<S>) -> Result<()> {
        let request = self.server.recv().context("receive http request")?;
        respond(handler, request)
    }
}

fn respond<S: RecordStore>(handler: &Handler<S>, mut request: tiny_http::Request) -> Result<()> {
    let method = request.method().clone();
    let path = request
        .url()
        .split('?')
        .next()
        .unwrap_or_default()
        .to_owned();

    let (status, body) = if path != API_PATH {
        tracing::debug!(target: "relabel", path = %path, "unknown path");
        (404, json!({ "serverError": format!("No route for {path}.") }))
    } else if method != Method::Post {
        (405, json!({ "serverError": "Use POST for translation requests." }))
    } else {
        let mut raw = String::new();
        match request.as_reader().read_to_string(&mut raw) {
            Err(error) => {
                tracing::warn!(target: "relabel", error = %error, "unreadable request body");
                (400, json!({ "serverError": "Unable to read request body." }))
            }
            Ok(_) => match serde_json::from_str::<Request>(&raw) {
                Err(error) => {
                    tracing::warn!(target: "relabel", error = %error, "malformed request");
                    (400, json!({ "serverError": format!("Malformed request: {error}") }))
                }
                Ok(parsed) => {
                    let response = handler.handle(&parsed);
                    tracing::info!(
                        target: "relabel",
                        action = parsed.action(),
                        server_error = response.server_error().unwrap_or_default(),
                        "handled request"
                    );
                    (
                        200,
                        serde_json::to_value(&response).context("encode response")?,
                    )
                }
            },
        }
    };

    let payload = serde_json::to_string(&body).context("encode response body")?;
    let header = Header::from_bytes("Content-Type", "application/json")
        .map_err(|()| anyhow!("build content type header"))?;
    request
        .respond(
            Response::from_string(payload)
                .with_status_code(StatusCode(status))
                .with_header(header),
        )
        .context("write http response")
}
