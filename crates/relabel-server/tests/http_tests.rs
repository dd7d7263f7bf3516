// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use relabel_db::Store;
use relabel_server::{API_PATH, Handler, HttpServer};
use serde_json::{Value, json};
use std::thread;
use std::time::Duration;

/// Binds an ephemeral port and answers `requests` requests on a background
/// thread.
fn spawn_server(requests: usize) -> Result<(String, thread::JoinHandle<()>)> {
    let store = Store::open_memory()?;
    store.bootstrap()?;
    store.seed_demo_data()?;
    let handler = Handler::new(store);

    let server = HttpServer::bind("127.0.0.1:0")?;
    let base = format!("http://{}", server.local_addr()?);
    let handle = thread::spawn(move || {
        for _ in 0..requests {
            server
                .handle_next(&handler)
                .expect("request should be answered");
        }
    });
    Ok((base, handle))
}

fn client() -> Result<reqwest::blocking::Client> {
    Ok(reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()?)
}

#[test]
fn search_and_update_round_trip_over_http() -> Result<()> {
    let (base, handle) = spawn_server(2)?;
    let client = client()?;
    let url = format!("{base}{API_PATH}");

    let response = client
        .post(&url)
        .json(&json!({"action": "search", "searchTerm": "caller", "tableName": "incident"}))
        .send()?;
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json()?;
    assert_eq!(body["appliedTables"], json!(["incident", "task"]));
    assert_eq!(body["results"][0]["recordType"], "documentation");
    assert_eq!(body["results"][0]["sys_id"], "doc_incident_caller");

    let response = client
        .post(&url)
        .json(&json!({
            "action": "update",
            "record": {"sys_id": "doc_incident_caller", "recordType": "documentation", "hint": "Who called"}
        }))
        .send()?;
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json()?;
    assert_eq!(body["updateResponse"]["success"], true);
    assert_eq!(body["updateResponse"]["record"]["hint"], "Who called");

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn failures_are_still_200() -> Result<()> {
    let (base, handle) = spawn_server(1)?;
    let response = client()?
        .post(format!("{base}{API_PATH}"))
        .json(&json!({"action": "update", "record": {"recordType": "choice", "label": "x"}}))
        .send()?;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json()?;
    assert_eq!(body["updateResponse"]["success"], false);
    assert_eq!(body["updateResponse"]["message"], "Missing record identifier.");

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn mistyped_payloads_get_messages_not_400() -> Result<()> {
    let bodies = [
        json!({"action": "update"}),
        json!({"action": "update", "record": null}),
        json!({"action": "update", "record": {"sys_id": 42, "label": "x"}}),
        json!({"action": "search", "searchTerm": null, "tableName": "incident"}),
    ];
    let (base, handle) = spawn_server(bodies.len())?;
    let client = client()?;
    let url = format!("{base}{API_PATH}");

    let mut replies = Vec::new();
    for body in &bodies {
        let response = client.post(&url).json(body).send()?;
        assert_eq!(response.status().as_u16(), 200, "{body}");
        replies.push(response.json::<Value>()?);
    }

    for reply in &replies[..2] {
        assert_eq!(reply["updateResponse"]["success"], false);
        assert_eq!(reply["updateResponse"]["message"], "Missing record identifier.");
    }
    assert_eq!(replies[2]["updateResponse"]["message"], "Record not found.");
    assert_eq!(
        replies[3]["errorMessage"],
        "Enter text to search for translations."
    );
    assert!(replies.iter().all(|reply| reply.get("serverError").is_none()));

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn malformed_json_is_400() -> Result<()> {
    let (base, handle) = spawn_server(2)?;
    let client = client()?;

    let response = client
        .post(format!("{base}{API_PATH}"))
        .header("Content-Type", "application/json")
        .body("{not json")
        .send()?;
    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json()?;
    assert!(body["serverError"].is_string());

    let response = client
        .post(format!("{base}{API_PATH}"))
        .json(&json!({"action": "delete"}))
        .send()?;
    assert_eq!(response.status().as_u16(), 400);

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn unknown_path_is_404() -> Result<()> {
    let (base, handle) = spawn_server(1)?;
    let response = client()?
        .post(format!("{base}/api/other"))
        .json(&json!({"action": "search"}))
        .send()?;
    assert_eq!(response.status().as_u16(), 404);

    handle.join().expect("server thread should join");
    Ok(())
}
