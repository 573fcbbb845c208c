// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use jobtrack_app::{ApplicationStatus, JobId};
use jobtrack_remote::{Client, JobsTable};
use jobtrack_testkit::sample_draft;
use std::io::Read;
use std::thread;
use std::time::Duration;
use tiny_http::{Header, Method, Request, Response, Server};

const API_KEY: &str = "anon-test-key";

fn header_value(request: &Request, name: &'static str) -> Option<String> {
    request
        .headers()
        .iter()
        .find(|header| header.field.equiv(name))
        .map(|header| header.value.as_str().to_owned())
}

fn json_response(status: u16, body: &str) -> Response<std::io::Cursor<Vec<u8>>> {
    Response::from_string(body)
        .with_status_code(status)
        .with_header(
            Header::from_bytes("Content-Type", "application/json")
                .expect("valid content type header"),
        )
}

fn mock_server() -> Result<(Server, String)> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());
    Ok((server, addr))
}

#[test]
fn unreachable_host_error_names_the_url() {
    let mut client = Client::new("http://127.0.0.1:1", API_KEY, Duration::from_millis(50))
        .expect("client should initialize");

    let error = client
        .select_jobs()
        .expect_err("select should fail for unreachable endpoint");
    assert_eq!(error.status, None);
    assert!(error.message.contains("cannot reach http://127.0.0.1:1"));
}

#[test]
fn select_orders_newest_first_and_sends_credentials() -> Result<()> {
    let (server, addr) = mock_server()?;

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(request.method(), &Method::Get);
        assert_eq!(
            request.url(),
            "/rest/v1/jobs?select=*&order=created_at.desc"
        );
        assert_eq!(header_value(&request, "apikey").as_deref(), Some(API_KEY));
        assert_eq!(
            header_value(&request, "Authorization").as_deref(),
            Some("Bearer anon-test-key")
        );
        let body = r#"[
            {"id":2,"company_name":"Globex","role_title":"Analyst","location":null,
             "source_url":null,"platform":"Manual","status":"Offer",
             "applied_date":"2026-02-20T08:00:00+00:00","notes":null,
             "created_at":"2026-02-20T08:00:00+00:00"},
            {"id":1,"company_name":"Acme","role_title":"Engineer","location":"Remote",
             "source_url":"https://acme.example.com/jobs/1","platform":"LinkedIn",
             "status":"Rejected","applied_date":"2026-02-19","notes":"no reply",
             "created_at":"2026-02-19T08:00:00+00:00"}
        ]"#;
        request
            .respond(json_response(200, body))
            .expect("response should succeed");
    });

    let mut client = Client::new(&addr, API_KEY, Duration::from_secs(1))?;
    let rows = client.select_jobs()?;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id, JobId::new(2));
    assert_eq!(rows[0].location, "");
    assert_eq!(rows[1].status, ApplicationStatus::Rejected);
    assert_eq!(rows[1].notes.as_deref(), Some("no reply"));

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn insert_posts_single_row_array_and_returns_stored_row() -> Result<()> {
    let (server, addr) = mock_server()?;

    let handle = thread::spawn(move || {
        let mut request = server.recv().expect("request expected");
        assert_eq!(request.method(), &Method::Post);
        assert_eq!(request.url(), "/rest/v1/jobs");
        assert_eq!(
            header_value(&request, "Prefer").as_deref(),
            Some("return=representation")
        );

        let mut body = String::new();
        request
            .as_reader()
            .read_to_string(&mut body)
            .expect("request body should read");
        let sent: serde_json::Value = serde_json::from_str(&body).expect("body should be JSON");
        let rows = sent.as_array().expect("insert body should be an array");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["company_name"], "Acme");
        assert_eq!(rows[0]["platform"], "Manual");
        assert_eq!(rows[0]["status"], "Applied");
        assert!(rows[0].get("id").is_none());

        let stored = r#"[{"id":41,"company_name":"Acme","role_title":"Engineer",
            "location":"","source_url":"","platform":"Manual","status":"Applied",
            "applied_date":"2026-02-19T12:34:56.123+00:00","notes":""}]"#;
        request
            .respond(json_response(201, stored))
            .expect("response should succeed");
    });

    let mut client = Client::new(&addr, API_KEY, Duration::from_secs(1))?;
    let row = client.insert_job(&sample_draft("Acme", "Engineer"))?;
    assert_eq!(row.id, JobId::new(41));
    assert_eq!(row.company_name, "Acme");

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn insert_without_returned_row_is_an_error() -> Result<()> {
    let (server, addr) = mock_server()?;

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        request
            .respond(json_response(201, "[]"))
            .expect("response should succeed");
    });

    let mut client = Client::new(&addr, API_KEY, Duration::from_secs(1))?;
    let error = client
        .insert_job(&sample_draft("Acme", "Engineer"))
        .expect_err("empty representation should fail");
    assert_eq!(error.message, "insert returned no rows");

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn update_and_delete_filter_by_id() -> Result<()> {
    let (server, addr) = mock_server()?;

    let handle = thread::spawn(move || {
        let mut request = server.recv().expect("update request expected");
        assert_eq!(request.method(), &Method::Patch);
        assert_eq!(request.url(), "/rest/v1/jobs?id=eq.7");
        let mut body = String::new();
        request
            .as_reader()
            .read_to_string(&mut body)
            .expect("request body should read");
        let sent: serde_json::Value = serde_json::from_str(&body).expect("body should be JSON");
        assert_eq!(sent["status"], "Interviewing");
        assert!(sent.is_object());
        request
            .respond(Response::empty(204))
            .expect("response should succeed");

        let request = server.recv().expect("delete request expected");
        assert_eq!(request.method(), &Method::Delete);
        assert_eq!(request.url(), "/rest/v1/jobs?id=eq.7");
        request
            .respond(Response::empty(204))
            .expect("response should succeed");
    });

    let mut client = Client::new(&addr, API_KEY, Duration::from_secs(1))?;
    let mut draft = sample_draft("Acme", "Engineer");
    draft.status = ApplicationStatus::Interviewing;
    client.update_job(JobId::new(7), &draft)?;
    client.delete_job(JobId::new(7))?;

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn server_error_message_is_surfaced() -> Result<()> {
    let (server, addr) = mock_server()?;

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        let body = r#"{"code":"42501","details":null,"hint":null,
            "message":"permission denied for table jobs"}"#;
        request
            .respond(json_response(403, body))
            .expect("response should succeed");
    });

    let mut client = Client::new(&addr, API_KEY, Duration::from_secs(1))?;
    let error = client
        .delete_job(JobId::new(3))
        .expect_err("forbidden delete should fail");
    assert_eq!(error.status, Some(403));
    assert_eq!(error.to_string(), "permission denied for table jobs");

    handle.join().expect("server thread should join");
    Ok(())
}
