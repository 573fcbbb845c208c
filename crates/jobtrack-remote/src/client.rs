// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use jobtrack_app::{JobApplication, JobDraft, JobId};
use reqwest::StatusCode;
use reqwest::blocking::{Client as HttpClient, RequestBuilder, Response};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::{JOBS_TABLE, JobsTable, ORDER_COLUMN, RemoteError};

/// Blocking client for a PostgREST-style `/rest/v1/<table>` endpoint.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    table_url: Url,
    api_key: String,
    http: HttpClient,
}

impl Client {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            bail!("remote.url must not be empty");
        }
        if api_key.trim().is_empty() {
            bail!("remote.api_key must not be empty");
        }
        let table_url = Url::parse(&format!("{base_url}/rest/v1/{JOBS_TABLE}"))
            .with_context(|| format!("parse remote.url {base_url:?}"))?;

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            base_url,
            table_url,
            api_key: api_key.trim().to_owned(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_with(&self, pairs: &[(&str, &str)]) -> Url {
        let mut url = self.table_url.clone();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        url
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
    }

    fn send(&self, request: RequestBuilder) -> Result<Response, RemoteError> {
        let response = self
            .authorized(request)
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let status = response.status();
        debug!(status = status.as_u16(), "remote response");
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }
        Ok(response)
    }
}

impl JobsTable for Client {
    fn select_jobs(&mut self) -> Result<Vec<JobApplication>, RemoteError> {
        let order = format!("{ORDER_COLUMN}.desc");
        let url = self.url_with(&[("select", "*"), ("order", &order)]);
        debug!(%url, "select jobs");

        let response = self.send(self.http.get(url))?;
        response
            .json::<Vec<JobApplication>>()
            .map_err(|error| RemoteError::new(format!("decode job rows: {error}")))
    }

    fn insert_job(&mut self, draft: &JobDraft) -> Result<JobApplication, RemoteError> {
        let url = self.url_with(&[]);
        debug!(%url, company = %draft.company_name, "insert job");

        let request = self
            .http
            .post(url)
            .header("Prefer", "return=representation")
            .json(std::slice::from_ref(draft));
        let rows = self
            .send(request)?
            .json::<Vec<JobApplication>>()
            .map_err(|error| RemoteError::new(format!("decode inserted row: {error}")))?;

        rows.into_iter()
            .next()
            .ok_or_else(|| RemoteError::new("insert returned no rows"))
    }

    fn update_job(&mut self, id: JobId, draft: &JobDraft) -> Result<(), RemoteError> {
        let filter = format!("eq.{id}");
        let url = self.url_with(&[("id", &filter)]);
        debug!(%url, "update job");

        self.send(self.http.patch(url).json(draft))?;
        Ok(())
    }

    fn delete_job(&mut self, id: JobId) -> Result<(), RemoteError> {
        let filter = format!("eq.{id}");
        let url = self.url_with(&[("id", &filter)]);
        debug!(%url, "delete job");

        self.send(self.http.delete(url))?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    message: Option<String>,
}

fn connection_error(base_url: &str, error: reqwest::Error) -> RemoteError {
    RemoteError::new(format!(
        "cannot reach {base_url} -- check remote.url and your network ({error})"
    ))
}

fn clean_error_response(status: StatusCode, body: &str) -> RemoteError {
    if let Ok(parsed) = serde_json::from_str::<ErrorEnvelope>(body)
        && let Some(message) = parsed.message
        && !message.is_empty()
    {
        return RemoteError::with_status(status.as_u16(), message);
    }

    let body = body.trim();
    if !body.is_empty() {
        return RemoteError::with_status(status.as_u16(), body);
    }

    let message = status
        .canonical_reason()
        .map(str::to_owned)
        .unwrap_or_else(|| format!("server returned {}", status.as_u16()));
    RemoteError::with_status(status.as_u16(), message)
}
