// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use jobtrack_app::{JobApplication, JobDraft, JobId};
use time::OffsetDateTime;

use crate::{JobsTable, RemoteError};

/// In-process jobs table. Rows are kept newest first, the order a select returns.
#[derive(Debug, Clone, Default)]
pub struct MemoryTable {
    rows: Vec<JobApplication>,
    next_id: i64,
    failure: Option<String>,
}

impl MemoryTable {
    pub fn new() -> Self {
        Self::with_rows(Vec::new())
    }

    pub fn with_rows(rows: Vec<JobApplication>) -> Self {
        let next_id = rows.iter().map(|row| row.id.get()).max().unwrap_or(0) + 1;
        Self {
            rows,
            next_id,
            failure: None,
        }
    }

    /// While set, every operation fails with this message and leaves the rows alone.
    pub fn set_failure(&mut self, message: Option<String>) {
        self.failure = message;
    }

    pub fn rows(&self) -> &[JobApplication] {
        &self.rows
    }

    fn check(&self) -> Result<(), RemoteError> {
        match &self.failure {
            Some(message) => Err(RemoteError::new(message.clone())),
            None => Ok(()),
        }
    }
}

impl JobsTable for MemoryTable {
    fn select_jobs(&mut self) -> Result<Vec<JobApplication>, RemoteError> {
        self.check()?;
        Ok(self.rows.clone())
    }

    fn insert_job(&mut self, draft: &JobDraft) -> Result<JobApplication, RemoteError> {
        self.check()?;
        let mut row = JobApplication {
            id: JobId::new(self.next_id.max(1)),
            company_name: String::new(),
            role_title: String::new(),
            location: String::new(),
            source_url: String::new(),
            platform: String::new(),
            status: draft.status,
            applied_date: OffsetDateTime::now_utc(),
            notes: None,
        };
        row.apply_draft(draft);
        self.next_id = row.id.get() + 1;
        self.rows.insert(0, row.clone());
        Ok(row)
    }

    fn update_job(&mut self, id: JobId, draft: &JobDraft) -> Result<(), RemoteError> {
        self.check()?;
        // An unmatched filter updates nothing and still succeeds.
        if let Some(row) = self.rows.iter_mut().find(|row| row.id == id) {
            row.apply_draft(draft);
        }
        Ok(())
    }

    fn delete_job(&mut self, id: JobId) -> Result<(), RemoteError> {
        self.check()?;
        self.rows.retain(|row| row.id != id);
        Ok(())
    }
}
