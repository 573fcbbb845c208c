// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use jobtrack_app::{JobApplication, JobDraft, JobId};
use jobtrack_remote::JobsTable;
use tracing::{info, warn};

/// Adapts any [`JobsTable`] to the screen's runtime seam, logging each outcome.
pub struct TableRuntime<T> {
    table: T,
}

impl<T: JobsTable> TableRuntime<T> {
    pub fn new(table: T) -> Self {
        Self { table }
    }

    #[cfg(test)]
    pub fn table(&self) -> &T {
        &self.table
    }
}

impl<T: JobsTable> jobtrack_tui::AppRuntime for TableRuntime<T> {
    fn load_jobs(&mut self) -> Result<Vec<JobApplication>> {
        match self.table.select_jobs() {
            Ok(jobs) => {
                info!(count = jobs.len(), "loaded job applications");
                Ok(jobs)
            }
            Err(error) => {
                warn!(status = ?error.status, %error, "load job applications failed");
                Err(error.into())
            }
        }
    }

    fn insert_job(&mut self, draft: &JobDraft) -> Result<JobApplication> {
        match self.table.insert_job(draft) {
            Ok(job) => {
                info!(id = job.id.get(), company = %job.company_name, "inserted job application");
                Ok(job)
            }
            Err(error) => {
                warn!(status = ?error.status, %error, "insert job application failed");
                Err(error.into())
            }
        }
    }

    fn update_job(&mut self, id: JobId, draft: &JobDraft) -> Result<()> {
        match self.table.update_job(id, draft) {
            Ok(()) => {
                info!(id = id.get(), status = draft.status.as_str(), "updated job application");
                Ok(())
            }
            Err(error) => {
                warn!(id = id.get(), status = ?error.status, %error, "update job application failed");
                Err(error.into())
            }
        }
    }

    fn delete_job(&mut self, id: JobId) -> Result<()> {
        match self.table.delete_job(id) {
            Ok(()) => {
                info!(id = id.get(), "deleted job application");
                Ok(())
            }
            Err(error) => {
                warn!(id = id.get(), status = ?error.status, %error, "delete job application failed");
                Err(error.into())
            }
        }
    }
}
