// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod client;
mod error;
mod memory;

pub use client::Client;
pub use error::RemoteError;
pub use memory::MemoryTable;

use jobtrack_app::{JobApplication, JobDraft, JobId};

/// Name of the remote table holding job applications.
pub const JOBS_TABLE: &str = "jobs";

/// Column the list view orders by, newest first.
pub const ORDER_COLUMN: &str = "created_at";

/// The four row operations the tracker issues against its backing table.
pub trait JobsTable {
    fn select_jobs(&mut self) -> Result<Vec<JobApplication>, RemoteError>;
    /// Inserts one row and returns it as stored, with its assigned id and date.
    fn insert_job(&mut self, draft: &JobDraft) -> Result<JobApplication, RemoteError>;
    fn update_job(&mut self, id: JobId, draft: &JobDraft) -> Result<(), RemoteError>;
    fn delete_job(&mut self, id: JobId) -> Result<(), RemoteError>;
}
