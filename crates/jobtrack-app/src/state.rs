// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};

use crate::{ApplicationStatus, DraftField, JobApplication, JobDraft, JobId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogMode {
    Add,
    Edit(JobId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogState {
    Closed,
    Open(DialogMode),
}

/// The remote write a submitted draft turns into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Insert(JobDraft),
    Update { id: JobId, draft: JobDraft },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub jobs: Vec<JobApplication>,
    pub load_error: Option<String>,
    pub dialog: DialogState,
    pub draft: JobDraft,
    pub pending_delete: Option<JobId>,
    pub alert: Option<String>,
    pub status_line: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            jobs: Vec::new(),
            load_error: None,
            dialog: DialogState::Closed,
            draft: JobDraft::blank(),
            pending_delete: None,
            alert: None,
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    LoadSucceeded(Vec<JobApplication>),
    LoadFailed(String),
    OpenAddDialog,
    OpenEditDialog(JobId),
    SetDraftText(DraftField, String),
    SetDraftStatus(ApplicationStatus),
    CancelDialog,
    InsertSucceeded(JobApplication),
    UpdateSucceeded { id: JobId, draft: JobDraft },
    SaveFailed(String),
    RequestDelete(JobId),
    DeclineDelete,
    DeleteSucceeded(JobId),
    DeleteFailed(String),
    DismissAlert,
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    JobsLoaded(usize),
    LoadFailed(String),
    DialogChanged(DialogState),
    DraftChanged(DraftField),
    JobInserted(JobId),
    JobUpdated(JobId),
    JobDeleted(JobId),
    DeleteRequested(JobId),
    DeleteDeclined,
    AlertShown(String),
    AlertDismissed,
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn with_jobs(jobs: Vec<JobApplication>) -> Self {
        Self {
            jobs,
            ..Self::default()
        }
    }

    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::LoadSucceeded(jobs) => {
                let count = jobs.len();
                self.jobs = jobs;
                self.load_error = None;
                vec![AppEvent::JobsLoaded(count)]
            }
            AppCommand::LoadFailed(message) => {
                self.jobs.clear();
                self.load_error = Some(message.clone());
                vec![AppEvent::LoadFailed(message)]
            }
            AppCommand::OpenAddDialog => {
                self.draft = JobDraft::blank();
                self.dialog = DialogState::Open(DialogMode::Add);
                vec![AppEvent::DialogChanged(self.dialog)]
            }
            AppCommand::OpenEditDialog(id) => {
                let Some(job) = self.job(id) else {
                    return vec![self.set_status(format!("no application with id {id}"))];
                };
                self.draft = job.draft();
                self.dialog = DialogState::Open(DialogMode::Edit(id));
                vec![AppEvent::DialogChanged(self.dialog)]
            }
            AppCommand::SetDraftText(field, value) => {
                if self.dialog == DialogState::Closed {
                    return Vec::new();
                }
                let Some(slot) = self.draft.text_mut(field) else {
                    return Vec::new();
                };
                *slot = value;
                vec![AppEvent::DraftChanged(field)]
            }
            AppCommand::SetDraftStatus(status) => {
                if self.dialog == DialogState::Closed {
                    return Vec::new();
                }
                self.draft.status = status;
                vec![AppEvent::DraftChanged(DraftField::Status)]
            }
            AppCommand::CancelDialog => {
                if self.dialog == DialogState::Closed {
                    return Vec::new();
                }
                vec![self.close_dialog()]
            }
            AppCommand::InsertSucceeded(job) => {
                let id = job.id;
                self.jobs.retain(|existing| existing.id != id);
                self.jobs.insert(0, job);
                vec![
                    AppEvent::JobInserted(id),
                    self.close_dialog(),
                    self.set_status("application created"),
                ]
            }
            AppCommand::UpdateSucceeded { id, draft } => {
                if let Some(job) = self.jobs.iter_mut().find(|job| job.id == id) {
                    job.apply_draft(&draft);
                }
                vec![
                    AppEvent::JobUpdated(id),
                    self.close_dialog(),
                    self.set_status("changes saved"),
                ]
            }
            AppCommand::SaveFailed(message) => {
                vec![self.show_alert(format!("Error saving job: {message}"))]
            }
            AppCommand::RequestDelete(id) => {
                if self.job(id).is_none() {
                    return vec![self.set_status(format!("no application with id {id}"))];
                }
                self.pending_delete = Some(id);
                vec![AppEvent::DeleteRequested(id)]
            }
            AppCommand::DeclineDelete => {
                self.pending_delete = None;
                vec![AppEvent::DeleteDeclined, self.set_status("delete canceled")]
            }
            AppCommand::DeleteSucceeded(id) => {
                self.pending_delete = None;
                self.jobs.retain(|job| job.id != id);
                vec![
                    AppEvent::JobDeleted(id),
                    self.set_status("application deleted"),
                ]
            }
            AppCommand::DeleteFailed(message) => {
                self.pending_delete = None;
                vec![self.show_alert(format!("Error deleting job: {message}"))]
            }
            AppCommand::DismissAlert => {
                self.alert = None;
                vec![AppEvent::AlertDismissed]
            }
            AppCommand::SetStatus(message) => vec![self.set_status(message)],
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    pub fn job(&self, id: JobId) -> Option<&JobApplication> {
        self.jobs.iter().find(|job| job.id == id)
    }

    pub fn edit_target(&self) -> Option<&JobApplication> {
        match self.dialog {
            DialogState::Open(DialogMode::Edit(id)) => self.job(id),
            DialogState::Open(DialogMode::Add) | DialogState::Closed => None,
        }
    }

    /// Validated remote write for the open dialog's draft.
    pub fn submission(&self) -> Result<Submission> {
        let DialogState::Open(mode) = self.dialog else {
            bail!("no form is open -- press a to add an application");
        };
        self.draft.validate()?;
        let draft = self.draft.clone();
        Ok(match mode {
            DialogMode::Add => Submission::Insert(draft),
            DialogMode::Edit(id) => Submission::Update { id, draft },
        })
    }

    fn close_dialog(&mut self) -> AppEvent {
        self.dialog = DialogState::Closed;
        self.draft = JobDraft::blank();
        AppEvent::DialogChanged(self.dialog)
    }

    fn show_alert(&mut self, message: String) -> AppEvent {
        self.alert = Some(message.clone());
        AppEvent::AlertShown(message)
    }

    fn set_status(&mut self, message: impl Into<String>) -> AppEvent {
        let message = message.into();
        self.status_line = Some(message.clone());
        AppEvent::StatusUpdated(message)
    }
}
