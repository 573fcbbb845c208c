// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{ApplicationStatus, DEFAULT_PLATFORM};

/// Editable fields of a job application, as sent on insert and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDraft {
    pub company_name: String,
    pub role_title: String,
    pub location: String,
    pub source_url: String,
    pub platform: String,
    pub status: ApplicationStatus,
    pub notes: String,
}

impl Default for JobDraft {
    fn default() -> Self {
        Self::blank()
    }
}

impl JobDraft {
    pub fn blank() -> Self {
        Self {
            company_name: String::new(),
            role_title: String::new(),
            location: String::new(),
            source_url: String::new(),
            platform: DEFAULT_PLATFORM.to_owned(),
            status: ApplicationStatus::Applied,
            notes: String::new(),
        }
    }

    pub fn text(&self, field: DraftField) -> Option<&str> {
        match field {
            DraftField::Company => Some(&self.company_name),
            DraftField::Role => Some(&self.role_title),
            DraftField::Location => Some(&self.location),
            DraftField::SourceUrl => Some(&self.source_url),
            DraftField::Notes => Some(&self.notes),
            DraftField::Status => None,
        }
    }

    pub fn text_mut(&mut self, field: DraftField) -> Option<&mut String> {
        match field {
            DraftField::Company => Some(&mut self.company_name),
            DraftField::Role => Some(&mut self.role_title),
            DraftField::Location => Some(&mut self.location),
            DraftField::SourceUrl => Some(&mut self.source_url),
            DraftField::Notes => Some(&mut self.notes),
            DraftField::Status => None,
        }
    }

    /// Input-level checks only; the remote table does its own validation.
    pub fn validate(&self) -> Result<()> {
        if self.company_name.trim().is_empty() {
            bail!("company is required -- enter a company name and retry");
        }
        if self.role_title.trim().is_empty() {
            bail!("role is required -- enter a role title and retry");
        }
        let source_url = self.source_url.trim();
        if !source_url.is_empty() {
            let Ok(parsed) = Url::parse(source_url) else {
                bail!("job URL {source_url:?} is not a valid URL -- use a full https:// link");
            };
            if !matches!(parsed.scheme(), "http" | "https") {
                bail!(
                    "job URL scheme {:?} is not supported -- use http or https",
                    parsed.scheme()
                );
            }
        }
        Ok(())
    }
}

/// Inputs of the record form, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    Company,
    Role,
    Location,
    Status,
    SourceUrl,
    Notes,
}

impl DraftField {
    pub const ALL: [Self; 6] = [
        Self::Company,
        Self::Role,
        Self::Location,
        Self::Status,
        Self::SourceUrl,
        Self::Notes,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Company => "Company",
            Self::Role => "Role",
            Self::Location => "Location",
            Self::Status => "Status",
            Self::SourceUrl => "Job URL",
            Self::Notes => "Notes",
        }
    }

    pub const fn required(self) -> bool {
        matches!(self, Self::Company | Self::Role)
    }
}
