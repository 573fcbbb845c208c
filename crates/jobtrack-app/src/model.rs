// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Deserializer, Serialize};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime};

use crate::{JobDraft, JobId};

/// Platform recorded for applications entered by hand.
pub const DEFAULT_PLATFORM: &str = "Manual";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Applied,
    Interviewing,
    Offer,
    Rejected,
    Ghosted,
}

impl ApplicationStatus {
    pub const ALL: [Self; 5] = [
        Self::Applied,
        Self::Interviewing,
        Self::Offer,
        Self::Rejected,
        Self::Ghosted,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Applied => "Applied",
            Self::Interviewing => "Interviewing",
            Self::Offer => "Offer",
            Self::Rejected => "Rejected",
            Self::Ghosted => "Ghosted",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Applied" => Some(Self::Applied),
            "Interviewing" => Some(Self::Interviewing),
            "Offer" => Some(Self::Offer),
            "Rejected" => Some(Self::Rejected),
            "Ghosted" => Some(Self::Ghosted),
            _ => None,
        }
    }

    pub const fn badge(self) -> StatusBadge {
        match self {
            Self::Rejected => StatusBadge::Destructive,
            Self::Offer => StatusBadge::Highlight,
            Self::Applied | Self::Interviewing | Self::Ghosted => StatusBadge::Neutral,
        }
    }

    /// Steps through [`Self::ALL`], wrapping at both ends.
    pub fn cycle(self, delta: isize) -> Self {
        let all = Self::ALL;
        let current = all.iter().position(|status| *status == self).unwrap_or(0) as isize;
        let next = (current + delta).rem_euclid(all.len() as isize) as usize;
        all[next]
    }
}

/// Visual treatment of a status cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusBadge {
    Destructive,
    Highlight,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobApplication {
    pub id: JobId,
    pub company_name: String,
    pub role_title: String,
    #[serde(default, deserialize_with = "nullable_text")]
    pub location: String,
    #[serde(default, deserialize_with = "nullable_text")]
    pub source_url: String,
    #[serde(default, deserialize_with = "nullable_text")]
    pub platform: String,
    pub status: ApplicationStatus,
    #[serde(with = "applied_date")]
    pub applied_date: OffsetDateTime,
    #[serde(default)]
    pub notes: Option<String>,
}

impl JobApplication {
    /// Editable fields of this record, with absent notes read as empty.
    pub fn draft(&self) -> JobDraft {
        JobDraft {
            company_name: self.company_name.clone(),
            role_title: self.role_title.clone(),
            location: self.location.clone(),
            source_url: self.source_url.clone(),
            platform: self.platform.clone(),
            status: self.status,
            notes: self.notes.clone().unwrap_or_default(),
        }
    }

    /// Replaces every editable field. `id` and `applied_date` are left alone.
    pub fn apply_draft(&mut self, draft: &JobDraft) {
        self.company_name = draft.company_name.clone();
        self.role_title = draft.role_title.clone();
        self.location = draft.location.clone();
        self.source_url = draft.source_url.clone();
        self.platform = draft.platform.clone();
        self.status = draft.status;
        self.notes = Some(draft.notes.clone());
    }
}

/// Accepts RFC 3339 timestamps, Postgres text timestamps (zone-less ones read as UTC),
/// and bare dates.
pub fn parse_applied_date(raw: &str) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    if let Ok(value) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(value);
    }

    if let Ok(value) = OffsetDateTime::parse(
        raw,
        &format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond][offset_hour sign:mandatory]:[offset_minute]"
        ),
    ) {
        return Some(value);
    }

    if let Ok(value) = OffsetDateTime::parse(
        raw,
        &format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second][offset_hour sign:mandatory]:[offset_minute]"
        ),
    ) {
        return Some(value);
    }

    if let Ok(value) = PrimitiveDateTime::parse(
        raw,
        &format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
    ) {
        return Some(value.assume_utc());
    }

    if let Ok(value) = PrimitiveDateTime::parse(
        raw,
        &format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    ) {
        return Some(value.assume_utc());
    }

    Date::parse(raw, &format_description!("[year]-[month]-[day]"))
        .ok()
        .map(|date| date.midnight().assume_utc())
}

fn nullable_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

pub mod applied_date {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};
    use time::OffsetDateTime;
    use time::format_description::well_known::Rfc3339;

    pub fn serialize<S>(value: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = value.format(&Rfc3339).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_applied_date(&raw)
            .ok_or_else(|| D::Error::custom(format!("invalid applied_date {raw:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::{ApplicationStatus, JobApplication, StatusBadge, parse_applied_date};
    use crate::JobId;
    use anyhow::Result;
    use time::{Date, Month};

    #[test]
    fn status_round_trips_wire_names() {
        for status in ApplicationStatus::ALL {
            assert_eq!(ApplicationStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ApplicationStatus::parse("applied"), None);
    }

    #[test]
    fn badge_distinguishes_rejected_and_offer() {
        assert_eq!(
            ApplicationStatus::Rejected.badge(),
            StatusBadge::Destructive
        );
        assert_eq!(ApplicationStatus::Offer.badge(), StatusBadge::Highlight);
        assert_eq!(ApplicationStatus::Ghosted.badge(), StatusBadge::Neutral);
    }

    #[test]
    fn status_cycle_wraps() {
        assert_eq!(
            ApplicationStatus::Ghosted.cycle(1),
            ApplicationStatus::Applied
        );
        assert_eq!(
            ApplicationStatus::Applied.cycle(-1),
            ApplicationStatus::Ghosted
        );
    }

    #[test]
    fn applied_date_accepts_server_shapes() -> Result<()> {
        let expected = Date::from_calendar_date(2026, Month::March, 4)?;
        for raw in [
            "2026-03-04T10:15:30.123456+00:00",
            "2026-03-04T10:15:30Z",
            "2026-03-04 10:15:30.25+02:00",
            "2026-03-04T10:15:30.5",
            "2026-03-04T10:15:30",
            "2026-03-04",
        ] {
            let parsed = parse_applied_date(raw).expect("date should parse");
            assert_eq!(parsed.date(), expected, "raw {raw}");
        }
        assert!(parse_applied_date("yesterday").is_none());
        Ok(())
    }

    #[test]
    fn decode_reads_null_text_columns_as_empty() -> Result<()> {
        let raw = r#"{
            "id": 7,
            "company_name": "Acme",
            "role_title": "Engineer",
            "location": null,
            "source_url": null,
            "platform": "LinkedIn",
            "status": "Interviewing",
            "applied_date": "2026-01-05T09:00:00+00:00",
            "notes": null,
            "created_at": "2026-01-05T09:00:00+00:00"
        }"#;
        let job: JobApplication = serde_json::from_str(raw)?;
        assert_eq!(job.id, JobId::new(7));
        assert_eq!(job.location, "");
        assert_eq!(job.source_url, "");
        assert_eq!(job.status, ApplicationStatus::Interviewing);
        assert_eq!(job.notes, None);
        Ok(())
    }

    #[test]
    fn decode_rejects_unknown_status() {
        let raw = r#"{"id":1,"company_name":"A","role_title":"B","status":"Hired","applied_date":"2026-01-05"}"#;
        assert!(serde_json::from_str::<JobApplication>(raw).is_err());
    }

    #[test]
    fn apply_draft_keeps_identity_and_applied_date() -> Result<()> {
        let raw = r#"{"id":3,"company_name":"Old","role_title":"Dev","status":"Applied","applied_date":"2026-02-01"}"#;
        let mut job: JobApplication = serde_json::from_str(raw)?;
        let original_date = job.applied_date;

        let mut draft = job.draft();
        assert_eq!(draft.notes, "");
        draft.company_name = "New".to_owned();
        draft.status = ApplicationStatus::Offer;
        draft.notes = "called back".to_owned();
        job.apply_draft(&draft);

        assert_eq!(job.id, JobId::new(3));
        assert_eq!(job.applied_date, original_date);
        assert_eq!(job.draft(), draft);
        Ok(())
    }
}
