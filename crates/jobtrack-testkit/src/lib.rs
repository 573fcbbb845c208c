// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use jobtrack_app::{ApplicationStatus, DEFAULT_PLATFORM, JobApplication, JobDraft, JobId};
use time::{Date, Duration, Month, OffsetDateTime, Time};

const COMPANY_ROOTS: [&str; 16] = [
    "Acme", "Globex", "Initech", "Umbrella", "Hooli", "Vandelay", "Soylent", "Stark", "Wayne",
    "Cyberdyne", "Tyrell", "Wonka", "Massive", "Pied Piper", "Gringotts", "Oscorp",
];
const COMPANY_SUFFIXES: [&str; 6] = ["Labs", "Systems", "Inc", "Group", "Analytics", "Cloud"];

const ROLE_LEVELS: [&str; 5] = ["Junior", "", "Senior", "Staff", "Principal"];
const ROLE_TITLES: [&str; 10] = [
    "Software Engineer",
    "Backend Engineer",
    "Frontend Developer",
    "Data Engineer",
    "Site Reliability Engineer",
    "Platform Engineer",
    "Product Engineer",
    "Security Engineer",
    "Mobile Developer",
    "Engineering Manager",
];

const LOCATIONS: [&str; 12] = [
    "Remote",
    "Austin, TX",
    "Seattle, WA",
    "Denver, CO",
    "New York, NY",
    "Chicago, IL",
    "Portland, OR",
    "Boston, MA",
    "Raleigh, NC",
    "Remote (US)",
    "Hybrid - San Francisco, CA",
    "Toronto, ON",
];

const PLATFORMS: [&str; 6] = [
    "LinkedIn",
    "Indeed",
    "Wellfound",
    "Company Site",
    "Referral",
    DEFAULT_PLATFORM,
];

const NOTE_WORDS: [&str; 20] = [
    "recruiter",
    "screen",
    "onsite",
    "take-home",
    "referral",
    "follow",
    "up",
    "salary",
    "range",
    "benefits",
    "hiring",
    "manager",
    "call",
    "scheduled",
    "portfolio",
    "sent",
    "team",
    "culture",
    "remote",
    "offer",
];

const DEMO_JOB_COUNT: usize = 12;

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

/// Seeded generator of plausible job applications.
#[derive(Debug, Clone)]
pub struct JobFaker {
    rng: DeterministicRng,
}

impl JobFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
        }
    }

    pub fn draft(&mut self) -> JobDraft {
        let company_name = self.company_name();
        let level = self.pick(&ROLE_LEVELS);
        let title = self.pick(&ROLE_TITLES);
        let role_title = if level.is_empty() {
            title.to_owned()
        } else {
            format!("{level} {title}")
        };
        let source_url = if self.rng.bool() {
            format!(
                "https://jobs.{}.example.com/postings/{}",
                slug(&company_name),
                self.rng.int_n(90_000) + 10_000
            )
        } else {
            String::new()
        };
        let notes = if self.rng.bool() {
            self.sentence(3, 9)
        } else {
            String::new()
        };

        JobDraft {
            company_name,
            role_title,
            location: self.pick(&LOCATIONS).to_owned(),
            source_url,
            platform: self.pick(&PLATFORMS).to_owned(),
            status: ApplicationStatus::ALL[self.rng.int_n(ApplicationStatus::ALL.len())],
            notes,
        }
    }

    /// A stored record with `id`, applied within the 120 days before the reference date.
    pub fn job(&mut self, id: i64) -> JobApplication {
        let draft = self.draft();
        let days_back = self.rng.int_n(120) as i64;
        let minutes = self.rng.int_n(24 * 60) as i64;
        let applied_date = reference_now() - Duration::days(days_back) - Duration::minutes(minutes);
        let mut job = JobApplication {
            id: JobId::new(id),
            company_name: String::new(),
            role_title: String::new(),
            location: String::new(),
            source_url: String::new(),
            platform: String::new(),
            status: ApplicationStatus::Applied,
            applied_date,
            notes: None,
        };
        job.apply_draft(&draft);
        if draft.notes.is_empty() {
            job.notes = None;
        }
        job
    }

    fn company_name(&mut self) -> String {
        let root = self.pick(&COMPANY_ROOTS);
        if self.rng.bool() {
            root.to_owned()
        } else {
            format!("{root} {}", self.pick(&COMPANY_SUFFIXES))
        }
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn sentence(&mut self, min_words: usize, max_words: usize) -> String {
        let count = min_words + self.rng.int_n(max_words.saturating_sub(min_words) + 1);
        let mut parts = Vec::with_capacity(count);
        for _ in 0..count {
            parts.push(self.pick(&NOTE_WORDS));
        }
        let mut sentence = parts.join(" ");
        if let Some(first) = sentence.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        sentence.push('.');
        sentence
    }
}

/// Rows for the demo table, newest applied date first.
pub fn demo_jobs(seed: u64) -> Vec<JobApplication> {
    let mut faker = JobFaker::new(seed);
    let mut jobs = (1..=DEMO_JOB_COUNT as i64)
        .map(|id| faker.job(id))
        .collect::<Vec<_>>();
    jobs.sort_by(|left, right| {
        right
            .applied_date
            .cmp(&left.applied_date)
            .then(right.id.cmp(&left.id))
    });
    jobs
}

pub fn sample_job(id: i64, company: &str, role: &str) -> JobApplication {
    JobApplication {
        id: JobId::new(id),
        company_name: company.to_owned(),
        role_title: role.to_owned(),
        location: "Remote".to_owned(),
        source_url: String::new(),
        platform: DEFAULT_PLATFORM.to_owned(),
        status: ApplicationStatus::Applied,
        applied_date: reference_now(),
        notes: None,
    }
}

pub fn sample_draft(company: &str, role: &str) -> JobDraft {
    JobDraft {
        company_name: company.to_owned(),
        role_title: role.to_owned(),
        ..JobDraft::blank()
    }
}

pub fn fixture_datetime() -> &'static str {
    "2026-02-19T12:34:56Z"
}

/// Matches [`fixture_datetime`].
pub fn reference_now() -> OffsetDateTime {
    let date = Date::from_calendar_date(2026, Month::February, 19).unwrap_or(Date::MIN);
    let time = Time::from_hms(12, 34, 56).unwrap_or(Time::MIDNIGHT);
    date.with_time(time).assume_utc()
}

fn slug(name: &str) -> String {
    name.chars()
        .filter(|ch| ch.is_ascii_alphanumeric())
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{JobFaker, demo_jobs, fixture_datetime, reference_now, sample_job};
    use jobtrack_app::{JobId, parse_applied_date};
    use std::collections::BTreeSet;

    #[test]
    fn new_deterministic_seed() {
        let mut left = JobFaker::new(42);
        let mut right = JobFaker::new(42);
        for id in 1..=5 {
            assert_eq!(left.job(id), right.job(id));
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let left = (1..=5).map(|id| JobFaker::new(1).job(id)).collect::<Vec<_>>();
        let right = (1..=5).map(|id| JobFaker::new(2).job(id)).collect::<Vec<_>>();
        assert_ne!(left, right);
    }

    #[test]
    fn zero_seed_is_normalized() {
        assert_eq!(JobFaker::new(0).job(1), JobFaker::new(1).job(1));
    }

    #[test]
    fn drafts_always_validate() {
        let mut faker = JobFaker::new(7);
        for _ in 0..200 {
            let draft = faker.draft();
            assert!(draft.validate().is_ok(), "invalid draft {draft:?}");
        }
    }

    #[test]
    fn demo_jobs_are_newest_first_with_unique_ids() {
        let jobs = demo_jobs(3);
        assert!(!jobs.is_empty());
        assert!(
            jobs.windows(2)
                .all(|pair| pair[0].applied_date >= pair[1].applied_date)
        );
        let ids = jobs.iter().map(|job| job.id).collect::<BTreeSet<JobId>>();
        assert_eq!(ids.len(), jobs.len());
        assert!(jobs.iter().all(|job| job.applied_date <= reference_now()));
    }

    #[test]
    fn reference_now_matches_fixture_datetime() {
        assert_eq!(parse_applied_date(fixture_datetime()), Some(reference_now()));
    }

    #[test]
    fn sample_job_uses_given_identity() {
        let job = sample_job(9, "Acme", "Engineer");
        assert_eq!(job.id, JobId::new(9));
        assert_eq!(job.company_name, "Acme");
        assert_eq!(job.role_title, "Engineer");
        assert_eq!(job.notes, None);
    }
}
