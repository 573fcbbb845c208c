// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use std::env;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

const LOG_FILTER_ENV: &str = "JOBTRACK_LOG";

/// Installs the global subscriber, appending to the configured log file.
/// The terminal belongs to the TUI, so nothing is written to stdout or stderr.
pub fn init(config: &Config) -> Result<PathBuf> {
    let path = config.log_file()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(config.log_level())?)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|error| anyhow!("install log subscriber: {error}"))?;
    Ok(path)
}

/// `JOBTRACK_LOG` wins over the configured level when set.
pub fn env_filter(default_level: &str) -> Result<EnvFilter> {
    let directives = env::var(LOG_FILTER_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default_level.to_owned());
    EnvFilter::try_new(&directives)
        .with_context(|| format!("parse log filter {directives:?}; check {LOG_FILTER_ENV} or [log].level"))
}

#[cfg(test)]
mod tests {
    use super::env_filter;
    use anyhow::Result;

    #[test]
    fn configured_level_builds_filter() -> Result<()> {
        let filter = env_filter("jobtrack_remote=debug,info")?;
        assert!(filter.to_string().contains("jobtrack_remote=debug"));
        Ok(())
    }

    #[test]
    fn bad_level_is_reported() {
        let error = env_filter("jobtrack=verbose").expect_err("bad level should fail");
        assert!(error.to_string().contains("parse log filter"));
    }
}
