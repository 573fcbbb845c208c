// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod runtime;

use anyhow::{Context, Result, anyhow};
use config::Config;
use jobtrack_app::AppState;
use jobtrack_remote::{Client, JobsTable, MemoryTable};
use jobtrack_tui::AppRuntime;
use runtime::TableRuntime;
use std::env;
use std::path::PathBuf;
use time::UtcOffset;
use tracing::info;

const DEMO_SEED: u64 = 20_260_219;

fn main() {
    // The lookup fails once another thread exists, so it runs first.
    let date_offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    if let Err(error) = run(date_offset) {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run(date_offset: UtcOffset) -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `jobtrack --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;
    let log_path = logging::init(&config)?;
    info!(
        log = %log_path.display(),
        demo = options.demo,
        %date_offset,
        "starting jobtrack"
    );

    if options.demo {
        let table = MemoryTable::with_rows(jobtrack_testkit::demo_jobs(DEMO_SEED));
        return launch(table, options.check_only, "in-memory demo table", date_offset);
    }

    let credentials = config.credentials().with_context(|| {
        format!(
            "invalid [remote] config in {}",
            options.config_path.display()
        )
    })?;
    let client = Client::new(
        &credentials.url,
        &credentials.api_key,
        config.remote_timeout()?,
    )
    .with_context(|| {
        format!(
            "invalid [remote] config in {}; fix url/api_key/timeout values",
            options.config_path.display()
        )
    })?;
    let target = client.base_url().to_owned();
    launch(client, options.check_only, &target, date_offset)
}

fn launch<T: JobsTable>(
    table: T,
    check_only: bool,
    target: &str,
    date_offset: UtcOffset,
) -> Result<()> {
    let mut runtime = TableRuntime::new(table);
    if check_only {
        let jobs = runtime
            .load_jobs()
            .with_context(|| format!("select jobs from {target}"))?;
        println!("ok: {} applications in {target}", jobs.len());
        return Ok(());
    }

    let mut state = AppState::default();
    jobtrack_tui::run_app(&mut state, &mut runtime, date_offset)
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_example: bool,
    demo: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        print_example: false,
        demo: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("jobtrack: track job applications in a hosted table");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --demo                   Launch against an in-memory table with demo rows");
    println!("  --check                  Validate config and run one select, then exit");
    println!("  --help                   Show this help");
}
