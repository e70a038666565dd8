//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `taskdeck_core` wiring end to end: config, logging, storage, views.
//! - Print the todo list, month grid and progress summary for one owner.

mod render;

use anyhow::{bail, Context, Result};
use chrono::Local;
use std::env;
use std::path::PathBuf;
use taskdeck_core::view::progress::derive_category_view_with_limit;
use taskdeck_core::{
    derive_calendar_view, derive_todo_view, ensure_default_config, init_logging, load_config,
    open_db, require_owner, SqliteTaskRepository, StatusFilter, TaskService, YearMonth,
};

const DEFAULT_CONFIG_PATH: &str = "taskdeck.json";
const USAGE: &str = "Usage: taskdeck [--config <path>] <owner> [YYYY-MM]";

struct Args {
    config_path: PathBuf,
    owner: Option<String>,
    month: Option<String>,
}

fn parse_args() -> Result<Args> {
    let mut config_path = PathBuf::from(DEFAULT_CONFIG_PATH);
    let mut positional = Vec::new();
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            config_path = args.next().map(PathBuf::from).context(USAGE)?;
        } else {
            positional.push(arg);
        }
    }
    if positional.len() > 2 {
        bail!(USAGE);
    }
    let mut positional = positional.into_iter();
    Ok(Args {
        config_path,
        owner: positional.next(),
        month: positional.next(),
    })
}

fn parse_month(value: &str) -> Result<YearMonth> {
    let (year, month) = value
        .split_once('-')
        .with_context(|| format!("expected YYYY-MM, got `{value}`"))?;
    let year: i32 = year.parse().context("invalid year")?;
    let month: u32 = month.parse().context("invalid month")?;
    Ok(YearMonth::new(year, month)?)
}

fn main() -> Result<()> {
    let args = parse_args()?;

    ensure_default_config(&args.config_path)
        .with_context(|| format!("writing {}", args.config_path.display()))?;
    let config = load_config(&args.config_path)
        .with_context(|| format!("loading {}", args.config_path.display()))?;
    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, log_dir)?;
    }

    let owner = require_owner(args.owner.as_deref()).context(USAGE)?;
    let today = Local::now().date_naive();
    let month = match args.month.as_deref() {
        Some(value) => parse_month(value)?,
        None => YearMonth::of(today),
    };

    let conn = open_db(config.resolve_database_path(&args.config_path))?;
    let service = TaskService::new(SqliteTaskRepository::try_new(&conn)?);
    let tasks = service.list_tasks(&owner)?;

    println!("taskdeck_core version={}", taskdeck_core::core_version());
    println!();
    render::print_todo(&derive_todo_view(&tasks, StatusFilter::All), today);
    println!();
    render::print_calendar(&derive_calendar_view(month, &tasks, today));
    println!();
    render::print_progress(&derive_category_view_with_limit(
        &tasks,
        config.recent_completed_limit,
    ));

    log::info!(
        "event=cli_report module=cli status=ok count={} month={}-{:02}",
        tasks.len(),
        month.year(),
        month.month()
    );
    Ok(())
}
