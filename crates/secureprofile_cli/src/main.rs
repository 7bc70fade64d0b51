//! `secureprofile` command-line entry point.
//!
//! # Responsibility
//! - Expose the session directory and simulated dashboard from a terminal.
//! - Keep all state in memory; every invocation is a fresh session.

use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use secureprofile_core::db::open_session_db;
use secureprofile_core::repo::seed::load_seed_profiles;
use secureprofile_core::sim::{standard_feeds, EventSource, Scheduler};
use secureprofile_core::time::{format_time_ago, now_epoch_ms};
use secureprofile_core::{
    default_log_level, init_logging, Dashboard, DashboardConfig, ExportFormat, ExportOptions,
    LogSettings, NotificationStore, ProfileService, SqliteProfileRepository, StatusFilter, Toast,
};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::mpsc::RecvTimeoutError;
use std::time::{Duration, Instant};

type CliResult<T> = Result<T, Box<dyn Error>>;

#[derive(Parser, Debug)]
#[command(name = "secureprofile", version)]
#[command(about = "Mock profile registry dashboard")]
struct Cli {
    /// Absolute directory for rotating log files; logging is off when omitted.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Prints core linkage information.
    Ping,
    /// Lists the seeded profile directory.
    Profiles {
        #[arg(long, default_value = "")]
        search: String,
        /// `all`, `active`, `under_investigation` or `pending_verification`.
        #[arg(long, default_value = "all")]
        status: String,
        #[arg(long, value_enum)]
        export: Option<FormatArg>,
    },
    /// Runs the live dashboard simulation.
    Demo {
        #[arg(long, default_value_t = 30)]
        seconds: u64,
        #[arg(long)]
        seed: Option<u64>,
        /// JSON config file; `SECUREPROFILE_*` variables apply otherwise.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Prints the final dashboard snapshot as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Pdf,
    Csv,
    Excel,
    Json,
}

impl From<FormatArg> for ExportFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Pdf => Self::Pdf,
            FormatArg::Csv => Self::Csv,
            FormatArg::Excel => Self::Excel,
            FormatArg::Json => Self::Json,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let result = start_logging(cli.log_dir.as_ref()).and_then(|()| match cli.command {
        Command::Ping => {
            println!("secureprofile_core ping={}", secureprofile_core::ping());
            println!(
                "secureprofile_core version={}",
                secureprofile_core::core_version()
            );
            Ok(())
        }
        Command::Profiles {
            search,
            status,
            export,
        } => list_profiles(&search, &status, export),
        Command::Demo {
            seconds,
            seed,
            config,
            json,
        } => run_demo(Duration::from_secs(seconds), seed, config, json),
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("secureprofile: {err}");
            ExitCode::FAILURE
        }
    }
}

fn start_logging(log_dir: Option<&PathBuf>) -> CliResult<()> {
    let Some(dir) = log_dir else {
        return Ok(());
    };
    let dir = dir.to_str().ok_or("log_dir must be valid UTF-8")?;
    let settings = LogSettings::parse(default_log_level().as_str(), dir)?;
    init_logging(&settings)?;
    Ok(())
}

fn list_profiles(search: &str, status: &str, export: Option<FormatArg>) -> CliResult<()> {
    let filter =
        StatusFilter::parse(status).ok_or_else(|| format!("unknown status filter `{status}`"))?;
    let now_ms = now_epoch_ms();
    let conn = open_session_db()?;
    let mut service = ProfileService::new(SqliteProfileRepository::new(&conn));
    load_seed_profiles(&SqliteProfileRepository::new(&conn), now_ms)?;

    let listing = service.list(search, filter)?;
    for profile in &listing.items {
        println!(
            "{:<18} {:<4} {:>3}  {:<17} {:<21} {}",
            profile.name,
            profile.alias,
            profile.age,
            profile.entry_point,
            profile.status.label(),
            format_time_ago(now_ms, profile.last_updated_ms)
        );
    }
    if !search.trim().is_empty() {
        println!("{}", service.search_summary(search, filter)?);
    }
    println!("{} of {} profiles", listing.items.len(), listing.total);

    if let Some(format) = export {
        let mut notifications = NotificationStore::new();
        for profile in &listing.items {
            service.toggle_selection(profile.id)?;
        }
        let report = service.export(format.into(), ExportOptions::default(), &mut notifications)?;
        if let Some(latest) = notifications.latest() {
            println!("{}: {}", latest.title, latest.message);
        }
        println!("sections: {}", report.sections.join(", "));
    }
    Ok(())
}

fn run_demo(
    duration: Duration,
    seed: Option<u64>,
    config_path: Option<PathBuf>,
    json: bool,
) -> CliResult<()> {
    let mut config = match config_path {
        Some(path) => DashboardConfig::from_json_file(path)?,
        None => DashboardConfig::from_env()?,
    };
    if seed.is_some() {
        config.seed = seed;
    }

    let origin_ms = now_epoch_ms();
    let conn = open_session_db()?;
    load_seed_profiles(&SqliteProfileRepository::new(&conn), origin_ms)?;
    let service = ProfileService::new(SqliteProfileRepository::new(&conn));
    let recent = service.list("", StatusFilter::All)?.items;

    let mut dashboard = Dashboard::new(config.clone(), recent, origin_ms);
    let scheduler = Scheduler::new(origin_ms, config.seed).with_feeds(standard_feeds(&config));
    let source = EventSource::spawn(scheduler)?;
    info!(
        "event=demo_start module=cli status=ok duration_s={}",
        duration.as_secs()
    );

    let started_at = Instant::now();
    let mut last_toast: Option<Toast> = None;
    while let Some(remaining) = duration.checked_sub(started_at.elapsed()) {
        let event = match source.recv_timeout(remaining) {
            Ok(event) => event,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                return Err("simulation worker stopped unexpectedly".into());
            }
        };
        dashboard.apply(&event);
        dashboard.pump_toasts(event.at_ms);

        let toast = dashboard.current_toast(event.at_ms).cloned();
        if let Some(shown) = toast.as_ref().filter(|shown| last_toast.as_ref() != Some(*shown)) {
            println!(
                "[{:>4}s] toast  {}: {}",
                (event.at_ms - origin_ms) / 1000,
                shown.title,
                shown.description
            );
        }
        last_toast = toast;
    }
    source.stop();

    let now_ms = now_epoch_ms();
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    dashboard.refresh(&mut rng, now_ms);

    if json {
        println!("{}", serde_json::to_string_pretty(&dashboard.snapshot(now_ms))?);
        return Ok(());
    }

    let stats = dashboard.stats();
    println!(
        "profiles={} new={} cases={} load={}% users={} data={:.1}TB",
        stats.total_profiles,
        stats.new_entries,
        stats.active_cases,
        stats.system_load,
        stats.active_users,
        stats.data_processed
    );
    let sidebar = dashboard.sidebar(secureprofile_core::notify::store::SIDEBAR_PREVIEW_LIMIT);
    match sidebar.unread_badge {
        Some(unread) => println!("notifications: {unread} unread"),
        None => println!("notifications: none unread"),
    }
    for notification in &sidebar.recent {
        println!(
            "  [{}] {}: {} ({})",
            notification.kind.as_str(),
            notification.title,
            notification.message,
            format_time_ago(now_ms, notification.created_at_ms)
        );
    }
    if sidebar.overflow > 0 {
        println!("  ... and {} more", sidebar.overflow);
    }
    Ok(())
}
