//! Gridwatch CLI - Command-line interface
//!
//! This binary provides a command-line interface to the gridwatch library.

use clap::{Parser, ValueEnum};
use std::process;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use gridwatch::api::{AsyncReqwestClient, YasnoClient};
use gridwatch::config::{Settings, DEFAULT_UPDATE_INTERVAL_SECS};
use gridwatch::coordinator::RefreshCoordinator;
use gridwatch::facts::{FactId, OutageFacts};
use gridwatch::i18n::Language;
use gridwatch::logging;

#[derive(Debug, Clone, ValueEnum)]
enum LanguageArg {
    /// Ukrainian
    Uk,
    /// English
    En,
}

impl From<LanguageArg> for Language {
    fn from(arg: LanguageArg) -> Self {
        match arg {
            LanguageArg::Uk => Language::Ukrainian,
            LanguageArg::En => Language::English,
        }
    }
}

#[derive(Parser)]
#[command(name = "gridwatch")]
#[command(about = "Track power outage schedules for a rotation group", long_about = None)]
#[command(version = gridwatch::VERSION)]
struct Args {
    /// Region name as published by the utility (e.g. "Київська область")
    #[arg(long)]
    region: String,

    /// Provider (DSO) name within the region
    #[arg(long)]
    provider: String,

    /// Rotation group (e.g. "1.1")
    #[arg(long)]
    group: String,

    /// Refresh interval in seconds (daemon mode)
    #[arg(long, default_value_t = DEFAULT_UPDATE_INTERVAL_SECS)]
    interval: u64,

    /// Display language for countdowns and event names
    #[arg(long, value_enum, default_value = "uk")]
    language: LanguageArg,

    /// Fetch once, print the fact table, and exit
    #[arg(long)]
    once: bool,

    /// Override the schedule API base URL
    #[arg(long)]
    base_url: Option<String>,
}

fn print_facts(facts: &OutageFacts) {
    let now = Utc::now();
    println!();
    println!(
        "Schedule facts for {} / {}",
        facts.region_name(),
        facts.provider_name()
    );
    for id in FactId::ALL {
        println!("  {:<34} {}", id.key(), facts.resolve(id, now));
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let _logging_guard =
        match logging::init_logging(logging::default_log_dir(), logging::default_log_file()) {
            Ok(guard) => guard,
            Err(e) => {
                eprintln!("Error initializing logging: {}", e);
                process::exit(1);
            }
        };
    info!(version = gridwatch::VERSION, "gridwatch starting");

    let settings = match Settings::new(args.region, args.provider, args.group) {
        Ok(settings) => settings
            .with_update_interval(Duration::from_secs(args.interval))
            .with_language(args.language.into()),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let http_client = match AsyncReqwestClient::new() {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error creating HTTP client: {}", e);
            process::exit(1);
        }
    };
    let client = match args.base_url {
        Some(url) => YasnoClient::with_base_url(http_client, url),
        None => YasnoClient::new(http_client),
    };

    let coordinator = Arc::new(RefreshCoordinator::new(settings, client));

    if args.once {
        if let Err(e) = coordinator.refresh_now().await {
            eprintln!("Error refreshing schedule: {}", e);
            process::exit(1);
        }
        print_facts(&coordinator.facts());
        return;
    }

    let shutdown = CancellationToken::new();
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_shutdown.cancel();
        }
    });

    let daemon = Arc::clone(&coordinator);
    let daemon_shutdown = shutdown.clone();
    let daemon_handle = tokio::spawn(async move {
        daemon.run(daemon_shutdown).await;
    });

    // Re-render the fact table whenever a refresh lands
    let mut updates = coordinator.subscribe_updates();
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            update = updates.recv() => match update {
                Ok(_) => print_facts(&coordinator.facts()),
                Err(_) => break,
            },
        }
    }

    let _ = daemon_handle.await;
}
