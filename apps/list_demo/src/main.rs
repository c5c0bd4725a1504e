use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use paging_core::{FetchOutcome, ListEvent, PaginatedList};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::broadcast::{self, error::RecvError},
    task::JoinHandle,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod catalog;
mod commands;
mod config;
mod view;

use catalog::{CatalogItem, MockCatalog};
use commands::{parse_command, DemoCommand, HELP};

const KEYSTROKE_INTERVAL: Duration = Duration::from_millis(80);

#[derive(Parser, Debug)]
struct Args {
    /// Settings file; missing files are ignored.
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    #[command(flatten)]
    overrides: config::CliOverrides,
    /// Print snapshots as JSON.
    #[arg(long)]
    json: bool,
    #[arg(long, default_value = "info")]
    log_filter: String,
}

type DemoList = Arc<PaginatedList<CatalogItem>>;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut settings = config::load_settings(&args.config)?;
    settings.apply_overrides(&args.overrides);

    let catalog = MockCatalog::generate(settings.catalog_size)
        .with_latency(settings.latency())
        .with_fail_every(settings.fail_every);
    info!(
        entries = catalog.len(),
        page_size = settings.page_size,
        search = settings.search_enabled,
        "demo: catalog ready"
    );

    let list = PaginatedList::new(settings.list_config())
        .context("invalid list settings")?
        .with_page_source(catalog.clone());
    if settings.search_enabled {
        list.set_search_source(catalog.clone());
    }

    let printer = spawn_event_printer(list.subscribe());

    println!("{HELP}");
    list.fetch_items(false).await;
    print_snapshot(&list, args.json)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        match parse_command(&line) {
            Ok(Some(DemoCommand::Quit)) => break,
            Ok(Some(command)) => run_command(&list, command, args.json).await?,
            Ok(None) => {}
            Err(err) => eprintln!("{err}"),
        }
    }

    list.shutdown();
    printer.abort();
    info!(requests = catalog.request_count(), "demo: exiting");
    Ok(())
}

async fn run_command(list: &DemoList, command: DemoCommand, json: bool) -> Result<()> {
    match command {
        DemoCommand::More => {
            let Some(last) = list.snapshot().last_index() else {
                println!("  nothing loaded yet; try 'refresh'");
                return Ok(());
            };
            // Failures and discarded responses are reported by the event printer.
            match list.load_more_if_needed(last).await {
                FetchOutcome::Skipped => println!("  nothing more to load"),
                FetchOutcome::Busy => println!("  still loading, try again"),
                outcome if outcome.is_applied() => print_snapshot(list, json)?,
                _ => {}
            }
        }
        DemoCommand::Refresh => {
            list.refresh().await;
            print_snapshot(list, json)?;
        }
        DemoCommand::Search(text) => list.update_search_query(text),
        DemoCommand::Type(text) => type_text(list, &text).await,
        DemoCommand::Show => print_snapshot(list, json)?,
        DemoCommand::Help => println!("{HELP}"),
        DemoCommand::Quit => {}
    }
    Ok(())
}

/// Feeds `text` to the search field one character at a time, faster than
/// the debounce period, so only the final text is searched.
async fn type_text(list: &DemoList, text: &str) {
    for (end, ch) in text.char_indices() {
        list.update_search_query(&text[..end + ch.len_utf8()]);
        tokio::time::sleep(KEYSTROKE_INTERVAL).await;
    }
}

fn print_snapshot(list: &DemoList, json: bool) -> Result<()> {
    let snapshot = list.snapshot();
    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        println!("{}", view::render_snapshot(&snapshot));
    }
    Ok(())
}

fn spawn_event_printer(mut events: broadcast::Receiver<ListEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    if let Some(line) = view::describe_event(&event) {
                        println!("  * {line}");
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "demo: event printer fell behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}
