//! Quarry CLI binary.
//!
//! Command-line interface for searching the ticker directory, fetching
//! disclosures, and browsing the earnings calendar.

use chrono::Local;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use quarry::calendar::{CalendarAggregator, CalendarEvent, group_by_month, order_events, split_upcoming_past};
use quarry::download::Downloader;
use quarry::paths;
use quarry::watchlist::Watchlist;
use quarry::QuarryError;
use quarry_data::edgar::sec_user_agent;
use quarry_data::tickers::TickerDirectory;
use std::process;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "quarry")]
#[command(about = "Quarry: SEC filings and earnings-call research tool", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the ticker directory by symbol or company name
    Search {
        /// Free-text query (ticker or company name)
        query: String,

        /// Maximum number of results
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Download the latest disclosures for one or more tickers
    Fetch {
        /// Ticker symbols or company names
        #[arg(required = true)]
        tickers: Vec<String>,

        /// Also download the latest earnings-call transcript
        #[arg(long)]
        earnings: bool,

        /// Skip SEC filings (10-K / 10-Q)
        #[arg(long)]
        no_sec: bool,

        /// Output directory
        #[arg(long, default_value = "downloads")]
        out: String,
    },

    /// Show the filing and earnings calendar
    Calendar {
        /// Tickers to include (defaults to the watchlist)
        tickers: Vec<String>,
    },

    /// Manage the ticker watchlist
    Watchlist {
        #[command(subcommand)]
        action: WatchlistAction,
    },
}

#[derive(Subcommand)]
enum WatchlistAction {
    /// Print the watchlist
    List,
    /// Add a ticker
    Add {
        /// Ticker symbol
        ticker: String,
    },
    /// Remove a ticker
    Remove {
        /// Ticker symbol
        ticker: String,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Search { query, limit } => search(&query, limit).await?,
        Commands::Fetch {
            tickers,
            earnings,
            no_sec,
            out,
        } => fetch(&tickers, earnings, no_sec, &out).await?,
        Commands::Calendar { tickers } => calendar(tickers).await?,
        Commands::Watchlist { action } => watchlist(action)?,
    }

    Ok(())
}

/// Directory backed by the SEC feed and the default snapshot path.
fn ticker_directory() -> Result<TickerDirectory, Box<dyn std::error::Error>> {
    let client = reqwest::Client::builder()
        .user_agent(sec_user_agent())
        .timeout(Duration::from_secs(30))
        .build()?;
    Ok(TickerDirectory::new(client, paths::ticker_cache_path()))
}

async fn search(query: &str, limit: usize) -> Result<(), Box<dyn std::error::Error>> {
    let directory = ticker_directory()?;
    let results = directory.search(query, limit).await?;

    if results.is_empty() {
        println!("No matches for '{}'", query);
        return Ok(());
    }

    println!("{:<8} {:<12} NAME", "TICKER", "CIK");
    for company in results {
        println!("{:<8} {:<12} {}", company.ticker, company.cik, company.name);
    }

    Ok(())
}

/// Resolve a free-text argument to a ticker symbol.
///
/// Directory misses and lookup failures fall back to treating the input
/// as a literal symbol.
async fn resolve_ticker(directory: &TickerDirectory, input: &str) -> String {
    match directory.best_ticker(input).await {
        Ok(Some(ticker)) => ticker,
        Ok(None) | Err(_) => input.trim().to_uppercase(),
    }
}

async fn fetch(
    inputs: &[String],
    earnings: bool,
    no_sec: bool,
    out: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let directory = ticker_directory()?;
    let downloader = Downloader::new(out)?;

    let pb = (inputs.len() > 1).then(|| progress_bar(inputs.len() as u64));

    for input in inputs {
        let ticker = resolve_ticker(&directory, input).await;
        if let Some(pb) = &pb {
            pb.set_message(ticker.clone());
        }

        if !no_sec {
            fetch_filings(&downloader, &ticker).await;
        }
        if earnings {
            fetch_transcript(&downloader, &ticker).await;
        }

        if let Some(pb) = &pb {
            pb.inc(1);
        }
    }

    if let Some(pb) = &pb {
        pb.finish_with_message("done");
    }

    Ok(())
}

async fn fetch_filings(downloader: &Downloader, ticker: &str) {
    match downloader.download_filings(ticker).await {
        Ok(saved) if saved.is_empty() => {
            println!("{}: no 10-K or 10-Q on record", ticker);
        }
        Ok(saved) => {
            for filing in saved {
                println!(
                    "{}: {} filed {} -> {}",
                    ticker,
                    filing.form,
                    filing.date,
                    filing.path.display()
                );
            }
        }
        Err(e) => eprintln!("{}: filings failed: {}", ticker, e),
    }
}

async fn fetch_transcript(downloader: &Downloader, ticker: &str) {
    match downloader.download_transcript(ticker).await {
        Ok(saved) => {
            let date = saved
                .meta
                .date
                .map_or_else(|| "unknown date".to_string(), |d| d.to_string());
            println!(
                "{}: earnings call ({}) -> {}",
                ticker,
                date,
                saved.path.display()
            );
        }
        Err(QuarryError::TranscriptNotFound(_)) => {
            println!("{}: no earnings-call transcript found", ticker);
        }
        Err(e) => eprintln!("{}: transcript failed: {}", ticker, e),
    }
}

async fn calendar(tickers: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    let tickers = if tickers.is_empty() {
        let watchlist = Watchlist::new(paths::watchlist_path());
        let stored = watchlist.load()?;
        if stored.is_empty() {
            println!("Watchlist is empty. Add tickers with 'quarry watchlist add <TICKER>'");
            println!("or pass them directly: quarry calendar AAPL MSFT");
            return Ok(());
        }
        stored
    } else {
        tickers
    };

    let aggregator = CalendarAggregator::new()?;

    let pb = progress_bar(tickers.len() as u64);
    let mut events = Vec::new();
    for ticker in &tickers {
        pb.set_message(ticker.to_uppercase());
        events.extend(aggregator.ticker_events(ticker).await);
        pb.inc(1);
    }
    pb.finish_and_clear();

    if events.is_empty() {
        println!("No events found for {}", tickers.join(", "));
        return Ok(());
    }

    let events = order_events(events);
    print_calendar(&events);
    Ok(())
}

fn print_calendar(events: &[CalendarEvent]) {
    let today = Local::now().date_naive();
    println!("Calendar as of {}\n", today);

    let (upcoming, past) = split_upcoming_past(events);

    if !upcoming.is_empty() {
        println!("UPCOMING");
        println!("========");
        print_month_groups(&upcoming);
    }

    if !past.is_empty() {
        if !upcoming.is_empty() {
            println!();
        }
        println!("RECENT");
        println!("======");
        print_month_groups(&past);
    }
}

fn print_month_groups(events: &[&CalendarEvent]) {
    let owned: Vec<CalendarEvent> = events.iter().map(|e| (*e).clone()).collect();
    for (month, group) in group_by_month(&owned) {
        println!("\n{}", month);
        for event in group {
            let time = event
                .time
                .as_deref()
                .map_or_else(String::new, |t| format!("  {}", t));
            println!(
                "  {}  {:<6} {}{}",
                event.date, event.ticker, event.event_type, time
            );
        }
    }
}

fn watchlist(action: WatchlistAction) -> Result<(), Box<dyn std::error::Error>> {
    let watchlist = Watchlist::new(paths::watchlist_path());

    match action {
        WatchlistAction::List => {
            let tickers = watchlist.load()?;
            if tickers.is_empty() {
                println!("Watchlist is empty");
            } else {
                for ticker in tickers {
                    println!("{}", ticker);
                }
            }
        }
        WatchlistAction::Add { ticker } => {
            if watchlist.add(&ticker)? {
                println!("Added {}", ticker.trim().to_uppercase());
            } else {
                println!("{} is already on the watchlist", ticker.trim().to_uppercase());
            }
        }
        WatchlistAction::Remove { ticker } => {
            if watchlist.remove(&ticker)? {
                println!("Removed {}", ticker.trim().to_uppercase());
            } else {
                println!("{} is not on the watchlist", ticker.trim().to_uppercase());
            }
        }
    }

    Ok(())
}

fn progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("valid template")
            .progress_chars("█▓░"),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
