use std::path::PathBuf;

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};

use lab_roster_insights::facade::Outcome;
use lab_roster_insights::loader::{load_members, load_publications};
use lab_roster_insights::normalize::parse_timestamp;
use lab_roster_insights::report;
use lab_roster_insights::{Bucket, RawTimestamp, SearchIndex};

#[derive(Parser)]
#[command(name = "lab-roster-insights")]
#[command(about = "Roster classification and publication statistics for the lab website", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify members into roster buckets
    Roster {
        #[arg(long)]
        input: PathBuf,
        /// Case-insensitive text filter over names, email, role and bio
        #[arg(long)]
        query: Option<String>,
        #[arg(long, value_parser = parse_bucket)]
        bucket: Option<Bucket>,
        #[arg(long)]
        json: bool,
    },
    /// Summarize publications across rolling windows
    Publications {
        #[arg(long)]
        input: PathBuf,
        /// Reference time for the windows (defaults to now)
        #[arg(long, value_parser = parse_now)]
        now: Option<DateTime<Utc>>,
        #[arg(long)]
        json: bool,
    },
    /// Generate a markdown report
    Report {
        #[arg(long)]
        members: PathBuf,
        #[arg(long)]
        publications: PathBuf,
        #[arg(long, value_parser = parse_now)]
        now: Option<DateTime<Utc>>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

fn parse_bucket(value: &str) -> Result<Bucket, String> {
    Bucket::from_key(value).ok_or_else(|| {
        let keys: Vec<&str> = Bucket::ALL.iter().map(|bucket| bucket.key()).collect();
        format!("expected one of: {}", keys.join(", "))
    })
}

fn parse_now(value: &str) -> Result<DateTime<Utc>, String> {
    parse_timestamp(&RawTimestamp::Text(value.to_string())).map_err(|err| err.to_string())
}

fn report_diagnostics<T>(outcome: &Outcome<T>) {
    if let Some(warning) = outcome.warning() {
        eprintln!("Warning: {warning}");
        for diagnostic in &warning.diagnostics {
            eprintln!("  {diagnostic}");
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Roster {
            input,
            query,
            bucket,
            json,
        } => {
            let outcome = load_members(&input)
                .with_context(|| format!("failed to load members from {}", input.display()))?;
            report_diagnostics(&outcome);

            let index = SearchIndex::new(&outcome.value);
            let buckets = index.filter_all(query.as_deref().unwrap_or_default());

            if json {
                let rendered = match bucket {
                    Some(bucket) => serde_json::to_string_pretty(buckets.get(bucket))?,
                    None => serde_json::to_string_pretty(&buckets)?,
                };
                println!("{rendered}");
            } else {
                print!("{}", report::render_roster(&buckets, bucket));
            }
        }
        Commands::Publications { input, now, json } => {
            let now = now.unwrap_or_else(Utc::now);
            let outcome = load_publications(&input, now).with_context(|| {
                format!("failed to load publications from {}", input.display())
            })?;
            report_diagnostics(&outcome);

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome.value)?);
            } else {
                println!("Publication totals as of {}:", now.format("%Y-%m-%d"));
                print!("{}", report::render_summary_table(&outcome.value));
            }
        }
        Commands::Report {
            members,
            publications,
            now,
            out,
        } => {
            let now = now.unwrap_or_else(Utc::now);
            let member_outcome = load_members(&members)
                .with_context(|| format!("failed to load members from {}", members.display()))?;
            let publication_outcome = load_publications(&publications, now).with_context(|| {
                format!("failed to load publications from {}", publications.display())
            })?;

            let rendered = report::build_report(&member_outcome, &publication_outcome, now);
            std::fs::write(&out, rendered)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
