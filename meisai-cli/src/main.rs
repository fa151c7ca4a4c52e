use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use meisai_client::VpassSession;
use meisai_core::{Credentials, Period};

mod workflow;

#[derive(Parser, Debug)]
#[command(
    name = "meisai",
    version,
    about = "Export Vpass credit card statements to CSV"
)]
struct Cli {
    /// Vpass member username
    #[arg(long)]
    username: String,

    /// Vpass member password
    #[arg(long)]
    password: String,

    /// Statement year (defaults to the current year)
    #[arg(long)]
    year: Option<i32>,

    /// Statement month, 1-12 (defaults to the current month)
    #[arg(long)]
    month: Option<i32>,

    /// Directory the CSV exports are written to
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Rejects empty values before any network traffic.
    let creds = Credentials::new(cli.username, cli.password)?;
    let period = Period::resolve(cli.year, cli.month, Local::now().date_naive());

    let mut session = VpassSession::new().context("building HTTP client")?;
    let summary = workflow::export_statements(&mut session, &creds, period, &cli.out_dir).await?;

    println!(
        "{}: exported {} statement(s), skipped {} card(s)",
        period.label(),
        summary.exported.len(),
        summary.skipped.len()
    );
    for path in &summary.exported {
        println!("  {}", path.display());
    }
    for (card, reason) in &summary.skipped {
        println!("  skipped {card}: {reason}");
    }

    Ok(())
}
