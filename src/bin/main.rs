//! Sluice CLI - Turn analytics questions into read-only SQL
//!
//! Usage:
//!   sluice translate <TEXT> [--min-date <D> --max-date <D>] [--table <T>] [--explain]
//!   sluice check <SQL>
//!   sluice ask <TEXT> [--provider rules|conversation]
//!
//! Examples:
//!   sluice translate "top 5 products by profit in 2022" --min-date 2021-01-03 --max-date 2024-12-30
//!   sluice check "SELECT * FROM main.retail_gold.vw_sales_daily LIMIT 100"
//!   sluice ask "sales by month" --provider conversation

use std::process::ExitCode;
use std::sync::Arc;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use sluice::assistant::{is_manual_sql, Answer, AskResult, Assistant};
use sluice::bounds::{BoundsCache, BoundsSource, DateBounds, NoBounds, StaticBounds};
use sluice::config::{ProviderKind, Settings, TableIdent};
use sluice::guard;
use sluice::provider::{build_provider, SqlProvider};
use sluice::translation::translate_explained;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "sluice")]
#[command(about = "Sluice - Rule-based natural-language to SQL with a read-only safety gate")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate a question to SQL with the rule-based translator
    Translate {
        /// The question, e.g. "sales by month"
        text: String,

        #[command(flatten)]
        target: TargetArgs,

        /// Print the extracted intent and chosen shape to stderr
        #[arg(long)]
        explain: bool,
    },

    /// Check whether a SQL statement passes the safety gate
    Check {
        /// The SQL statement
        sql: String,
    },

    /// Run the full pipeline: manual SQL or provider, then the safety gate
    Ask {
        /// A question or a SELECT/WITH statement
        text: String,

        #[command(flatten)]
        target: TargetArgs,

        /// Provider to use (overrides the settings file)
        #[arg(short, long)]
        provider: Option<ProviderKind>,
    },
}

#[derive(Args)]
struct TargetArgs {
    /// Target table as catalog.schema.table
    #[arg(short, long)]
    table: Option<String>,

    /// First order date in the dataset (YYYY-MM-DD)
    #[arg(long)]
    min_date: Option<NaiveDate>,

    /// Last order date in the dataset (YYYY-MM-DD)
    #[arg(long)]
    max_date: Option<NaiveDate>,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr; stdout carries only SQL.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sluice=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let settings = match Settings::load() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading settings: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Translate {
            text,
            target,
            explain,
        } => cmd_translate(&settings, &text, &target, explain),
        Commands::Check { sql } => cmd_check(&sql),
        Commands::Ask {
            text,
            target,
            provider,
        } => cmd_ask(settings, &text, &target, provider).await,
    }
}

fn resolve_table(settings: &Settings, args: &TargetArgs) -> Result<TableIdent, String> {
    match &args.table {
        Some(t) => TableIdent::parse(t),
        None => settings.table.resolve(),
    }
    .map_err(|e| e.to_string())
}

/// Dataset bounds from flags, falling back to settings; `None` when neither has any.
fn resolve_bounds(settings: &Settings, args: &TargetArgs) -> Result<Option<DateBounds>, String> {
    match (args.min_date, args.max_date) {
        (Some(min), Some(max)) => DateBounds::new(min, max)
            .map(Some)
            .map_err(|e| e.to_string()),
        (None, None) => settings.date_bounds().map_err(|e| e.to_string()),
        _ => Err("--min-date and --max-date must be given together".to_string()),
    }
}

const MISSING_BOUNDS: &str =
    "No date bounds: pass --min-date and --max-date or set [bounds] in sluice.toml";

fn cmd_translate(settings: &Settings, text: &str, target: &TargetArgs, explain: bool) -> ExitCode {
    if text.trim().is_empty() {
        eprintln!("Error: empty question");
        return ExitCode::FAILURE;
    }

    let resolved = resolve_table(settings, target).and_then(|table| {
        let bounds = resolve_bounds(settings, target)?.ok_or(MISSING_BOUNDS)?;
        Ok((table, bounds))
    });
    let (table, bounds) = match resolved {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match translate_explained(text, &table, &bounds) {
        Ok(translation) => {
            if explain {
                match serde_json::to_string_pretty(&translation) {
                    Ok(json) => eprintln!("{}", json),
                    Err(e) => eprintln!("Could not render explanation: {}", e),
                }
            }
            println!("{}", translation.sql);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_check(sql: &str) -> ExitCode {
    match guard::inspect(sql) {
        Ok(()) => {
            println!("OK");
            ExitCode::SUCCESS
        }
        Err(rejection) => {
            tracing::warn!(reason = %rejection, "rejected unsafe statement");
            eprintln!("Only read-only single-statement SELECTs are allowed.");
            ExitCode::FAILURE
        }
    }
}

async fn cmd_ask(
    mut settings: Settings,
    text: &str,
    target: &TargetArgs,
    provider: Option<ProviderKind>,
) -> ExitCode {
    if text.trim().is_empty() {
        eprintln!("Error: empty question");
        return ExitCode::FAILURE;
    }

    if let Some(kind) = provider {
        settings.provider.kind = kind;
    }

    let resolved = resolve_table(&settings, target)
        .and_then(|table| Ok((table, resolve_bounds(&settings, target)?)));
    let (table, bounds) = match resolved {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Manual SQL never reads the bounds.
    if bounds.is_none() && !is_manual_sql(text) {
        eprintln!("Error: {}", MISSING_BOUNDS);
        return ExitCode::FAILURE;
    }

    let provider = match build_provider(&settings.provider) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let outcome = match bounds {
        Some(bounds) => ask(provider, table, StaticBounds(bounds), text).await,
        None => ask(provider, table, NoBounds, text).await,
    };

    match outcome {
        Ok(answer) => {
            eprintln!("Provider: {}", answer.origin);
            println!("{}", answer.sql);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn ask<S: BoundsSource>(
    provider: Arc<dyn SqlProvider>,
    table: TableIdent,
    source: S,
    text: &str,
) -> AskResult<Answer> {
    let cache = Arc::new(BoundsCache::new(Arc::new(source), table.clone()));
    Assistant::new(provider, table, cache).ask(text).await
}
