use clap::{Parser, Subcommand};
use natega_engine::{config::DEFAULT_DB_PATH, RecordSource, SearchEngine};

#[derive(Parser)]
#[command(name = "natega-cli")]
#[command(about = "Natega student search CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Database path
    #[arg(short, long, default_value = DEFAULT_DB_PATH)]
    db: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild the dataset from a CSV file or URL
    Import {
        /// Local path or http(s) URL
        source: String,
    },

    /// Search students by name
    Search {
        /// Search query (Arabic)
        query: String,
    },

    /// Get dataset statistics
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let engine = SearchEngine::open(&cli.db).await?;

    match cli.command {
        Commands::Import { source } => {
            let source = RecordSource::parse(&source);
            println!("Importing {}...", source.describe());

            let report = engine.ingest(&source).await?;

            println!("Imported {} records in {:.1}ms", report.accepted, report.elapsed_ms);
            if !report.skipped.is_empty() {
                println!("Skipped {} rows:", report.skipped.len());
                for row in &report.skipped {
                    let line = row.line.map_or_else(|| "?".to_string(), |l| l.to_string());
                    println!("   line {}: {}", line, row.reason);
                }
            }
        }

        Commands::Search { query } => {
            let hits = engine.search(Some(&query)).await?;

            if hits.is_empty() {
                println!("No matches for: {}", query);
            }
            for (i, hit) in hits.iter().enumerate() {
                println!("{:>2}. {}", i + 1, hit.display());
            }
        }

        Commands::Stats => {
            let stats = engine.stats().await?;

            println!("Dataset Statistics:");
            println!("   Total records: {}", stats.total_records);
            if let Some(loaded_at) = stats.loaded_at {
                println!("   Loaded at: {}", loaded_at.format("%Y-%m-%d %H:%M:%S"));
            }
        }
    }

    Ok(())
}
