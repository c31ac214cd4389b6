//! Rutas CLI: command-line client for the Rutas backend.
//!
//! Set RUTAS_API_URL and RUTAS_API_TOKEN (Bearer). Form limits are read from
//! the same environment variables as the form engine.

use anyhow::Context;
use clap::{Parser, Subcommand};
use rutas_api_client::ApiClient;
use rutas_cli::{check_record, init_tracing, truncate_string};
use rutas_core::directory::{calendar_entries, map_markers};
use rutas_core::models::{EntityKind, PersistedEntity};
use rutas_core::FormsConfig;
use serde::Serialize;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "rutas", about = "Rutas API CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List activities or events
    List {
        /// activity or event
        kind: EntityKind,
        /// Page number (1-based)
        #[arg(long, default_value = "1")]
        page: u32,
        /// One line per record instead of JSON
        #[arg(long)]
        plain: bool,
    },
    /// Get a single record by ID
    Get {
        kind: EntityKind,
        id: Uuid,
    },
    /// Map markers for one page of records
    Markers {
        kind: EntityKind,
        #[arg(long, default_value = "1")]
        page: u32,
    },
    /// Calendar entries for one page of events
    Calendar {
        #[arg(long, default_value = "1")]
        page: u32,
    },
    /// Query the place-search proxy
    Places {
        query: String,
    },
    /// Run the form's submit checks on a record JSON file (offline)
    CheckDraft {
        file: std::path::PathBuf,
    },
    /// Delete a record by ID
    Delete {
        kind: EntityKind,
        id: Uuid,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

fn client() -> anyhow::Result<ApiClient> {
    ApiClient::from_env().context("Failed to create API client. Set RUTAS_API_URL")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::List { kind, page, plain } => {
            let response = client()?.list_entities(kind, page).await?;
            if plain {
                for item in &response.items {
                    let date = item
                        .start_date
                        .map(|d| d.to_string())
                        .unwrap_or_else(|| "-".to_string());
                    println!("{}  {:<10}  {}", item.id, date, truncate_string(&item.title, 48));
                }
                println!(
                    "page {}/{} ({} total)",
                    response.pagination.page,
                    response.pagination.total_pages(),
                    response.pagination.total
                );
            } else {
                print_json(&response)?;
            }
        }
        Commands::Get { kind, id } => {
            let response = client()?.get_entity(kind, id).await?;
            print_json(&response)?;
        }
        Commands::Markers { kind, page } => {
            let response = client()?.list_entities(kind, page).await?;
            print_json(&map_markers(&response.items))?;
        }
        Commands::Calendar { page } => {
            let response = client()?.list_entities(EntityKind::Event, page).await?;
            print_json(&calendar_entries(&response.items))?;
        }
        Commands::Places { query } => {
            let response = client()?.search_places(&query).await?;
            print_json(&response)?;
        }
        Commands::CheckDraft { file } => {
            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let record: PersistedEntity =
                serde_json::from_str(&raw).context("File is not a valid record")?;
            let config = FormsConfig::from_env()?;
            print_json(&check_record(config, &record))?;
        }
        Commands::Delete { kind, id } => {
            client()?.delete_entity(kind, id).await?;
            print_json(
                &serde_json::json!({ "success": true, "message": format!("{} {} deleted", kind, id) }),
            )?;
        }
    }

    Ok(())
}
