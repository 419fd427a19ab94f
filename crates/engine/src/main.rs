//! Tavernkeep - command line entry point.
//!
//! ```text
//! tavernkeep list
//! tavernkeep import <builder-export.json>
//! tavernkeep export <character-id> [output.json]
//! ```

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use tavernkeep_domain::CharacterId;
use tavernkeep_engine::infrastructure::clock::SystemClock;
use tavernkeep_engine::infrastructure::export::ArchiveExporter;
use tavernkeep_engine::infrastructure::importers::BuilderImporter;
use tavernkeep_engine::infrastructure::ports::ClockPort;
use tavernkeep_engine::infrastructure::storage::JsonFileStore;
use tavernkeep_engine::use_cases::{ExportCharacter, ImportCharacter, ListRoster};
use tavernkeep_engine::EngineConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "usage: tavernkeep <list | import <file> | export <character-id> [output]>";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv_from_repo_root();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tavernkeep_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = EngineConfig::from_env();
    tracing::debug!(data_dir = %config.data_dir.display(), "Configuration loaded");

    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock::new());
    let store = Arc::new(JsonFileStore::new(&config.data_dir, clock.clone()));

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    match args.as_slice() {
        ["list"] => {
            let roster = ListRoster::new(store.clone(), store).execute().await?;
            for character in &roster.characters {
                println!(
                    "{}\t{}\t{}",
                    character.id(),
                    character.name(),
                    character.class_summary()
                );
            }
            for monster in &roster.monsters {
                println!(
                    "{}\t{}\tCR {}",
                    monster.id(),
                    monster.name(),
                    monster.challenge_rating()
                );
            }
            for failure in &roster.failures {
                eprintln!("unreadable: {}: {}", failure.path.display(), failure.reason);
            }
        }
        ["import", file] => {
            let use_case = ImportCharacter::new(BuilderImporter::new(clock), store);
            let decoded = use_case
                .execute(Path::new(file))
                .await
                .with_context(|| format!("Failed to import {}", file))?;
            println!("{}\t{}", decoded.value.id(), decoded.value.name());
            for issue in &decoded.issues {
                println!("  note: {}", issue);
            }
        }
        ["export", id] | ["export", id, _] => {
            let id: CharacterId = id.parse().context("Invalid character id")?;
            let output = args.get(2).map(Path::new);
            let exporter = ArchiveExporter::new(&config.export_dir, clock);
            let path = ExportCharacter::new(store, exporter)
                .execute(id, output)
                .await?;
            println!("{}", path.display());
        }
        _ => bail!(USAGE),
    }
    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
