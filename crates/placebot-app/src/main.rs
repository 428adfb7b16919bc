//! Placebot binary: wires config, catalog, providers and store together
//! behind a line-oriented transport stand-in.
//!
//! The real chat transport is an external collaborator; here each stdin
//! line is one command ("/find central"), and replies print to stdout.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};

use placebot_catalog::PlaceCatalog;
use placebot_core::Config;
use placebot_engine::{CommandKind, Engine, EngineSettings, IncomingCommand};
use placebot_routing::{Coordinates, RoutingClient};
use placebot_store::{FeedbackClient, SqliteFeedbackStore};
use placebot_weather::{Geocoder, WeatherProvider};

/// Starter catalog written on first run when no catalog file exists yet.
const DEFAULT_CATALOG: &str = r#"[
  {"id": "1", "name": "Hermitage Museum", "latitude": 59.9398, "longitude": 30.3146,
   "address": "Palace Square, 2", "hours": "10:30-18:00, closed Mon",
   "website": "https://hermitagemuseum.org"},
  {"id": "2", "name": "Russian Museum", "latitude": 59.9386, "longitude": 30.3321,
   "address": "Inzhenernaya st., 4", "hours": "10:00-18:00, closed Tue"},
  {"id": "3", "name": "Kunstkamera", "latitude": 59.9417, "longitude": 30.3044,
   "address": "Universitetskaya emb., 3", "hours": "11:00-18:00, closed Mon"},
  {"id": "4", "name": "Saint Isaac's Cathedral", "latitude": 59.9339, "longitude": 30.3061,
   "address": "St Isaac's Square, 4", "hours": "10:30-18:00, closed Wed"},
  {"id": "5", "name": "Peter and Paul Fortress", "latitude": 59.9496, "longitude": 30.3167,
   "address": "Petropavlovskaya Fortress, 3"}
]"#;

#[tokio::main]
async fn main() -> Result<()> {
    placebot_core::init()?;

    let (config, _validation) = Config::load_validated()?;
    std::fs::create_dir_all(&config.data_dir).context("Failed to create data directory")?;

    let catalog_file = config.catalog_file();
    if !catalog_file.exists() {
        tracing::info!("Seeding default catalog at {}", catalog_file.display());
        std::fs::write(&catalog_file, DEFAULT_CATALOG).context("Failed to seed catalog")?;
    }

    let catalog = Arc::new(PlaceCatalog::load(&catalog_file)?);
    let store = FeedbackClient::new(SqliteFeedbackStore::new(config.db_file())?);

    let engine = Engine::new(
        catalog,
        WeatherProvider::new(&config.providers.weather_url)?,
        Geocoder::new(&config.providers.geocoding_url)?,
        RoutingClient::new(&config.providers.routing_url)?,
        store,
        EngineSettings {
            origin: Coordinates::new(config.origin.latitude, config.origin.longitude),
            origin_label: config.origin.label.clone(),
            call_timeout: std::time::Duration::from_secs(config.providers.call_timeout_secs),
        },
    );

    let caller_id = std::env::var("PLACEBOT_CALLER").unwrap_or_else(|_| "local".to_string());
    let is_admin = config.admin.is_admin(&caller_id);

    tracing::info!("Placebot ready, caller '{}' (admin: {})", caller_id, is_admin);
    println!("Placebot ready. Type /help for commands, /quit to exit.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "/quit" || line == "/exit" {
            break;
        }

        match parse_line(line) {
            Some((kind, args)) => {
                let cmd = IncomingCommand::new(kind, args, caller_id.clone(), is_admin);
                match engine.handle(&cmd).await {
                    Ok(reply) => println!("{}\n", reply.text),
                    Err(e) => {
                        tracing::debug!("Command failed: {}", e);
                        println!("{}\n", e.user_message());
                    }
                }
            }
            None => println!("Unknown command. Type /help for the list.\n"),
        }
    }

    tracing::info!("Placebot shutting down");
    Ok(())
}

/// Split one input line into a command and its argument text.
fn parse_line(line: &str) -> Option<(CommandKind, String)> {
    let (name, args) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim().to_string()),
        None => (line, String::new()),
    };
    CommandKind::parse(name).map(|kind| (kind, args))
}
