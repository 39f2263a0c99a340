#![deny(missing_docs)]
//! Hangar command-line interface.
//!
//! Lists, inspects, registers, updates, and removes ships through the Hangar server.

mod client;
mod render;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use clap::{Args, Parser, Subcommand, ValueEnum};
use client::ShipClient;
use hangar_core::{ShipPayload, ShipType};
use render::{render_json, render_ship_table};

pub(crate) type CliResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Parser)]
#[command(name = "hangar", version, about = "Hangar ship registry CLI")]
struct Cli {
    /// Base URL of the Hangar server.
    #[arg(
        long,
        env = "HANGAR_API_URL",
        default_value = "http://127.0.0.1:8080",
        global = true
    )]
    server_url: String,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,
    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Copy, Clone, Debug, Eq, PartialEq)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Args, Clone, Debug, Default)]
struct FilterArgs {
    /// Substring the ship name must contain.
    #[arg(long)]
    name: Option<String>,
    /// Substring the planet must contain.
    #[arg(long)]
    planet: Option<String>,
    /// Exact ship type (TRANSPORT, MILITARY, MERCHANT).
    #[arg(long = "type")]
    ship_type: Option<ShipType>,
    /// Usage flag.
    #[arg(long)]
    used: Option<bool>,
    /// Earliest production date (YYYY-MM-DD or epoch millis).
    #[arg(long, value_parser = parse_date_arg)]
    after: Option<NaiveDateTime>,
    /// Latest production date (YYYY-MM-DD or epoch millis).
    #[arg(long, value_parser = parse_date_arg)]
    before: Option<NaiveDateTime>,
    /// Minimum speed.
    #[arg(long)]
    min_speed: Option<f64>,
    /// Maximum speed.
    #[arg(long)]
    max_speed: Option<f64>,
    /// Minimum crew size.
    #[arg(long)]
    min_crew: Option<i32>,
    /// Maximum crew size.
    #[arg(long)]
    max_crew: Option<i32>,
    /// Minimum rating.
    #[arg(long, allow_hyphen_values = true)]
    min_rating: Option<f64>,
    /// Maximum rating.
    #[arg(long, allow_hyphen_values = true)]
    max_rating: Option<f64>,
}

impl FilterArgs {
    /// Translate the flags into server query parameters.
    fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        let mut push = |key: &str, value: Option<String>| {
            if let Some(value) = value {
                params.push((key.to_string(), value));
            }
        };
        push("name", self.name.clone());
        push("planet", self.planet.clone());
        push("shipType", self.ship_type.map(|value| value.to_string()));
        push("isUsed", self.used.map(|value| value.to_string()));
        push("after", self.after.map(epoch_millis));
        push("before", self.before.map(epoch_millis));
        push("minSpeed", self.min_speed.map(|value| value.to_string()));
        push("maxSpeed", self.max_speed.map(|value| value.to_string()));
        push("minCrewSize", self.min_crew.map(|value| value.to_string()));
        push("maxCrewSize", self.max_crew.map(|value| value.to_string()));
        push("minRating", self.min_rating.map(|value| value.to_string()));
        push("maxRating", self.max_rating.map(|value| value.to_string()));
        params
    }
}

#[derive(Args, Clone, Debug, Default)]
struct PageArgs {
    /// Zero-based page index.
    #[arg(long)]
    page: Option<i64>,
    /// Ships per page.
    #[arg(long)]
    page_size: Option<i64>,
    /// Sort field (id, name, planet, shipType, prodDate, isUsed, speed, crewSize, rating).
    #[arg(long)]
    order: Option<String>,
}

impl PageArgs {
    fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(page) = self.page {
            params.push(("pageNumber".to_string(), page.to_string()));
        }
        if let Some(size) = self.page_size {
            params.push(("pageSize".to_string(), size.to_string()));
        }
        if let Some(order) = &self.order {
            params.push(("order".to_string(), order.clone()));
        }
        params
    }
}

#[derive(Args, Clone, Debug, Default)]
struct ShipArgs {
    /// Ship name.
    #[arg(long)]
    name: Option<String>,
    /// Home planet.
    #[arg(long)]
    planet: Option<String>,
    /// Ship type (TRANSPORT, MILITARY, MERCHANT).
    #[arg(long = "type")]
    ship_type: Option<ShipType>,
    /// Production date (YYYY-MM-DD or epoch millis).
    #[arg(long, value_parser = parse_date_arg)]
    prod_date: Option<NaiveDateTime>,
    /// Whether the ship is second-hand.
    #[arg(long)]
    used: Option<bool>,
    /// Speed between 0.10 and 0.99.
    #[arg(long)]
    speed: Option<f64>,
    /// Crew size between 1 and 9999.
    #[arg(long)]
    crew_size: Option<i32>,
}

impl From<ShipArgs> for ShipPayload {
    fn from(args: ShipArgs) -> Self {
        ShipPayload {
            name: args.name,
            planet: args.planet,
            ship_type: args.ship_type,
            prod_date: args.prod_date,
            is_used: args.used,
            speed: args.speed,
            crew_size: args.crew_size,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List a page of ships matching the filters.
    List {
        #[command(flatten)]
        filters: FilterArgs,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Count ships matching the filters.
    Count {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Show a single ship.
    Get {
        /// Ship identifier.
        id: i64,
    },
    /// Register a new ship.
    Create {
        #[command(flatten)]
        ship: ShipArgs,
    },
    /// Change selected fields of a ship.
    Update {
        /// Ship identifier.
        id: i64,
        #[command(flatten)]
        ship: ShipArgs,
    },
    /// Remove a ship.
    Delete {
        /// Ship identifier.
        id: i64,
    },
}

#[cfg(not(test))]
#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();
    let output = run(cli).await?;
    print!("{output}");
    Ok(())
}

#[cfg(test)]
fn main() {}

/// Execute a parsed command and return the rendered output.
async fn run(cli: Cli) -> CliResult<String> {
    let client = ShipClient::new(&cli.server_url)?;
    let format = cli.format;
    match cli.command {
        Commands::List { filters, page } => {
            let mut params = filters.to_params();
            params.extend(page.to_params());
            let ships = client.list(&params).await?;
            match format {
                OutputFormat::Text => Ok(render_ship_table(&ships)),
                OutputFormat::Json => Ok(with_newline(render_json(&ships)?)),
            }
        }
        Commands::Count { filters } => {
            let count = client.count(&filters.to_params()).await?;
            match format {
                OutputFormat::Text => Ok(format!("{count}\n")),
                OutputFormat::Json => Ok(with_newline(render_json(&count)?)),
            }
        }
        Commands::Get { id } => {
            let ship = client.get(id).await?;
            match format {
                OutputFormat::Text => Ok(render_ship_table(std::slice::from_ref(&ship))),
                OutputFormat::Json => Ok(with_newline(render_json(&ship)?)),
            }
        }
        Commands::Create { ship } => {
            let created = client.create(&ShipPayload::from(ship)).await?;
            match format {
                OutputFormat::Text => Ok(render_ship_table(std::slice::from_ref(&created))),
                OutputFormat::Json => Ok(with_newline(render_json(&created)?)),
            }
        }
        Commands::Update { id, ship } => {
            let updated = client.update(id, &ShipPayload::from(ship)).await?;
            match format {
                OutputFormat::Text => Ok(render_ship_table(std::slice::from_ref(&updated))),
                OutputFormat::Json => Ok(with_newline(render_json(&updated)?)),
            }
        }
        Commands::Delete { id } => {
            client.delete(id).await?;
            match format {
                OutputFormat::Text => Ok(format!("Deleted ship {id}.\n")),
                OutputFormat::Json => Ok(with_newline(render_json(
                    &serde_json::json!({ "deleted": id }),
                )?)),
            }
        }
    }
}

fn with_newline(mut output: String) -> String {
    output.push('\n');
    output
}

/// Parse a date given as `YYYY-MM-DD` or epoch milliseconds.
fn parse_date_arg(value: &str) -> Result<NaiveDateTime, String> {
    let trimmed = value.trim();
    if let Ok(millis) = trimmed.parse::<i64>() {
        return DateTime::from_timestamp_millis(millis)
            .map(|moment| moment.naive_utc())
            .ok_or_else(|| format!("timestamp out of range: {millis}"));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| format!("expected YYYY-MM-DD or epoch millis, got {value:?}"))
}

fn epoch_millis(moment: NaiveDateTime) -> String {
    moment.and_utc().timestamp_millis().to_string()
}
