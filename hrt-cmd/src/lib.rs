//! Command implementations for the HRT CLI.
//!
//! Provides subcommands for loading the current telemetry window of a
//! reservoir station, with a local snapshot fallback when the remote
//! endpoint is down.

use chrono::Utc;
use clap::Subcommand;

use hrt_core::cache::FileStore;
use hrt_core::config::StationConfig;
use hrt_core::series::x_labels;
use hrt_core::window::StationWindow;

pub mod load;

#[derive(Subcommand)]
pub enum Command {
    /// Load the latest 48-hour window and print renderable series
    Load {
        /// Relay endpoint that forwards the GET to the hydrology API
        #[arg(long)]
        proxy_url: String,

        /// Station code (defaults to the Tongwan reservoir deployment)
        #[arg(long, default_value = "613K0912")]
        station: String,

        /// Flood-limit water level in meters for the reference line
        #[arg(long, default_value_t = 152.5)]
        flood_limit: f64,

        /// Directory the snapshot cache lives in
        #[arg(long, default_value = ".hrt-cache")]
        cache_dir: String,

        /// Print the full outcome as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print the 48-hour request window for the current instant
    Window,
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Load {
            proxy_url,
            station,
            flood_limit,
            cache_dir,
            json,
        } => {
            let mut config = StationConfig::tongwan_defaults(proxy_url);
            config.station_code = station;
            config.flood_limit_level = flood_limit;

            let client = hrt_core::fetch::build_client()?;
            let mut store = FileStore::new(cache_dir);
            let outcome =
                load::load_station(&client, &config, &mut store, Utc::now()).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                print_outcome(&outcome);
            }
            Ok(())
        }
        Command::Window => {
            let window = StationWindow::lookback_from(Utc::now());
            println!("{} .. {}", window.date_begin, window.date_end);
            Ok(())
        }
    }
}

/// Plain-text rendering of a load outcome: provenance, window, then one row
/// per time label with "--" standing in for missing samples.
fn print_outcome(outcome: &load::LoadOutcome) {
    println!(
        "source: {}  window: {} .. {}",
        match outcome.source {
            load::DataSource::Remote => "remote",
            load::DataSource::Cache => "cached snapshot",
        },
        outcome.window.date_begin,
        outcome.window.date_end
    );

    let labels = x_labels(&outcome.dataset);
    let header: Vec<&str> = outcome.series.iter().map(|s| s.name.as_str()).collect();
    println!("{:<14} {}", "time", header.join("  "));

    for (row, label) in labels.iter().enumerate() {
        let cells: Vec<String> = outcome
            .series
            .iter()
            .map(|series| match series.points.get(row).copied().flatten() {
                Some(value) => format!("{value:.2}"),
                None => "--".to_string(),
            })
            .collect();
        println!("{:<14} {}", label, cells.join("  "));
    }
}
