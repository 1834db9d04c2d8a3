//! CLI entry point for the subway ride dashboard.
//!
//! Fetches ride records and aggregate statistics from a ride-tracker
//! backend, consolidates same-complex stops, classifies boroughs and lines,
//! and renders chart summaries to the terminal (or JSON/CSV).

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::ffi::OsStr;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use subway_dash::charts::{self, ChartData};
use subway_dash::engine::consolidate::{ConsolidatedStop, borough_distribution, consolidate};
use subway_dash::filter::{DateFilter, today_new_york};
use subway_dash::infra::tracker::client::TrackerClient;
use subway_dash::output;
use subway_dash::reference::{BoroughTable, ComplexTable};
use subway_dash::services::tracker_api::{DashboardData, TrackerApi, fetch_dashboard_data};
use subway_dash::stats::{RideStats, bucket_rides, granularity_for};

const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Parser)]
#[command(name = "subway_dash")]
#[command(about = "Dashboard client for a subway ride-tracker backend", long_about = None)]
struct Cli {
    /// Backend base URL (falls back to SUBWAY_TRACKER_URL, then localhost)
    #[arg(long)]
    base_url: Option<String>,

    /// Transfer complex reference file
    #[arg(long, default_value = "data/transfer_stations.json")]
    complexes: PathBuf,

    /// Borough station-list reference file
    #[arg(long, default_value = "data/boroughs.json")]
    boroughs: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the full dashboard: summary numbers plus all charts
    Dashboard {
        /// Date filter: all, today, week, month, year, or YYYY-MM-DD..YYYY-MM-DD
        #[arg(short, long, default_value = "all")]
        filter: DateFilter,

        /// Maximum rows per stop chart
        #[arg(short, long, default_value_t = 10)]
        top: usize,

        /// Emit the dashboard as JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Show the consolidated visited-stop table
    Stops {
        #[arg(short, long, default_value = "all")]
        filter: DateFilter,

        #[arg(short, long, default_value_t = 10)]
        top: usize,
    },
    /// Show the ride distribution across boroughs
    Boroughs {
        #[arg(short, long, default_value = "all")]
        filter: DateFilter,
    },
    /// Export consolidated visited stops to CSV
    Export {
        #[arg(short, long, default_value = "all")]
        filter: DateFilter,

        /// CSV file to write
        #[arg(short, long, default_value = "stops.csv")]
        output: String,
    },
}

/// Full dashboard in one serializable report, for `--json`.
#[derive(Serialize)]
struct DashboardReport {
    generated_at: DateTime<Utc>,
    filter: String,
    stats: RideStats,
    charts: Vec<ChartData>,
    stops: Vec<ConsolidatedStop>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/subway_dash.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("subway_dash.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let base_url = cli
        .base_url
        .or_else(|| std::env::var("SUBWAY_TRACKER_URL").ok())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let api = TrackerClient::new(&base_url);

    // Reference data loads once per session; failures degrade to empty
    // tables and the engine leaves every stop ungrouped.
    let complexes = ComplexTable::load(&cli.complexes);
    let boroughs = BoroughTable::load(&cli.boroughs);

    match cli.command {
        Commands::Dashboard { filter, top, json } => {
            run_dashboard(&api, &complexes, &boroughs, filter, top, json).await?;
        }
        Commands::Stops { filter, top } => {
            run_stops(&api, &complexes, filter, top).await?;
        }
        Commands::Boroughs { filter } => {
            run_boroughs(&api, &complexes, &boroughs, filter).await?;
        }
        Commands::Export { filter, output } => {
            run_export(&api, &complexes, filter, &output).await?;
        }
    }

    Ok(())
}

/// Fetches all inputs and narrows the ride list to the filter window. The
/// aggregate endpoints are already narrowed server-side via query params.
#[tracing::instrument(skip(api), fields(filter = %filter))]
async fn load_data<A: TrackerApi + Sync>(api: &A, filter: DateFilter) -> Result<DashboardData> {
    let today = today_new_york();
    let mut data = fetch_dashboard_data(api, &filter).await?;
    data.rides.retain(|ride| filter.contains(ride.date, today));
    info!(
        rides = data.rides.len(),
        visited_stops = data.visited_stops.len(),
        transfer_stops = data.transfer_stops.len(),
        "Dashboard inputs ready"
    );
    Ok(data)
}

async fn run_dashboard<A: TrackerApi + Sync>(
    api: &A,
    complexes: &ComplexTable,
    boroughs: &BoroughTable,
    filter: DateFilter,
    top: usize,
    json: bool,
) -> Result<()> {
    let data = load_data(api, filter).await?;

    let visited = consolidate(&data.visited_stops, &data.rides, complexes);
    let transfers = consolidate(&data.transfer_stops, &data.rides, complexes);
    let stats = RideStats::from_rides(&data.rides);

    let bucket = granularity_for(&filter, today_new_york());
    let chart_list = vec![
        charts::ride_volume(bucket_rides(&data.rides, bucket)),
        charts::top_stops(&visited, top),
        charts::transfer_activity(&transfers, top),
        charts::line_usage(&data.popular_lines),
        charts::borough_distribution(borough_distribution(&visited, boroughs), boroughs),
    ];

    let mut stdout = std::io::stdout().lock();
    if json {
        let report = DashboardReport {
            generated_at: Utc::now(),
            filter: filter.to_string(),
            stats,
            charts: chart_list,
            stops: visited,
        };
        output::write_json(&mut stdout, &report)?;
    } else {
        output::render_summary(&mut stdout, &stats)?;
        for chart in &chart_list {
            output::render_chart(&mut stdout, chart)?;
        }
    }

    Ok(())
}

async fn run_stops<A: TrackerApi + Sync>(
    api: &A,
    complexes: &ComplexTable,
    filter: DateFilter,
    top: usize,
) -> Result<()> {
    let data = load_data(api, filter).await?;
    let visited = consolidate(&data.visited_stops, &data.rides, complexes);

    let mut stdout = std::io::stdout().lock();
    for stop in visited.iter().take(top) {
        let marker = if stop.is_transfer_complex { "*" } else { " " };
        writeln!(
            stdout,
            "{marker} {:<32} {:>5}  [{}] {}",
            stop.display_name,
            stop.count,
            stop.primary_line,
            stop.lines.join(","),
        )?;
    }
    Ok(())
}

async fn run_boroughs<A: TrackerApi + Sync>(
    api: &A,
    complexes: &ComplexTable,
    boroughs: &BoroughTable,
    filter: DateFilter,
) -> Result<()> {
    let data = load_data(api, filter).await?;
    let visited = consolidate(&data.visited_stops, &data.rides, complexes);
    let chart = charts::borough_distribution(borough_distribution(&visited, boroughs), boroughs);

    let mut stdout = std::io::stdout().lock();
    output::render_chart(&mut stdout, &chart)?;
    Ok(())
}

async fn run_export<A: TrackerApi + Sync>(
    api: &A,
    complexes: &ComplexTable,
    filter: DateFilter,
    output_path: &str,
) -> Result<()> {
    let data = load_data(api, filter).await?;
    let visited = consolidate(&data.visited_stops, &data.rides, complexes);

    output::export_stops_csv(output_path, &visited)?;
    info!(path = output_path, rows = visited.len(), "CSV export written");
    Ok(())
}
