use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use clap::{Args, Parser, Subcommand};
use duty_roster::config::AppConfig;
use duty_roster::error::AppError;
use duty_roster::roster::{roster_router, seed, AllocationEngine, MemoryStore};
use duty_roster::telemetry;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use serde_json::json;
use std::fs::File;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
    store: Arc<MemoryStore>,
}

#[derive(Parser, Debug)]
#[command(
    name = "Duty Roster",
    about = "Run the volunteer-slot allocation service from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Validate a time-slot seeding CSV without starting the service
    Seed(SeedArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
    /// Preload time slots from a seeding CSV at startup
    /// (falls back to ROSTER_SEED_CSV)
    #[arg(long)]
    seed_csv: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct SeedArgs {
    /// Seeding CSV with headers date,start_time,end_time,total_slots
    csv: PathBuf,
}

#[derive(Debug, Deserialize)]
struct SeedRequest {
    csv: String,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Seed(args) => run_seed_check(args),
    }
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let store = Arc::new(MemoryStore::new());
    let seed_csv = args.seed_csv.take().or_else(|| config.seed_csv.clone());
    if let Some(path) = seed_csv {
        let file = File::open(&path)?;
        let slots = seed::parse_slots(file)?;
        let seeded = seed::seed_store(store.as_ref(), slots)?;
        info!(seeded, path = %path.display(), "preloaded time slots");
    }

    let engine = Arc::new(AllocationEngine::new(store.clone()));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
        store,
    };

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/roster/seed", post(seed_endpoint))
        .with_state(state)
        .merge(roster_router(engine))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "duty roster service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn run_seed_check(args: SeedArgs) -> Result<(), AppError> {
    let file = File::open(&args.csv)?;
    let slots = seed::parse_slots(file)?;

    println!("{} slot(s) parsed from {}", slots.len(), args.csv.display());
    for slot in &slots {
        println!(
            "  {} {}-{} ({} vaga{})",
            slot.date,
            slot.start_time.format("%H:%M"),
            slot.end_time.format("%H:%M"),
            slot.total_slots,
            if slot.total_slots == 1 { "" } else { "s" }
        );
    }

    Ok(())
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

async fn seed_endpoint(
    State(state): State<AppState>,
    Json(payload): Json<SeedRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let reader = Cursor::new(payload.csv.into_bytes());
    let slots = seed::parse_slots(reader)?;
    let seeded = seed::seed_store(state.store.as_ref(), slots)?;
    Ok(Json(json!({ "seeded": seeded })))
}
