use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use listing_alerts::config::AppConfig;
use listing_alerts::error::AppError;
use listing_alerts::marketplace::alerts::{
    search_router, AlertPipeline, AlertRunReport, CriteriaForm, LogMailer, MailError, MailMessage,
    MailSender, SavedSearch, SavedSearchId, SavedSearchRepository, SavedSearchService,
};
use listing_alerts::marketplace::directory::{AlertRecipient, UserId};
use listing_alerts::marketplace::listings::{
    listing_router, Amenity, AmenitySet, Listing, ListingId, ListingIntake, ListingService,
};
use listing_alerts::marketplace::memory::{
    MemoryListingStore, MemorySearchStore, MemoryUserDirectory,
};
use listing_alerts::telemetry;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use serde_json::json;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "Listing Alerts",
    about = "Run the rental marketplace saved-search alert service from the command line",
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
    /// Inspect the saved-search alert pipeline
    Alerts {
        #[command(subcommand)]
        command: AlertsCommand,
    },
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum AlertsCommand {
    /// Evaluate a hypothetical listing against saved searches and show who
    /// would be alerted
    Preview(PreviewArgs),
}

#[derive(Args, Debug)]
struct PreviewArgs {
    /// Listing location / area
    #[arg(long)]
    location: String,
    /// Monthly rent
    #[arg(long)]
    rent: u32,
    /// Bedroom count
    #[arg(long, default_value_t = 0)]
    bedrooms: u8,
    /// Comma-separated amenities (solar, borehole, security, parking, internet)
    #[arg(long, value_parser = parse_amenities, default_value = "")]
    amenities: AmenitySet,
    /// JSON file of saved-search samples to evaluate instead of the built-in
    /// set
    #[arg(long)]
    searches: Option<PathBuf>,
}

/// Saved-search sample accepted by `alerts preview`.
#[derive(Debug, Deserialize)]
struct SearchSample {
    #[serde(default)]
    name: String,
    owner_email: String,
    #[serde(default = "enabled")]
    premium: bool,
    #[serde(default = "enabled")]
    active: bool,
    #[serde(default)]
    criteria: CriteriaForm,
}

fn enabled() -> bool {
    true
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
        Command::Alerts {
            command: AlertsCommand::Preview(args),
        } => run_alert_preview(args),
    }
}

fn parse_amenities(raw: &str) -> Result<AmenitySet, String> {
    let mut set = AmenitySet::default();
    for token in raw.split(',').map(str::trim).filter(|token| !token.is_empty()) {
        let amenity = Amenity::ALL
            .into_iter()
            .find(|amenity| amenity.label().eq_ignore_ascii_case(token))
            .ok_or_else(|| format!("unknown amenity '{token}'"))?;
        set.set(amenity, true);
    }
    Ok(set)
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

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let listings = Arc::new(MemoryListingStore::default());
    let searches = Arc::new(MemorySearchStore::default());
    let directory = Arc::new(MemoryUserDirectory::default());
    let mail = Arc::new(LogMailer::new(config.mail.from.clone()));

    let pipeline = Arc::new(AlertPipeline::new(
        searches.clone(),
        directory.clone(),
        mail,
    ));
    let intake = Arc::new(ListingIntake {
        service: ListingService::new(listings),
        pipeline,
    });
    let search_service = Arc::new(SavedSearchService::new(searches, directory));

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .merge(listing_router(intake))
        .merge(search_router(search_service))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "saved-search alert service ready");

    axum::serve(listener, app).await?;
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

fn run_alert_preview(args: PreviewArgs) -> Result<(), AppError> {
    let samples = match &args.searches {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            serde_json::from_str::<Vec<SearchSample>>(&raw)?
        }
        None => builtin_samples(),
    };

    let (listing, report, messages) = preview_pass(&args, samples)?;
    render_preview(&listing, &report, &messages);

    Ok(())
}

/// Mailer used by the preview so would-be alerts can be printed instead of
/// delivered.
#[derive(Default, Clone)]
struct PreviewMailer {
    sent: Arc<Mutex<Vec<MailMessage>>>,
}

impl PreviewMailer {
    fn sent(&self) -> Vec<MailMessage> {
        self.sent.lock().expect("mailer mutex poisoned").clone()
    }
}

impl MailSender for PreviewMailer {
    fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        self.sent
            .lock()
            .expect("mailer mutex poisoned")
            .push(message.clone());
        Ok(())
    }
}

fn preview_pass(
    args: &PreviewArgs,
    samples: Vec<SearchSample>,
) -> Result<(Listing, AlertRunReport, Vec<MailMessage>), AppError> {
    let searches = Arc::new(MemorySearchStore::default());
    let directory = Arc::new(MemoryUserDirectory::default());

    for (index, sample) in samples.into_iter().enumerate() {
        let owner = UserId(format!("user-{index:03}"));
        directory.upsert(
            owner.clone(),
            AlertRecipient {
                email: sample.owner_email,
                premium: sample.premium,
            },
        );
        searches
            .insert(SavedSearch {
                id: SavedSearchId(format!("preview-{index:03}")),
                owner,
                name: if sample.name.is_empty() {
                    "Saved Search".to_string()
                } else {
                    sample.name
                },
                criteria: sample.criteria.normalize(),
                is_active: sample.active,
                last_notified_at: None,
                created_at: Utc::now(),
            })
            .expect("sample ids are unique");
    }

    let listing = Listing {
        id: ListingId("listing-preview".to_string()),
        landlord: UserId("landlord-preview".to_string()),
        name: "Preview listing".to_string(),
        location: args.location.clone(),
        monthly_rent: args.rent,
        bedrooms: args.bedrooms,
        amenities: args.amenities,
        created_at: Utc::now(),
    };

    let mailer = Arc::new(PreviewMailer::default());
    let pipeline = AlertPipeline::new(searches, directory, mailer.clone());
    let report = pipeline.run(&listing)?;

    Ok((listing, report, mailer.sent()))
}

fn render_preview(listing: &Listing, report: &AlertRunReport, messages: &[MailMessage]) {
    println!("Saved-search alert preview");
    println!(
        "Listing: {} | {} per month | {} bedroom(s)",
        listing.location, listing.monthly_rent, listing.bedrooms
    );

    let amenities: Vec<&str> = listing.amenities.enabled().map(Amenity::label).collect();
    if amenities.is_empty() {
        println!("Amenities: none");
    } else {
        println!("Amenities: {}", amenities.join(", "));
    }

    println!(
        "\nCandidates: {} | matched: {} | sent: {} | failed: {}",
        report.candidates,
        report.matched,
        report.sent,
        report.failed.len()
    );

    if messages.is_empty() {
        println!("\nNo alerts would be sent.");
    } else {
        println!("\nAlerts");
        for message in messages {
            println!("- {}: {}", message.to, message.text);
        }
    }
}

fn builtin_samples() -> Vec<SearchSample> {
    vec![
        SearchSample {
            name: "Gaborone mid-range".to_string(),
            owner_email: "premium-tenant@example.test".to_string(),
            premium: true,
            active: true,
            criteria: CriteriaForm {
                location: "Gaborone".to_string(),
                min_rent: 3000,
                max_rent: 4000,
                amenities: AmenitySet {
                    parking: true,
                    ..AmenitySet::default()
                },
                ..CriteriaForm::default()
            },
        },
        SearchSample {
            name: "Lapsed subscription".to_string(),
            owner_email: "basic-tenant@example.test".to_string(),
            premium: false,
            active: true,
            criteria: CriteriaForm::default(),
        },
        SearchSample {
            name: "Luxury only".to_string(),
            owner_email: "luxury-tenant@example.test".to_string(),
            premium: true,
            active: true,
            criteria: CriteriaForm {
                min_rent: 15_000,
                ..CriteriaForm::default()
            },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_amenities_accepts_labels_case_insensitively() {
        let set = parse_amenities("Parking, SECURITY").expect("labels parse");
        assert!(set.parking);
        assert!(set.security);
        assert!(!set.solar);
    }

    #[test]
    fn parse_amenities_rejects_unknown_labels() {
        assert!(parse_amenities("pool").is_err());
    }

    #[test]
    fn preview_pass_reports_builtin_matches() {
        let args = PreviewArgs {
            location: "Gaborone".to_string(),
            rent: 3500,
            bedrooms: 2,
            amenities: parse_amenities("parking").expect("labels parse"),
            searches: None,
        };

        let (_, report, messages) =
            preview_pass(&args, builtin_samples()).expect("preview completes");

        // The lapsed subscription never becomes a candidate; the luxury
        // search is a candidate but does not match.
        assert_eq!(report.candidates, 2);
        assert_eq!(report.matched, 1);
        assert_eq!(report.sent, 1);
        assert!(report.failed.is_empty());

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].to, "premium-tenant@example.test");
        assert!(messages[0].text.contains("Gaborone"));
    }

    #[test]
    fn preview_pass_respects_inactive_samples() {
        let args = PreviewArgs {
            location: "Gaborone".to_string(),
            rent: 3500,
            bedrooms: 2,
            amenities: AmenitySet::default(),
            searches: None,
        };

        let samples = vec![SearchSample {
            name: "Paused".to_string(),
            owner_email: "premium-tenant@example.test".to_string(),
            premium: true,
            active: false,
            criteria: CriteriaForm::default(),
        }];

        let (_, report, messages) = preview_pass(&args, samples).expect("preview completes");
        assert_eq!(report.candidates, 0);
        assert!(messages.is_empty());
    }
}
