//! ResolveIT API Server
//!
//! Run with: cargo run --bin resolveit-api
//!
//! # Configuration
//!
//! Settings come from the first config file found (`$XDG_CONFIG/resolveit/config.toml`,
//! `/etc/resolveit/config.toml`, `./config.toml`), or from the path given as
//! the first argument, and are then overridden by environment variables:
//! - `RESOLVEIT_DATA_DIR`: Data directory (default: ./data)
//! - `RESOLVEIT_API_HOST` / `RESOLVEIT_API_PORT`: Bind address (default: 0.0.0.0:8080)
//! - `RESOLVEIT_TOKEN_SECRET`: Token signing secret (random per process if unset)
//! - `RESOLVEIT_ADMIN_EMAIL` / `RESOLVEIT_ADMIN_PASSWORD`: Bootstrap admin account
//! - `RESOLVEIT_ESCALATION_ENABLED`, `RESOLVEIT_SLA_HOURS`: SLA sweep
//! - `RESOLVEIT_LOG_LEVEL`, `RESOLVEIT_LOG_FORMAT`: Logging (`RUST_LOG` wins)

use anyhow::Context;
use resolveit::api::{serve, ApiConfig, AppState};
use resolveit::auth::AuthService;
use resolveit::config::{Config, LoggingConfig};
use resolveit::service::{ComplaintService, EscalationScheduler, ServiceConfig, StoreNotifier};
use resolveit::store::Database;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => Config::load_with_env(Path::new(&path))
            .with_context(|| format!("loading config from {}", path))?,
        None => Config::load_default(),
    };

    init_tracing(&config.logging)?;

    tracing::info!("Starting ResolveIT API server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Data directory: {}", config.storage.data_dir);

    // Initialize database
    let db_path = config.storage.database_path();
    let db = Arc::new(
        Database::open(&db_path)
            .with_context(|| format!("opening database at {}", db_path.display()))?,
    );
    let seeded = db.seed_default_categories()?;
    if seeded > 0 {
        tracing::info!(count = seeded, "Seeded default categories");
    }

    // Initialize auth
    let secret = if config.auth.token_secret.is_empty() {
        tracing::warn!(
            "No token secret configured; using a random one. Tokens will not survive a restart."
        );
        format!("{}{}", uuid::Uuid::new_v4().simple(), uuid::Uuid::new_v4().simple())
    } else {
        config.auth.token_secret.clone()
    };
    let auth = Arc::new(AuthService::new(
        Arc::clone(&db),
        secret,
        config.auth.token_ttl_hours,
    ));

    if let (Some(email), Some(password)) = (&config.auth.admin_email, &config.auth.admin_password)
    {
        if auth.bootstrap_admin(email, password)? {
            tracing::info!(email = %email, "Created bootstrap admin account");
        }
    } else if db.count_admins()? == 0 {
        tracing::warn!("No administrator exists; set RESOLVEIT_ADMIN_EMAIL and RESOLVEIT_ADMIN_PASSWORD");
    }

    // Initialize complaint service
    let service_config = ServiceConfig {
        sla_hours: config.escalation.sla_hours,
        senior_admin_email: config.escalation.senior_admin_email.clone(),
        upload_dir: config.storage.upload_dir(),
    };
    let notifier = Arc::new(StoreNotifier::new(Arc::clone(&db)));
    let complaints = Arc::new(ComplaintService::new(
        Arc::clone(&db),
        notifier,
        service_config,
    ));

    // Start background escalation
    let scheduler = if config.escalation.enabled {
        tracing::info!(
            sla_hours = config.escalation.sla_hours,
            interval_secs = config.escalation.check_interval_secs,
            "Starting SLA escalation scheduler"
        );
        Some(EscalationScheduler::start(
            Arc::clone(&complaints),
            Duration::from_secs(config.escalation.check_interval_secs.max(1)),
        ))
    } else {
        tracing::info!("SLA escalation disabled");
        None
    };

    let api_config = ApiConfig::from(&config.api);
    let state = AppState::new(Arc::clone(&db), auth, complaints, api_config.clone());

    // Run server
    serve(state, &api_config).await?;

    // Graceful shutdown
    if let Some(scheduler) = scheduler {
        scheduler.stop();
    }
    tracing::info!("Checkpointing database...");
    db.checkpoint()?;
    tracing::info!("ResolveIT API server stopped");

    Ok(())
}

/// `RUST_LOG` takes precedence over the configured level
fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "resolveit={level},tower_http={level}",
            level = logging.level
        ))
    });

    let file = match &logging.file {
        Some(path) => Some(Mutex::new(
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path))?,
        )),
        None => None,
    };

    let registry = tracing_subscriber::registry().with(filter);

    match (logging.format.as_str(), file) {
        ("json", Some(file)) => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(file))
            .init(),
        ("json", None) => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        (_, Some(file)) => registry
            .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(file))
            .init(),
        (_, None) => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    Ok(())
}
