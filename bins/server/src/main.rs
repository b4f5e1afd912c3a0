//! LeaveFlow API Server
//!
//! Main entry point for the leave management service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use leaveflow_api::{AppState, create_router};
use leaveflow_core::LeaveManager;
use leaveflow_core::directory::NewStaff;
use leaveflow_core::leave::LeaveError;
use leaveflow_core::ledger::policy_allotments;
use leaveflow_shared::config::SeedAccount;
use leaveflow_shared::{AppConfig, JwtConfig, JwtService};

/// Creates the configured seed accounts, skipping ones that already exist.
async fn seed_accounts(manager: &LeaveManager, accounts: &[SeedAccount]) -> anyhow::Result<()> {
    for account in accounts {
        let new_staff = NewStaff::from_seed(account)?;
        match manager.register_staff(new_staff).await {
            Ok(member) => info!(employee_id = %member.employee_id, role = %member.role, "Seeded account"),
            Err(LeaveError::Duplicate(id)) => info!(employee_id = %id, "Seed account already present"),
            Err(e) => return Err(e).with_context(|| format!("seeding {}", account.employee_id)),
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "leaveflow=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Create JWT service
    let jwt_config = JwtConfig {
        secret: config.jwt.secret.clone(),
        access_token_expires_secs: i64::try_from(config.jwt.access_token_expiry_secs)
            .context("jwt.access_token_expiry_secs is too large")?,
    };
    let jwt_service = JwtService::new(jwt_config);

    // Leave workflow over the in-memory store
    let manager = LeaveManager::in_memory(policy_allotments(&config.leave));
    if config.seed.accounts.is_empty() {
        warn!("No seed accounts configured; nobody can log in until staff are added");
    }
    seed_accounts(&manager, &config.seed.accounts).await?;

    // Create application state
    let state = AppState {
        manager: Arc::new(manager),
        jwt_service: Arc::new(jwt_service),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
