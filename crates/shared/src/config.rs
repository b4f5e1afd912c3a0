//! Application configuration management.
//!
//! Values come from `config/default.toml`, then `config/{RUN_MODE}.toml`,
//! then `LEAVEFLOW__*` environment variables (`__` separates sections).

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// JWT configuration.
    pub jwt: JwtSettings,
    /// Default leave allotments for newly registered staff.
    #[serde(default)]
    pub leave: LeavePolicyConfig,
    /// Accounts created at startup.
    #[serde(default)]
    pub seed: SeedConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// JWT configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Access token expiration in seconds.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
}

fn default_access_token_expiry() -> u64 {
    28_800 // one working day
}

/// Default allotment per leave type, in days.
#[derive(Debug, Clone, Deserialize)]
pub struct LeavePolicyConfig {
    /// Casual leave days per year.
    #[serde(default = "default_casual")]
    pub casual: Decimal,
    /// Compensatory-off days.
    #[serde(default)]
    pub comp_off: Decimal,
    /// Half-day casual leave days.
    #[serde(default)]
    pub half_day_casual: Decimal,
    /// Leave-without-pay days.
    #[serde(default)]
    pub leave_without_pay: Decimal,
    /// Gazetted-holiday adjustment days.
    #[serde(default)]
    pub gazetted_holiday: Decimal,
}

fn default_casual() -> Decimal {
    Decimal::from(12)
}

impl Default for LeavePolicyConfig {
    fn default() -> Self {
        Self {
            casual: default_casual(),
            comp_off: Decimal::ZERO,
            half_day_casual: Decimal::ZERO,
            leave_without_pay: Decimal::ZERO,
            gazetted_holiday: Decimal::ZERO,
        }
    }
}

/// Accounts to create when the server starts.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedConfig {
    /// Seed accounts; existing employee ids are skipped.
    #[serde(default)]
    pub accounts: Vec<SeedAccount>,
}

/// One seeded staff account.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedAccount {
    /// Employee code used to log in.
    pub employee_id: String,
    /// Display name.
    pub name: String,
    /// Job title.
    pub designation: String,
    /// Staff role (`employee`, `site_incharge`, `hr`, `sbu_head`, `admin`).
    pub role: String,
    /// Plaintext password, hashed before storage.
    pub password: String,
    /// Department name.
    #[serde(default)]
    pub department: String,
    /// Password recovery question.
    #[serde(default)]
    pub security_question: Option<String>,
    /// Answer to `security_question`, hashed before storage.
    #[serde(default)]
    pub security_answer: Option<String>,
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("LEAVEFLOW").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
