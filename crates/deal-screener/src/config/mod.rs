use crate::analysis::{
    AnalysisConfig, Combination, DealError, FinancingTerms, FlipCostAllowance, MarketThresholds,
    OperatingExpenseAssumptions, RecommendationPolicy,
};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub analysis: AnalysisConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            analysis: load_analysis()?,
        })
    }
}

fn load_analysis() -> Result<AnalysisConfig, ConfigError> {
    let defaults = AnalysisConfig::default();

    let market = MarketThresholds {
        sellers_max_inventory_months: number_or(
            "MARKET_SELLERS_MAX_INVENTORY_MONTHS",
            defaults.market.sellers_max_inventory_months,
        )?,
        sellers_max_days_on_market: number_or(
            "MARKET_SELLERS_MAX_DAYS_ON_MARKET",
            defaults.market.sellers_max_days_on_market,
        )?,
        sellers_min_appreciation_percent: number_or(
            "MARKET_SELLERS_MIN_APPRECIATION_PERCENT",
            defaults.market.sellers_min_appreciation_percent,
        )?,
        buyers_min_inventory_months: number_or(
            "MARKET_BUYERS_MIN_INVENTORY_MONTHS",
            defaults.market.buyers_min_inventory_months,
        )?,
        buyers_min_days_on_market: number_or(
            "MARKET_BUYERS_MIN_DAYS_ON_MARKET",
            defaults.market.buyers_min_days_on_market,
        )?,
        buyers_max_appreciation_percent: number_or(
            "MARKET_BUYERS_MAX_APPRECIATION_PERCENT",
            defaults.market.buyers_max_appreciation_percent,
        )?,
        stable_band_percent: number_or(
            "MARKET_STABLE_BAND_PERCENT",
            defaults.market.stable_band_percent,
        )?,
    };

    let combination = match env::var("RECOMMENDATION_COMBINATION") {
        Ok(raw) => Combination::from_str(&raw).map_err(|_| ConfigError::InvalidChoice {
            key: "RECOMMENDATION_COMBINATION",
            value: raw,
        })?,
        Err(_) => defaults.recommendation.combination,
    };

    let recommendation = RecommendationPolicy {
        combination,
        min_flip_roi_percent: optional_number("RECOMMENDATION_MIN_FLIP_ROI_PERCENT")?,
        min_cash_on_cash_percent: optional_number("RECOMMENDATION_MIN_CASH_ON_CASH_PERCENT")?,
    };

    let flip_costs = FlipCostAllowance {
        closing_cost_percent: number_or(
            "FLIP_CLOSING_COST_PERCENT",
            defaults.flip_costs.closing_cost_percent,
        )?,
        carrying_cost_percent: number_or(
            "FLIP_CARRYING_COST_PERCENT",
            defaults.flip_costs.carrying_cost_percent,
        )?,
    };

    let expenses = OperatingExpenseAssumptions {
        insurance_percent_of_price: number_or(
            "EXPENSE_INSURANCE_PERCENT_OF_PRICE",
            defaults.expenses.insurance_percent_of_price,
        )?,
        maintenance_percent_of_rent: number_or(
            "EXPENSE_MAINTENANCE_PERCENT_OF_RENT",
            defaults.expenses.maintenance_percent_of_rent,
        )?,
        vacancy_percent_of_rent: number_or(
            "EXPENSE_VACANCY_PERCENT_OF_RENT",
            defaults.expenses.vacancy_percent_of_rent,
        )?,
        management_percent_of_rent: number_or(
            "EXPENSE_MANAGEMENT_PERCENT_OF_RENT",
            defaults.expenses.management_percent_of_rent,
        )?,
    };

    let loan_term_years = match env::var("DEFAULT_LOAN_TERM_YEARS") {
        Ok(raw) => raw
            .trim()
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidNumber {
                key: "DEFAULT_LOAN_TERM_YEARS",
                value: raw,
            })?,
        Err(_) => defaults.default_financing.loan_term_years,
    };

    let default_financing = FinancingTerms::new(
        number_or(
            "DEFAULT_DOWN_PAYMENT_PERCENT",
            defaults.default_financing.down_payment_percent,
        )?,
        number_or(
            "DEFAULT_INTEREST_RATE_PERCENT",
            defaults.default_financing.annual_interest_rate_percent,
        )?,
        loan_term_years,
    );

    let analysis = AnalysisConfig {
        market,
        recommendation,
        flip_costs,
        expenses,
        default_financing,
    };
    analysis.validate().map_err(ConfigError::InvalidAnalysis)?;
    Ok(analysis)
}

fn optional_number(key: &'static str) -> Result<Option<f64>, ConfigError> {
    match env::var(key) {
        Ok(raw) if raw.trim().is_empty() => Ok(None),
        Ok(raw) => match raw.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(Some(value)),
            _ => Err(ConfigError::InvalidNumber { key, value: raw }),
        },
        Err(_) => Ok(None),
    }
}

fn number_or(key: &'static str, default: f64) -> Result<f64, ConfigError> {
    Ok(optional_number(key)?.unwrap_or(default))
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { key: &'static str, value: String },
    InvalidChoice { key: &'static str, value: String },
    InvalidAnalysis(DealError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { key, value } => {
                write!(f, "{key} must be a finite number (got '{value}')")
            }
            ConfigError::InvalidChoice { key, value } => {
                write!(f, "{key} has an unsupported value '{value}'")
            }
            ConfigError::InvalidAnalysis(err) => write!(f, "analysis settings rejected: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidAnalysis(err) => Some(err),
            ConfigError::InvalidPort
            | ConfigError::InvalidNumber { .. }
            | ConfigError::InvalidChoice { .. } => None,
        }
    }
}
