use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// How the portal checks the SMS code typed by an existing customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmsVerificationMode {
    /// No SMS is sent; the configured fixed code is accepted.
    Simulated,
    /// Sending and checking are delegated to the backend.
    Backend,
}

impl FromStr for SmsVerificationMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "simulated" => Ok(Self::Simulated),
            "backend" => Ok(Self::Backend),
            other => Err(format!("unknown SMS verification mode: {}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub port: u16,
    pub request_timeout_secs: u64,
    pub sms_verification_mode: SmsVerificationMode,
    pub simulated_sms_code: String,
    /// Lets portal customers book the same service more than once.
    pub allow_service_quantity: bool,
    pub utc_offset_minutes: i32,
    pub booking_window_months: u32,
    pub contact_store_path: Option<PathBuf>,
    /// Portal sessions untouched for this long are dropped.
    pub session_idle_ttl_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3333".to_string(),
            port: 3000,
            request_timeout_secs: 30,
            sms_verification_mode: SmsVerificationMode::Simulated,
            simulated_sms_code: "123456".to_string(),
            allow_service_quantity: false,
            utc_offset_minutes: -180,
            booking_window_months: 3,
            contact_store_path: None,
            session_idle_ttl_secs: 1800,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let config = Self {
            api_base_url: env::var("BARBER_API_URL")
                .unwrap_or_else(|_| {
                    warn!("BARBER_API_URL not set, using {}", defaults.api_base_url);
                    defaults.api_base_url.clone()
                }),
            port: parse_var("PORT", defaults.port),
            request_timeout_secs: parse_var("BACKEND_TIMEOUT_SECS", defaults.request_timeout_secs),
            sms_verification_mode: parse_var("SMS_VERIFICATION_MODE", defaults.sms_verification_mode),
            simulated_sms_code: env::var("SMS_SIMULATED_CODE")
                .unwrap_or_else(|_| defaults.simulated_sms_code.clone()),
            allow_service_quantity: parse_var("PORTAL_SERVICE_QUANTITY", defaults.allow_service_quantity),
            utc_offset_minutes: parse_var("BOOKING_UTC_OFFSET_MINUTES", defaults.utc_offset_minutes),
            booking_window_months: parse_var("BOOKING_WINDOW_MONTHS", defaults.booking_window_months),
            contact_store_path: env::var("CONTACT_STORE_PATH").ok().map(PathBuf::from),
            session_idle_ttl_secs: parse_var("PORTAL_SESSION_TTL_SECS", defaults.session_idle_ttl_secs),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - backend URL is empty");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.api_base_url.trim().is_empty()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Never below one second, so the session sweep cannot spin.
    pub fn session_idle_ttl(&self) -> Duration {
        Duration::from_secs(self.session_idle_ttl_secs.max(1))
    }
}

fn parse_var<T>(name: &str, default: T) -> T
where
    T: FromStr + std::fmt::Debug,
{
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{} has an invalid value {:?}, using {:?}", name, raw, default);
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sms_mode_parsing() {
        assert_eq!("backend".parse::<SmsVerificationMode>(), Ok(SmsVerificationMode::Backend));
        assert_eq!(" Simulated ".parse::<SmsVerificationMode>(), Ok(SmsVerificationMode::Simulated));
        assert!("carrier-pigeon".parse::<SmsVerificationMode>().is_err());
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert!(config.is_configured());
        assert_eq!(config.simulated_sms_code, "123456");
        assert!(!config.allow_service_quantity);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.session_idle_ttl(), Duration::from_secs(1800));

        let config = AppConfig {
            session_idle_ttl_secs: 0,
            ..AppConfig::default()
        };
        assert_eq!(config.session_idle_ttl(), Duration::from_secs(1));
    }
}
