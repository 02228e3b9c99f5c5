use serde::Deserialize;

use crate::rules::{RulePolicy, DEFAULT_MAX_AGE_MONTHS};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    pub max_document_age_months: u32,
    pub max_batch_size: usize,
    pub max_body_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            max_document_age_months: DEFAULT_MAX_AGE_MONTHS,
            max_batch_size: 50,
            max_body_bytes: 1024 * 1024,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        let config = Self {
            port: std::env::var("PORT")
                .ok()
                .map(|port| port.trim().parse::<u16>())
                .transpose()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?
                .unwrap_or(defaults.port),
            max_document_age_months: std::env::var("MAX_DOCUMENT_AGE_MONTHS")
                .ok()
                .map(|months| months.trim().parse::<u32>())
                .transpose()
                .map_err(|_| anyhow::anyhow!("MAX_DOCUMENT_AGE_MONTHS must be a whole number"))
                .and_then(|months| {
                    let months = months.unwrap_or(defaults.max_document_age_months);
                    if !(1..=120).contains(&months) {
                        anyhow::bail!("MAX_DOCUMENT_AGE_MONTHS must be between 1 and 120");
                    }
                    Ok(months)
                })?,
            max_batch_size: std::env::var("MAX_BATCH_SIZE")
                .ok()
                .map(|size| size.trim().parse::<usize>())
                .transpose()
                .map_err(|_| anyhow::anyhow!("MAX_BATCH_SIZE must be a whole number"))
                .and_then(|size| {
                    let size = size.unwrap_or(defaults.max_batch_size);
                    if size == 0 {
                        anyhow::bail!("MAX_BATCH_SIZE must be at least 1");
                    }
                    Ok(size)
                })?,
            max_body_bytes: std::env::var("MAX_BODY_BYTES")
                .ok()
                .map(|bytes| bytes.trim().parse::<usize>())
                .transpose()
                .map_err(|_| anyhow::anyhow!("MAX_BODY_BYTES must be a whole number"))?
                .unwrap_or(defaults.max_body_bytes),
        };

        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Server Port: {}", config.port);
        tracing::debug!(
            "Document age window: {} months",
            config.max_document_age_months
        );
        tracing::debug!("Max batch size: {}", config.max_batch_size);

        Ok(config)
    }

    /// Rule parameters derived from this configuration.
    pub fn rule_policy(&self) -> RulePolicy {
        RulePolicy {
            max_age_months: self.max_document_age_months,
        }
    }
}
