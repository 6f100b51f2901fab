//! TOML configuration with defaults for every setting.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::carousel::CarouselConfig;
use crate::constants::*;
use crate::state::PendingPolicy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("invalid config {path:?}: {source}")]
    Parse { path: PathBuf, source: toml::de::Error },
    #[error("missing setting `{0}`")]
    Missing(&'static str),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowreelConfig {
    pub carousel: CarouselSettings,
    pub email: EmailSettings,
    pub testimonials: TestimonialSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselSettings {
    pub settle_delay_ms: u64,
    pub pending: PendingPolicy,
    pub swipe_threshold: f32,
    pub clip_seconds: f32,
}

impl Default for CarouselSettings {
    fn default() -> Self {
        Self {
            settle_delay_ms: SETTLE_DELAY_MS,
            pending: PendingPolicy::Queue,
            swipe_threshold: SWIPE_THRESHOLD,
            clip_seconds: CLIP_DURATION,
        }
    }
}

impl CarouselSettings {
    pub fn carousel_config(&self) -> CarouselConfig {
        CarouselConfig {
            settle_delay: Duration::from_millis(self.settle_delay_ms),
            pending: self.pending,
        }
    }
}

/// Where quote and contact submissions are delivered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailSettings {
    pub endpoint: String,
    pub service_id: String,
    pub operator_template: String,
    pub confirmation_template: String,
    pub public_key: Option<String>,
    pub operator_address: String,
}

impl Default for EmailSettings {
    fn default() -> Self {
        Self {
            endpoint: EMAILJS_ENDPOINT.to_string(),
            service_id: String::new(),
            operator_template: String::new(),
            confirmation_template: String::new(),
            public_key: None,
            operator_address: String::new(),
        }
    }
}

impl EmailSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("email.service_id", &self.service_id),
            ("email.operator_template", &self.operator_template),
            ("email.confirmation_template", &self.confirmation_template),
            ("email.operator_address", &self.operator_address),
        ];
        if let Some((name, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(ConfigError::Missing(*name));
        }
        match &self.public_key {
            Some(key) if !key.trim().is_empty() => Ok(()),
            _ => Err(ConfigError::Missing("email.public_key")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestimonialSettings {
    pub base_url: String,
    pub ledger_path: PathBuf,
    pub cooldown_days: i64,
}

impl Default for TestimonialSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            ledger_path: PathBuf::from(".showreel/testimonial.json"),
            cooldown_days: TESTIMONIAL_COOLDOWN_DAYS,
        }
    }
}

impl ShowreelConfig {
    /// Load from `path`, or use defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            debug!("no config file given, using defaults");
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        let config = Self::from_toml(&text)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
        debug!(?path, "loaded config");
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = ShowreelConfig::from_toml("").unwrap();
        assert_eq!(config, ShowreelConfig::default());
        assert_eq!(config.carousel.carousel_config(), CarouselConfig::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = ShowreelConfig::from_toml(
            r#"
            [carousel]
            settle_delay_ms = 100
            pending = "drop"

            [email]
            service_id = "svc"
            "#,
        )
        .unwrap();
        assert_eq!(config.carousel.settle_delay_ms, 100);
        assert_eq!(config.carousel.pending, PendingPolicy::Drop);
        assert_eq!(config.carousel.swipe_threshold, SWIPE_THRESHOLD);
        assert_eq!(config.email.service_id, "svc");
        assert_eq!(config.email.endpoint, EMAILJS_ENDPOINT);
        assert_eq!(config.testimonials.cooldown_days, 7);
    }

    #[test]
    fn email_settings_need_every_field() {
        let mut email = EmailSettings {
            service_id: "svc".into(),
            operator_template: "op".into(),
            confirmation_template: "conf".into(),
            operator_address: "ops@example.com".into(),
            ..Default::default()
        };
        assert!(matches!(email.validate(), Err(ConfigError::Missing("email.public_key"))));
        email.public_key = Some("pk".into());
        assert!(email.validate().is_ok());
        email.operator_template.clear();
        assert!(matches!(email.validate(), Err(ConfigError::Missing("email.operator_template"))));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = ShowreelConfig::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
