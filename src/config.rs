use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;
use figment::{
    providers::{Env, Format, Json, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::models::Period;
use crate::render::RenderOptions;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_base_url: String,
    /// SQLite file holding the saved login session.
    pub session_db_path: String,
    pub default_period: Period,
    /// Width of the date window `list` applies when no bounds are given.
    pub default_filter_days: u32,
    pub date_format: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5001/api".to_string(),
            session_db_path: "fitness_session.db".to_string(),
            default_period: Period::Month,
            default_filter_days: 30,
            date_format: "%d.%m.%Y".to_string(),
        }
    }
}

impl AppConfig {
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file("Fitness.toml"))
            .merge(Json::file("Fitness.json"))
            .merge(Env::raw().only(&[
                "API_BASE_URL",
                "SESSION_DB_PATH",
                "DEFAULT_PERIOD",
                "DEFAULT_FILTER_DAYS",
                "DATE_FORMAT",
            ]))
    }

    pub fn load() -> Result<Self, figment::Error> {
        Self::from_figment(Self::figment())
    }

    pub fn from_figment(figment: Figment) -> Result<Self, figment::Error> {
        let config: AppConfig = figment.extract()?;
        config.validate().map_err(figment::Error::from)?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), String> {
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(format!("invalid date_format '{}'", self.date_format));
        }
        // Time and offset specifiers parse fine but cannot render a bare date.
        let sample = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap_or_default();
        let mut rendered = String::new();
        if write!(rendered, "{}", sample.format(&self.date_format)).is_err() {
            return Err(format!(
                "date_format '{}' cannot format a calendar date",
                self.date_format
            ));
        }
        if self.api_base_url.trim().is_empty() {
            return Err("api_base_url must not be empty".to_string());
        }
        Ok(())
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            date_format: self.date_format.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_toml(toml: &str) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default())).merge(Toml::string(toml))
    }

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::from_figment(with_toml("")).expect("defaults");
        assert_eq!(config.api_base_url, "http://localhost:5001/api");
        assert_eq!(config.default_period, Period::Month);
        assert_eq!(config.default_filter_days, 30);
    }

    #[test]
    fn file_values_override_defaults() {
        let config = AppConfig::from_figment(with_toml(
            "api_base_url = \"https://fit.example.com/api\"\ndefault_period = \"week\"\ndate_format = \"%Y-%m-%d\"",
        ))
        .expect("overrides");
        assert_eq!(config.api_base_url, "https://fit.example.com/api");
        assert_eq!(config.default_period, Period::Week);
        assert_eq!(config.render_options().date_format, "%Y-%m-%d");
    }

    #[test]
    fn rejects_bad_date_format() {
        assert!(AppConfig::from_figment(with_toml("date_format = \"%Q\"")).is_err());
    }

    #[test]
    fn rejects_time_only_format() {
        assert!(AppConfig::from_figment(with_toml("date_format = \"%H:%M\"")).is_err());
        assert!(AppConfig::from_figment(with_toml("date_format = \"%d.%m.%Y %z\"")).is_err());
        assert!(AppConfig::from_figment(with_toml("date_format = \"%a %e %b %Y\"")).is_ok());
    }

    #[test]
    fn rejects_unknown_period() {
        assert!(AppConfig::from_figment(with_toml("default_period = \"decade\"")).is_err());
    }
}
