use config::{Config, ConfigError};
use serde::Deserialize;

pub mod domain;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct HotelConfig {
    #[serde(default)]
    pub logger: Logger,
}

impl HotelConfig {
    /// `hotel.toml` と `HOTEL_` で始まる環境変数から設定を読み込む
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(config::File::with_name("hotel").required(false))
            .add_source(config::Environment::with_prefix("HOTEL").separator("_"))
            .build()?
            .try_deserialize::<HotelConfig>()
    }

    /// 設定したレベルでログ出力を開始する
    pub fn init_tracing(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::from(&self.logger.level))
            .try_init()
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Logger {
    #[serde(default)]
    pub level: Level,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub enum Level {
    TRACE,
    DEBUG,
    #[default]
    INFO,
    WARN,
    ERROR,
}

impl From<&Level> for tracing::Level {
    fn from(value: &Level) -> Self {
        match value {
            Level::TRACE => tracing::Level::TRACE,
            Level::DEBUG => tracing::Level::DEBUG,
            Level::INFO => tracing::Level::INFO,
            Level::WARN => tracing::Level::WARN,
            Level::ERROR => tracing::Level::ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn from_toml(toml: &str) -> Result<HotelConfig, ConfigError> {
        Config::builder()
            .add_source(config::File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    #[test]
    fn test_logger_level_defaults_to_info() {
        let config = from_toml("").unwrap();
        assert_eq!(config.logger.level, Level::INFO);
        assert_eq!(tracing::Level::from(&config.logger.level), tracing::Level::INFO);
    }

    #[test]
    fn test_logger_level_from_file() {
        let config = from_toml("[logger]\nlevel = \"DEBUG\"\n").unwrap();
        assert_eq!(config.logger.level, Level::DEBUG);
        assert_eq!(tracing::Level::from(&Level::ERROR), tracing::Level::ERROR);
    }

    #[test]
    fn test_unknown_level_is_rejected() {
        assert!(from_toml("[logger]\nlevel = \"LOUD\"\n").is_err());
    }

    #[test]
    fn test_init_tracing_only_once() {
        let config = HotelConfig::default();
        assert!(config.init_tracing().is_ok());
        assert!(config.init_tracing().is_err());
    }
}
