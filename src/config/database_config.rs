//! Tick store configuration parsing from environment variables.

use anyhow::Result;

/// Database environment configuration
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseEnvConfig {
    pub url: String,
    /// Only ticks of this symbol are used for training when set
    pub symbol: Option<String>,
}

impl Default for DatabaseEnvConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://data/ticks.db".to_string(),
            symbol: None,
        }
    }
}

impl DatabaseEnvConfig {
    pub fn load(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            url: var("DATABASE_URL").unwrap_or_else(|| Self::default().url),
            symbol: var("TICK_SYMBOL")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_config_defaults() {
        let config = DatabaseEnvConfig::load(|_| None).unwrap();
        assert_eq!(config.url, "sqlite://data/ticks.db");
        assert_eq!(config.symbol, None);
    }

    #[test]
    fn test_blank_symbol_means_all_symbols() {
        let config = DatabaseEnvConfig::load(|key| (key == "TICK_SYMBOL").then(|| "  ".to_string()))
            .unwrap();
        assert_eq!(config.symbol, None);
    }
}
