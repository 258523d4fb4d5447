//! Configuration for the packet ledger

use serde::{Deserialize, Serialize};

/// Packet ledger configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Service name
    pub service_name: String,

    /// Metrics listen address
    pub metrics_listen_addr: String,

    /// Minimum amount (smallest units) a packet may escrow
    pub min_packet_amount: u64,

    /// Floor applied to random-mode draws (clamped to the remainder when the
    /// pool is smaller than this)
    pub min_claim_amount: u64,

    /// Upper bound on a packet's recipient limit
    pub max_recipients: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: "packet-core".to_string(),
            metrics_listen_addr: "0.0.0.0:9090".to_string(),
            min_packet_amount: 1,
            min_claim_amount: 1,
            max_recipients: 100,
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::Error::Config(format!("Failed to read config: {}", e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();

        if let Ok(addr) = std::env::var("PACKET_METRICS_ADDR") {
            config.metrics_listen_addr = addr;
        }

        if let Ok(min) = std::env::var("PACKET_MIN_AMOUNT") {
            config.min_packet_amount = min
                .parse()
                .map_err(|e| crate::Error::Config(format!("PACKET_MIN_AMOUNT: {}", e)))?;
        }

        if let Ok(max) = std::env::var("PACKET_MAX_RECIPIENTS") {
            config.max_recipients = max
                .parse()
                .map_err(|e| crate::Error::Config(format!("PACKET_MAX_RECIPIENTS: {}", e)))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check configuration invariants
    pub fn validate(&self) -> crate::Result<()> {
        if self.min_packet_amount == 0 {
            return Err(crate::Error::Config(
                "min_packet_amount must be positive".to_string(),
            ));
        }
        if self.min_claim_amount == 0 {
            return Err(crate::Error::Config(
                "min_claim_amount must be positive".to_string(),
            ));
        }
        if self.max_recipients == 0 || self.max_recipients > 100 {
            return Err(crate::Error::Config(
                "max_recipients must be in [1, 100]".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.service_name, "packet-core");
        assert_eq!(config.min_packet_amount, 1);
        assert_eq!(config.max_recipients, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_minimum() {
        let config = Config {
            min_packet_amount: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_oversized_recipient_bound() {
        let config = Config {
            max_recipients: 101,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            service_name = "packet-core"
            metrics_listen_addr = "127.0.0.1:9091"
            min_packet_amount = 100
            min_claim_amount = 1
            max_recipients = 50
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.min_packet_amount, 100);
        assert_eq!(config.max_recipients, 50);
    }
}
