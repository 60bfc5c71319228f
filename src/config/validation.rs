//! Configuration validation.
//!
//! Serde handles syntax; this module checks values. Returns every error, not
//! just the first.

use crate::config::schema::{IssuerConfig, NetworkConfig};

/// Largest accepted gas margin, in percent.
pub const MAX_GAS_MARGIN_PERCENT: u64 = 500;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validate a loaded configuration.
pub fn validate_config(config: &IssuerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    validate_network("network", &config.network, &mut errors);

    if config.contract.address.is_zero() {
        errors.push(ValidationError::new("contract.address", "must not be the zero address"));
    }

    if config.submission.gas_margin_percent > MAX_GAS_MARGIN_PERCENT {
        errors.push(ValidationError::new(
            "submission.gas_margin_percent",
            format!("must be at most {}", MAX_GAS_MARGIN_PERCENT),
        ));
    }

    if config.wallet.private_key_env.trim().is_empty() {
        errors.push(ValidationError::new("wallet.private_key_env", "must not be empty"));
    }

    if config.wallet.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("wallet.rpc_timeout_secs", "must be greater than 0"));
    }

    for (i, network) in config.wallet.extra_networks.iter().enumerate() {
        validate_network(&format!("wallet.extra_networks[{}]", i), network, &mut errors);
    }

    if let Some(initial) = config.wallet.initial_chain_id {
        let known = initial == config.network.chain_id
            || config.wallet.extra_networks.iter().any(|n| n.chain_id == initial);
        if !known {
            errors.push(ValidationError::new(
                "wallet.initial_chain_id",
                format!("chain {} is neither the target nor an extra network", initial),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_network(prefix: &str, network: &NetworkConfig, errors: &mut Vec<ValidationError>) {
    if network.chain_id == 0 {
        errors.push(ValidationError::new(format!("{}.chain_id", prefix), "must be non-zero"));
    }
    if network.chain_name.trim().is_empty() {
        errors.push(ValidationError::new(format!("{}.chain_name", prefix), "must not be empty"));
    }
    if network.rpc_urls.is_empty() {
        errors.push(ValidationError::new(
            format!("{}.rpc_urls", prefix),
            "at least one RPC URL is required",
        ));
    }
    for url in network.rpc_urls.iter().chain(network.block_explorer_urls.iter()) {
        if let Err(e) = url.parse::<url::Url>() {
            errors.push(ValidationError::new(
                format!("{}.urls", prefix),
                format!("invalid URL '{}': {}", url, e),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::Address;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&IssuerConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = IssuerConfig::default();
        config.network.chain_id = 0;
        config.network.rpc_urls.clear();
        config.contract.address = Address::ZERO;
        config.submission.gas_margin_percent = 900;
        config.wallet.rpc_timeout_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"network.chain_id"));
        assert!(fields.contains(&"network.rpc_urls"));
        assert!(fields.contains(&"contract.address"));
        assert!(fields.contains(&"submission.gas_margin_percent"));
        assert!(fields.contains(&"wallet.rpc_timeout_secs"));
    }

    #[test]
    fn test_rejects_bad_url() {
        let mut config = IssuerConfig::default();
        config.network.rpc_urls = vec!["not a url".to_string()];
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("not a url"));
    }

    #[test]
    fn test_initial_chain_must_be_known() {
        let mut config = IssuerConfig::default();
        config.wallet.initial_chain_id = Some(1);
        assert!(validate_config(&config).is_err());

        let mut mainnet = NetworkConfig::default();
        mainnet.chain_id = 1;
        mainnet.chain_name = "Ethereum".to_string();
        config.wallet.extra_networks.push(mainnet);
        assert!(validate_config(&config).is_ok());
    }
}
