//! Built-in deployment constants. These are the configuration defaults.

use alloy::primitives::{address, Address};

/// Deployed certificate registry on Sonic Testnet.
pub const CERTIFICATE_CONTRACT_ADDRESS: Address =
    address!("a3081cd8f09dee3e5f0bcff197a40ff90720a05f");

pub const SONIC_TESTNET_CHAIN_ID: u64 = 14601;
pub const SONIC_TESTNET_NAME: &str = "Sonic Testnet";
pub const SONIC_TESTNET_RPC_URL: &str = "https://rpc.testnet.soniclabs.com";
pub const SONIC_TESTNET_EXPLORER_URL: &str = "https://testnet.soniclabs.com/";
pub const SONIC_CURRENCY_NAME: &str = "Sonic";
pub const SONIC_CURRENCY_SYMBOL: &str = "S";
pub const SONIC_CURRENCY_DECIMALS: u8 = 18;

/// 0.01 S.
pub const MIN_BALANCE_WEI: u64 = 10_000_000_000_000_000;

pub const GAS_MARGIN_PERCENT: u64 = 20;

/// Environment variable name for the headless wallet's private key.
pub const PRIVATE_KEY_ENV_VAR: &str = "CERTIFICATE_ISSUER_PRIVATE_KEY";
