//! Conversions between wallet-boundary calls/receipts and alloy RPC types.

use alloy::network::TransactionBuilder;
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};

use crate::wallet::{ContractCall, SubmissionReceipt};

/// Request for a read-only call or gas estimate.
pub fn call_request(call: &ContractCall) -> TransactionRequest {
    TransactionRequest::default()
        .with_from(call.from)
        .with_to(call.to)
        .with_input(call.input.clone())
}

/// Request for a transaction to be signed and sent. Nonce, fees and chain ID
/// are filled in by the provider.
pub fn send_request(call: &ContractCall, gas_limit: u64) -> TransactionRequest {
    call_request(call).with_gas_limit(gas_limit)
}

pub fn submission_receipt(receipt: &TransactionReceipt) -> SubmissionReceipt {
    SubmissionReceipt {
        transaction_hash: receipt.transaction_hash,
        block_number: receipt.block_number,
        gas_used: receipt.gas_used,
        status: receipt.status(),
        logs: receipt
            .inner
            .logs()
            .iter()
            .map(|log| log.inner.clone())
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{address, b256, Bytes};
    use serde_json::json;

    fn call() -> ContractCall {
        ContractCall {
            from: address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266"),
            to: address!("a3081cd8f09dee3e5f0bcff197a40ff90720a05f"),
            input: Bytes::from_static(&[0xde, 0xad, 0xbe, 0xef]),
        }
    }

    #[test]
    fn test_send_request_carries_gas_limit() {
        let tx = send_request(&call(), 120_000);
        assert_eq!(tx.from, Some(call().from));
        assert_eq!(tx.gas, Some(120_000));
        assert_eq!(tx.input.input().cloned(), Some(call().input));

        let tx = call_request(&call());
        assert_eq!(tx.gas, None);
    }

    #[test]
    fn test_submission_receipt_from_rpc() {
        let bloom = format!("0x{}", "0".repeat(512));
        let receipt: TransactionReceipt = serde_json::from_value(json!({
            "type": "0x2",
            "status": "0x1",
            "cumulativeGasUsed": "0xc350",
            "logs": [{
                "address": "0xa3081cd8f09dee3e5f0bcff197a40ff90720a05f",
                "topics": [
                    "0x0000000000000000000000000000000000000000000000000000000000000000",
                    "0xcccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccc"
                ],
                "data": "0x",
                "blockHash": "0x2222222222222222222222222222222222222222222222222222222222222222",
                "blockNumber": "0x2a",
                "transactionHash": "0x1111111111111111111111111111111111111111111111111111111111111111",
                "transactionIndex": "0x0",
                "logIndex": "0x0",
                "removed": false
            }],
            "logsBloom": bloom,
            "transactionHash": "0x1111111111111111111111111111111111111111111111111111111111111111",
            "transactionIndex": "0x0",
            "blockHash": "0x2222222222222222222222222222222222222222222222222222222222222222",
            "blockNumber": "0x2a",
            "gasUsed": "0xc350",
            "effectiveGasPrice": "0x3b9aca00",
            "from": "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266",
            "to": "0xa3081cd8f09dee3e5f0bcff197a40ff90720a05f",
            "contractAddress": null
        }))
        .unwrap();

        let converted = submission_receipt(&receipt);
        assert_eq!(
            converted.transaction_hash,
            b256!("1111111111111111111111111111111111111111111111111111111111111111")
        );
        assert_eq!(converted.block_number, Some(42));
        assert_eq!(converted.gas_used, 50_000);
        assert!(converted.status);
        assert_eq!(converted.logs.len(), 1);
        assert_eq!(
            converted.logs[0].topics()[1],
            b256!("cccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccc")
        );
    }
}
