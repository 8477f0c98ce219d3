//! On-chain credential verification through an Ethereum JSON-RPC `eth_call`.
//!
//! The contract exposes `verify(address) returns (bool)`; the call data is the
//! 4-byte selector followed by the left-padded 32-byte address word.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::services::{CredentialVerifier, EnrichmentError};

/// First four bytes of keccak256("verify(address)").
pub const VERIFY_SELECTOR: &str = "0x63a9c3d7";

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<String>,
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    message: String,
}

#[derive(Clone)]
pub struct EthCredentialVerifier {
    client: Client,
    rpc_url: String,
    contract_address: String,
    selector: String,
}

impl EthCredentialVerifier {
    pub fn new(client: Client, rpc_url: String, contract_address: String, selector: String) -> Self {
        Self {
            client,
            rpc_url,
            contract_address,
            selector,
        }
    }
}

#[async_trait]
impl CredentialVerifier for EthCredentialVerifier {
    async fn verify(&self, wallet: &str) -> Result<bool, EnrichmentError> {
        let data = encode_call(&self.selector, wallet)?;
        let payload = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "eth_call",
            "params": [{ "to": self.contract_address, "data": data }, "latest"],
        });

        let response = self.client.post(&self.rpc_url).json(&payload).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(EnrichmentError::Status(status.as_u16()));
        }

        let body: RpcResponse = response.json().await?;
        if let Some(error) = body.error {
            return Err(EnrichmentError::Malformed(error.message));
        }
        let result = body
            .result
            .ok_or_else(|| EnrichmentError::Malformed("eth_call returned no result".to_string()))?;

        decode_bool(&result)
    }
}

/// `selector ++ pad32(address)` as a 0x-prefixed hex string.
fn encode_call(selector: &str, wallet: &str) -> Result<String, EnrichmentError> {
    let address = wallet.trim_start_matches("0x").trim_start_matches("0X");
    if address.len() != 40 || !address.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(EnrichmentError::Malformed(format!("invalid wallet address: {wallet}")));
    }
    let selector = selector.trim_start_matches("0x");
    Ok(format!("0x{selector}{:0>64}", address.to_lowercase()))
}

/// An ABI-encoded `bool` is a 32-byte word; any non-zero digit means true.
fn decode_bool(word: &str) -> Result<bool, EnrichmentError> {
    let digits = word.trim_start_matches("0x");
    if digits.is_empty() {
        return Ok(false);
    }
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(EnrichmentError::Malformed(format!("non-hex eth_call result: {word}")));
    }
    Ok(digits.chars().any(|c| c != '0'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_http;
    use axum::{
        http::StatusCode,
        response::{IntoResponse, Response},
        routing::post,
        Json, Router,
    };
    use serde_json::Value;

    const CONTRACT: &str = "0x00000000000000000000000000000000000c0de5";

    /// JSON-RPC node stub; the reply depends on the last digit of the encoded wallet.
    async fn stub_node(Json(request): Json<Value>) -> Response {
        let call = &request["params"][0];
        let data = call["data"].as_str().unwrap_or_default();
        if request["method"] != "eth_call" || call["to"] != CONTRACT || !data.starts_with(VERIFY_SELECTOR) {
            return Json(json!({ "jsonrpc": "2.0", "id": 1, "error": { "code": -32602, "message": "bad call" } }))
                .into_response();
        }
        match data.chars().last() {
            Some('1') => Json(json!({ "jsonrpc": "2.0", "id": 1, "result": format!("0x{:0>64}", "1") })).into_response(),
            Some('2') => Json(json!({ "jsonrpc": "2.0", "id": 1, "result": format!("0x{}", "0".repeat(64)) })).into_response(),
            Some('3') => Json(json!({ "jsonrpc": "2.0", "id": 1, "error": { "code": 3, "message": "execution reverted" } }))
                .into_response(),
            Some('4') => Json(json!({ "jsonrpc": "2.0", "id": 1 })).into_response(),
            _ => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }

    async fn stub_verifier() -> EthCredentialVerifier {
        let rpc_url = test_http::serve(Router::new().route("/", post(stub_node))).await;
        EthCredentialVerifier::new(
            Client::new(),
            rpc_url,
            CONTRACT.to_string(),
            VERIFY_SELECTOR.to_string(),
        )
    }

    fn wallet(n: u8) -> String {
        format!("0x{n:040x}")
    }

    const WALLET: &str = "0x52908400098527886E0F7030069857D2E4169EE7";

    #[test]
    fn test_encode_call_layout() {
        let data = encode_call(VERIFY_SELECTOR, WALLET).unwrap();
        assert_eq!(data.len(), 2 + 8 + 64);
        assert!(data.starts_with("0x63a9c3d7000000000000000000000000"));
        assert!(data.ends_with("52908400098527886e0f7030069857d2e4169ee7"));
    }

    #[test]
    fn test_encode_call_rejects_bad_wallet() {
        assert!(encode_call(VERIFY_SELECTOR, "0x1234").is_err());
        assert!(encode_call(VERIFY_SELECTOR, "0xZZ908400098527886E0F7030069857D2E4169EE7").is_err());
    }

    #[test]
    fn test_decode_bool_words() {
        let truthy = format!("0x{:0>64}", "1");
        let falsy = format!("0x{}", "0".repeat(64));
        assert!(decode_bool(&truthy).unwrap());
        assert!(!decode_bool(&falsy).unwrap());
        assert!(!decode_bool("0x").unwrap());
        assert!(decode_bool("0xnothex").is_err());
    }

    #[tokio::test]
    async fn test_verify_reads_result_word() {
        let verifier = stub_verifier().await;
        assert!(verifier.verify(&wallet(1)).await.unwrap());
        assert!(!verifier.verify(&wallet(2)).await.unwrap());
    }

    #[tokio::test]
    async fn test_verify_surfaces_rpc_error() {
        let verifier = stub_verifier().await;
        match verifier.verify(&wallet(3)).await {
            Err(EnrichmentError::Malformed(message)) => assert_eq!(message, "execution reverted"),
            other => panic!("expected rpc error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_verify_without_result_is_malformed() {
        let verifier = stub_verifier().await;
        assert!(matches!(verifier.verify(&wallet(4)).await, Err(EnrichmentError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_verify_http_failure_status() {
        let verifier = stub_verifier().await;
        assert!(matches!(verifier.verify(&wallet(5)).await, Err(EnrichmentError::Status(500))));
    }

    #[tokio::test]
    async fn test_verify_rejects_bad_wallet_before_calling() {
        let verifier = stub_verifier().await;
        assert!(matches!(verifier.verify("0x1234").await, Err(EnrichmentError::Malformed(_))));
    }

    #[test]
    fn test_rpc_error_payload_deserializes() {
        let body = r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32000,"message":"execution reverted"}}"#;
        let parsed: RpcResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.result.is_none());
        assert_eq!(parsed.error.unwrap().message, "execution reverted");
    }
}
