// src/rpc.rs
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const JSONRPC_VERSION: &str = "2.0";
pub const GET_BLOCK_BY_NUMBER: &str = "eth_getBlockByNumber";
pub const REQUEST_ID: u64 = 1;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    pub params: Value,
    pub id: Value,
}

impl RpcRequest {
    pub fn new(method: &str, params: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.into(),
            method: method.into(),
            params,
            id: REQUEST_ID.into(),
        }
    }

    /// `eth_getBlockByNumber("latest", true)`, asking for full transaction objects.
    pub fn latest_block() -> Self {
        Self::new(GET_BLOCK_BY_NUMBER, serde_json::json!(["latest", true]))
    }
}

/// A reply from a node. `result` is `Some(Value::Null)` when the node sent
/// `"result": null` and `None` when the field is absent.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct RpcResponse {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<ErrorObject>,
    #[serde(default)]
    pub id: Value,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}
