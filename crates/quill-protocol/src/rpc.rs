use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-RPC 2.0: the request could not be interpreted as a valid request.
pub const ERR_INVALID_REQUEST: i64 = -32600;
/// JSON-RPC 2.0: the method does not exist.
pub const ERR_METHOD_NOT_FOUND: i64 = -32601;
/// JSON-RPC 2.0: invalid method parameters (also used for unknown tools).
pub const ERR_INVALID_PARAMS: i64 = -32602;
/// JSON-RPC 2.0: internal server error.
pub const ERR_INTERNAL: i64 = -32603;

/// Client → Server call.
/// Wire: `{ "jsonrpc": "2.0", "method": "tools/call", "params": {...}, "id": 1 }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    /// Client-supplied id, echoed back verbatim. Absent for notifications.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
}

/// Server → Client reply. Exactly one of `result` / `error` is present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcErrorObj>,
    pub id: Value,
}

impl RpcResponse {
    pub fn result(id: Option<Value>, result: impl Serialize) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: Some(serde_json::to_value(result).unwrap_or(Value::Null)),
            error: None,
            id: id.unwrap_or(Value::Null),
        }
    }

    pub fn error(id: Option<Value>, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(RpcErrorObj {
                code,
                message: message.into(),
            }),
            id: id.unwrap_or(Value::Null),
        }
    }
}

/// Error body carried inside a failed [`RpcResponse`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcErrorObj {
    pub code: i64,
    pub message: String,
}
