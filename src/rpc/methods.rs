//! RPC Method Implementations
//!
//! Each method corresponds to a JSON-RPC call that external apps can make.
//! Every method only reads state.

use crate::errors::RandError;
use crate::node::NodeApp;
use crate::storage::KvStore;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// JSON-RPC 2.0 Request
#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    pub params: Option<Value>,
    pub id: Value,
}

/// JSON-RPC 2.0 Response
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub result: Option<Value>,
    pub error: Option<JsonRpcError>,
    pub id: Value,
}

/// JSON-RPC Error
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;

impl JsonRpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    pub fn error(id: Value, code: i32, message: String) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(JsonRpcError { code, message }),
            id,
        }
    }

    /// Module errors keep their module code
    fn from_rand_error(id: Value, err: RandError) -> Self {
        Self::error(id, err.code() as i32, err.to_string())
    }
}

/// RPC Handler State
pub struct RpcState<St> {
    pub app: Arc<Mutex<NodeApp<St>>>,
}

impl<St> RpcState<St> {
    pub fn new(app: Arc<Mutex<NodeApp<St>>>) -> Self {
        Self { app }
    }
}

/// Process a JSON-RPC request and return a response
pub fn handle_request<St: KvStore>(state: &RpcState<St>, request: JsonRpcRequest) -> JsonRpcResponse {
    let id = request.id;
    let app = match state.app.lock() {
        Ok(app) => app,
        Err(_) => return JsonRpcResponse::error(id, INTERNAL_ERROR, "node state unavailable".into()),
    };
    let keeper = app.keeper();
    let store = app.store();

    let result = match request.method.as_str() {
        "rand_status" => {
            return JsonRpcResponse::success(
                id,
                serde_json::json!({
                    "module": crate::constants::MODULE_NAME,
                    "height": app.height(),
                    "version": env!("CARGO_PKG_VERSION"),
                }),
            )
        }
        "rand_period" => keeper.query_period(store).map(to_value),
        "rand_commitment" => {
            let (period, validator) = match commitment_params(request.params) {
                Some(p) => p,
                None => {
                    return JsonRpcResponse::error(
                        id,
                        INVALID_PARAMS,
                        "Invalid params: expected [period, validator]".into(),
                    )
                }
            };
            keeper.query_commitment(store, period, &validator).map(to_value)
        }
        "rand_commitments" => keeper.query_commitments(store).map(to_value),
        "rand_reveals" => keeper.query_reveals(store).map(to_value),
        "rand_penalties" => keeper.query_penalties(store).map(to_value),
        "rand_randomness" => keeper.query_current_randomness(store).map(to_value),
        "rand_params" => keeper.query_params(store).map(to_value),
        _ => {
            return JsonRpcResponse::error(
                id,
                METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
            )
        }
    };

    match result {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::from_rand_error(id, e),
    }
}

fn to_value<T: Serialize>(v: T) -> Value {
    serde_json::to_value(v).unwrap_or(Value::Null)
}

/// `[period, validator]` or `{"period": .., "validator": ..}`
fn commitment_params(params: Option<Value>) -> Option<(u64, String)> {
    match params? {
        Value::Array(arr) if arr.len() >= 2 => Some((arr[0].as_u64()?, arr[1].as_str()?.to_string())),
        Value::Object(map) => Some((
            map.get("period")?.as_u64()?,
            map.get("validator")?.as_str()?.to_string(),
        )),
        _ => None,
    }
}
