//! `quill-protocol` — JSON-RPC 2.0 wire shapes for the tool endpoint.
//!
//! The gateway speaks a minimal JSON-RPC dialect over `POST /mcp`:
//! `initialize`, `tools/list` and `tools/call`. This crate defines the
//! request/response frames and the standard error codes; it carries no
//! dispatch logic so clients and tests can depend on it without pulling in
//! the server.

pub mod rpc;

pub use rpc::{RpcErrorObj, RpcRequest, RpcResponse};
