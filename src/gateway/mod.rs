//! MCP tool gateway client
//!
//! The gateway exposes vendor APIs (Amadeus flight and hotel search) as MCP
//! tools reachable over JSON-RPC (`tools/call`, `tools/list`). Requests carry
//! a client-credentials bearer token from a [`TokenCache`](crate::auth::TokenCache).

mod client;

pub use client::{extract_tool_text, GatewayClient, GatewayTool};
