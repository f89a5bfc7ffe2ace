//! HTTP API
//!
//! # Endpoints
//!
//! ## Public
//! - `GET /health` - liveness
//! - `GET /api/generate-trip` - trip generation status
//! - `POST /agents/{agent}/invocations` - run an agent in this process,
//!   answering like the hosted runtime (JSON, or SSE when only
//!   `text/event-stream` is accepted)
//! - `GET /api-docs/openapi.json` - OpenAPI document
//!
//! ## Protected (`Authorization: Bearer <key>` or `X-API-Key`)
//! - `POST /api/generate-trip` - plan a whole trip in one call
//! - `GET /api/agents` - configured agents
//! - `POST /api/wizard` - start a wizard session
//! - `GET /api/wizard/{id}` - session state
//! - `POST /api/wizard/{id}/dates|travelers|hotels|budget` - step forms
//! - `POST /api/wizard/{id}/generate` - generate the plan
//! - `POST /api/wizard/{id}/back|reset` - navigation
//! - `POST /api/wizard/{id}/select` - choose flight and hotels
//! - `POST /api/wizard/{id}/booking` - confirm the booking
//!
//! With the `swagger-ui` feature an interactive UI is served at `/swagger-ui/`.

/// OpenAPI document.
pub mod docs;
/// Request handlers.
pub mod handlers;
/// Router assembly.
pub mod routes;

pub use routes::create_router;
