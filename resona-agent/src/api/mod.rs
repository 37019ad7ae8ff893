//! REST + SSE API implementation for the Resona agent
//!
//! The desktop client consumes this surface the way it consumed the
//! original in-process IPC bridge: every mutating endpoint answers
//! `{ok, error?}`, and real-time updates arrive over `GET /api/v1/events`.

pub mod handlers;
pub mod server;
pub mod sse;

pub use server::{create_router, AppContext};
