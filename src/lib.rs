//! HTTP Edge Router Library
//!
//! Classifies every inbound request against an ordered, immutable rule
//! table and either serves a static asset with computed cache headers,
//! dispatches to the application backend, denies, or answers the
//! liveness probe.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌────────────────────────────────────────────────┐
//!                      │                  EDGE ROUTER                    │
//!                      │                                                 │
//!   Client Request     │  ┌────────┐   ┌──────────┐   ┌─────────────┐  │
//!   ───────────────────┼─▶│  http  │──▶│ security │──▶│   routing   │  │
//!                      │  │ server │   │ enforcer │   │ classifier  │  │
//!                      │  └────────┘   └──────────┘   └──────┬──────┘  │
//!                      │       │ health                      │          │
//!                      │       ▼                ┌────────────┼────────┐ │
//!                      │  200 "healthy"         ▼            ▼        │ │
//!                      │                 ┌──────────┐  ┌───────────┐  │ │
//!   Client Response    │                 │  assets  │  │ upstream  │──┼─┼── Backend
//!   ◀──────────────────┼─────────────────│  store + │  │dispatcher │  │ │
//!                      │                 │  cache   │  └───────────┘  │ │
//!                      │                 └──────────┘                 │ │
//!                      │  ┌───────────────────────────────────────────┘ │
//!                      │  │            Cross-Cutting Concerns           │
//!                      │  │  config · observability · lifecycle        │
//!                      │  └─────────────────────────────────────────── │
//!                      └────────────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod config;
pub mod error;
pub mod http;
pub mod routing;
pub mod security;

// Request outcomes
pub mod assets;
pub mod health;
pub mod upstream;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::EdgeConfig;
pub use error::EdgeError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
