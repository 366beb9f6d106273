//! # devicestore-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the `/devices` JSON API and the `/` liveness probe
//! - Map HTTP requests into application service calls (driving adapter)
//! - Map service outcomes into status codes and JSON bodies:
//!   `{"devices": [...]}`, `{"device": {...}}`, `{"status": "<reason>"}`
//!   and `{"error": "<message>"}`
//!
//! ## Dependency rule
//! Depends on `devicestore-app` (for port traits and services) and
//! `devicestore-domain` (for domain types used in request/response mapping).
//! Never leaks axum types into the domain.

pub mod api;
pub mod body;
pub mod error;
pub mod router;
pub mod state;
