//! # devicestore-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define the **port trait** that storage adapters must implement:
//!   - `DeviceRepository` — store, find, list, search by brand, update, remove
//! - Define the **driving/inbound** use-case struct:
//!   - `DeviceService` — create, get, list, search, update, delete
//! - Orchestrate domain objects without knowing *how* persistence works
//!
//! ## Dependency rule
//! Depends on `devicestore-domain` only.
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;
