//! # devicestore-domain
//!
//! Pure domain model for the devicestore service.
//!
//! ## Responsibilities
//! - Foundational types: the device identifier, error conventions, timestamps
//! - Define the **Device** record and its creation payload
//! - Define **partial updates** and the rules that resolve them into a change
//! - Contain all invariant enforcement that needs no IO
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod device;
