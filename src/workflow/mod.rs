//! Project status catalogs and task status transitions.
//!
//! Each project owns an ordered, mutable pipeline of statuses. This module
//! maintains the pipeline ordering when statuses are created or repositioned
//! and moves tasks along it, either to an explicit status or to the next
//! stage with wrap-around. It follows hexagonal architecture:
//!
//! - Domain types and policy functions in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
