//! Trellis: project task status pipelines.
//!
//! This crate provides the workflow core of a project-management backend:
//! per-project ordered status catalogs and the rules that move tasks along
//! them, run inside store transactions.
//!
//! # Architecture
//!
//! Trellis follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for persistence and transactions
//! - **Adapters**: Concrete implementations of ports (in-memory, `PostgreSQL`)
//!
//! # Modules
//!
//! - [`workflow`]: Status catalog maintenance and task status transitions

pub mod workflow;
