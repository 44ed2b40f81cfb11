//! # Quantview Database Crate
//!
//! This crate acts as a high-level, application-specific interface to the
//! PostgreSQL asset store. It is the system's "permanent archive."
//!
//! ## Architectural Principles
//!
//! - **Layer 3 Adapter:** This crate is an adapter that encapsulates all
//!   database-specific logic. It provides a clean, abstract API to the rest
//!   of the application, hiding the underlying SQL and database
//!   implementation details.
//! - **Edge Conversion:** Monetary columns are `NUMERIC` and come back as
//!   `Decimal`; they are converted to `f64` here so the analytics layer can
//!   do its statistical work in floating point.
//! - **Asynchronous & Pooled:** All operations are asynchronous, and it uses
//!   a connection pool (`PgPool`) for concurrent database access.
//!
//! ## Public API
//!
//! - `connect` / `connect_lazy`: establish the database connection pool.
//! - `run_migrations`: apply migrations so the schema is up-to-date.
//! - `MarketRepository`: the struct that holds the pool and provides all
//!   high-level data access methods (e.g., `price_history`).
//! - `DbError`: the specific error types that can be returned from this
//!   crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, connect_lazy, run_migrations};
pub use error::DbError;
pub use repository::MarketRepository;
