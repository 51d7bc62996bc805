//! Pricing Facade
//!
//! High-level API for linear resale price models. Re-exports all public
//! types from the pricing stack, including the remote scoring client.

// Re-export everything from API (which includes SPI and core)
pub use pricing_api::*;

// Explicit re-exports for documentation
pub use pricing_api::prelude;

// Re-export core modules for direct access
pub use pricing_core::{evaluator, loader, remote, trend};

// Re-export functions at root
pub use pricing_core::{
    evaluate, fetch_tables, fetch_tables_with, generate_trend, months_between, parse_tables,
    trend_months, RemoteScorer, WireFormat,
};
