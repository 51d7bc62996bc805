//! Table source trait definition.

use crate::error::Result;
use crate::model::PricingTables;

/// Supplies the coefficient and ordinal tables.
///
/// Implementations read static files, embedded documents or a remote
/// provider. Tables are loaded once and shared read-only afterwards.
pub trait TableSource: Send + Sync {
    /// Source name, used in logs.
    fn name(&self) -> &str;

    /// Load and validate every table.
    fn load(&self) -> Result<PricingTables>;
}
