//! Contract module containing trait definitions for pricing operations

mod price_model;
mod table_source;

pub use price_model::PriceModel;
pub use table_source::TableSource;
