//! Model module containing data structures

mod coefficients;
mod options;
mod policy;
mod request;
mod result;
mod tables;
mod wire;
mod year_month;

pub use coefficients::ModelCoefficients;
pub use options::CategoryOptions;
pub use policy::{ClampPolicy, WindowPolicy};
pub use request::PredictionRequest;
pub use result::{PredictionResult, TrendPoint};
pub use tables::{MonthOrdinalTable, PricingTables, StoreyRangeTable};
pub use wire::{
    BatchScoringRequest, BatchScoringResponse, ScoringQuery, ScoringResponse, ScoringRow,
};
pub use year_month::YearMonth;
