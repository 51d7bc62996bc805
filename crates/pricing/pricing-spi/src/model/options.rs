//! Category option lists

use serde::{Deserialize, Serialize};

/// Values a form layer may offer; storey ranges by rank, the rest ascending
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CategoryOptions {
    pub ml_model_list: Vec<String>,
    pub town_list: Vec<String>,
    pub storey_range_list: Vec<String>,
    pub flat_model_list: Vec<String>,
}
