//! Read-only lookup tables consumed by the evaluator

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{CategoryKind, PricingError, Result};
use crate::model::{CategoryOptions, ModelCoefficients, YearMonth};

/// Calendar month to the integer used as the `month` feature.
///
/// Ordinals strictly increase with calendar time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, i64>", into = "BTreeMap<String, i64>")]
pub struct MonthOrdinalTable {
    ordinals: BTreeMap<YearMonth, i64>,
}

impl MonthOrdinalTable {
    /// Build from parsed months, checking monotonicity
    pub fn new(ordinals: BTreeMap<YearMonth, i64>) -> Result<Self> {
        let mut previous: Option<(&YearMonth, i64)> = None;
        for (month, &ordinal) in &ordinals {
            if let Some((prev_month, prev_ordinal)) = previous {
                if ordinal <= prev_ordinal {
                    return Err(PricingError::InvalidTable(format!(
                        "month ordinal for {} ({}) does not increase after {} ({})",
                        month, ordinal, prev_month, prev_ordinal
                    )));
                }
            }
            previous = Some((month, ordinal));
        }
        Ok(Self { ordinals })
    }

    /// Ordinal of `month`
    pub fn ordinal(&self, month: &YearMonth) -> Result<i64> {
        self.ordinals
            .get(month)
            .copied()
            .ok_or_else(|| PricingError::UnknownMonth(month.to_string()))
    }

    /// Ordinal of a `YYYY-MM` label; malformed labels are unknown months
    pub fn ordinal_for_label(&self, label: &str) -> Result<i64> {
        let month: YearMonth = label
            .parse()
            .map_err(|_| PricingError::UnknownMonth(label.to_string()))?;
        self.ordinal(&month)
    }

    /// Whether `month` has an ordinal
    pub fn contains(&self, month: &YearMonth) -> bool {
        self.ordinals.contains_key(month)
    }

    /// Earliest covered month
    pub fn first(&self) -> Option<YearMonth> {
        self.ordinals.keys().next().copied()
    }

    /// Latest covered month
    pub fn last(&self) -> Option<YearMonth> {
        self.ordinals.keys().next_back().copied()
    }

    /// Number of covered months
    pub fn len(&self) -> usize {
        self.ordinals.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.ordinals.is_empty()
    }

    /// Iterate in chronological order
    pub fn iter(&self) -> impl Iterator<Item = (&YearMonth, &i64)> {
        self.ordinals.iter()
    }
}

impl TryFrom<BTreeMap<String, i64>> for MonthOrdinalTable {
    type Error = PricingError;

    fn try_from(raw: BTreeMap<String, i64>) -> Result<Self> {
        let mut ordinals = BTreeMap::new();
        for (label, ordinal) in raw {
            let month: YearMonth = label.parse().map_err(|_| {
                PricingError::InvalidTable(format!("month key '{}' is not YYYY-MM", label))
            })?;
            ordinals.insert(month, ordinal);
        }
        Self::new(ordinals)
    }
}

impl From<MonthOrdinalTable> for BTreeMap<String, i64> {
    fn from(table: MonthOrdinalTable) -> Self {
        table
            .ordinals
            .into_iter()
            .map(|(month, ordinal)| (month.to_string(), ordinal))
            .collect()
    }
}

/// Storey range label (e.g. `"01 TO 03"`) to an ordinal rank.
///
/// Ranks are monotonic with physical floor height.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, i64>", into = "BTreeMap<String, i64>")]
pub struct StoreyRangeTable {
    ranks: BTreeMap<String, i64>,
}

impl StoreyRangeTable {
    /// Build from label ranks, checking monotonicity of `NN TO MM` labels
    pub fn new(ranks: BTreeMap<String, i64>) -> Result<Self> {
        let mut by_floor: Vec<(u32, &str, i64)> = ranks
            .iter()
            .filter_map(|(label, &rank)| {
                parse_floor_bounds(label).map(|(low, _)| (low, label.as_str(), rank))
            })
            .collect();
        by_floor.sort_by_key(|(low, _, _)| *low);

        for pair in by_floor.windows(2) {
            let (_, lower_label, lower_rank) = pair[0];
            let (_, upper_label, upper_rank) = pair[1];
            if upper_rank <= lower_rank {
                return Err(PricingError::InvalidTable(format!(
                    "storey range '{}' rank {} is not above '{}' rank {}",
                    upper_label, upper_rank, lower_label, lower_rank
                )));
            }
        }

        Ok(Self { ranks })
    }

    /// Rank of `storey_range`
    pub fn rank(&self, storey_range: &str) -> Result<i64> {
        self.ranks.get(storey_range).copied().ok_or_else(|| {
            PricingError::unknown_category(CategoryKind::StoreyRange, storey_range)
        })
    }

    /// All labels by ascending rank, ties in lexical order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        let mut labels: Vec<(&str, i64)> = self
            .ranks
            .iter()
            .map(|(label, &rank)| (label.as_str(), rank))
            .collect();
        labels.sort_by_key(|&(label, rank)| (rank, label));
        labels.into_iter().map(|(label, _)| label)
    }

    /// Number of labels
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}

impl TryFrom<BTreeMap<String, i64>> for StoreyRangeTable {
    type Error = PricingError;

    fn try_from(raw: BTreeMap<String, i64>) -> Result<Self> {
        Self::new(raw)
    }
}

impl From<StoreyRangeTable> for BTreeMap<String, i64> {
    fn from(table: StoreyRangeTable) -> Self {
        table.ranks
    }
}

/// Parse `"NN TO MM"` into floor bounds
fn parse_floor_bounds(label: &str) -> Option<(u32, u32)> {
    let (low, high) = label.split_once(" TO ")?;
    let low: u32 = low.trim().parse().ok()?;
    let high: u32 = high.trim().parse().ok()?;
    (low <= high).then_some((low, high))
}

/// Every table the evaluator needs, loaded once and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingTables {
    models: BTreeMap<String, ModelCoefficients>,
    months: MonthOrdinalTable,
    storey_ranges: StoreyRangeTable,
    towns: Vec<String>,
    flat_models: Vec<String>,
}

impl PricingTables {
    /// Assemble and cross-check tables.
    ///
    /// `towns` / `flat_models` are the values the input layer accepts. When
    /// absent they are derived as the keys shared by every model. When
    /// present every value must have an offset in every model.
    pub fn new(
        models: BTreeMap<String, ModelCoefficients>,
        months: MonthOrdinalTable,
        storey_ranges: StoreyRangeTable,
        towns: Option<Vec<String>>,
        flat_models: Option<Vec<String>>,
    ) -> Result<Self> {
        if models.is_empty() {
            return Err(PricingError::InvalidTable(
                "coefficient table has no models".to_string(),
            ));
        }
        if months.is_empty() {
            return Err(PricingError::InvalidTable(
                "month ordinal table is empty".to_string(),
            ));
        }
        if storey_ranges.is_empty() {
            return Err(PricingError::InvalidTable(
                "storey range table is empty".to_string(),
            ));
        }

        let towns = resolve_category(&models, towns, CategoryKind::Town, |m| &m.town_offsets)?;
        let flat_models = resolve_category(&models, flat_models, CategoryKind::FlatModel, |m| {
            &m.flat_model_offsets
        })?;

        Ok(Self {
            models,
            months,
            storey_ranges,
            towns,
            flat_models,
        })
    }

    /// Coefficients for `model_id`
    pub fn model(&self, model_id: &str) -> Result<&ModelCoefficients> {
        self.models
            .get(model_id)
            .ok_or_else(|| PricingError::UnknownModel(model_id.to_string()))
    }

    /// Model ids in lexical order
    pub fn model_ids(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    /// Every model with its coefficients, by id
    pub fn models(&self) -> impl Iterator<Item = (&str, &ModelCoefficients)> {
        self.models.iter().map(|(id, coef)| (id.as_str(), coef))
    }

    /// Month ordinal table
    pub fn months(&self) -> &MonthOrdinalTable {
        &self.months
    }

    /// Storey range ordinal table
    pub fn storey_ranges(&self) -> &StoreyRangeTable {
        &self.storey_ranges
    }

    /// Accepted towns, sorted
    pub fn towns(&self) -> &[String] {
        &self.towns
    }

    /// Accepted flat models, sorted
    pub fn flat_models(&self) -> &[String] {
        &self.flat_models
    }

    /// Option lists for a form layer, storey ranges in floor order
    pub fn options(&self) -> CategoryOptions {
        CategoryOptions {
            ml_model_list: self.models.keys().cloned().collect(),
            town_list: self.towns.clone(),
            storey_range_list: self.storey_ranges.labels().map(String::from).collect(),
            flat_model_list: self.flat_models.clone(),
        }
    }
}

fn resolve_category<F>(
    models: &BTreeMap<String, ModelCoefficients>,
    listed: Option<Vec<String>>,
    kind: CategoryKind,
    offsets: F,
) -> Result<Vec<String>>
where
    F: Fn(&ModelCoefficients) -> &BTreeMap<String, f64>,
{
    match listed {
        Some(values) => {
            for (model_id, coef) in models {
                if let Some(missing) = values.iter().find(|v| !offsets(coef).contains_key(*v)) {
                    return Err(PricingError::InvalidTable(format!(
                        "model '{}' has no {} offset for '{}'",
                        model_id, kind, missing
                    )));
                }
            }
            let unique: BTreeSet<String> = values.into_iter().collect();
            Ok(unique.into_iter().collect())
        }
        None => {
            let mut iter = models.values();
            let mut shared: BTreeSet<String> = iter
                .next()
                .map(|coef| offsets(coef).keys().cloned().collect())
                .unwrap_or_default();
            for coef in iter {
                shared.retain(|key| offsets(coef).contains_key(key));
            }
            Ok(shared.into_iter().collect())
        }
    }
}
