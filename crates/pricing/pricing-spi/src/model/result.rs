//! Prediction result model

use serde::{Deserialize, Serialize};

/// One labelled value of a trend series, as exchanged with scoring endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// `YYYY-MM` label
    pub label: String,
    /// Predicted price
    pub data: f64,
}

/// Ordered trend series; `labels[i]` belongs to `values[i]`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Month labels in chronological order
    pub labels: Vec<String>,
    /// Predicted prices
    pub values: Vec<f64>,
}

impl PredictionResult {
    /// Number of points
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the series is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of the last month, shown as the headline prediction
    pub fn latest(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// Value for a given label
    pub fn value_for(&self, label: &str) -> Option<f64> {
        self.labels
            .iter()
            .position(|l| l == label)
            .and_then(|i| self.values.get(i).copied())
    }

    /// Labelled points
    pub fn points(&self) -> impl Iterator<Item = TrendPoint> + '_ {
        self.labels
            .iter()
            .zip(&self.values)
            .map(|(label, &data)| TrendPoint {
                label: label.clone(),
                data,
            })
    }
}

impl FromIterator<TrendPoint> for PredictionResult {
    fn from_iter<I: IntoIterator<Item = TrendPoint>>(iter: I) -> Self {
        let (labels, values) = iter.into_iter().map(|p| (p.label, p.data)).unzip();
        Self { labels, values }
    }
}
