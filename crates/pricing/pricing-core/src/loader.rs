//! Static JSON table loading
//!
//! Table documents follow the layout published next to the models:
//!
//! - `ml_model.json`: `{ "<model id>": { "mapping": { ...coefficients } } }`
//! - `month.json`: `{ "YYYY-MM": ordinal }`
//! - `storey_range.json`: `{ "01 TO 03": rank }`
//! - `town.json`, `flat_model.json` (optional): accepted values as arrays

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use pricing_spi::{
    ModelCoefficients, MonthOrdinalTable, PricingError, PricingTables, Result, StoreyRangeTable,
    TableSource,
};

pub const MODELS_FILE: &str = "ml_model.json";
pub const MONTHS_FILE: &str = "month.json";
pub const STOREY_RANGES_FILE: &str = "storey_range.json";
pub const TOWNS_FILE: &str = "town.json";
pub const FLAT_MODELS_FILE: &str = "flat_model.json";

#[derive(Debug, Deserialize)]
struct ModelEntry {
    mapping: ModelCoefficients,
}

#[derive(Serialize)]
struct ModelEntryRef<'a> {
    mapping: &'a ModelCoefficients,
}

/// Raw table documents, before parsing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableDocuments {
    pub models: String,
    pub months: String,
    pub storey_ranges: String,
    pub towns: Option<String>,
    pub flat_models: Option<String>,
}

fn parse_document<T: DeserializeOwned>(file: &str, json: &str) -> Result<T> {
    serde_json::from_str(json)
        .map_err(|e| PricingError::DataSourceUnavailable(format!("{}: {}", file, e)))
}

/// Parse and validate every document into [`PricingTables`]
pub fn parse_tables(documents: &TableDocuments) -> Result<PricingTables> {
    let entries: BTreeMap<String, ModelEntry> = parse_document(MODELS_FILE, &documents.models)?;
    let models = entries
        .into_iter()
        .map(|(id, entry)| (id, entry.mapping))
        .collect();

    let months: BTreeMap<String, i64> = parse_document(MONTHS_FILE, &documents.months)?;
    let months = MonthOrdinalTable::try_from(months)?;

    let storey_ranges: BTreeMap<String, i64> =
        parse_document(STOREY_RANGES_FILE, &documents.storey_ranges)?;
    let storey_ranges = StoreyRangeTable::new(storey_ranges)?;

    let towns = documents
        .towns
        .as_deref()
        .map(|json| parse_document::<Vec<String>>(TOWNS_FILE, json))
        .transpose()?;
    let flat_models = documents
        .flat_models
        .as_deref()
        .map(|json| parse_document::<Vec<String>>(FLAT_MODELS_FILE, json))
        .transpose()?;

    PricingTables::new(models, months, storey_ranges, towns, flat_models)
}

fn render_document<T: Serialize + ?Sized>(file: &str, value: &T) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| PricingError::InvalidTable(format!("{}: {}", file, e)))
}

/// Render loaded tables back into documents [`parse_tables`] accepts.
///
/// Town and flat model lists are always written out.
pub fn render_tables(tables: &PricingTables) -> Result<TableDocuments> {
    let models: BTreeMap<&str, ModelEntryRef<'_>> = tables
        .models()
        .map(|(id, mapping)| (id, ModelEntryRef { mapping }))
        .collect();
    Ok(TableDocuments {
        models: render_document(MODELS_FILE, &models)?,
        months: render_document(MONTHS_FILE, tables.months())?,
        storey_ranges: render_document(STOREY_RANGES_FILE, tables.storey_ranges())?,
        towns: Some(render_document(TOWNS_FILE, tables.towns())?),
        flat_models: Some(render_document(FLAT_MODELS_FILE, tables.flat_models())?),
    })
}

/// Tables read from a directory of JSON files
#[derive(Debug, Clone)]
pub struct JsonDirSource {
    dir: PathBuf,
}

impl JsonDirSource {
    /// Source reading from `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory being read
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read(&self, file: &str) -> Result<String> {
        let path = self.dir.join(file);
        fs::read_to_string(&path).map_err(|e| {
            PricingError::DataSourceUnavailable(format!("{}: {}", path.display(), e))
        })
    }

    fn read_optional(&self, file: &str) -> Result<Option<String>> {
        let path = self.dir.join(file);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PricingError::DataSourceUnavailable(format!(
                "{}: {}",
                path.display(),
                e
            ))),
        }
    }

    /// Read the documents without parsing them
    pub fn documents(&self) -> Result<TableDocuments> {
        Ok(TableDocuments {
            models: self.read(MODELS_FILE)?,
            months: self.read(MONTHS_FILE)?,
            storey_ranges: self.read(STOREY_RANGES_FILE)?,
            towns: self.read_optional(TOWNS_FILE)?,
            flat_models: self.read_optional(FLAT_MODELS_FILE)?,
        })
    }
}

impl TableSource for JsonDirSource {
    fn name(&self) -> &str {
        "json-dir"
    }

    fn load(&self) -> Result<PricingTables> {
        let tables = parse_tables(&self.documents()?)?;
        tracing::info!(
            source = self.name(),
            dir = %self.dir.display(),
            models = tables.model_ids().count(),
            months = tables.months().len(),
            "loaded pricing tables"
        );
        Ok(tables)
    }
}

/// Tables held in memory, e.g. from `include_str!`
#[derive(Debug, Clone)]
pub struct StaticSource {
    documents: TableDocuments,
}

impl StaticSource {
    /// Source over in-memory documents
    pub fn new(documents: TableDocuments) -> Self {
        Self { documents }
    }
}

impl TableSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    fn load(&self) -> Result<PricingTables> {
        let tables = parse_tables(&self.documents)?;
        tracing::debug!(source = self.name(), "loaded pricing tables");
        Ok(tables)
    }
}
