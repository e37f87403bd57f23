// 📚 Reference Catalog - Links as Data
// Static nested mapping [indicator][score_type][gender][age_range] -> dataset identifier

use crate::age_range;
use crate::error::{GrowthError, GrowthResult};
use crate::indicators::{AgeRange, Gender, Indicator, ScoreType};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

type GenderRanges = HashMap<String, HashMap<String, String>>;
type ScoreGenders = HashMap<String, GenderRanges>;

/// Resolved reference selection: everything needed to fetch and label a table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selection {
    pub indicator: Indicator,
    pub score_type: ScoreType,
    pub gender: Gender,
    pub age_range: AgeRange,
    pub identifier: String,
}

// ============================================================================
// CATALOG
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceCatalog {
    entries: HashMap<String, ScoreGenders>,
}

impl ReferenceCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        ReferenceCatalog::default()
    }

    /// Load catalog from JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read catalog file: {:?}", path.as_ref()))?;

        ReferenceCatalog::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let catalog: ReferenceCatalog =
            serde_json::from_str(content).context("Failed to parse catalog JSON")?;

        debug!(entries = catalog.len(), "reference catalog loaded");
        Ok(catalog)
    }

    /// Register a single identifier (used by tests and programmatic setup)
    pub fn insert(
        &mut self,
        indicator: Indicator,
        score_type: ScoreType,
        gender: Gender,
        age_range: AgeRange,
        identifier: impl Into<String>,
    ) {
        self.entries
            .entry(indicator.key().to_string())
            .or_default()
            .entry(score_type.key().to_string())
            .or_default()
            .entry(gender.catalog_key().to_string())
            .or_default()
            .insert(age_range.key().to_string(), identifier.into());
    }

    /// Exact lookup. A miss is an error: WHO tables are not interchangeable
    /// across brackets, so no neighbouring range is tried.
    pub fn lookup(
        &self,
        indicator: Indicator,
        score_type: ScoreType,
        gender: Gender,
        age_range: AgeRange,
    ) -> GrowthResult<&str> {
        self.entries
            .get(indicator.key())
            .and_then(|by_score| by_score.get(score_type.key()))
            .and_then(|by_gender| by_gender.get(gender.catalog_key()))
            .and_then(|by_range| by_range.get(age_range.key()))
            .map(String::as_str)
            .ok_or_else(|| GrowthError::NotFound {
                indicator: indicator.key().to_string(),
                score_type: score_type.key().to_string(),
                gender: gender.catalog_key().to_string(),
                age_range: age_range.key().to_string(),
            })
    }

    /// Resolve the age bracket for the child and look up its dataset
    pub fn select(
        &self,
        indicator: Indicator,
        score_type: ScoreType,
        gender: Gender,
        age_months: i32,
    ) -> GrowthResult<Selection> {
        let age_range = age_range::resolve(indicator, age_months);
        let identifier = self.lookup(indicator, score_type, gender, age_range)?;

        debug!(
            indicator = indicator.key(),
            score_type = score_type.key(),
            gender = gender.catalog_key(),
            age_range = age_range.key(),
            identifier,
            "catalog selection resolved"
        );

        Ok(Selection {
            indicator,
            score_type,
            gender,
            age_range,
            identifier: identifier.to_string(),
        })
    }

    /// Number of leaf identifiers
    pub fn len(&self) -> usize {
        self.entries
            .values()
            .flat_map(|s| s.values())
            .flat_map(|g| g.values())
            .map(|r| r.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// TESTS
// ============================================================================
