// 📈 Reference Tables - Normalization of WHO datasets
// Typed column mapping validated once, at load time

use crate::catalog::Selection;
use crate::decode::{decoder_for, RawTable};
use crate::error::{GrowthError, GrowthResult};
use crate::fetch::ByteFetcher;
use crate::indicators::{Curve, Indicator, ScoreType, XAxis};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Average month length used to express week-based tables in months
const DAYS_PER_MONTH: f64 = 30.4375;

// ============================================================================
// CORE TYPES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceRow {
    pub x: f64,
    /// Curves present in this row; non-numeric cells are simply absent
    pub values: BTreeMap<Curve, f64>,
}

impl ReferenceRow {
    pub fn new(x: f64) -> Self {
        ReferenceRow {
            x,
            values: BTreeMap::new(),
        }
    }

    pub fn with_value(mut self, curve: Curve, value: f64) -> Self {
        self.values.insert(curve, value);
        self
    }

    pub fn value(&self, curve: Curve) -> Option<f64> {
        self.values.get(&curve).copied()
    }
}

/// ReferenceTable - Normalized rows for one (indicator, score type) selection.
/// Immutable once built; owned by a single chart request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceTable {
    pub identifier: String,
    pub score_type: ScoreType,
    pub x_axis: XAxis,
    pub rows: Vec<ReferenceRow>,
}

impl ReferenceTable {
    pub fn new(identifier: impl Into<String>, score_type: ScoreType, x_axis: XAxis, rows: Vec<ReferenceRow>) -> Self {
        ReferenceTable {
            identifier: identifier.into(),
            score_type,
            x_axis,
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Curves of this score type, in display order
    pub fn curves(&self) -> &'static [Curve] {
        self.score_type.curves()
    }
}

// ============================================================================
// NORMALIZATION
// ============================================================================

/// Lenient numeric coercion: anything unparsable or non-finite is missing
pub fn coerce_number(cell: &str) -> Option<f64> {
    let value: f64 = cell.trim().parse().ok()?;
    if value.is_finite() {
        Some(value)
    } else {
        None
    }
}

/// Map a decoded table onto the fixed curve-label set.
///
/// - x-column found by its WHO header name (`Week` is converted to months)
/// - rows whose x or center curve is missing are dropped
/// - fails with `MalformedTable` when no x-column exists
pub fn normalize(
    identifier: &str,
    raw: &RawTable,
    indicator: Indicator,
    score_type: ScoreType,
) -> GrowthResult<ReferenceTable> {
    let x_axis = indicator.x_axis();

    let (x_index, x_name) = x_axis
        .source_columns()
        .iter()
        .find_map(|name| raw.column_index(name).map(|idx| (idx, *name)))
        .ok_or_else(|| {
            GrowthError::malformed(
                identifier,
                format!(
                    "missing x-column (expected one of {:?}, found {:?})",
                    x_axis.source_columns(),
                    raw.headers
                ),
            )
        })?;

    let in_weeks = x_name == "Week";

    let curve_columns: Vec<(Curve, usize)> = score_type
        .curves()
        .iter()
        .filter_map(|curve| raw.column_index(curve.source_column()).map(|idx| (*curve, idx)))
        .collect();

    let center = score_type.center_curve();
    let mut rows = Vec::with_capacity(raw.len());
    let mut dropped = 0usize;

    for row_idx in 0..raw.len() {
        let x = match coerce_number(raw.cell(row_idx, x_index)) {
            Some(x) if in_weeks => x * 7.0 / DAYS_PER_MONTH,
            Some(x) => x,
            None => {
                dropped += 1;
                continue;
            }
        };

        let mut row = ReferenceRow::new(x);
        for (curve, col_idx) in &curve_columns {
            if let Some(value) = coerce_number(raw.cell(row_idx, *col_idx)) {
                row.values.insert(*curve, value);
            }
        }

        if row.value(center).is_none() {
            dropped += 1;
            continue;
        }

        rows.push(row);
    }

    if dropped > 0 {
        warn!(identifier, dropped, "dropped incomplete reference rows");
    }
    debug!(identifier, rows = rows.len(), x_column = x_name, "reference table normalized");

    Ok(ReferenceTable::new(identifier, score_type, x_axis, rows))
}

// ============================================================================
// PROVIDER
// ============================================================================

/// ReferenceTableProvider - fetch bytes, decode, normalize
pub struct ReferenceTableProvider<F: ByteFetcher> {
    fetcher: F,
}

impl<F: ByteFetcher> ReferenceTableProvider<F> {
    pub fn new(fetcher: F) -> Self {
        ReferenceTableProvider { fetcher }
    }

    pub fn fetch(&self, identifier: &str, indicator: Indicator, score_type: ScoreType) -> GrowthResult<ReferenceTable> {
        let bytes = self.fetcher.fetch(identifier)?;
        let decoder = decoder_for(identifier)?;
        let raw = decoder.decode(identifier, &bytes)?;

        normalize(identifier, &raw, indicator, score_type)
    }

    pub fn fetch_selection(&self, selection: &Selection) -> GrowthResult<ReferenceTable> {
        self.fetch(&selection.identifier, selection.indicator, selection.score_type)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::{DelimitedDecoder, TableDecoder};

    fn raw(csv: &str) -> RawTable {
        DelimitedDecoder::csv().decode("test.csv", csv.as_bytes()).unwrap()
    }

    struct StaticFetcher(&'static str);

    impl ByteFetcher for StaticFetcher {
        fn fetch(&self, _identifier: &str) -> GrowthResult<Vec<u8>> {
            Ok(self.0.as_bytes().to_vec())
        }
    }

    struct FailingFetcher;

    impl ByteFetcher for FailingFetcher {
        fn fetch(&self, identifier: &str) -> GrowthResult<Vec<u8>> {
            Err(GrowthError::fetch(identifier, "HTTP 503"))
        }
    }

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_number(" 3.5 "), Some(3.5));
        assert_eq!(coerce_number("abc"), None);
        assert_eq!(coerce_number(""), None);
        assert_eq!(coerce_number("NaN"), None);
    }

    #[test]
    fn test_normalize_zscore_table() {
        let table = raw(
            "Month,L,M,S,SD3neg,SD2neg,SD1neg,SD0,SD1,SD2,SD3\n\
             24,1,12.15,0.11,8.6,9.7,10.8,12.2,13.6,15.3,17.1\n\
             25,1,12.36,0.11,8.8,9.8,11.0,12.4,13.9,15.5,17.5\n",
        );
        let normalized = normalize("wfa.csv", &table, Indicator::WeightForAge, ScoreType::Z).unwrap();

        assert_eq!(normalized.len(), 2);
        assert_eq!(normalized.x_axis, XAxis::Age);
        assert_eq!(normalized.rows[0].x, 24.0);
        assert_eq!(normalized.rows[0].value(Curve::Sd0), Some(12.2));
        assert_eq!(normalized.rows[1].value(Curve::SdNeg3), Some(8.8));
        assert_eq!(normalized.rows[1].values.len(), 7);
    }

    #[test]
    fn test_non_numeric_cells_become_missing() {
        let table = raw("Month,P3,P5,P50,P85,P97\n0,n/a,2.5,3.3,3.9,4.3\n");
        let normalized = normalize("p.csv", &table, Indicator::WeightForAge, ScoreType::Percentile).unwrap();

        assert_eq!(normalized.len(), 1);
        assert_eq!(normalized.rows[0].value(Curve::P3), None);
        assert_eq!(normalized.rows[0].value(Curve::P5), Some(2.5));
    }

    #[test]
    fn test_rows_missing_center_or_x_are_dropped() {
        let table = raw(
            "Month,SD2neg,SD0,SD2\n\
             0,2.5,3.3,4.4\n\
             1,3.4,,5.8\n\
             ,3.8,5.6,6.6\n\
             3,4.4,6.4,7.5\n",
        );
        let normalized = normalize("z.csv", &table, Indicator::WeightForAge, ScoreType::Z).unwrap();

        let xs: Vec<f64> = normalized.rows.iter().map(|r| r.x).collect();
        assert_eq!(xs, vec![0.0, 3.0]);
    }

    #[test]
    fn test_height_axis_and_length_alias() {
        let table = raw("Length,SD0\n45.0,2.44\n45.5,2.52\n");
        let normalized = normalize("wfl.csv", &table, Indicator::WeightForHeight, ScoreType::Z).unwrap();

        assert_eq!(normalized.x_axis, XAxis::Height);
        assert_eq!(normalized.rows[1].x, 45.5);
    }

    #[test]
    fn test_week_tables_converted_to_months() {
        let table = raw("Week,P50\n0,3.3\n13,6.4\n");
        let normalized = normalize("wk.csv", &table, Indicator::WeightForAge, ScoreType::Percentile).unwrap();

        assert_eq!(normalized.rows[0].x, 0.0);
        let thirteen_weeks = normalized.rows[1].x;
        assert!((thirteen_weeks - 2.99).abs() < 0.01, "13 weeks ~ 2.99 months, got {}", thirteen_weeks);
    }

    #[test]
    fn test_missing_x_column_is_malformed() {
        let table = raw("Month,SD0\n0,3.3\n");
        let result = normalize("wfh.csv", &table, Indicator::WeightForHeight, ScoreType::Z);

        assert!(matches!(result, Err(GrowthError::MalformedTable { .. })));
    }

    #[test]
    fn test_provider_fetch_and_normalize() {
        let provider = ReferenceTableProvider::new(StaticFetcher("Month,P3,P50,P97\n0,2.4,3.3,4.3\n1,3.2,4.5,5.7\n"));
        let table = provider
            .fetch("bfa-girls.csv", Indicator::BmiForAge, ScoreType::Percentile)
            .unwrap();

        assert_eq!(table.identifier, "bfa-girls.csv");
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_provider_surfaces_fetch_error() {
        let provider = ReferenceTableProvider::new(FailingFetcher);
        let result = provider.fetch("https://x.org/wfa.xlsx", Indicator::WeightForAge, ScoreType::Z);

        assert!(matches!(result, Err(GrowthError::Fetch { .. })));
    }
}
