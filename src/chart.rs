// 📊 Chart Data Assembler
// Reference curves + child trajectory in one renderable dataset; drawing is external

use crate::error::{GrowthError, GrowthResult};
use crate::indicators::{Curve, Indicator, ScoreType};
use crate::reference::ReferenceTable;
use crate::session::MeasurementRecord;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurveSeries {
    pub curve: Curve,
    pub label: &'static str,
    pub color: &'static str,
    pub dashed: bool,
    pub points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChildSeries {
    pub label: String,
    pub points: Vec<(f64, f64)>,
}

/// ChartData - Everything a renderer needs, in draw order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub title: String,
    pub indicator: Indicator,
    pub score_type: ScoreType,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub curves: Vec<CurveSeries>,
    pub child_series: ChildSeries,
}

impl ChartData {
    pub fn curve(&self, curve: Curve) -> Option<&[(f64, f64)]> {
        self.curves
            .iter()
            .find(|s| s.curve == curve)
            .map(|s| s.points.as_slice())
    }

    /// (min, max) over every plotted point, x and y
    pub fn bounds(&self) -> Option<((f64, f64), (f64, f64))> {
        let points = self
            .curves
            .iter()
            .flat_map(|s| s.points.iter())
            .chain(self.child_series.points.iter());

        let mut bounds: Option<((f64, f64), (f64, f64))> = None;
        for (x, y) in points {
            bounds = Some(match bounds {
                None => ((*x, *x), (*y, *y)),
                Some(((x0, x1), (y0, y1))) => ((x0.min(*x), x1.max(*x)), (y0.min(*y), y1.max(*y))),
            });
        }
        bounds
    }
}

/// Join a reference table with the child's history.
///
/// Fails with `NoReferenceData` when the table is empty or was normalized
/// on a different x-axis than the indicator needs.
pub fn assemble(
    indicator: Indicator,
    reference: &ReferenceTable,
    history: &[MeasurementRecord],
    child_name: &str,
) -> GrowthResult<ChartData> {
    let x_axis = indicator.x_axis();

    if reference.is_empty() {
        return Err(GrowthError::NoReferenceData {
            indicator: indicator.key().to_string(),
            reason: format!("reference table '{}' has no rows", reference.identifier),
        });
    }
    if reference.x_axis != x_axis {
        return Err(GrowthError::NoReferenceData {
            indicator: indicator.key().to_string(),
            reason: format!(
                "reference table '{}' lacks the '{}' column",
                reference.identifier,
                x_axis.label()
            ),
        });
    }

    let curves = reference
        .curves()
        .iter()
        .map(|curve| CurveSeries {
            curve: *curve,
            label: curve.label(),
            color: curve.color(),
            dashed: true,
            points: reference
                .rows
                .iter()
                .filter_map(|row| row.value(*curve).map(|y| (row.x, y)))
                .collect(),
        })
        .filter(|series| !series.points.is_empty())
        .collect();

    let metric = indicator.child_metric();
    let child_points = history
        .iter()
        .filter_map(|record| Some((record.x_value(x_axis)?, record.metric(metric)?)))
        .collect();

    Ok(ChartData {
        title: format!(
            "{} ({})",
            indicator.name(),
            reference.score_type.key().to_uppercase()
        ),
        indicator,
        score_type: reference.score_type,
        x_label: x_axis.label(),
        y_label: metric.label(),
        curves,
        child_series: ChildSeries {
            label: child_name.to_string(),
            points: child_points,
        },
    })
}
