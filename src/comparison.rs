// 🔗 Comparison - One chart request end to end
// catalog selection -> reference table -> preview window -> chart data

use crate::catalog::{ReferenceCatalog, Selection};
use crate::chart::{assemble, ChartData};
use crate::error::GrowthResult;
use crate::fetch::ByteFetcher;
use crate::indicators::{Indicator, ScoreType, XAxis};
use crate::reference::{ReferenceRow, ReferenceTableProvider};
use crate::session::GrowthSession;
use crate::window::{window, DEFAULT_WINDOW};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    pub selection: Selection,
    /// x-value the preview is centered on, when the child has one
    pub preview_target: Option<f64>,
    pub preview: Vec<ReferenceRow>,
    pub chart: ChartData,
}

pub struct ComparisonService<F: ByteFetcher> {
    catalog: ReferenceCatalog,
    provider: ReferenceTableProvider<F>,
    window_size: usize,
}

impl<F: ByteFetcher> ComparisonService<F> {
    pub fn new(catalog: ReferenceCatalog, fetcher: F) -> Self {
        ComparisonService {
            catalog,
            provider: ReferenceTableProvider::new(fetcher),
            window_size: DEFAULT_WINDOW,
        }
    }

    pub fn with_window_size(mut self, size: usize) -> Self {
        self.window_size = size;
        self
    }

    pub fn catalog(&self) -> &ReferenceCatalog {
        &self.catalog
    }

    /// Dataset the request would use, without fetching it
    pub fn select(
        &self,
        session: &GrowthSession,
        indicator: Indicator,
        score_type: ScoreType,
        today: NaiveDate,
    ) -> GrowthResult<Selection> {
        let profile = session.profile();
        self.catalog
            .select(indicator, score_type, profile.gender, profile.age_months_at(today))
    }

    /// Preview target: current age, or the latest height for weight-for-height
    pub fn preview_target(session: &GrowthSession, indicator: Indicator, today: NaiveDate) -> Option<f64> {
        match indicator.x_axis() {
            XAxis::Age => Some(f64::from(session.profile().age_months_at(today))),
            XAxis::Height => session.latest_height(),
        }
    }

    pub fn compare(
        &self,
        session: &GrowthSession,
        indicator: Indicator,
        score_type: ScoreType,
        today: NaiveDate,
    ) -> GrowthResult<Comparison> {
        let selection = self.select(session, indicator, score_type, today)?;
        let table = self.provider.fetch_selection(&selection)?;

        let preview_target = Self::preview_target(session, indicator, today);
        let preview = preview_target
            .map(|target| window(&table, target, self.window_size))
            .unwrap_or_default();

        let chart = assemble(indicator, &table, session.records(), &session.profile().name)?;

        info!(
            indicator = indicator.key(),
            score_type = score_type.key(),
            identifier = %selection.identifier,
            curves = chart.curves.len(),
            child_points = chart.child_series.points.len(),
            "comparison ready"
        );

        Ok(Comparison {
            selection,
            preview_target,
            preview,
            chart,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GrowthError;
    use crate::indicators::{AgeRange, Curve, Gender};
    use crate::session::ChildProfile;
    use std::collections::HashMap;

    struct MapFetcher(HashMap<&'static str, &'static str>);

    impl ByteFetcher for MapFetcher {
        fn fetch(&self, identifier: &str) -> GrowthResult<Vec<u8>> {
            self.0
                .get(identifier)
                .map(|s| s.as_bytes().to_vec())
                .ok_or_else(|| GrowthError::fetch(identifier, "not found"))
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn service() -> ComparisonService<MapFetcher> {
        let mut catalog = ReferenceCatalog::new();
        catalog.insert(Indicator::WeightForAge, ScoreType::Z, Gender::Female, AgeRange::ZeroToFiveYears, "wfa.csv");
        catalog.insert(Indicator::WeightForHeight, ScoreType::Percentile, Gender::Female, AgeRange::TwoToFiveYears, "wfh.csv");
        catalog.insert(Indicator::BmiForAge, ScoreType::Z, Gender::Female, AgeRange::TwoToFiveYears, "missing.csv");

        let mut files = HashMap::new();
        files.insert(
            "wfa.csv",
            "Month,SD2neg,SD0,SD2\n33,10.6,13.6,17.4\n34,10.7,13.8,17.6\n35,10.8,13.9,17.8\n36,11.0,14.1,18.1\n37,11.1,14.3,18.3\n38,11.2,14.4,18.5\n",
        );
        files.insert("wfh.csv", "Height,P3,P50,P97\n90,11.0,12.6,14.6\n92,11.5,13.2,15.3\n94,12.0,13.8,16.0\n");

        ComparisonService::new(catalog, MapFetcher(files)).with_window_size(3)
    }

    fn session() -> GrowthSession {
        GrowthSession::demo(ChildProfile::new("Ana", Gender::Female, date(2022, 2, 13)))
    }

    #[test]
    fn test_compare_weight_for_age() {
        let result = service()
            .compare(&session(), Indicator::WeightForAge, ScoreType::Z, date(2025, 3, 14))
            .unwrap();

        assert_eq!(result.selection.identifier, "wfa.csv");
        assert_eq!(result.preview_target, Some(37.0));
        let preview_x: Vec<f64> = result.preview.iter().map(|r| r.x).collect();
        assert_eq!(preview_x, vec![36.0, 37.0, 38.0]);
        assert_eq!(result.chart.curve(Curve::Sd0).unwrap().len(), 6);
        assert_eq!(result.chart.child_series.points.len(), 2);
    }

    #[test]
    fn test_weight_for_height_preview_uses_latest_height() {
        let result = service()
            .compare(&session(), Indicator::WeightForHeight, ScoreType::Percentile, date(2025, 3, 14))
            .unwrap();

        assert_eq!(result.preview_target, Some(94.0));
        assert_eq!(result.preview.len(), 3);
        assert_eq!(result.chart.x_label, "Height (cm)");
    }

    #[test]
    fn test_catalog_miss_surfaces() {
        let result = service().compare(&session(), Indicator::HeightForAge, ScoreType::Z, date(2025, 3, 14));
        assert!(matches!(result, Err(GrowthError::NotFound { .. })));
    }

    #[test]
    fn test_fetch_failure_surfaces() {
        let result = service().compare(&session(), Indicator::BmiForAge, ScoreType::Z, date(2025, 3, 14));
        assert!(matches!(result, Err(GrowthError::Fetch { .. })));
    }
}
