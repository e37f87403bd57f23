// End-to-end: catalog file -> local reference files -> preview + chart data

use chrono::NaiveDate;
use growth_charts::{
    ChildProfile, ComparisonService, Curve, FileFetcher, Gender, GrowthError, GrowthSession, Indicator,
    MeasurementInput, ReferenceCatalog, ScoreType, SourceFetcher,
};
use std::fs;
use std::path::Path;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn write_fixtures(dir: &Path) {
    fs::write(
        dir.join("who_links.json"),
        r#"{
            "weight-for-age": {
                "z": { "girls": { "0-5": "wfa_girls_z_0_5.csv" } },
                "p": { "girls": { "0-5": "wfa_girls_p_0_5.txt" } }
            },
            "length-height-for-age": {
                "z": { "girls": { "2-5": "broken_lhfa.csv" } }
            },
            "head-circumference-for-age": {
                "z": { "girls": { "0-5": "missing_file.csv" } }
            }
        }"#,
    )
    .unwrap();

    let mut wfa = String::from("Month,L,M,S,SD3neg,SD2neg,SD1neg,SD0,SD1,SD2,SD3\n");
    for month in 30..45 {
        let m = month as f64;
        wfa.push_str(&format!(
            "{},1,{:.1},0.12,{:.1},{:.1},{:.1},{:.1},{:.1},{:.1},{:.1}\n",
            month,
            m * 0.4,
            m * 0.28,
            m * 0.31,
            m * 0.35,
            m * 0.4,
            m * 0.45,
            m * 0.5,
            m * 0.56
        ));
    }
    // structurally incomplete row: no median
    wfa.push_str("45,1,,0.12,12,13,14,,16,17,18\n");
    fs::write(dir.join("wfa_girls_z_0_5.csv"), wfa).unwrap();

    fs::write(
        dir.join("wfa_girls_p_0_5.txt"),
        "Month\tL\tM\tS\tP3\tP5\tP50\tP85\tP97\n36\t1\t13.9\t0.1\t11.0\t11.3\t13.9\t15.8\t17.2\n37\t1\t14.0\t0.1\t11.1\t11.4\t14.0\t16.0\t17.4\n",
    )
    .unwrap();

    fs::write(dir.join("broken_lhfa.csv"), "Age,SD0\n24,86.4\n").unwrap();
}

fn service(dir: &Path) -> ComparisonService<SourceFetcher> {
    let catalog = ReferenceCatalog::from_file(dir.join("who_links.json")).unwrap();
    let fetcher = SourceFetcher::offline(FileFetcher::with_base_dir(dir));
    ComparisonService::new(catalog, fetcher)
}

fn session() -> GrowthSession {
    let mut session = GrowthSession::demo(ChildProfile::new("Sofia Ruiz", Gender::Female, date(2022, 2, 13)));
    session.add(MeasurementInput::on(date(2025, 6, 20)).weight(14.6).height(97.0));
    session
}

#[test]
fn test_weight_for_age_z_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    write_fixtures(dir.path());

    let result = service(dir.path())
        .compare(&session(), Indicator::WeightForAge, ScoreType::Z, date(2025, 3, 14))
        .unwrap();

    assert_eq!(result.selection.identifier, "wfa_girls_z_0_5.csv");

    // incomplete row 45 dropped
    let median = result.chart.curve(Curve::Sd0).unwrap();
    assert_eq!(median.len(), 15);
    assert_eq!(median.last().unwrap().0, 44.0);
    assert_eq!(result.chart.curves.len(), 7);

    // preview centered on 37 months
    let preview_x: Vec<f64> = result.preview.iter().map(|r| r.x).collect();
    assert_eq!(preview_x, vec![35.0, 36.0, 37.0, 38.0, 39.0]);

    assert_eq!(
        result.chart.child_series.points,
        vec![(34.0, 13.5), (37.0, 14.0), (40.0, 14.6)]
    );
}

#[test]
fn test_percentile_tab_separated_table() {
    let dir = tempfile::tempdir().unwrap();
    write_fixtures(dir.path());

    let result = service(dir.path())
        .compare(&session(), Indicator::WeightForAge, ScoreType::Percentile, date(2025, 3, 14))
        .unwrap();

    assert_eq!(result.chart.title, "Weight for age (P)");
    assert_eq!(result.chart.curves.len(), 5);
    assert_eq!(result.chart.curve(Curve::P97).unwrap(), &[(36.0, 17.2), (37.0, 17.4)]);
}

#[test]
fn test_catalog_miss_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    write_fixtures(dir.path());

    let result = service(dir.path()).compare(&session(), Indicator::BmiForAge, ScoreType::Z, date(2025, 3, 14));

    let err = result.unwrap_err();
    assert!(matches!(err, GrowthError::NotFound { .. }));
    assert!(err.to_string().contains("body-mass-index-for-age"));
}

#[test]
fn test_table_without_x_column_is_malformed() {
    let dir = tempfile::tempdir().unwrap();
    write_fixtures(dir.path());

    let result = service(dir.path()).compare(&session(), Indicator::HeightForAge, ScoreType::Z, date(2025, 3, 14));
    assert!(matches!(result, Err(GrowthError::MalformedTable { .. })));
}

#[test]
fn test_missing_reference_file_is_fetch_error() {
    let dir = tempfile::tempdir().unwrap();
    write_fixtures(dir.path());

    let result = service(dir.path()).compare(
        &session(),
        Indicator::HeadCircumferenceForAge,
        ScoreType::Z,
        date(2025, 3, 14),
    );
    assert!(matches!(result, Err(GrowthError::Fetch { .. })));
}

#[test]
fn test_export_after_edits() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = session();
    session.remove(0);

    let path = session.export_csv(dir.path()).unwrap();
    assert_eq!(path.file_name().unwrap(), "Sofia_Ruiz_growth_data.csv");

    let content = fs::read_to_string(path).unwrap();
    assert_eq!(content.lines().count(), 3);
}
