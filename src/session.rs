// 👶 Growth Session - One child, one measurement history
// Explicit session object passed by reference; derived fields are read-only

use crate::indicators::{ChildMetric, Gender, XAxis};
use crate::metrics;
use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::info;

// ============================================================================
// CORE TYPES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildProfile {
    pub name: String,
    pub gender: Gender,
    pub birthdate: NaiveDate,
}

impl ChildProfile {
    pub fn new(name: impl Into<String>, gender: Gender, birthdate: NaiveDate) -> Self {
        ChildProfile {
            name: name.into(),
            gender,
            birthdate,
        }
    }

    /// Age at `today`, same calendar-month rule as the measurements
    pub fn age_months_at(&self, today: NaiveDate) -> i32 {
        metrics::age_months(self.birthdate, Some(today)).unwrap_or(0)
    }

    /// "<name with underscores>_growth_data.csv"
    pub fn export_file_name(&self) -> String {
        format!("{}_growth_data.csv", self.name.replace(' ', "_"))
    }
}

/// User-editable part of a measurement row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasurementInput {
    pub date: Option<NaiveDate>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub head_circ_cm: Option<f64>,
}

impl MeasurementInput {
    pub fn on(date: NaiveDate) -> Self {
        MeasurementInput {
            date: Some(date),
            ..Default::default()
        }
    }

    pub fn weight(mut self, kg: f64) -> Self {
        self.weight_kg = Some(kg);
        self
    }

    pub fn height(mut self, cm: f64) -> Self {
        self.height_cm = Some(cm);
        self
    }

    pub fn head_circumference(mut self, cm: f64) -> Self {
        self.head_circ_cm = Some(cm);
        self
    }
}

/// MeasurementRecord - Raw inputs plus derived age/BMI.
/// Derived fields have no setters; they are refreshed by the session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementRecord {
    input: MeasurementInput,
    age_months: Option<i32>,
    bmi: Option<f64>,
}

impl MeasurementRecord {
    fn derive(input: MeasurementInput, birthdate: NaiveDate) -> Self {
        let age_months = metrics::age_months(birthdate, input.date);
        let bmi = metrics::bmi(input.weight_kg, input.height_cm);
        MeasurementRecord { input, age_months, bmi }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.input.date
    }

    pub fn weight_kg(&self) -> Option<f64> {
        self.input.weight_kg
    }

    pub fn height_cm(&self) -> Option<f64> {
        self.input.height_cm
    }

    pub fn head_circ_cm(&self) -> Option<f64> {
        self.input.head_circ_cm
    }

    pub fn age_months(&self) -> Option<i32> {
        self.age_months
    }

    pub fn bmi(&self) -> Option<f64> {
        self.bmi
    }

    pub fn input(&self) -> &MeasurementInput {
        &self.input
    }

    pub fn x_value(&self, axis: XAxis) -> Option<f64> {
        match axis {
            XAxis::Age => self.age_months.map(f64::from),
            XAxis::Height => self.input.height_cm,
        }
    }

    pub fn metric(&self, metric: ChildMetric) -> Option<f64> {
        match metric {
            ChildMetric::Height => self.input.height_cm,
            ChildMetric::Weight => self.input.weight_kg,
            ChildMetric::Bmi => self.bmi,
            ChildMetric::HeadCircumference => self.input.head_circ_cm,
        }
    }
}

// ============================================================================
// CSV ROWS
// ============================================================================

#[derive(Debug, Serialize)]
struct ExportRow {
    #[serde(rename = "Date")]
    date: Option<String>,
    #[serde(rename = "Age (months)")]
    age_months: Option<i32>,
    #[serde(rename = "Weight (kg)")]
    weight_kg: Option<f64>,
    #[serde(rename = "Height (cm)")]
    height_cm: Option<f64>,
    #[serde(rename = "Head circumference (cm)")]
    head_circ_cm: Option<f64>,
    #[serde(rename = "BMI")]
    bmi: Option<f64>,
}

/// Import keeps cells as text so one bad cell never rejects the row
#[derive(Debug, Deserialize)]
struct ImportRow {
    #[serde(rename = "Date", default)]
    date: String,
    #[serde(rename = "Weight (kg)", default)]
    weight_kg: String,
    #[serde(rename = "Height (cm)", default)]
    height_cm: String,
    #[serde(rename = "Head circumference (cm)", default)]
    head_circ_cm: String,
}

// ============================================================================
// SESSION
// ============================================================================

/// GrowthSession - Owns the profile and the history (entry order, not
/// necessarily chronological). Only explicit edits mutate it.
#[derive(Debug, Clone, Serialize)]
pub struct GrowthSession {
    profile: ChildProfile,
    history: Vec<MeasurementRecord>,
}

impl GrowthSession {
    pub fn new(profile: ChildProfile) -> Self {
        GrowthSession {
            profile,
            history: Vec::new(),
        }
    }

    /// Session seeded with two example measurements
    pub fn demo(profile: ChildProfile) -> Self {
        let mut session = GrowthSession::new(profile);
        if let Some(d) = NaiveDate::from_ymd_opt(2024, 12, 14) {
            session.add(MeasurementInput::on(d).weight(13.5).height(92.0));
        }
        if let Some(d) = NaiveDate::from_ymd_opt(2025, 3, 14) {
            session.add(MeasurementInput::on(d).weight(14.0).height(94.0).head_circumference(50.0));
        }
        session
    }

    pub fn profile(&self) -> &ChildProfile {
        &self.profile
    }

    pub fn records(&self) -> &[MeasurementRecord] {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Append a row, returns its index
    pub fn add(&mut self, input: MeasurementInput) -> usize {
        self.history.push(MeasurementRecord::derive(input, self.profile.birthdate));
        self.recompute();
        self.history.len() - 1
    }

    /// Replace the inputs of an existing row
    pub fn update(&mut self, index: usize, input: MeasurementInput) -> Result<()> {
        if index >= self.history.len() {
            bail!("No measurement at row {} (history has {} rows)", index, self.history.len());
        }
        self.history[index] = MeasurementRecord::derive(input, self.profile.birthdate);
        self.recompute();
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Option<MeasurementRecord> {
        if index >= self.history.len() {
            return None;
        }
        let removed = self.history.remove(index);
        self.recompute();
        Some(removed)
    }

    /// Refresh every derived field from the raw inputs
    fn recompute(&mut self) {
        let birthdate = self.profile.birthdate;
        for record in self.history.iter_mut() {
            *record = MeasurementRecord::derive(record.input.clone(), birthdate);
        }
    }

    /// Most recently entered height, the preview target for weight-for-height
    pub fn latest_height(&self) -> Option<f64> {
        self.history.iter().rev().find_map(|r| r.height_cm())
    }

    // ========================================================================
    // PERSISTENCE
    // ========================================================================

    /// Write the history to `<dir>/<name>_growth_data.csv`
    pub fn export_csv(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(self.profile.export_file_name());
        let file = File::create(&path)
            .with_context(|| format!("Failed to create export file: {}", path.display()))?;

        let mut writer = csv::Writer::from_writer(file);
        for record in &self.history {
            writer.serialize(ExportRow {
                date: record.date().map(|d| d.format("%Y-%m-%d").to_string()),
                age_months: record.age_months(),
                weight_kg: record.weight_kg(),
                height_cm: record.height_cm(),
                head_circ_cm: record.head_circ_cm(),
                bmi: record.bmi(),
            })?;
        }
        writer.flush()?;

        info!(path = %path.display(), rows = self.history.len(), "growth data exported");
        Ok(path)
    }

    /// Read a history CSV (export layout). Derived columns in the file are
    /// ignored and recomputed.
    pub fn load_csv(profile: ChildProfile, path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open file: {}", path.display()))?;
        let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(file);

        let mut session = GrowthSession::new(profile);
        for (line_num, result) in reader.deserialize::<ImportRow>().enumerate() {
            let row = result.with_context(|| {
                format!("Failed to parse CSV line {} in {}", line_num + 2, path.display())
            })?;

            session.history.push(MeasurementRecord::derive(
                MeasurementInput {
                    date: metrics::parse_date(&row.date),
                    weight_kg: metrics::parse_measurement(&row.weight_kg),
                    height_cm: metrics::parse_measurement(&row.height_cm),
                    head_circ_cm: metrics::parse_measurement(&row.head_circ_cm),
                },
                session.profile.birthdate,
            ));
        }
        session.recompute();

        Ok(session)
    }
}

// ============================================================================
// TESTS
// ============================================================================
