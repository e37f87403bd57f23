// 📏 Indicators - Core vocabulary
// Indicator, score type, gender, age range and curve labels as typed values

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// INDICATOR
// ============================================================================

/// Indicator - Which WHO growth standard the child is compared against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Indicator {
    HeightForAge,
    WeightForAge,
    WeightForHeight,
    BmiForAge,
    HeadCircumferenceForAge,
}

impl Indicator {
    pub const ALL: [Indicator; 5] = [
        Indicator::HeightForAge,
        Indicator::WeightForAge,
        Indicator::WeightForHeight,
        Indicator::BmiForAge,
        Indicator::HeadCircumferenceForAge,
    ];

    /// Key used by the catalog data file
    pub fn key(&self) -> &'static str {
        match self {
            Indicator::HeightForAge => "length-height-for-age",
            Indicator::WeightForAge => "weight-for-age",
            Indicator::WeightForHeight => "weight-for-length-height",
            Indicator::BmiForAge => "body-mass-index-for-age",
            Indicator::HeadCircumferenceForAge => "head-circumference-for-age",
        }
    }

    /// Human-readable name for display
    pub fn name(&self) -> &'static str {
        match self {
            Indicator::HeightForAge => "Height for age",
            Indicator::WeightForAge => "Weight for age",
            Indicator::WeightForHeight => "Weight for height",
            Indicator::BmiForAge => "BMI for age",
            Indicator::HeadCircumferenceForAge => "Head circumference for age",
        }
    }

    /// x-axis of both the reference table and the child series
    pub fn x_axis(&self) -> XAxis {
        match self {
            Indicator::WeightForHeight => XAxis::Height,
            _ => XAxis::Age,
        }
    }

    /// Child measurement plotted on the y-axis
    pub fn child_metric(&self) -> ChildMetric {
        match self {
            Indicator::HeightForAge => ChildMetric::Height,
            Indicator::WeightForAge | Indicator::WeightForHeight => ChildMetric::Weight,
            Indicator::BmiForAge => ChildMetric::Bmi,
            Indicator::HeadCircumferenceForAge => ChildMetric::HeadCircumference,
        }
    }

    pub fn next(&self) -> Self {
        let idx = Self::ALL.iter().position(|i| i == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn previous(&self) -> Self {
        let idx = Self::ALL.iter().position(|i| i == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Indicator {
    type Err = String;

    /// Accepts both the short names and the catalog keys
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "height-for-age" | "length-for-age" | "length-height-for-age" => Ok(Indicator::HeightForAge),
            "weight-for-age" => Ok(Indicator::WeightForAge),
            "weight-for-height" | "weight-for-length" | "weight-for-length-height" => {
                Ok(Indicator::WeightForHeight)
            }
            "bmi-for-age" | "body-mass-index-for-age" => Ok(Indicator::BmiForAge),
            "head-circumference-for-age" => Ok(Indicator::HeadCircumferenceForAge),
            other => Err(format!("unknown indicator: {}", other)),
        }
    }
}

// ============================================================================
// AXES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum XAxis {
    Age,
    Height,
}

impl XAxis {
    pub fn label(&self) -> &'static str {
        match self {
            XAxis::Age => "Age (months)",
            XAxis::Height => "Height (cm)",
        }
    }

    /// Header names this axis may carry in the WHO source tables
    pub fn source_columns(&self) -> &'static [&'static str] {
        match self {
            XAxis::Age => &["Month", "Week"],
            XAxis::Height => &["Height", "Length"],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChildMetric {
    Height,
    Weight,
    Bmi,
    HeadCircumference,
}

impl ChildMetric {
    pub fn label(&self) -> &'static str {
        match self {
            ChildMetric::Height => "Height (cm)",
            ChildMetric::Weight => "Weight (kg)",
            ChildMetric::Bmi => "BMI (kg/m²)",
            ChildMetric::HeadCircumference => "Head circumference (cm)",
        }
    }
}

// ============================================================================
// SCORE TYPE & CURVES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoreType {
    Z,
    Percentile,
}

impl ScoreType {
    /// Key used by the catalog data file
    pub fn key(&self) -> &'static str {
        match self {
            ScoreType::Z => "z",
            ScoreType::Percentile => "p",
        }
    }

    /// Fixed curve set exposed by this score type
    pub fn curves(&self) -> &'static [Curve] {
        match self {
            ScoreType::Z => &[
                Curve::SdNeg3,
                Curve::SdNeg2,
                Curve::SdNeg1,
                Curve::Sd0,
                Curve::SdPos1,
                Curve::SdPos2,
                Curve::SdPos3,
            ],
            ScoreType::Percentile => &[Curve::P3, Curve::P5, Curve::P50, Curve::P85, Curve::P97],
        }
    }

    /// Rows without this curve are structurally incomplete
    pub fn center_curve(&self) -> Curve {
        match self {
            ScoreType::Z => Curve::Sd0,
            ScoreType::Percentile => Curve::P50,
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            ScoreType::Z => ScoreType::Percentile,
            ScoreType::Percentile => ScoreType::Z,
        }
    }
}

impl fmt::Display for ScoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ScoreType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "z" | "zscore" | "z-score" => Ok(ScoreType::Z),
            "p" | "percentile" => Ok(ScoreType::Percentile),
            other => Err(format!("unknown score type: {}", other)),
        }
    }
}

/// Curve - One reference line of a WHO table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Curve {
    #[serde(rename = "-3 SD")]
    SdNeg3,
    #[serde(rename = "-2 SD")]
    SdNeg2,
    #[serde(rename = "-1 SD")]
    SdNeg1,
    #[serde(rename = "0 SD")]
    Sd0,
    #[serde(rename = "+1 SD")]
    SdPos1,
    #[serde(rename = "+2 SD")]
    SdPos2,
    #[serde(rename = "+3 SD")]
    SdPos3,
    P3,
    P5,
    P50,
    P85,
    P97,
}

impl Curve {
    pub fn label(&self) -> &'static str {
        match self {
            Curve::SdNeg3 => "-3 SD",
            Curve::SdNeg2 => "-2 SD",
            Curve::SdNeg1 => "-1 SD",
            Curve::Sd0 => "0 SD",
            Curve::SdPos1 => "+1 SD",
            Curve::SdPos2 => "+2 SD",
            Curve::SdPos3 => "+3 SD",
            Curve::P3 => "P3",
            Curve::P5 => "P5",
            Curve::P50 => "P50",
            Curve::P85 => "P85",
            Curve::P97 => "P97",
        }
    }

    /// Column header in the WHO source tables
    pub fn source_column(&self) -> &'static str {
        match self {
            Curve::SdNeg3 => "SD3neg",
            Curve::SdNeg2 => "SD2neg",
            Curve::SdNeg1 => "SD1neg",
            Curve::Sd0 => "SD0",
            Curve::SdPos1 => "SD1",
            Curve::SdPos2 => "SD2",
            Curve::SdPos3 => "SD3",
            Curve::P3 => "P3",
            Curve::P5 => "P5",
            Curve::P50 => "P50",
            Curve::P85 => "P85",
            Curve::P97 => "P97",
        }
    }

    /// Display color: center green, then yellow/orange/red moving outward
    pub fn color(&self) -> &'static str {
        match self {
            Curve::Sd0 | Curve::P50 => "green",
            Curve::SdNeg1 | Curve::SdPos1 => "yellow",
            Curve::SdNeg2 | Curve::SdPos2 | Curve::P5 | Curve::P85 => "orange",
            Curve::SdNeg3 | Curve::SdPos3 | Curve::P3 | Curve::P97 => "red",
        }
    }
}

// ============================================================================
// GENDER
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Normalize a free-form label. Only the exact "female" label maps to
    /// Female; everything else falls back to Male.
    pub fn from_label(label: &str) -> Self {
        if label == "female" {
            Gender::Female
        } else {
            if label != "male" {
                tracing::warn!(label, "unrecognized gender label, treating as male");
            }
            Gender::Male
        }
    }

    /// Key used by the catalog data file
    pub fn catalog_key(&self) -> &'static str {
        match self {
            Gender::Male => "boys",
            Gender::Female => "girls",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

// ============================================================================
// AGE RANGE
// ============================================================================

/// AgeRange - Catalog bracket key, never shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeRange {
    #[serde(rename = "0-13-weeks")]
    ZeroToThirteenWeeks,
    #[serde(rename = "0-2")]
    ZeroToTwoYears,
    #[serde(rename = "2-5")]
    TwoToFiveYears,
    #[serde(rename = "0-5")]
    ZeroToFiveYears,
    #[serde(rename = "0-13")]
    ZeroToThirteenMonths,
}

impl AgeRange {
    pub fn key(&self) -> &'static str {
        match self {
            AgeRange::ZeroToThirteenWeeks => "0-13-weeks",
            AgeRange::ZeroToTwoYears => "0-2",
            AgeRange::TwoToFiveYears => "2-5",
            AgeRange::ZeroToFiveYears => "0-5",
            AgeRange::ZeroToThirteenMonths => "0-13",
        }
    }
}

impl fmt::Display for AgeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ============================================================================
// TESTS
// ============================================================================
