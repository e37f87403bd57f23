// Growth Charts - Core Library
// Exposes all modules for use in CLI, TUI, and tests

pub mod error;
pub mod indicators;
pub mod age_range;   // Age bracket per indicator
pub mod catalog;     // Links as data
pub mod fetch;       // Byte retrieval (file, http, cache)
pub mod decode;      // Tabular decoding (csv, tsv, xlsx)
pub mod reference;   // Normalized WHO tables
pub mod window;      // Preview window
pub mod metrics;     // Age in months, BMI
pub mod session;     // Child profile + history
pub mod chart;       // Chart data assembly
pub mod comparison;  // One chart request end to end
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use error::{GrowthError, GrowthResult};
pub use indicators::{
    AgeRange, ChildMetric, Curve, Gender, Indicator, ScoreType, XAxis,
};
pub use age_range::resolve;
pub use catalog::{ReferenceCatalog, Selection};
pub use fetch::{ByteFetcher, CachingFetcher, FileFetcher, SourceFetcher};
pub use decode::{decoder_for, DelimitedDecoder, RawTable, TableDecoder};
pub use reference::{normalize, ReferenceRow, ReferenceTable, ReferenceTableProvider};
pub use window::{window, DEFAULT_WINDOW};
pub use session::{ChildProfile, GrowthSession, MeasurementInput, MeasurementRecord};
pub use chart::{assemble, ChartData, ChildSeries, CurveSeries};
pub use comparison::{Comparison, ComparisonService};
pub use config::AppConfig;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
