//! Application constants for the epi pipeline.
//!
//! Default origin location, comparison country set, repair sentinels and
//! the rolling-window parameters used by the metric engine.

// =============================================================================
// Dataset origin
// =============================================================================

/// OWID COVID-19 compact dataset, the primary origin
pub const OWID_COMPACT_URL: &str =
    "https://catalog.ourworldindata.org/garden/covid/latest/compact/compact.csv";

/// Local cached copy consulted once when the origin is unreachable
pub const FALLBACK_FILENAME: &str = "compact.csv";

/// HTTP timeout for the single origin fetch, in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// Comparison set and repair sentinels
// =============================================================================

/// Default countries for the two-country comparison
pub const DEFAULT_COUNTRIES: &[&str] = &["Ecuador", "Peru"];

/// Sentinel substituted for a missing country value
pub const UNKNOWN_COUNTRY: &str = "Unknown";

/// Replacement for null, non-numeric or non-positive population values
pub const DEFAULT_POPULATION: f64 = 1.0;

// =============================================================================
// Metric parameters
// =============================================================================

/// Trailing rolling window applied by both indicators, in days
pub const ROLLING_WINDOW_DAYS: usize = 7;

/// Minimum rows a country needs before a growth factor can be derived
/// (one full week plus the week preceding it)
pub const MIN_GROWTH_ROWS: usize = 14;

/// Incidence is expressed per this many inhabitants
pub const INCIDENCE_SCALE: f64 = 100_000.0;

// =============================================================================
// Column names
// =============================================================================

/// Known origin column names. Anything else in the origin table is ignored.
pub mod columns {
    pub const COUNTRY: &str = "country";
    pub const DATE: &str = "date";
    pub const POPULATION: &str = "population";
    pub const NEW_CASES: &str = "new_cases";
    pub const PEOPLE_VACCINATED: &str = "people_vaccinated";

    /// Columns that must exist after cleaning
    pub const REQUIRED: &[&str] = &[COUNTRY, DATE, POPULATION];
}
