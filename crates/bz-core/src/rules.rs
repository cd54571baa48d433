//! Fixed classification rules.
//!
//! These are constants of the analysis and are not exposed through configuration.

/// A zone is flagged for an area layer when the summed overlap reaches the
/// zone's own area divided by this (one tenth, inclusive). An overlap equal to
/// the rounded `area / 10` passes.
pub const AREA_THRESHOLD_DIVISOR: f64 = 10.0;

/// A zone is flagged for a point-density layer when it contains at least this
/// many points.
pub const POINT_COUNT_THRESHOLD: u64 = 3;

/// Radius, in CRS length units, of the corridor built around line features.
pub const LINE_BUFFER_DISTANCE: f64 = 15.0;

/// EPSG code of the shared projected CRS (NAD83 / New York Long Island, US feet).
pub const SHARED_EPSG: u32 = 2263;

/// Zone identifier attribute in the zone input and every output table.
pub const UNIQUE_ID_FIELD: &str = "unique_id";

/// Zone area column in the final table.
pub const AREA_FIELD: &str = "area";

/// Prefix for zone attributes passed through to the final table.
pub const ZONE_ATTRIBUTE_PREFIX: &str = "zone.";
