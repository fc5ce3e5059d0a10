//! Sky position value object and sexagesimal coordinate helpers.
//!
//! Catalog records carry J2000 right ascension in hours (0 to 24) and
//! declination in degrees (±90). This module provides the identity/position
//! record shared by every catalog star, along with conversions between
//! decimal and sexagesimal notation.
//!
//! # Coordinate-derived identifiers
//!
//! Catalog rows without a name are identified by their position, packed as
//! `HHMMSSss±DDMMSSss` with hundredths of a second truncated:
//!
//! ```rust
//! use field_objects::coords::coordinate_id;
//!
//! assert_eq!(coordinate_id(6.50862013, 29.688453), "06303103+29411843");
//! ```

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Identity and position of one catalog star.
///
/// The identifier is fixed at construction. Coordinates may only be changed
/// through the explicit correction setters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkyPosition {
    object_id: String,
    ra_hr: f64,
    dec_deg: f64,
}

impl SkyPosition {
    /// Create a position record, deriving the id from the coordinates when
    /// the catalog supplied none.
    pub fn new(object_id: Option<&str>, ra_hr: f64, dec_deg: f64) -> Self {
        let object_id = match object_id {
            Some(id) => id.to_string(),
            None => coordinate_id(ra_hr, dec_deg),
        };
        Self {
            object_id,
            ra_hr,
            dec_deg,
        }
    }

    pub fn object_id(&self) -> &str {
        &self.object_id
    }

    /// Right ascension in hours
    pub fn ra_hr(&self) -> f64 {
        self.ra_hr
    }

    /// Declination in degrees
    pub fn dec_deg(&self) -> f64 {
        self.dec_deg
    }

    /// Correct the right ascension (hours)
    pub fn set_ra_hr(&mut self, ra_hr: f64) {
        self.ra_hr = ra_hr;
    }

    /// Correct the declination (degrees)
    pub fn set_dec_deg(&mut self, dec_deg: f64) {
        self.dec_deg = dec_deg;
    }
}

/// Split a `A:B:C` string into its three numeric fields.
///
/// The sign of the first field is returned separately so `-00:30:00` keeps
/// its negative sign.
fn split_sexagesimal(input: &str) -> Result<(bool, f64, f64, f64), CatalogError> {
    let trimmed = input.trim();
    let parts: Vec<&str> = trimmed.split(':').collect();
    if parts.len() != 3 {
        return Err(CatalogError::MalformedSexagesimal(input.to_string()));
    }

    let first = parts[0].trim();
    let (negative, first) = match first.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, first.strip_prefix('+').unwrap_or(first)),
    };

    let parse = |field: &str| -> Result<f64, CatalogError> {
        field
            .trim()
            .parse::<f64>()
            .map_err(|_| CatalogError::InvalidNumber {
                field: field.to_string(),
                input: input.to_string(),
            })
    };

    let whole = parse(first)?;
    let minutes = parse(parts[1])?;
    let seconds = parse(parts[2])?;

    if !(0.0..60.0).contains(&minutes) {
        return Err(CatalogError::OutOfRange {
            name: "Minutes",
            value: minutes,
            min: 0.0,
            max: 60.0,
        });
    }
    if !(0.0..60.0).contains(&seconds) {
        return Err(CatalogError::OutOfRange {
            name: "Seconds",
            value: seconds,
            min: 0.0,
            max: 60.0,
        });
    }

    Ok((negative, whole, minutes, seconds))
}

/// Convert right ascension `HH:MM:SS.sss` to decimal hours.
///
/// # Errors
/// Returns an error for malformed input or fields outside their ranges.
pub fn ra_hms_to_ra_hr(hms: &str) -> Result<f64, CatalogError> {
    let (negative, hours, minutes, seconds) = split_sexagesimal(hms)?;
    let ra_hr = hours + minutes / 60.0 + seconds / SECONDS_PER_HOUR;

    if negative || !(0.0..24.0).contains(&ra_hr) {
        return Err(CatalogError::OutOfRange {
            name: "RA hours",
            value: if negative { -ra_hr } else { ra_hr },
            min: 0.0,
            max: 24.0,
        });
    }
    Ok(ra_hr)
}

/// Convert declination `±DD:MM:SS.ss` to decimal degrees.
///
/// # Errors
/// Returns an error for malformed input or a result beyond ±90°.
pub fn dec_dms_to_dec_deg(dms: &str) -> Result<f64, CatalogError> {
    let (negative, degrees, minutes, seconds) = split_sexagesimal(dms)?;
    let magnitude = degrees + minutes / 60.0 + seconds / SECONDS_PER_HOUR;
    let dec_deg = if negative { -magnitude } else { magnitude };

    if !(-90.0..=90.0).contains(&dec_deg) {
        return Err(CatalogError::OutOfRange {
            name: "Dec degrees",
            value: dec_deg,
            min: -90.0,
            max: 90.0,
        });
    }
    Ok(dec_deg)
}

/// Format decimal hours as `HH:MM:SS.sss`, wrapping into 0 to 24 h.
pub fn ra_hr_to_hms(ra_hr: f64) -> String {
    const MS_PER_DAY: i64 = 24 * 3_600_000;
    let total_ms = (ra_hr * SECONDS_PER_HOUR * 1000.0).round() as i64;
    let total_ms = total_ms.rem_euclid(MS_PER_DAY);

    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let seconds = (total_ms % 60_000) / 1000;
    let millis = total_ms % 1000;
    format!("{hours:02}:{minutes:02}:{seconds:02}.{millis:03}")
}

/// Format decimal degrees as `±DD:MM:SS.ss`.
pub fn dec_deg_to_dms(dec_deg: f64) -> String {
    let sign = if dec_deg < 0.0 { '-' } else { '+' };
    let total_cs = (dec_deg.abs() * SECONDS_PER_HOUR * 100.0).round() as i64;

    let degrees = total_cs / 360_000;
    let minutes = (total_cs % 360_000) / 6000;
    let seconds = (total_cs % 6000) / 100;
    let centis = total_cs % 100;
    format!("{sign}{degrees:02}:{minutes:02}:{seconds:02}.{centis:02}")
}

/// Build a catalog-style identifier from a position.
///
/// Both coordinates are truncated to hundredths of a (time or arc) second.
pub fn coordinate_id(ra_hr: f64, dec_deg: f64) -> String {
    let ra_cs = (ra_hr * SECONDS_PER_HOUR * 100.0).floor() as i64;
    let ra_h = ra_cs / 360_000;
    let ra_m = (ra_cs % 360_000) / 6000;
    let ra_s = (ra_cs % 6000) / 100;
    let ra_c = ra_cs % 100;

    let sign = if dec_deg < 0.0 { '-' } else { '+' };
    let dec_cs = (dec_deg.abs() * SECONDS_PER_HOUR * 100.0).floor() as i64;
    let dec_d = dec_cs / 360_000;
    let dec_m = (dec_cs % 360_000) / 6000;
    let dec_s = (dec_cs % 6000) / 100;
    let dec_c = dec_cs % 100;

    format!("{ra_h:02}{ra_m:02}{ra_s:02}{ra_c:02}{sign}{dec_d:02}{dec_m:02}{dec_s:02}{dec_c:02}")
}
