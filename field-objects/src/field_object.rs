//! Single catalog record for a comparison or reference star.
//!
//! A [`FieldObject`] holds the catalog data for one star returned by an
//! on-line catalog query, plus two quantities derived relative to the current
//! target star:
//!
//! - **Radial separation** in arc-minutes, from the spherical law of cosines
//! - **Delta magnitude**, `mag - target_mag`
//!
//! Filtering state is kept as two independent gates so the order in which the
//! selection filters run is visible in the data rather than implied by call
//! order. See [`FilterGates`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::coords::{dec_dms_to_dec_deg, ra_hms_to_ra_hr, SkyPosition};

/// Placeholder aperture label until aperture mapping assigns one
pub const DEFAULT_APERTURE_ID: &str = "Cnn";

/// Outcome of the two selection stages for one record.
///
/// The observation-count stage runs first and starts a fresh pass; the
/// magnitude-limit stage can only narrow what survived it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterGates {
    /// Passed the minimum number of observations
    pub observation: bool,
    /// Passed the magnitude limits
    pub magnitude: bool,
}

impl FilterGates {
    /// True when both stages pass
    pub fn passes(&self) -> bool {
        self.observation && self.magnitude
    }

    /// Start a fresh filtering pass with the observation-count result.
    pub fn reset_with_observation(&mut self, passes: bool) {
        self.observation = passes;
        self.magnitude = true;
    }

    /// Narrow the magnitude gate. Never re-opens a closed gate.
    pub fn narrow_magnitude(&mut self, in_range: bool) {
        self.magnitude &= in_range;
    }
}

impl Default for FilterGates {
    fn default() -> Self {
        Self {
            observation: true,
            magnitude: true,
        }
    }
}

fn default_n_obs() -> u32 {
    1
}

fn default_aperture_id() -> String {
    DEFAULT_APERTURE_ID.to_string()
}

fn default_true() -> bool {
    true
}

/// Catalog star with coordinates, photometry and target-relative fields.
///
/// Records are plain values: `clone()` duplicates every field, and two
/// records with identical contents are still separate entries in a
/// collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldObject {
    #[serde(flatten)]
    position: SkyPosition,
    mag: f64,
    #[serde(default)]
    mag_err: f64,
    #[serde(default = "default_n_obs")]
    n_obs: u32,
    #[serde(default = "default_aperture_id")]
    aperture_id: String,
    #[serde(default)]
    rad_sep_amin: f64,
    #[serde(default)]
    delta_mag: f64,
    #[serde(default = "default_true")]
    selected: bool,
    #[serde(default = "default_true")]
    accepted: bool,
    #[serde(default)]
    is_target: bool,
    #[serde(default)]
    gates: FilterGates,
}

impl FieldObject {
    /// Create a record from catalog values.
    ///
    /// # Arguments
    /// * `object_id` - Catalog name, or `None` to derive one from the position
    /// * `ra_hr` - J2000 right ascension in hours (0 to 24)
    /// * `dec_deg` - J2000 declination in degrees (±90)
    /// * `mag` - Catalog magnitude in the current filter band
    /// * `mag_err` - Uncertainty of `mag`
    pub fn new(object_id: Option<&str>, ra_hr: f64, dec_deg: f64, mag: f64, mag_err: f64) -> Self {
        Self {
            position: SkyPosition::new(object_id, ra_hr, dec_deg),
            mag,
            mag_err,
            n_obs: default_n_obs(),
            aperture_id: default_aperture_id(),
            rad_sep_amin: 0.0,
            delta_mag: 0.0,
            selected: true,
            accepted: true,
            is_target: false,
            gates: FilterGates::default(),
        }
    }

    /// Builder-style observation count, handy when assembling query results
    pub fn with_n_obs(mut self, n_obs: u32) -> Self {
        self.n_obs = n_obs;
        self
    }

    /// Compute the angular separation from `target` in arc-minutes and store it.
    ///
    /// Uses the spherical law of cosines:
    /// ```text
    /// cos A = sin(dec)·sin(dec0) + cos(dec)·cos(dec0)·cos(ra - ra0)
    /// ```
    /// The cosine is clamped to [-1, 1] so rounding at near-zero separation
    /// cannot push `acos` out of its domain. NaN coordinates propagate to a
    /// NaN separation.
    pub fn compute_rad_sep_amin(&mut self, target: &FieldObject) -> f64 {
        self.rad_sep_amin = angular_separation_arcmin(
            self.ra_hr(),
            self.dec_deg(),
            target.ra_hr(),
            target.dec_deg(),
        );
        self.rad_sep_amin
    }

    /// Compute `mag - target_mag` and store it.
    pub fn compute_delta_mag(&mut self, target_mag: f64) -> f64 {
        self.delta_mag = self.mag - target_mag;
        self.delta_mag
    }

    pub fn position(&self) -> &SkyPosition {
        &self.position
    }

    pub fn object_id(&self) -> &str {
        self.position.object_id()
    }

    pub fn ra_hr(&self) -> f64 {
        self.position.ra_hr()
    }

    /// Correct the right ascension (hours)
    pub fn set_ra_hr(&mut self, ra_hr: f64) {
        self.position.set_ra_hr(ra_hr);
    }

    pub fn dec_deg(&self) -> f64 {
        self.position.dec_deg()
    }

    /// Correct the declination (degrees)
    pub fn set_dec_deg(&mut self, dec_deg: f64) {
        self.position.set_dec_deg(dec_deg);
    }

    pub fn mag(&self) -> f64 {
        self.mag
    }

    pub fn set_mag(&mut self, mag: f64) {
        self.mag = mag;
    }

    pub fn mag_err(&self) -> f64 {
        self.mag_err
    }

    pub fn set_mag_err(&mut self, mag_err: f64) {
        self.mag_err = mag_err;
    }

    /// Number of observations behind the catalog magnitude
    pub fn n_obs(&self) -> u32 {
        self.n_obs
    }

    pub fn set_n_obs(&mut self, n_obs: u32) {
        self.n_obs = n_obs;
    }

    pub fn aperture_id(&self) -> &str {
        &self.aperture_id
    }

    pub fn set_aperture_id(&mut self, aperture_id: impl Into<String>) {
        self.aperture_id = aperture_id.into();
    }

    /// Separation from the last target in arc-minutes (0.0 until computed)
    pub fn rad_sep_amin(&self) -> f64 {
        self.rad_sep_amin
    }

    pub fn set_rad_sep_amin(&mut self, rad_sep_amin: f64) {
        self.rad_sep_amin = rad_sep_amin;
    }

    /// Magnitude difference from the last target (0.0 until computed)
    pub fn delta_mag(&self) -> f64 {
        self.delta_mag
    }

    pub fn set_delta_mag(&mut self, delta_mag: f64) {
        self.delta_mag = delta_mag;
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub fn is_accepted(&self) -> bool {
        self.accepted
    }

    pub fn set_accepted(&mut self, accepted: bool) {
        self.accepted = accepted;
    }

    pub fn is_target(&self) -> bool {
        self.is_target
    }

    pub fn set_target(&mut self, is_target: bool) {
        self.is_target = is_target;
    }

    /// True when the record passes the current filter criteria.
    ///
    /// Note the polarity: `true` means included.
    pub fn is_filtered(&self) -> bool {
        self.gates.passes()
    }

    pub fn gates(&self) -> FilterGates {
        self.gates
    }

    pub(crate) fn gates_mut(&mut self) -> &mut FilterGates {
        &mut self.gates
    }
}

impl Default for FieldObject {
    /// Sirius, used as a stand-in record before a query has run
    fn default() -> Self {
        // Both literals are well-formed; the fallbacks are the same values in decimal
        let ra_hr = ra_hms_to_ra_hr("06:45:08.917").unwrap_or(6.752_476_944);
        let dec_deg = dec_dms_to_dec_deg("-16:42:58.02").unwrap_or(-16.716_116_667);
        Self::new(Some("sirius"), ra_hr, dec_deg, -1.46, 0.02)
    }
}

impl fmt::Display for FieldObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FieldObject [object_id={}, ra_hr={}, dec_deg={}, mag={}, mag_err={}, n_obs={}, \
             rad_sep_amin={}, aperture_id={}, selected={}, accepted={}, is_target={}, \
             delta_mag={}, filtered={}]",
            self.object_id(),
            self.ra_hr(),
            self.dec_deg(),
            self.mag,
            self.mag_err,
            self.n_obs,
            self.rad_sep_amin,
            self.aperture_id,
            self.selected,
            self.accepted,
            self.is_target,
            self.delta_mag,
            self.is_filtered()
        )
    }
}

/// Great-circle separation in arc-minutes between two (RA hours, Dec degrees) points.
pub fn angular_separation_arcmin(ra_hr: f64, dec_deg: f64, ra0_hr: f64, dec0_deg: f64) -> f64 {
    let ra = (ra_hr * 15.0).to_radians();
    let ra0 = (ra0_hr * 15.0).to_radians();
    let dec = dec_deg.to_radians();
    let dec0 = dec0_deg.to_radians();

    let cos_a = dec.sin() * dec0.sin() + dec.cos() * dec0.cos() * (ra - ra0).cos();
    // f64::clamp passes NaN through unchanged
    cos_a.clamp(-1.0, 1.0).acos().to_degrees() * 60.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn random_star(rng: &mut ChaCha8Rng) -> FieldObject {
        FieldObject::new(
            Some("rand"),
            rng.random_range(0.0..24.0),
            rng.random_range(-90.0..=90.0),
            rng.random_range(-2.0..20.0),
            0.01,
        )
    }

    #[test]
    fn test_defaults() {
        let fo = FieldObject::new(Some("wasp12"), 6.50862013, 29.688453, 12.345, 0.23);
        assert_eq!(fo.object_id(), "wasp12");
        assert_eq!(fo.n_obs(), 1);
        assert_eq!(fo.aperture_id(), DEFAULT_APERTURE_ID);
        assert_eq!(fo.rad_sep_amin(), 0.0);
        assert_eq!(fo.delta_mag(), 0.0);
        assert!(fo.is_selected());
        assert!(fo.is_accepted());
        assert!(!fo.is_target());
        assert!(fo.is_filtered());
    }

    #[test]
    fn test_default_is_sirius() {
        let sirius = FieldObject::default();
        assert_eq!(sirius.object_id(), "sirius");
        assert_relative_eq!(sirius.ra_hr(), 6.752_476_944, epsilon = 1e-8);
        assert_relative_eq!(sirius.dec_deg(), -16.716_116_667, epsilon = 1e-8);
        assert_eq!(sirius.mag(), -1.46);
        assert_eq!(sirius.mag_err(), 0.02);
    }

    #[test]
    fn test_clone_duplicates_every_field() {
        let mut fo = FieldObject::new(None, 1.0, 2.0, 3.0, 0.1).with_n_obs(7);
        fo.set_aperture_id("C4");
        fo.set_rad_sep_amin(5.5);
        fo.set_delta_mag(-0.25);
        fo.set_selected(false);
        fo.set_accepted(false);
        fo.set_target(true);
        fo.gates_mut().reset_with_observation(false);

        let copy = fo.clone();
        assert_eq!(copy.position(), fo.position());
        assert_eq!(copy.n_obs(), 7);
        assert_eq!(copy.aperture_id(), "C4");
        assert_eq!(copy.rad_sep_amin(), 5.5);
        assert_eq!(copy.delta_mag(), -0.25);
        assert!(!copy.is_selected());
        assert!(!copy.is_accepted());
        assert!(copy.is_target());
        assert_eq!(copy.gates(), fo.gates());
    }

    #[test]
    fn test_known_separation() {
        // One degree of declination along a meridian
        let target = FieldObject::new(Some("t"), 5.0, 10.0, 12.0, 0.0);
        let mut fo = FieldObject::new(Some("c"), 5.0, 11.0, 12.0, 0.0);
        assert_relative_eq!(fo.compute_rad_sep_amin(&target), 60.0, epsilon = 1e-9);
        assert_relative_eq!(fo.rad_sep_amin(), 60.0, epsilon = 1e-9);

        // One hour of RA on the equator is 15 degrees
        let target = FieldObject::new(Some("t"), 0.0, 0.0, 12.0, 0.0);
        let mut fo = FieldObject::new(Some("c"), 1.0, 0.0, 12.0, 0.0);
        assert_relative_eq!(fo.compute_rad_sep_amin(&target), 900.0, epsilon = 1e-9);
    }

    #[test]
    fn test_separation_wraps_ra() {
        let target = FieldObject::new(Some("t"), 23.9, 0.0, 12.0, 0.0);
        let mut fo = FieldObject::new(Some("c"), 0.1, 0.0, 12.0, 0.0);
        assert_relative_eq!(fo.compute_rad_sep_amin(&target), 0.2 * 15.0 * 60.0, epsilon = 1e-9);
    }

    #[test]
    fn test_self_separation_is_zero() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..1000 {
            let mut fo = random_star(&mut rng);
            let target = fo.clone();
            let sep = fo.compute_rad_sep_amin(&target);
            assert!(!sep.is_nan(), "NaN separation for {fo}");
            assert!(sep.abs() < 1e-3, "self separation {sep} for {fo}");
        }
    }

    #[test]
    fn test_separation_is_symmetric() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..1000 {
            let mut a = random_star(&mut rng);
            let mut b = random_star(&mut rng);
            let a_copy = a.clone();
            let ab = a.compute_rad_sep_amin(&b);
            let ba = b.compute_rad_sep_amin(&a_copy);
            assert_relative_eq!(ab, ba, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_separation_clamps_rounding_overshoot() {
        // Identical points near the pole can round cos A just above 1.0
        let target = FieldObject::new(Some("t"), 3.3, 89.999_999, 12.0, 0.0);
        let mut fo = target.clone();
        let sep = fo.compute_rad_sep_amin(&target);
        assert!(sep.is_finite());
        assert!(sep < 1e-3);
    }

    #[test]
    fn test_nan_target_propagates() {
        let target = FieldObject::new(Some("t"), f64::NAN, 0.0, 12.0, 0.0);
        let mut fo = FieldObject::new(Some("c"), 1.0, 0.0, 12.0, 0.0);
        assert!(fo.compute_rad_sep_amin(&target).is_nan());
    }

    #[test]
    fn test_delta_mag() {
        let mut fo = FieldObject::new(Some("c"), 1.0, 0.0, 13.25, 0.0);
        assert_relative_eq!(fo.compute_delta_mag(12.0), 1.25);
        assert_relative_eq!(fo.delta_mag(), 1.25);

        let mut target = FieldObject::new(Some("t"), 1.0, 0.0, 12.0, 0.0);
        let target_mag = target.mag();
        assert_eq!(target.compute_delta_mag(target_mag), 0.0);
    }

    #[test]
    fn test_gates_narrow_only() {
        let mut gates = FilterGates::default();
        gates.reset_with_observation(true);
        gates.narrow_magnitude(false);
        gates.narrow_magnitude(true);
        assert!(!gates.passes());

        gates.reset_with_observation(true);
        assert!(gates.passes());
    }

    #[test]
    fn test_json_defaults_for_missing_fields() {
        let json = r#"{"object_id":"c1","ra_hr":6.5,"dec_deg":29.7,"mag":12.1}"#;
        let fo: FieldObject = serde_json::from_str(json).unwrap();
        assert_eq!(fo.object_id(), "c1");
        assert_eq!(fo.n_obs(), 1);
        assert_eq!(fo.aperture_id(), DEFAULT_APERTURE_ID);
        assert!(fo.is_selected());
        assert!(fo.is_filtered());
        assert!(!fo.is_target());
    }

    #[test]
    fn test_display_mentions_id() {
        let fo = FieldObject::new(Some("wasp12"), 6.5, 29.7, 12.345, 0.23);
        let line = fo.to_string();
        assert!(line.starts_with("FieldObject [object_id=wasp12"));
        assert!(line.contains("mag=12.345"));
    }
}
