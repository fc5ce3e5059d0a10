//! Candidate comparison stars from one catalog query.
//!
//! [`FieldObjectCollection`] owns the records for a single query session and
//! runs the selection pipeline over them:
//!
//! 1. **Update**: recompute separation and delta magnitude against a target
//! 2. **Observation filter**: start a fresh pass on `n_obs >= min`
//! 3. **Magnitude filter**: narrow the survivors to the magnitude window
//! 4. **Sort**: order by separation or by `|delta_mag|` for presentation
//!
//! The two filters compose as a logical AND and must run in that order;
//! [`FieldObjectCollection::apply_filters`] runs both for you.
//!
//! # Example
//!
//! ```rust
//! use field_objects::{CatalogSettings, FieldObject, FieldObjectCollection, MagLimit};
//!
//! let target = FieldObject::new(Some("wasp12"), 6.5086, 29.6885, 12.0, 0.01);
//!
//! let mut collection = FieldObjectCollection::new();
//! collection.add_field_objects(vec![
//!     FieldObject::new(Some("A"), 6.51, 29.70, 12.5, 0.02).with_n_obs(3),
//!     FieldObject::new(Some("B"), 6.52, 29.60, 14.0, 0.02).with_n_obs(5),
//! ]);
//!
//! let settings = CatalogSettings {
//!     apply_limits: true,
//!     nominal_mag: 12.0,
//!     upper_limit: MagLimit::Offset(1.0),
//!     lower_limit: MagLimit::Offset(-1.0),
//!     min_observations: 2,
//! };
//!
//! collection.update(&target);
//! collection.apply_filters(&settings);
//! collection.sort_by_distance();
//!
//! assert_eq!(collection.total_count(), 2);
//! assert_eq!(collection.filtered_count(), 1);
//! ```

use std::cmp::Ordering;
use std::fmt;

use log::{debug, trace, warn};

use crate::field_object::FieldObject;
use crate::settings::CatalogSettings;

/// Ordered set of catalog candidates for one query session.
///
/// Insertion order is kept until a sort replaces it. Not meant for
/// concurrent mutation; use one collection per query.
#[derive(Debug, Clone, Default)]
pub struct FieldObjectCollection {
    field_objects: Vec<FieldObject>,
}

/// Ascending order with NaN after every number, whatever its sign bit
fn nan_last(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or_else(|| a.is_nan().cmp(&b.is_nan()))
}

fn by_distance(a: &FieldObject, b: &FieldObject) -> Ordering {
    nan_last(a.rad_sep_amin(), b.rad_sep_amin())
}

fn by_abs_delta_mag(a: &FieldObject, b: &FieldObject) -> Ordering {
    nan_last(a.delta_mag().abs(), b.delta_mag().abs())
}

impl FieldObjectCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append query results to the end of the collection.
    ///
    /// No deduplication or validation takes place.
    pub fn add_field_objects<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = FieldObject>,
    {
        let before = self.field_objects.len();
        self.field_objects.extend(items);
        debug!(
            "Added {} field objects ({} total)",
            self.field_objects.len() - before,
            self.field_objects.len()
        );
    }

    /// Drop every record, ready for a new query.
    pub fn clear(&mut self) {
        self.field_objects.clear();
    }

    /// Recompute separation and delta magnitude for every member relative to `target`.
    ///
    /// A copy of the target inside the collection ends up with zero for both.
    /// Calling this again with the same target gives the same values.
    pub fn update(&mut self, target: &FieldObject) {
        let target_mag = target.mag();
        for fo in &mut self.field_objects {
            fo.compute_rad_sep_amin(target);
            fo.compute_delta_mag(target_mag);
            trace!(
                "{}: rad_sep_amin={:.3} delta_mag={:.3}",
                fo.object_id(),
                fo.rad_sep_amin(),
                fo.delta_mag()
            );
        }
        debug!(
            "Updated {} field objects relative to target {}",
            self.field_objects.len(),
            target.object_id()
        );
    }

    /// First member flagged as the target, if any
    pub fn target(&self) -> Option<&FieldObject> {
        self.field_objects.iter().find(|fo| fo.is_target())
    }

    /// Run [`update`](Self::update) against the member flagged as target.
    ///
    /// Returns `false` and leaves every record untouched when no member is
    /// flagged.
    pub fn update_from_flagged_target(&mut self) -> bool {
        match self.target().cloned() {
            Some(target) => {
                self.update(&target);
                true
            }
            None => {
                warn!("No target flagged in collection; skipping update");
                false
            }
        }
    }

    /// Stable sort ascending by separation from the target.
    ///
    /// NaN separations sort after every number.
    pub fn sort_by_distance(&mut self) {
        self.field_objects.sort_by(by_distance);
    }

    /// Stable sort ascending by `|delta_mag|`, closest in brightness first.
    pub fn sort_by_delta_mag(&mut self) {
        self.field_objects.sort_by(by_abs_delta_mag);
    }

    /// Distance-ordered view that leaves the owned order alone
    pub fn sorted_by_distance(&self) -> Vec<&FieldObject> {
        let mut view: Vec<&FieldObject> = self.field_objects.iter().collect();
        view.sort_by(|a, b| by_distance(a, b));
        view
    }

    /// `|delta_mag|`-ordered view that leaves the owned order alone
    pub fn sorted_by_delta_mag(&self) -> Vec<&FieldObject> {
        let mut view: Vec<&FieldObject> = self.field_objects.iter().collect();
        view.sort_by(|a, b| by_abs_delta_mag(a, b));
        view
    }

    /// Start a fresh filtering pass keeping members with `n_obs >= min_obs`.
    ///
    /// Overwrites any earlier filter result, including the magnitude stage.
    pub fn filter_by_number_observations(&mut self, min_obs: u32) {
        for fo in &mut self.field_objects {
            let passes = fo.n_obs() >= min_obs;
            fo.gates_mut().reset_with_observation(passes);
        }
        debug!(
            "Observation filter (n_obs >= {}): {} of {} pass",
            min_obs,
            self.filtered_count(),
            self.total_count()
        );
    }

    /// Narrow the current pass to the magnitude window in `settings`.
    ///
    /// Does nothing unless `settings.apply_limits` is set. Can only turn a
    /// passing record into a failing one, so it must follow
    /// [`filter_by_number_observations`](Self::filter_by_number_observations).
    pub fn filter_by_mag_limits(&mut self, settings: &CatalogSettings) {
        if !settings.apply_limits {
            return;
        }

        for fo in &mut self.field_objects {
            let in_range = settings.accepts_mag(fo.mag());
            fo.gates_mut().narrow_magnitude(in_range);
        }
        debug!(
            "Magnitude filter (upper={:?}, lower={:?}): {} of {} pass",
            settings.upper_mag_range(),
            settings.lower_mag_range(),
            self.filtered_count(),
            self.total_count()
        );
    }

    /// Run both filters in contract order.
    pub fn apply_filters(&mut self, settings: &CatalogSettings) {
        self.filter_by_number_observations(settings.min_observations);
        self.filter_by_mag_limits(settings);
    }

    /// Number of records regardless of filter state
    pub fn total_count(&self) -> usize {
        self.field_objects.len()
    }

    /// Number of records passing the current filters
    pub fn filtered_count(&self) -> usize {
        self.filtered().count()
    }

    /// Number of records both passing the filters and selected
    pub fn selected_count(&self) -> usize {
        self.filtered().filter(|fo| fo.is_selected()).count()
    }

    /// Members passing the current filters, in collection order
    pub fn filtered(&self) -> impl Iterator<Item = &FieldObject> {
        self.field_objects.iter().filter(|fo| fo.is_filtered())
    }

    pub fn field_objects(&self) -> &[FieldObject] {
        &self.field_objects
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldObject> {
        self.field_objects.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, FieldObject> {
        self.field_objects.iter_mut()
    }

    pub fn is_empty(&self) -> bool {
        self.field_objects.is_empty()
    }
}

impl FromIterator<FieldObject> for FieldObjectCollection {
    fn from_iter<T: IntoIterator<Item = FieldObject>>(iter: T) -> Self {
        Self {
            field_objects: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for FieldObjectCollection {
    type Item = FieldObject;
    type IntoIter = std::vec::IntoIter<FieldObject>;

    fn into_iter(self) -> Self::IntoIter {
        self.field_objects.into_iter()
    }
}

impl<'a> IntoIterator for &'a FieldObjectCollection {
    type Item = &'a FieldObject;
    type IntoIter = std::slice::Iter<'a, FieldObject>;

    fn into_iter(self) -> Self::IntoIter {
        self.field_objects.iter()
    }
}

impl fmt::Display for FieldObjectCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for fo in &self.field_objects {
            writeln!(f, "{fo}")?;
        }
        Ok(())
    }
}
