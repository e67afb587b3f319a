//! Maps literal coordinates to positions along a [`Dimension`].
//!
//! All lookups are binary searches over a monotonic coordinate table. The
//! rules are stated for ascending tables and mirrored for descending ones:
//!
//! - [`Role::Start`] resolves to the lowest position whose value is `>=` the
//!   query, i.e. the first position inside a range that begins there.
//! - [`Role::Stop`] resolves to the highest position whose value is `<=` the
//!   query, i.e. the last position inside a range that ends there.
//! - A lone literal resolves to the nearest value, ties going to the lower
//!   position.
//!
//! Queries outside the table clamp to its first or last position.

use super::{Dimension, IndexError, Result};
use super::dimension::{Order};

/// Which end of a range a coordinate bound describes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Role {
    Start,
    Stop,
}

/// Returns the number of positions that come before `value` in table order.
fn before(values: &[f64], order: Order, value: f64) -> usize {
    match order {
        Order::Ascending => values.partition_point(|&v| v < value),
        Order::Descending => values.partition_point(|&v| v > value),
    }
}

/// Returns the number of positions that come before or at `value` in table
/// order.
fn through(values: &[f64], order: Order, value: f64) -> usize {
    match order {
        Order::Ascending => values.partition_point(|&v| v <= value),
        Order::Descending => values.partition_point(|&v| v >= value),
    }
}

/// Returns the position of the value in `values` nearest to `value`.
///
/// `values` must be non-empty and sorted in `order`.
pub fn nearest(values: &[f64], order: Order, value: f64) -> usize {
    assert!(!values.is_empty(), "Cannot look up a coordinate in an empty table");
    let p = before(values, order, value);
    if p == 0 { return 0; }
    if p == values.len() { return p - 1; }
    let below = (values[p - 1] - value).abs();
    let above = (values[p] - value).abs();
    if above < below { p } else { p - 1 }
}

/// Resolves `value` in `values` according to `role`, clamping to the table.
///
/// ```
/// use dimarray::dimension::Order;
/// use dimarray::resolve::{index_of, Role};
/// let lon = [0.0, 10.0, 20.0, 30.0];
/// assert_eq!(index_of(&lon, Order::Ascending, 15.0, Role::Start), 2);
/// assert_eq!(index_of(&lon, Order::Ascending, 15.0, Role::Stop), 1);
/// assert_eq!(index_of(&lon, Order::Ascending, 99.0, Role::Start), 3);
/// ```
pub fn index_of(values: &[f64], order: Order, value: f64, role: Role) -> usize {
    assert!(!values.is_empty(), "Cannot look up a coordinate in an empty table");
    let last = values.len() - 1;
    match role {
        Role::Start => before(values, order, value).min(last),
        Role::Stop => through(values, order, value).saturating_sub(1),
    }
}

// ----------------------------------------------------------------------------

/// Coordinate lookups along one axis of an array.
#[derive(Debug, Copy, Clone)]
pub struct Resolver<'a> {
    values: &'a [f64],
    order: Order,
}

impl<'a> Resolver<'a> {
    /// Fails if the values of `dim` are not monotonic. `dim` must not be
    /// empty.
    pub fn new(dim: &'a Dimension, axis: usize) -> Result<Self> {
        let order = dim.order().ok_or(IndexError::NonMonotonic {axis})?;
        assert!(!dim.is_empty(), "Cannot resolve coordinates along an empty axis");
        Ok(Self {values: dim.values(), order})
    }

    pub fn order(&self) -> Order { self.order }

    pub fn index_of(&self, value: f64, role: Role) -> usize {
        index_of(self.values, self.order, value, role)
    }

    pub fn nearest(&self, value: f64) -> usize { nearest(self.values, self.order, value) }

    /// Returns `true` if a range from `start` to `stop` runs in the same
    /// direction as the table.
    pub fn is_forward(&self, start: f64, stop: f64) -> bool {
        match self.order {
            Order::Ascending => start <= stop,
            Order::Descending => start >= stop,
        }
    }

    /// Converts a step in coordinate units, taken from position `start`, to
    /// a number of positions (at least `1`).
    ///
    /// The sign of `step` is the direction of traversal: positive towards
    /// higher positions. The step is measured in that direction, or the
    /// other way if `start` is the last position in that direction.
    pub fn step_count(&self, start: usize, step: f64) -> usize {
        let origin = self.values[start];
        let towards = |up: bool| {
            let rising = up == (self.order == Order::Ascending);
            let target = if rising { origin + step.abs() } else { origin - step.abs() };
            self.nearest(target).abs_diff(start)
        };
        let up = step > 0.0;
        let at_end = if up { start + 1 == self.values.len() } else { start == 0 };
        towards(up != at_end).max(1)
    }
}

// ----------------------------------------------------------------------------
