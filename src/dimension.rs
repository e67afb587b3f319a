//! Per-axis coordinate metadata.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::{resolve, Section};

/// The semantic role of an axis.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum DimensionKind {
    /// Longitude, or easting in a projected coordinate system.
    X,
    /// Latitude, or northing in a projected coordinate system.
    Y,
    /// Vertical level.
    Z,
    /// Time, stored as serial days (see [`serial_day()`]).
    T,
    Other,
}

/// The direction of a monotonic coordinate table.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq)]
pub enum Order {
    Ascending,
    Descending,
}

fn epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("1899-12-30 is a valid date")
}

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Converts a datetime to the numeric encoding used by [`DimensionKind::T`]
/// axes: fractional days since 1899-12-30T00:00:00.
///
/// ```
/// use chrono::NaiveDate;
/// use dimarray::dimension::serial_day;
/// let noon = NaiveDate::from_ymd_opt(1900, 1, 1).unwrap().and_hms_opt(12, 0, 0).unwrap();
/// assert_eq!(serial_day(noon), 2.5);
/// ```
pub fn serial_day(datetime: NaiveDateTime) -> f64 {
    duration_days(datetime - epoch())
}

/// The inverse of [`serial_day()`], to the nearest millisecond.
pub fn from_serial_day(days: f64) -> NaiveDateTime {
    epoch() + Duration::milliseconds((days * MILLIS_PER_DAY).round() as i64)
}

/// Converts a duration to fractional days.
pub fn duration_days(duration: Duration) -> f64 {
    duration.num_milliseconds() as f64 / MILLIS_PER_DAY
}

// ----------------------------------------------------------------------------

/// An ordered sequence of coordinate values describing one axis of a
/// [`DimArray`].
///
/// Coordinate lookups (literal values, range strings, datetimes) require the
/// values to be monotonic, ascending or descending.
///
/// [`DimArray`]: super::DimArray
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    #[serde(default)]
    name: String,
    kind: DimensionKind,
    values: Vec<f64>,
}

impl Dimension {
    pub fn new(kind: DimensionKind, values: impl Into<Vec<f64>>) -> Self {
        Self {name: String::new(), kind, values: values.into()}
    }

    /// Constructs a `Dimension` of `len` evenly spaced values.
    ///
    /// ```
    /// use dimarray::{Dimension, DimensionKind};
    /// let lon = Dimension::regular(DimensionKind::X, 0.0, 2.5, 4);
    /// assert_eq!(lon.values(), [0.0, 2.5, 5.0, 7.5]);
    /// ```
    pub fn regular(kind: DimensionKind, start: f64, delta: f64, len: usize) -> Self {
        Self::new(kind, (0..len).map(|i| start + delta * i as f64).collect::<Vec<_>>())
    }

    /// Constructs a time `Dimension`.
    pub fn from_dates(dates: &[NaiveDateTime]) -> Self {
        Self::new(DimensionKind::T, dates.iter().copied().map(serial_day).collect::<Vec<_>>())
    }

    /// A `Dimension` of length `1`, used for inserted axes.
    pub fn unit() -> Self { Self::new(DimensionKind::Other, vec![0.0]) }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str { &self.name }

    pub fn kind(&self) -> DimensionKind { self.kind }

    pub fn values(&self) -> &[f64] { &self.values }

    pub fn value(&self, index: usize) -> f64 { self.values[index] }

    pub fn len(&self) -> usize { self.values.len() }

    pub fn is_empty(&self) -> bool { self.values.is_empty() }

    /// Decodes the values of a time axis.
    pub fn dates(&self) -> Vec<NaiveDateTime> {
        self.values.iter().copied().map(from_serial_day).collect()
    }

    /// The direction of the values, or `None` if they are not monotonic.
    /// Constant and short tables count as ascending.
    pub fn order(&self) -> Option<Order> {
        if self.values.windows(2).all(|w| w[0] <= w[1]) {
            Some(Order::Ascending)
        } else if self.values.windows(2).all(|w| w[0] >= w[1]) {
            Some(Order::Descending)
        } else {
            None
        }
    }

    pub fn is_monotonic(&self) -> bool { self.order().is_some() }

    /// Returns the index of the value nearest to `value`, or `None` if `self`
    /// is empty or not monotonic.
    ///
    /// ```
    /// use dimarray::{Dimension, DimensionKind};
    /// let lat = Dimension::new(DimensionKind::Y, vec![90.0, 45.0, 0.0, -45.0]);
    /// assert_eq!(lat.value_index(10.0), Some(2));
    /// ```
    pub fn value_index(&self, value: f64) -> Option<usize> {
        if self.is_empty() { return None; }
        let order = self.order()?;
        Some(resolve::nearest(&self.values, order, value))
    }

    /// Returns the `Dimension` restricted to `section`, preserving the kind
    /// and the name.
    pub fn extract(&self, section: Section) -> Self {
        self.with_values(section.indices().map(|i| self.values[i]).collect())
    }

    /// Returns the `Dimension` restricted to `indices`, in the order given.
    pub fn extract_indices(&self, indices: &[usize]) -> Self {
        self.with_values(indices.iter().map(|&i| self.values[i]).collect())
    }

    /// Returns the `Dimension` with its values in reverse order.
    pub fn reversed(&self) -> Self {
        self.with_values(self.values.iter().rev().copied().collect())
    }

    fn with_values(&self, values: Vec<f64>) -> Self {
        Self {name: self.name.clone(), kind: self.kind, values}
    }
}

// ----------------------------------------------------------------------------
