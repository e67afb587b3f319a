//! The index-expression grammar and its classification into tokens.
//!
//! An index expression is a sequence of [`IndexItem`]s, usually built with
//! the [`idx!`] macro. Each item is classified once into an [`IndexToken`],
//! which the later stages match on exhaustively.
//!
//! [`idx!`]: crate::idx

use std::fmt;
use std::ops::{Range, RangeFrom, RangeFull, RangeInclusive, RangeTo, RangeToInclusive};
use std::str::{FromStr};

use chrono::{Duration, NaiveDateTime};

use super::{Dense, IndexError, Result};
use super::dimension::{duration_days, serial_day};

/// One bound of a [`Slice`].
#[derive(Debug, Clone, PartialEq)]
pub enum Bound {
    /// A position, counting from the end if negative.
    Index(i64),
    /// A coordinate value.
    Coord(f64),
    /// A coordinate value written as a string.
    Str(String),
    /// A time coordinate.
    DateTime(NaiveDateTime),
}

impl From<i64> for Bound { fn from(i: i64) -> Self { Bound::Index(i) } }
impl From<f64> for Bound { fn from(x: f64) -> Self { Bound::Coord(x) } }
impl From<&str> for Bound { fn from(s: &str) -> Self { Bound::Str(s.to_owned()) } }
impl From<String> for Bound { fn from(s: String) -> Self { Bound::Str(s) } }
impl From<NaiveDateTime> for Bound { fn from(t: NaiveDateTime) -> Self { Bound::DateTime(t) } }

/// The step of a [`Slice`].
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// A number of positions. Negative steps traverse the axis backwards.
    Count(i64),
    /// A distance in coordinate units.
    Coord(f64),
    /// A distance in coordinate units, written as a string.
    Str(String),
    /// A distance along a time axis.
    Duration(Duration),
}

impl From<i64> for Step { fn from(i: i64) -> Self { Step::Count(i) } }
impl From<f64> for Step { fn from(x: f64) -> Self { Step::Coord(x) } }
impl From<&str> for Step { fn from(s: &str) -> Self { Step::Str(s.to_owned()) } }
impl From<Duration> for Step { fn from(d: Duration) -> Self { Step::Duration(d) } }

/// A `start:stop:step` selection along one axis. Omitted parts take their
/// defaults, which depend on the sign of the step.
///
/// Integer `stop` bounds are exclusive, as in Python. Coordinate bounds are
/// inclusive.
///
/// ```
/// use dimarray::token::{Slice, Bound, Step};
/// let s = Slice::new(8, 2).step(-2);
/// assert_eq!(s.start, Some(Bound::Index(8)));
/// assert_eq!(s.step, Some(Step::Count(-2)));
/// ```
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Slice {
    pub start: Option<Bound>,
    pub stop: Option<Bound>,
    pub step: Option<Step>,
}

impl Slice {
    /// The slice `::`, which selects the whole axis.
    pub fn full() -> Self { Self::default() }

    /// The slice `start:stop`.
    pub fn new(start: impl Into<Bound>, stop: impl Into<Bound>) -> Self {
        Self {start: Some(start.into()), stop: Some(stop.into()), step: None}
    }

    /// The slice `start:`.
    pub fn starting_at(start: impl Into<Bound>) -> Self {
        Self {start: Some(start.into()), ..Self::default()}
    }

    /// The slice `:stop`.
    pub fn until(stop: impl Into<Bound>) -> Self {
        Self {stop: Some(stop.into()), ..Self::default()}
    }

    /// Replaces the step.
    pub fn step(self, step: impl Into<Step>) -> Self {
        Self {step: Some(step.into()), ..self}
    }
}

// ----------------------------------------------------------------------------

/// One element of an index expression.
#[derive(Debug, Clone, PartialEq)]
pub enum IndexItem {
    /// A single position, counting from the end if negative.
    Int(i64),
    /// The position whose coordinate is nearest to a value.
    Coord(f64),
    /// The position whose time coordinate is nearest to a datetime.
    DateTime(NaiveDateTime),
    /// A coordinate range literal: `"v"`, `"v1:v2"` or `"v1:v2:v3"`.
    Str(String),
    Slice(Slice),
    /// A list of positions.
    Ints(Vec<i64>),
    /// A boolean mask, one flag per position of the axis.
    Bools(Vec<bool>),
    /// A multi-dimensional boolean mask covering several consecutive axes.
    Mask(Dense<bool>),
    /// Inserts an axis of length `1` (when trailing) or selects the whole axis.
    NewAxis,
    /// Stands for as many whole-axis selections as needed.
    Ellipsis,
}

/// Shorthand for [`IndexItem::NewAxis`].
pub const NEW_AXIS: IndexItem = IndexItem::NewAxis;

/// Shorthand for [`IndexItem::Ellipsis`].
pub const ELLIPSIS: IndexItem = IndexItem::Ellipsis;

impl From<i64> for IndexItem { fn from(i: i64) -> Self { IndexItem::Int(i) } }
impl From<f64> for IndexItem { fn from(x: f64) -> Self { IndexItem::Coord(x) } }
impl From<NaiveDateTime> for IndexItem { fn from(t: NaiveDateTime) -> Self { IndexItem::DateTime(t) } }
impl From<&str> for IndexItem { fn from(s: &str) -> Self { IndexItem::Str(s.to_owned()) } }
impl From<String> for IndexItem { fn from(s: String) -> Self { IndexItem::Str(s) } }
impl From<Slice> for IndexItem { fn from(s: Slice) -> Self { IndexItem::Slice(s) } }
impl From<Vec<i64>> for IndexItem { fn from(v: Vec<i64>) -> Self { IndexItem::Ints(v) } }
impl From<Vec<bool>> for IndexItem { fn from(v: Vec<bool>) -> Self { IndexItem::Bools(v) } }
impl From<&[i64]> for IndexItem { fn from(v: &[i64]) -> Self { IndexItem::Ints(v.to_vec()) } }
impl From<&[bool]> for IndexItem { fn from(v: &[bool]) -> Self { IndexItem::Bools(v.to_vec()) } }
impl<const N: usize> From<[i64; N]> for IndexItem { fn from(v: [i64; N]) -> Self { IndexItem::Ints(v.to_vec()) } }
impl<const N: usize> From<[bool; N]> for IndexItem { fn from(v: [bool; N]) -> Self { IndexItem::Bools(v.to_vec()) } }
impl From<Dense<bool>> for IndexItem { fn from(m: Dense<bool>) -> Self { IndexItem::Mask(m) } }

impl From<RangeFull> for IndexItem {
    fn from(_: RangeFull) -> Self { IndexItem::Slice(Slice::full()) }
}

impl From<Range<i64>> for IndexItem {
    fn from(r: Range<i64>) -> Self { IndexItem::Slice(Slice::new(r.start, r.end)) }
}

impl From<RangeFrom<i64>> for IndexItem {
    fn from(r: RangeFrom<i64>) -> Self { IndexItem::Slice(Slice::starting_at(r.start)) }
}

impl From<RangeTo<i64>> for IndexItem {
    fn from(r: RangeTo<i64>) -> Self { IndexItem::Slice(Slice::until(r.end)) }
}

impl From<RangeInclusive<i64>> for IndexItem {
    fn from(r: RangeInclusive<i64>) -> Self {
        let (start, end) = r.into_inner();
        // `-1..=-1` would otherwise become the empty `-1:0`.
        match end.checked_add(1) {
            Some(0) | None => IndexItem::Slice(Slice::starting_at(start)),
            Some(stop) => IndexItem::Slice(Slice::new(start, stop)),
        }
    }
}

impl From<RangeToInclusive<i64>> for IndexItem {
    fn from(r: RangeToInclusive<i64>) -> Self {
        match r.end.checked_add(1) {
            Some(0) | None => IndexItem::Slice(Slice::full()),
            Some(stop) => IndexItem::Slice(Slice::until(stop)),
        }
    }
}

/// Builds an index expression (a `Vec<IndexItem>`) from anything that
/// converts into an [`IndexItem`].
///
/// ```
/// use dimarray::{idx, IndexItem, NEW_AXIS};
/// let e = idx![1, .., 2..5, "10:20", vec![0, 3], NEW_AXIS];
/// assert_eq!(e.len(), 6);
/// assert_eq!(e[0], IndexItem::Int(1));
/// ```
#[macro_export]
macro_rules! idx {
    ($($item:expr),* $(,)?) => {
        vec![$($crate::IndexItem::from($item)),*]
    };
}

// ----------------------------------------------------------------------------

/// A parsed coordinate range literal `"start"`, `"start:stop"` or
/// `"start:stop:step"`. All parts are in coordinate units.
///
/// ```
/// use dimarray::token::CoordRange;
/// let r: CoordRange = "10:20:2.5".parse().unwrap();
/// assert_eq!(r, CoordRange {start: 10.0, stop: Some(20.0), step: Some(2.5)});
/// assert_eq!(r.to_string(), "10:20:2.5");
/// ```
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CoordRange {
    pub start: f64,
    pub stop: Option<f64>,
    pub step: Option<f64>,
}

/// Returned when a string is not a coordinate range literal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid coordinate range literal `{0}`")]
pub struct ParseCoordRangeError(String);

impl FromStr for CoordRange {
    type Err = ParseCoordRangeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let err = || ParseCoordRangeError(s.to_owned());
        let parts: Vec<f64> = s.split(':')
            .map(|p| p.trim().parse::<f64>())
            .collect::<std::result::Result<_, _>>()
            .map_err(|_| err())?;
        if parts.iter().any(|x| !x.is_finite()) { return Err(err()); }
        match parts[..] {
            [start] => Ok(Self {start, stop: None, step: None}),
            [start, stop] => Ok(Self {start, stop: Some(stop), step: None}),
            [start, stop, step] if step != 0.0 => Ok(Self {start, stop: Some(stop), step: Some(step)}),
            _ => Err(err()),
        }
    }
}

impl fmt::Display for CoordRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.start)?;
        if let Some(stop) = self.stop { write!(f, ":{}", stop)?; }
        if let Some(step) = self.step { write!(f, ":{}", step)?; }
        Ok(())
    }
}

// ----------------------------------------------------------------------------

/// A classified [`Bound`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Limit {
    Index(i64),
    Coord(f64),
}

/// A classified [`Step`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum StepToken {
    Count(i64),
    Coord(f64),
}

impl StepToken {
    pub fn is_negative(self) -> bool {
        match self {
            StepToken::Count(n) => n < 0,
            StepToken::Coord(x) => x < 0.0,
        }
    }
}

/// A classified [`Slice`]. `None` bounds default according to the sign of
/// the step.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RangeToken {
    pub start: Option<Limit>,
    pub stop: Option<Limit>,
    pub step: StepToken,
}

/// The typed form of one axis of an index expression.
#[derive(Debug, Clone, PartialEq)]
pub enum IndexToken {
    Scalar(i64),
    /// A literal coordinate; datetimes are already in serial days.
    Coord(f64),
    Range(RangeToken),
    /// Explicit positions; boolean masks arrive here as their `true`
    /// positions.
    ValueList(Vec<i64>),
    CoordRange(CoordRange),
    NewAxis,
    FullSlice,
}

impl IndexToken {
    /// Returns `true` for tokens that select one position per list entry.
    pub fn is_integer_selection(&self) -> bool {
        matches!(self, IndexToken::Scalar(_) | IndexToken::ValueList(_))
    }
}

fn parse_coord(axis: usize, s: &str) -> Result<f64> {
    match s.trim().parse::<f64>() {
        Ok(x) if x.is_finite() => Ok(x),
        _ => Err(IndexError::index_type(axis, format!("`{}` is not a coordinate value", s))),
    }
}

fn classify_bound(axis: usize, bound: &Bound) -> Result<Limit> {
    Ok(match bound {
        Bound::Index(i) => Limit::Index(*i),
        Bound::Coord(x) => Limit::Coord(*x),
        Bound::Str(s) => Limit::Coord(parse_coord(axis, s)?),
        Bound::DateTime(t) => Limit::Coord(serial_day(*t)),
    })
}

fn classify_step(axis: usize, step: &Step) -> Result<StepToken> {
    let step = match step {
        Step::Count(n) => StepToken::Count(*n),
        Step::Coord(x) => StepToken::Coord(*x),
        Step::Str(s) => StepToken::Coord(parse_coord(axis, s)?),
        Step::Duration(d) => StepToken::Coord(duration_days(*d)),
    };
    match step {
        StepToken::Count(0) => Err(IndexError::index_type(axis, "slice step cannot be zero")),
        StepToken::Coord(x) if x == 0.0 || !x.is_finite() => Err(IndexError::index_type(axis, "slice step cannot be zero")),
        step => Ok(step),
    }
}

/// Classifies the item selecting axis `axis`, of length `len`.
///
/// [`IndexItem::Mask`] and [`IndexItem::Ellipsis`] span a variable number of
/// axes and are expanded by the normalizer before classification.
pub fn classify(item: &IndexItem, axis: usize, len: usize) -> Result<IndexToken> {
    Ok(match item {
        IndexItem::Int(i) => IndexToken::Scalar(*i),
        IndexItem::Coord(x) if x.is_finite() => IndexToken::Coord(*x),
        IndexItem::Coord(x) => return Err(IndexError::index_type(axis, format!("{} is not a coordinate value", x))),
        IndexItem::DateTime(t) => IndexToken::Coord(serial_day(*t)),
        IndexItem::Str(s) => IndexToken::CoordRange(s.parse::<CoordRange>().map_err(|e| IndexError::index_type(axis, e.to_string()))?),
        IndexItem::Slice(slice) => IndexToken::Range(RangeToken {
            start: slice.start.as_ref().map(|b| classify_bound(axis, b)).transpose()?,
            stop: slice.stop.as_ref().map(|b| classify_bound(axis, b)).transpose()?,
            step: slice.step.as_ref().map_or(Ok(StepToken::Count(1)), |s| classify_step(axis, s))?,
        }),
        IndexItem::Ints(v) => IndexToken::ValueList(v.clone()),
        IndexItem::Bools(flags) => {
            if flags.len() != len {
                return Err(IndexError::index_type(axis, format!("boolean mask of length {} for an axis of length {}", flags.len(), len)));
            }
            IndexToken::ValueList(flags.iter().enumerate().filter(|&(_, &f)| f).map(|(i, _)| i as i64).collect())
        },
        IndexItem::Mask(_) | IndexItem::Ellipsis => {
            return Err(IndexError::index_type(axis, "multi-axis item in a single-axis position"));
        },
        IndexItem::NewAxis => IndexToken::NewAxis,
    })
}

/// Returns, for each axis of `mask`, the positions of its `true` cells in
/// row-major order.
pub fn mask_lists(mask: &Dense<bool>) -> Vec<Vec<i64>> {
    let rank = mask.dims().len();
    let mut lists = vec![Vec::new(); rank];
    super::layout::each(mask.dims(), |i| {
        if *mask.at(i) {
            for (list, &x) in lists.iter_mut().zip(i) { list.push(x as i64); }
        }
    });
    lists
}

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn assert_classify(item: impl Into<IndexItem>, len: usize, expected: IndexToken) {
        assert_eq!(classify(&item.into(), 0, len).unwrap(), expected);
    }

    #[test]
    fn scalars_and_lists() {
        assert_classify(-2, 5, IndexToken::Scalar(-2));
        assert_classify(vec![3, -1], 5, IndexToken::ValueList(vec![3, -1]));
        assert_classify([true, false, true], 3, IndexToken::ValueList(vec![0, 2]));
        assert_classify(12.5, 5, IndexToken::Coord(12.5));
        assert_classify(NEW_AXIS, 5, IndexToken::NewAxis);
    }

    #[test]
    fn slices() {
        assert_classify(.., 5, IndexToken::Range(RangeToken {start: None, stop: None, step: StepToken::Count(1)}));
        assert_classify(Slice::new("10", 2.5).step(-1), 5, IndexToken::Range(RangeToken {
            start: Some(Limit::Coord(10.0)),
            stop: Some(Limit::Coord(2.5)),
            step: StepToken::Count(-1),
        }));
        assert_classify(Slice::full().step(Duration::hours(12)), 5, IndexToken::Range(RangeToken {
            start: None, stop: None, step: StepToken::Coord(0.5),
        }));
        assert_classify(1..=-1, 5, IndexToken::Range(RangeToken {
            start: Some(Limit::Index(1)), stop: None, step: StepToken::Count(1),
        }));
    }

    #[test]
    fn inclusive_ranges() {
        assert_classify(1..=2, 5, IndexToken::Range(RangeToken {
            start: Some(Limit::Index(1)), stop: Some(Limit::Index(3)), step: StepToken::Count(1),
        }));
        assert_classify(2..=i64::MAX, 5, IndexToken::Range(RangeToken {
            start: Some(Limit::Index(2)), stop: None, step: StepToken::Count(1),
        }));
        assert_classify(..=i64::MAX, 5, IndexToken::Range(RangeToken {start: None, stop: None, step: StepToken::Count(1)}));
        assert_classify(..=-1, 5, IndexToken::Range(RangeToken {start: None, stop: None, step: StepToken::Count(1)}));
    }

    #[test]
    fn coordinate_strings() {
        assert_classify("15", 4, IndexToken::CoordRange(CoordRange {start: 15.0, stop: None, step: None}));
        assert_classify(" -5 : 5 ", 4, IndexToken::CoordRange(CoordRange {start: -5.0, stop: Some(5.0), step: None}));
        assert!("1:2:3:4".parse::<CoordRange>().is_err());
        assert!("1:2:0".parse::<CoordRange>().is_err());
        assert!("a:b".parse::<CoordRange>().is_err());
        assert!("1:".parse::<CoordRange>().is_err());
    }

    #[test]
    fn rejections() {
        assert_matches!(classify(&IndexItem::from(vec![true]), 2, 3), Err(IndexError::IndexType {axis: 2, ..}));
        assert_matches!(classify(&IndexItem::from(Slice::full().step(0)), 0, 3), Err(IndexError::IndexType {..}));
        assert_matches!(classify(&IndexItem::from("x:1"), 0, 3), Err(IndexError::IndexType {..}));
        assert_matches!(classify(&IndexItem::from(f64::NAN), 0, 3), Err(IndexError::IndexType {..}));
        assert_matches!(classify(&ELLIPSIS, 0, 3), Err(IndexError::IndexType {..}));
    }

    #[test]
    fn mask_positions() {
        let mask = Dense::new([2, 3], vec![false, true, false, true, false, true]);
        assert_eq!(mask_lists(&mask), [vec![0, 1, 1], vec![1, 0, 2]]);
    }
}
