//! Turns normalized tokens into per-axis selections and chooses the backend
//! primitive that performs them.

use super::{Dimension, IndexError, IndexItem, Result, Section};
use super::normalize::{normalize};
use super::projection::{project_bounds, Geodesy, Projection};
use super::resolve::{Resolver, Role};
use super::token::{CoordRange, IndexToken, Limit, RangeToken, StepToken};

/// The positions selected along one axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AxisPlan {
    /// A strided range. If `flip` is set, it is traversed backwards.
    Section { section: Section, flip: bool },
    /// Explicit positions, in traversal order.
    Take(Vec<usize>),
    /// A range that selects nothing.
    Empty,
}

impl AxisPlan {
    fn forward(section: Section) -> Self { AxisPlan::Section {section, flip: false} }

    /// The number of positions selected.
    pub fn len(&self) -> usize {
        match self {
            AxisPlan::Section {section, ..} => section.len(),
            AxisPlan::Take(list) => list.len(),
            AxisPlan::Empty => 0,
        }
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// The positions selected, in traversal order.
    pub fn indices(&self) -> Vec<usize> {
        match self {
            AxisPlan::Section {section, flip: false} => section.indices().collect(),
            AxisPlan::Section {section, flip: true} => section.indices().rev().collect(),
            AxisPlan::Take(list) => list.clone(),
            AxisPlan::Empty => Vec::new(),
        }
    }
}

/// The backend primitive that performs a selection.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// [`Tensor::section()`], followed by a flip of each flipped axis.
    ///
    /// [`Tensor::section()`]: super::Tensor::section()
    Section,
    /// [`Tensor::take()`]: the cartesian product of the selections.
    ///
    /// [`Tensor::take()`]: super::Tensor::take()
    Take,
    /// [`Tensor::take_values()`]: one element per position of the paired
    /// index lists.
    ///
    /// [`Tensor::take_values()`]: super::Tensor::take_values()
    TakeValues,
}

/// The complete description of a selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub axes: Vec<AxisPlan>,
    pub dispatch: Dispatch,
}

impl Plan {
    /// Returns `true` if the selection contains no elements.
    pub fn is_empty(&self) -> bool { self.axes.iter().any(AxisPlan::is_empty) }

    /// The length of the paired index lists of a [`Dispatch::TakeValues`].
    /// Axes selecting single positions do not count, so this is `0` if the
    /// lists are empty.
    fn paired_len(&self) -> usize {
        self.axes.iter().find_map(|a| match a {
            AxisPlan::Take(list) => Some(list.len()),
            _ => None,
        }).unwrap_or(1)
    }

    /// The shape of the selection, before axes of length `1` are dropped.
    pub fn shape(&self) -> Vec<usize> {
        match self.dispatch {
            Dispatch::TakeValues => vec![self.paired_len()],
            _ => self.axes.iter().map(AxisPlan::len).collect(),
        }
    }

    /// The [`Section`] of each axis. Only meaningful for
    /// [`Dispatch::Section`].
    pub(crate) fn sections(&self) -> Vec<Section> {
        self.axes.iter().map(|a| match a {
            AxisPlan::Section {section, ..} => *section,
            _ => panic!("Not a Section plan: {:?}", a),
        }).collect()
    }

    /// The axes whose [`AxisPlan::Section`] is traversed backwards.
    pub fn flipped(&self) -> impl Iterator<Item=usize> + '_ {
        self.axes.iter().enumerate().filter_map(|(axis, a)| match a {
            AxisPlan::Section {flip: true, ..} => Some(axis),
            _ => None,
        })
    }

    /// The positions selected along each axis, in traversal order. For
    /// [`Dispatch::TakeValues`], single positions are repeated to the length
    /// of the paired lists.
    pub fn lists(&self) -> Vec<Vec<usize>> {
        let n = self.paired_len();
        self.axes.iter().map(|a| {
            let list = a.indices();
            match (self.dispatch, list.len()) {
                (Dispatch::TakeValues, 1) => vec![list[0]; n],
                _ => list,
            }
        }).collect()
    }
}

// ----------------------------------------------------------------------------

/// What the planner knows about the axes of the array being indexed.
#[derive(Debug, Copy, Clone, Default)]
pub struct Frame<'a> {
    /// The coordinate tables, one per axis, if any.
    pub dims: Option<&'a [Dimension]>,
    pub projection: Option<&'a Projection>,
    pub geodesy: Option<&'a dyn Geodesy>,
}

impl<'a> Frame<'a> {
    /// A `Frame` with no coordinate metadata.
    pub fn bare() -> Self { Self::default() }

    fn resolver(&self, axis: usize) -> Result<Resolver<'a>> {
        match self.dims {
            Some(dims) => Resolver::new(&dims[axis], axis),
            None => Err(IndexError::index_type(axis, "coordinate values need an array with dimensions")),
        }
    }
}

/// Wraps a negative `index` once. Returns `None` if the result is still
/// negative.
fn wrap(index: i64, len: usize) -> Option<i64> {
    let index = if index < 0 { index + len as i64 } else { index };
    if index < 0 { None } else { Some(index) }
}

/// Resolves an index that must fall inside the axis.
fn checked(index: i64, axis: usize, len: usize) -> Result<usize> {
    match wrap(index, len) {
        Some(i) if (i as usize) < len => Ok(i as usize),
        _ => Err(IndexError::IndexOutOfRange {index, axis, len}),
    }
}

/// Converts a coordinate range literal into a range token, or a coordinate
/// for a lone value.
///
/// The direction of a literal without a step is inferred from its bounds.
/// The sign of a literal step is in coordinate units, so it is mirrored on a
/// descending table.
fn coord_range(range: &CoordRange, resolver: &Resolver) -> IndexToken {
    let Some(stop) = range.stop else { return IndexToken::Coord(range.start); };
    let step = match range.step {
        None if resolver.is_forward(range.start, stop) => StepToken::Count(1),
        None => StepToken::Count(-1),
        Some(step) => {
            let forward = (step > 0.0) == resolver.is_forward(0.0, 1.0);
            StepToken::Coord(if forward { step.abs() } else { -step.abs() })
        },
    };
    IndexToken::Range(RangeToken {start: Some(Limit::Coord(range.start)), stop: Some(Limit::Coord(stop)), step})
}

/// Plans a [`RangeToken`] along an axis of length `len > 0`.
fn plan_range(range: &RangeToken, axis: usize, len: usize, frame: &Frame) -> Result<AxisPlan> {
    let backwards = range.step.is_negative();
    let n = len as i64;
    let resolver = || frame.resolver(axis);
    let (start_role, stop_role) = if backwards { (Role::Stop, Role::Start) } else { (Role::Start, Role::Stop) };

    // The first position traversed.
    let start = match range.start {
        None => if backwards { n - 1 } else { 0 },
        Some(Limit::Index(i)) => match wrap(i, len) {
            Some(s) if s >= n => return Err(IndexError::IndexOutOfRange {index: i, axis, len}),
            Some(s) => s,
            None if backwards => return Ok(AxisPlan::Empty),
            None => 0,
        },
        Some(Limit::Coord(v)) => resolver()?.index_of(v, start_role) as i64,
    };
    let step = match range.step {
        StepToken::Count(c) => c.unsigned_abs() as i64,
        StepToken::Coord(x) => resolver()?.step_count(start as usize, x) as i64,
    };
    // The last position that may be traversed, inclusive.
    let end = match range.stop {
        None => if backwards { 0 } else { n - 1 },
        Some(Limit::Index(j)) => {
            let j = j.clamp(-n - 1, n);
            let j = if j < 0 { j + n } else { j };
            if backwards { j + 1 } else { j - 1 }
        },
        Some(Limit::Coord(v)) => resolver()?.index_of(v, stop_role) as i64,
    };

    if backwards {
        if end > start { return Ok(AxisPlan::Empty); }
        let lo = start - (start - end) / step * step;
        Ok(AxisPlan::Section {section: Section::new(lo as usize, start as usize, step as usize), flip: true})
    } else {
        if end < start { return Ok(AxisPlan::Empty); }
        Ok(AxisPlan::forward(Section::new(start as usize, end as usize, step as usize)))
    }
}

/// Plans the selection of `token` along axis `axis`, of length `len`.
fn plan_axis(token: &IndexToken, axis: usize, len: usize, frame: &Frame) -> Result<AxisPlan> {
    Ok(match token {
        IndexToken::Scalar(i) => AxisPlan::forward(Section::single(checked(*i, axis, len)?)),
        IndexToken::Coord(_) | IndexToken::CoordRange(_) if len == 0 => {
            return Err(IndexError::IndexOutOfRange {index: 0, axis, len});
        },
        IndexToken::Coord(v) => AxisPlan::forward(Section::single(frame.resolver(axis)?.nearest(*v))),
        IndexToken::CoordRange(range) => {
            let token = coord_range(range, &frame.resolver(axis)?);
            plan_axis(&token, axis, len, frame)?
        },
        IndexToken::ValueList(list) => AxisPlan::Take(
            list.iter().map(|&i| checked(i, axis, len)).collect::<Result<_>>()?,
        ),
        IndexToken::Range(_) | IndexToken::FullSlice | IndexToken::NewAxis if len == 0 => AxisPlan::Empty,
        IndexToken::Range(range) => plan_range(range, axis, len, frame)?,
        IndexToken::FullSlice | IndexToken::NewAxis => AxisPlan::forward(Section::full(len)),
    })
}

/// Plans the selection of `tokens` from an array of shape `shape`.
///
/// `all_list` is as computed by [`normalize()`]. If it is set, and two or
/// more axes are selected by index lists that all have the same length, the
/// lists are paired instead of combined.
pub fn plan(tokens: &[IndexToken], shape: &[usize], all_list: bool, frame: &Frame) -> Result<Plan> {
    assert_eq!(tokens.len(), shape.len(), "Expected one token per axis");
    let axes: Vec<AxisPlan> = tokens.iter().zip(shape).enumerate()
        .map(|(axis, (token, &len))| plan_axis(token, axis, len, frame))
        .collect::<Result<_>>()?;
    let list_lens: Vec<usize> = tokens.iter().zip(&axes).filter_map(|(t, a)| match t {
        IndexToken::ValueList(_) => Some(a.len()),
        _ => None,
    }).collect();
    let dispatch = if all_list && list_lens.len() >= 2 && list_lens.iter().all(|&n| n == list_lens[0]) {
        Dispatch::TakeValues
    } else if axes.iter().any(|a| matches!(a, AxisPlan::Take(_))) {
        Dispatch::Take
    } else {
        Dispatch::Section
    };
    let plan = Plan {axes, dispatch};
    tracing::trace!(dispatch = ?plan.dispatch, shape = ?plan.shape(), empty = plan.is_empty(), "planned selection");
    Ok(plan)
}

/// Runs the front half of the pipeline: normalization, reprojection of
/// coordinate ranges, and planning.
///
/// Returns the plan and the positions of the inserted axes.
pub fn plan_expression(expr: &[IndexItem], shape: &[usize], frame: &Frame) -> Result<(Plan, Vec<usize>)> {
    let mut n = normalize(expr, shape)?;
    if let (Some(dims), Some(projection)) = (frame.dims, frame.projection) {
        project_bounds(&mut n.tokens, dims, projection, frame.geodesy)?;
    }
    let plan = plan(&n.tokens, shape, n.all_list, frame)?;
    Ok((plan, n.new_axes))
}

// ----------------------------------------------------------------------------
