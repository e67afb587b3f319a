use super::{layout, Tensor};
use super::plan::{Dispatch, Plan};

/// The result of a read: a bare element when exactly one element is
/// selected, otherwise an array.
#[derive(Debug, Clone, PartialEq)]
pub enum Selected<A, T> {
    Scalar(T),
    Array(A),
}

impl<A, T: Copy> Selected<A, T> {
    /// Returns the element, if `self` is a scalar.
    pub fn scalar(&self) -> Option<T> {
        match self {
            Selected::Scalar(x) => Some(*x),
            Selected::Array(_) => None,
        }
    }

    /// Returns the array, if `self` is not a scalar.
    pub fn array(&self) -> Option<&A> {
        match self {
            Selected::Scalar(_) => None,
            Selected::Array(a) => Some(a),
        }
    }

    pub fn into_array(self) -> Option<A> {
        match self {
            Selected::Scalar(_) => None,
            Selected::Array(a) => Some(a),
        }
    }

    pub fn is_scalar(&self) -> bool { matches!(self, Selected::Scalar(_)) }

    /// Applies `f` to the array, if `self` is not a scalar.
    pub fn map<B>(self, f: impl FnOnce(A) -> B) -> Selected<B, T> {
        match self {
            Selected::Scalar(x) => Selected::Scalar(x),
            Selected::Array(a) => Selected::Array(f(a)),
        }
    }
}

// ----------------------------------------------------------------------------

/// Performs the selection described by `plan` on `tensor`.
///
/// Axes that select exactly one position are dropped, and `new_axes` axes
/// of length `1` are appended. If the result has one element and no axes
/// were appended, it is returned as a scalar.
pub fn assemble<B: Tensor>(tensor: &B, plan: &Plan, new_axes: usize) -> Selected<B, B::T> {
    let raw = if plan.is_empty() {
        B::empty(&plan.shape())
    } else {
        match plan.dispatch {
            Dispatch::Section => plan.flipped().fold(tensor.section(&plan.sections()), |t, axis| t.flip(axis)),
            Dispatch::Take => tensor.take(&plan.lists()),
            Dispatch::TakeValues => tensor.take_values(&plan.lists()),
        }
    };
    let mut shape = layout::squeeze(raw.shape());
    if new_axes == 0 && layout::length(&shape) == 1 {
        return Selected::Scalar(raw.get_scalar(&vec![0; raw.rank()]));
    }
    shape.extend(std::iter::repeat(1).take(new_axes));
    Selected::Array(if shape == raw.shape() { raw } else { raw.reshape(&shape) })
}

// ----------------------------------------------------------------------------
