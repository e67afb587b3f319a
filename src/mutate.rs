//! The write path.

use super::{layout, Array, DimArray, Element, IndexError, IndexItem, IndexOptions, OutOfRangeWrites, Result, Tensor};
use super::plan::{plan_expression, Dispatch, Frame};

/// A value to write through an index expression.
#[derive(Debug, Clone)]
pub enum Value<B: Tensor> {
    /// An element, written to every selected position.
    Scalar(B::T),
    /// A literal, converted to the element type and written to every
    /// selected position.
    Float(f64),
    /// An array with one element, or with the shape of the selection once
    /// axes of length `1` are ignored.
    Tensor(B),
}

impl<B: Tensor> From<B> for Value<B> {
    fn from(tensor: B) -> Self { Value::Tensor(tensor) }
}

impl<B: Tensor> From<f64> for Value<B> {
    fn from(x: f64) -> Self { Value::Float(x) }
}

impl<B: Tensor> From<Array<B>> for Value<B> {
    fn from(array: Array<B>) -> Self { Value::Tensor(array.into_tensor()) }
}

impl<B: Tensor> From<DimArray<B>> for Value<B> {
    fn from(array: DimArray<B>) -> Self { Value::Tensor(array.into_parts().0.into_tensor()) }
}

/// Converts `value` to a `B` of shape `target`.
fn coerce<B: Tensor>(value: Value<B>, target: &[usize]) -> Result<B> {
    Ok(match value {
        Value::Scalar(x) => B::filled(target, x),
        Value::Float(x) => B::filled(target, <B::T as Element>::from_f64(x)),
        Value::Tensor(v) if v.len() == 1 => B::filled(target, v.get_scalar(&vec![0; v.rank()])),
        Value::Tensor(v) if layout::squeeze(v.shape()) == layout::squeeze(target) => v.reshape(target),
        Value::Tensor(v) => {
            return Err(IndexError::DimensionMismatch {value: v.shape().to_vec(), target: target.to_vec()});
        },
    })
}

/// Returns a copy of `tensor` with `value` written to the positions that
/// `expr` selects, or `None` if nothing needs to be written.
///
/// Nothing is written if the selection is empty. Out-of-range indices are an
/// error unless `options` say to ignore them. Inserted axes are not allowed.
pub fn write<B: Tensor>(
    tensor: &B,
    expr: &[IndexItem],
    value: Value<B>,
    frame: &Frame,
    options: &IndexOptions,
) -> Result<Option<B>> {
    let (plan, new_axes) = match plan_expression(expr, tensor.shape(), frame) {
        Err(IndexError::IndexOutOfRange {index, axis, len}) if options.out_of_range_writes == OutOfRangeWrites::Ignore => {
            tracing::debug!(index, axis, len, "ignored out-of-range write");
            return Ok(None);
        },
        planned => planned?,
    };
    if !new_axes.is_empty() {
        return Err(IndexError::IndexArity {got: expr.len(), rank: tensor.rank()});
    }
    if plan.is_empty() {
        tracing::trace!("empty selection; nothing written");
        return Ok(None);
    }
    let value = coerce(value, &plan.shape())?;
    Ok(Some(match plan.dispatch {
        Dispatch::Section => {
            let value = plan.flipped().fold(value, |v, axis| v.flip(axis));
            tensor.set_section(&plan.sections(), &value)
        },
        Dispatch::Take => tensor.set_take(&plan.lists(), &value),
        Dispatch::TakeValues => tensor.set_take_values(&plan.lists(), &value),
    }))
}

// ----------------------------------------------------------------------------
