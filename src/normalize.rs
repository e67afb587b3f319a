//! Brings an index expression to exactly one token per axis.

use std::iter::{repeat};

use super::{IndexError, IndexItem, Result};
use super::token::{classify, mask_lists, IndexToken};

/// A full-rank index expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    /// One token per axis of the indexed array.
    pub tokens: Vec<IndexToken>,
    /// Positions, in the unsqueezed frame, of the axes of length `1` that the
    /// trailing [`IndexItem::NewAxis`] markers insert. These are always
    /// `rank`, `rank + 1`, ...
    pub new_axes: Vec<usize>,
    /// `true` if every token selects positions by integer, i.e. is a
    /// `Scalar` or a `ValueList`.
    pub all_list: bool,
}

/// The number of axes `item` selects.
fn width(item: &IndexItem) -> usize {
    match item {
        IndexItem::Ellipsis => 0,
        IndexItem::Mask(mask) => mask.dims().len(),
        _ => 1,
    }
}

/// Normalizes `expr` against an array of shape `shape`.
///
/// - At most one [`IndexItem::Ellipsis`] is allowed. It stands for as many
///   whole-axis selections as are needed to reach the rank.
/// - Short expressions are padded with whole-axis selections.
/// - Items beyond the rank are allowed only if they are all
///   [`IndexItem::NewAxis`] markers at the end of the expression. Markers
///   that fall within the rank select the whole axis.
/// - An [`IndexItem::Mask`] covers as many consecutive axes as it has, and
///   must have their shape. A mask of rank two or more gathers paired
///   positions, so every other item must select by integer too.
///
/// ```
/// use dimarray::{idx, ELLIPSIS, NEW_AXIS};
/// use dimarray::normalize::{normalize};
/// use dimarray::token::{IndexToken};
/// let n = normalize(&idx![ELLIPSIS, 1, NEW_AXIS], &[4, 5, 6]).unwrap();
/// assert_eq!(n.tokens, [IndexToken::FullSlice, IndexToken::FullSlice, IndexToken::Scalar(1)]);
/// assert_eq!(n.new_axes, [3]);
/// ```
pub fn normalize(expr: &[IndexItem], shape: &[usize]) -> Result<Normalized> {
    let rank = shape.len();
    let arity = || IndexError::IndexArity {got: expr.len(), rank};
    let ellipses = expr.iter().filter(|item| matches!(item, IndexItem::Ellipsis)).count();
    if ellipses > 1 { return Err(IndexError::MultipleEllipsis); }

    // Split off the trailing run of `NewAxis` markers.
    let run = expr.iter().rev().take_while(|item| matches!(item, IndexItem::NewAxis)).count();
    let body = &expr[..expr.len() - run];
    let consumed: usize = body.iter().map(width).sum();
    if consumed > rank { return Err(arity()); }
    let (fill, inserted) = if ellipses == 1 {
        (rank - consumed, run)
    } else {
        (0, (consumed + run).saturating_sub(rank))
    };

    let mut tokens = Vec::with_capacity(rank);
    let mut mask_axis = None;
    for item in body {
        let axis = tokens.len();
        match item {
            IndexItem::Ellipsis => tokens.extend(repeat(IndexToken::FullSlice).take(fill)),
            IndexItem::Mask(mask) => {
                let covered = &shape[axis..axis + mask.dims().len()];
                if mask.dims().is_empty() || mask.dims() != covered {
                    return Err(IndexError::index_type(axis, format!(
                        "boolean mask of shape {:?} for axes of shape {:?}", mask.dims(), covered,
                    )));
                }
                if mask.dims().len() > 1 { mask_axis.get_or_insert(axis); }
                tokens.extend(mask_lists(mask).into_iter().map(IndexToken::ValueList));
            },
            IndexItem::NewAxis => tokens.push(IndexToken::FullSlice),
            item => tokens.push(classify(item, axis, shape[axis])?),
        }
    }
    // Pads, and turns the markers that fall within the rank into whole-axis
    // selections.
    tokens.resize(rank, IndexToken::FullSlice);
    debug_assert_eq!(tokens.len(), rank);

    let all_list = tokens.iter().all(IndexToken::is_integer_selection);
    if let Some(axis) = mask_axis {
        let mut lengths = tokens.iter().filter_map(|t| match t {
            IndexToken::ValueList(list) => Some(list.len()),
            _ => None,
        });
        let first = lengths.next();
        if !all_list || !lengths.all(|n| Some(n) == first) {
            return Err(IndexError::index_type(axis, "a multi-axis boolean mask can only be combined with integers"));
        }
    }
    Ok(Normalized {tokens, new_axes: (rank..rank + inserted).collect(), all_list})
}

// ----------------------------------------------------------------------------
