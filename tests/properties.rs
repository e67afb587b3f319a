//! Algebraic properties of reads and writes, checked on random arrays.

use dimarray::{idx, layout, Array, Dense, IndexItem, Selected, Tensor, NEW_AXIS};
use dimarray::token::{Slice};
use proptest::prelude::*;

// ── Helpers ──────────────────────────────────────────────────────────────────

/// An array whose elements are their own row-major positions.
fn numbered(shape: &[usize]) -> Array<Dense<i64>> {
    let n = layout::length(shape);
    Array::from_vec(shape, (0..n as i64).collect())
}

/// The elements of a read, in row-major order.
fn items(selected: Selected<Array<Dense<i64>>, i64>) -> Vec<i64> {
    match selected {
        Selected::Scalar(x) => vec![x],
        Selected::Array(a) => a.tensor().to_vec(),
    }
}

/// Whole-axis selections, except `item` at `axis`.
fn on_axis(rank: usize, axis: usize, item: IndexItem) -> Vec<IndexItem> {
    let mut expr = vec![IndexItem::from(..); rank];
    expr[axis] = item;
    expr
}

// ── Strategies ───────────────────────────────────────────────────────────────

fn arb_shape() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(1usize..=4, 1..=3)
}

/// A shape, an axis of it, and a position along that axis.
fn arb_position() -> impl Strategy<Value = (Vec<usize>, usize, usize)> {
    arb_shape().prop_flat_map(|shape| {
        let rank = shape.len();
        (Just(shape), 0..rank)
    }).prop_flat_map(|(shape, axis)| {
        let len = shape[axis];
        (Just(shape), Just(axis), 0..len)
    })
}

/// A shape and a multi-index inside it.
fn arb_index() -> impl Strategy<Value = (Vec<usize>, Vec<usize>)> {
    arb_shape().prop_flat_map(|shape| {
        let index: Vec<_> = shape.iter().map(|&len| 0..len).collect();
        (Just(shape), index)
    })
}

/// A shape and a boolean mask of that shape.
fn arb_mask() -> impl Strategy<Value = (Vec<usize>, Vec<bool>)> {
    arb_shape().prop_flat_map(|shape| {
        let n = layout::length(&shape);
        (Just(shape), prop::collection::vec(any::<bool>(), n))
    })
}

// ── Property tests ───────────────────────────────────────────────────────────

proptest! {
    /// `a[:]` equals `a` but is a copy; `a.view()` is not.
    #[test]
    fn full_slice_copies(shape in arb_shape()) {
        let a = numbered(&shape);
        let b = a.read(&idx![..]).unwrap().into_array().unwrap();
        prop_assert_eq!(&b, &a);
        prop_assert!(!b.tensor().shares_storage(a.tensor()));
        prop_assert!(a.view().tensor().shares_storage(a.tensor()));
    }

    /// `a[i]` equals `a[i - len]` along every axis.
    #[test]
    fn negative_indices_wrap((shape, axis, i) in arb_position()) {
        let a = numbered(&shape);
        let len = shape[axis] as i64;
        let pos = a.read(&on_axis(shape.len(), axis, IndexItem::Int(i as i64))).unwrap();
        let neg = a.read(&on_axis(shape.len(), axis, IndexItem::Int(i as i64 - len))).unwrap();
        prop_assert_eq!(pos, neg);
    }

    /// Reversing a backwards range reproduces the forwards range.
    #[test]
    fn flips_are_involutions(len in 1usize..12, start in 0usize..12, extent in 1usize..12, step in 1i64..4) {
        prop_assume!(start < len);
        let a = numbered(&[len]);
        let stop = (start + extent) as i64;
        let forward = items(a.read(&idx![Slice::new(start as i64, stop).step(step)]).unwrap());
        let last = *forward.last().unwrap();
        let backward = Slice {
            start: Some(last.into()),
            stop: if start == 0 { None } else { Some((start as i64 - 1).into()) },
            step: Some((-step).into()),
        };
        let mut reversed = items(a.read(&idx![backward]).unwrap());
        reversed.reverse();
        prop_assert_eq!(&reversed, &forward);

        let twice = a.read(&idx![Slice::full().step(-1)]).unwrap().into_array();
        let twice = match twice {
            Some(b) => items(b.read(&idx![Slice::full().step(-1)]).unwrap()),
            None => vec![0],
        };
        prop_assert_eq!(twice, a.tensor().to_vec());
    }

    /// Selecting one element gives a scalar, unless an axis is inserted.
    #[test]
    fn single_elements((shape, index) in arb_index()) {
        let a = numbered(&shape);
        let mut expr: Vec<IndexItem> = index.iter().map(|&i| IndexItem::Int(i as i64)).collect();
        let expected = a.get(&index);
        prop_assert_eq!(a.read(&expr).unwrap(), Selected::Scalar(expected));
        expr.push(NEW_AXIS);
        let b = a.read(&expr).unwrap().into_array().unwrap();
        prop_assert_eq!(b.shape(), &[1]);
        prop_assert_eq!(b.get(&[0]), expected);
    }

    /// Writing through a mask and reading through it again gives back the
    /// written values.
    #[test]
    fn masked_round_trip((shape, flags) in arb_mask()) {
        let mut a = numbered(&shape);
        let mask = Dense::new(&shape, flags.clone());
        let count = flags.iter().filter(|&&f| f).count();
        let values: Vec<i64> = (0..count as i64).map(|x| -1 - x).collect();
        a.write(&idx![mask.clone()], Dense::new([count], values.clone())).unwrap();
        if count > 0 {
            prop_assert_eq!(items(a.read(&idx![mask]).unwrap()), values);
        }
        for (flat, &f) in flags.iter().enumerate() {
            if !f { prop_assert_eq!(a.tensor().as_ref()[flat], flat as i64); }
        }
    }

    /// A range with `stop <= start` selects a zero-length axis.
    #[test]
    fn empty_ranges((shape, axis, start) in arb_position(), back in 0usize..4) {
        let a = numbered(&shape);
        let stop = start.saturating_sub(back) as i64;
        let b = a.read(&on_axis(shape.len(), axis, (start as i64..stop).into())).unwrap();
        let b = b.into_array().unwrap();
        let expected: Vec<usize> = shape.iter().enumerate().filter_map(|(k, &len)| match len {
            _ if k == axis => Some(0),
            1 => None,
            len => Some(len),
        }).collect();
        prop_assert_eq!(b.shape(), &expected[..]);
        prop_assert!(b.is_empty());
    }
}
