use std::sync::{Arc};

use super::{layout, Element, Section, Tensor};

/// A dense, row-major array of `T`s with a run-time shape.
///
/// The elements are stored in an [`Arc<[T]>`], so that [`Tensor::view()`] can
/// share them. Every other operation copies, including [`Clone::clone()`].
#[derive(Debug)]
pub struct Dense<T> {
    shape: Box<[usize]>,
    items: Arc<[T]>,
}

impl<T> Dense<T> {
    fn new_inner(shape: Box<[usize]>, items: Arc<[T]>) -> Self {
        assert_eq!(layout::length(&shape), items.len(), "Shape {:?} does not match {} items", shape, items.len());
        Self {shape, items}
    }

    /// Constructs a `Dense` of shape `shape` given its elements in row-major
    /// order.
    ///
    /// ```
    /// use dimarray::{Dense, Tensor};
    /// let a = Dense::new([2, 3], vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
    /// assert_eq!(a.get_scalar(&[1, 0]), 3.0);
    /// ```
    pub fn new(shape: impl AsRef<[usize]>, items: impl Into<Vec<T>>) -> Self {
        let items: Vec<T> = items.into();
        Self::new_inner(shape.as_ref().into(), items.into())
    }

    /// Constructs a `Dense` of shape `shape` from a function of the
    /// multi-index.
    ///
    /// ```
    /// use dimarray::{Dense};
    /// let a = Dense::from_fn([2, 2], |i| i[0] * 10 + i[1]);
    /// assert_eq!(a.as_ref(), [0, 1, 10, 11]);
    /// ```
    pub fn from_fn(shape: impl AsRef<[usize]>, mut f: impl FnMut(&[usize]) -> T) -> Self {
        let shape = shape.as_ref();
        let mut items = Vec::with_capacity(layout::length(shape));
        layout::each(shape, |i| items.push(f(i)));
        Self::new_inner(shape.into(), items.into())
    }

    /// The length of each axis.
    pub fn dims(&self) -> &[usize] { &self.shape }

    /// Returns the element at `index`.
    pub fn at(&self, index: &[usize]) -> &T { &self.items[layout::to_usize(index, &self.shape)] }
}

impl<T: Clone> Dense<T> {
    /// Returns the elements in row-major order.
    pub fn to_vec(&self) -> Vec<T> { self.items.to_vec() }
}

impl<T: Clone> Clone for Dense<T> {
    fn clone(&self) -> Self {
        Self {shape: self.shape.clone(), items: self.items.to_vec().into()}
    }
}

impl<T> AsRef<[T]> for Dense<T> {
    fn as_ref(&self) -> &[T] { &self.items }
}

impl<T: PartialEq> PartialEq for Dense<T> {
    fn eq(&self, other: &Self) -> bool {
        self.shape == other.shape && self.items == other.items
    }
}

// ----------------------------------------------------------------------------

impl<T: Element> Dense<T> {
    /// Copies `self`, passing each element's multi-index to `f`, which
    /// returns the replacement value or `None` to keep the original.
    fn replace(&self, mut f: impl FnMut(&[usize]) -> Option<T>) -> Self {
        let mut n = 0;
        Self::from_fn(&self.shape, |i| {
            let old = self.items[n];
            n += 1;
            f(i).unwrap_or(old)
        })
    }

    fn check_rank(&self, rank: usize) {
        assert_eq!(rank, self.shape.len(), "Expected one range per axis of {:?}", self.shape);
    }
}

impl<T: Element> Tensor for Dense<T> {
    type T = T;

    fn filled(shape: &[usize], value: T) -> Self {
        Self::from_fn(shape, |_| value)
    }

    fn shape(&self) -> &[usize] { &self.shape }

    fn get_scalar(&self, index: &[usize]) -> T { *self.at(index) }

    fn set_scalar(&self, index: &[usize], value: T) -> Self {
        let target = layout::to_usize(index, &self.shape);
        let mut items = self.items.to_vec();
        items[target] = value;
        Self::new_inner(self.shape.clone(), items.into())
    }

    fn section(&self, ranges: &[Section]) -> Self {
        self.check_rank(ranges.len());
        for (r, &size) in ranges.iter().zip(self.shape.iter()) {
            assert!(r.end < size, "Section {:?} out of bounds for axis of length {}", r, size);
        }
        let shape: Vec<usize> = ranges.iter().map(Section::len).collect();
        let mut source = vec![0; ranges.len()];
        Self::from_fn(&shape, |i| {
            for (axis, r) in ranges.iter().enumerate() { source[axis] = r.at(i[axis]); }
            *self.at(&source)
        })
    }

    fn take(&self, lists: &[Vec<usize>]) -> Self {
        self.check_rank(lists.len());
        let shape: Vec<usize> = lists.iter().map(Vec::len).collect();
        let mut source = vec![0; lists.len()];
        Self::from_fn(&shape, |i| {
            for (axis, list) in lists.iter().enumerate() { source[axis] = list[i[axis]]; }
            *self.at(&source)
        })
    }

    fn take_values(&self, lists: &[Vec<usize>]) -> Self {
        self.check_rank(lists.len());
        let n = lists.first().map_or(1, Vec::len);
        assert!(lists.iter().all(|l| l.len() == n), "Paired index lists must have equal lengths");
        let mut source = vec![0; lists.len()];
        Self::from_fn([n], |i| {
            for (axis, list) in lists.iter().enumerate() { source[axis] = list[i[0]]; }
            *self.at(&source)
        })
    }

    fn flip(&self, axis: usize) -> Self {
        assert!(axis < self.shape.len(), "Axis {} out of bounds for shape {:?}", axis, self.shape);
        let last = self.shape[axis].saturating_sub(1);
        let mut source = vec![0; self.shape.len()];
        Self::from_fn(&self.shape, |i| {
            source.copy_from_slice(i);
            source[axis] = last - i[axis];
            *self.at(&source)
        })
    }

    fn reshape(&self, shape: &[usize]) -> Self {
        Self::new_inner(shape.into(), self.items.to_vec().into())
    }

    fn set_section(&self, ranges: &[Section], value: &Self) -> Self {
        self.check_rank(ranges.len());
        let shape: Vec<usize> = ranges.iter().map(Section::len).collect();
        assert_eq!(value.shape(), &shape[..], "Value shape does not match the section");
        // Positions of each axis inside the section, or `None`.
        let inverse: Vec<Vec<Option<usize>>> = ranges.iter().zip(self.shape.iter()).map(|(r, &size)| {
            let mut inv = vec![None; size];
            for (n, i) in r.indices().enumerate() { inv[i] = Some(n); }
            inv
        }).collect();
        let mut target = vec![0; ranges.len()];
        self.replace(|i| {
            for (axis, inv) in inverse.iter().enumerate() { target[axis] = inv[i[axis]]?; }
            Some(*value.at(&target))
        })
    }

    fn set_take(&self, lists: &[Vec<usize>], value: &Self) -> Self {
        self.check_rank(lists.len());
        let shape: Vec<usize> = lists.iter().map(Vec::len).collect();
        assert_eq!(value.shape(), &shape[..], "Value shape does not match the index lists");
        let mut items = self.items.to_vec();
        let mut target = vec![0; lists.len()];
        layout::each(&shape, |i| {
            for (axis, list) in lists.iter().enumerate() { target[axis] = list[i[axis]]; }
            items[layout::to_usize(&target, &self.shape)] = *value.at(i);
        });
        Self::new_inner(self.shape.clone(), items.into())
    }

    fn set_take_values(&self, lists: &[Vec<usize>], value: &Self) -> Self {
        self.check_rank(lists.len());
        let n = lists.first().map_or(1, Vec::len);
        assert_eq!(value.shape(), &[n], "Value shape does not match the paired index lists");
        let mut items = self.items.to_vec();
        let mut target = vec![0; lists.len()];
        for k in 0..n {
            for (axis, list) in lists.iter().enumerate() { target[axis] = list[k]; }
            items[layout::to_usize(&target, &self.shape)] = value.items[k];
        }
        Self::new_inner(self.shape.clone(), items.into())
    }

    fn view(&self) -> Self {
        Self {shape: self.shape.clone(), items: Arc::clone(&self.items)}
    }

    fn shares_storage(&self, other: &Self) -> bool { Arc::ptr_eq(&self.items, &other.items) }
}

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Dense<i32> { Dense::from_fn([3, 4], |i| (i[0] * 10 + i[1]) as i32) }

    #[test]
    fn section() {
        let a = grid().section(&[Section::new(0, 2, 2), Section::new(1, 3, 1)]);
        assert_eq!(a.shape(), [2, 3]);
        assert_eq!(a.as_ref(), [1, 2, 3, 21, 22, 23]);
    }

    #[test]
    fn take_is_cartesian() {
        let a = grid().take(&[vec![2, 0], vec![3, 3, 1]]);
        assert_eq!(a.shape(), [2, 3]);
        assert_eq!(a.as_ref(), [23, 23, 21, 3, 3, 1]);
    }

    #[test]
    fn take_values_is_paired() {
        let a = grid().take_values(&[vec![2, 0], vec![3, 1]]);
        assert_eq!(a.shape(), [2]);
        assert_eq!(a.as_ref(), [23, 1]);
    }

    #[test]
    fn flip() {
        let a = grid().flip(1);
        assert_eq!(&a.as_ref()[..4], [3, 2, 1, 0]);
        assert_eq!(grid().flip(0).flip(0), grid());
    }

    #[test]
    fn set_section_round_trip() {
        let ranges = [Section::new(1, 2, 1), Section::new(0, 3, 3)];
        let value = Dense::new([2, 2], vec![-1, -2, -3, -4]);
        let a = grid().set_section(&ranges, &value);
        assert_eq!(a.section(&ranges), value);
        assert_eq!(a.get_scalar(&[0, 0]), 0);
        assert_eq!(a.get_scalar(&[1, 1]), 11);
    }

    #[test]
    fn set_take_and_values() {
        let a = grid().set_take(&[vec![0], vec![2, 1]], &Dense::new([1, 2], vec![7, 8]));
        assert_eq!(&a.as_ref()[..4], [0, 8, 7, 3]);
        let b = grid().set_take_values(&[vec![0, 2], vec![0, 3]], &Dense::new([2], vec![5, 6]));
        assert_eq!(b.get_scalar(&[0, 0]), 5);
        assert_eq!(b.get_scalar(&[2, 3]), 6);
    }

    #[test]
    fn writes_do_not_alias() {
        let a = grid();
        let v = a.view();
        assert!(a.shares_storage(&v));
        let b = a.set_scalar(&[0, 0], 99);
        assert!(!a.shares_storage(&b));
        assert_eq!(v.get_scalar(&[0, 0]), 0);
        assert!(!a.shares_storage(&a.clone()));
    }

    #[test]
    #[should_panic]
    fn section_out_of_bounds() {
        grid().section(&[Section::single(3), Section::single(0)]);
    }
}
