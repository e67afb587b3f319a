//! Row-major layout arithmetic for run-time shapes.
//!
//! A shape is a `&[usize]` giving the length of each axis. A multi-index is a
//! `&[usize]` of the same rank. Elements are numbered in row-major order: the
//! last axis varies fastest.

/// Returns `(index / length, index % length)`.
#[inline(always)]
pub fn div_mod(index: usize, length: usize) -> (usize, usize) {
    (index / length, index % length)
}

/// Returns the number of elements in an array of shape `shape`.
///
/// The empty shape has one element (it is a scalar).
pub fn length(shape: &[usize]) -> usize { shape.iter().product() }

/// Returns the flat position (in `0..length(shape)`) of `index`.
///
/// Panics if `index` is not a valid index into an array of shape `shape`.
pub fn to_usize(index: &[usize], shape: &[usize]) -> usize {
    assert_eq!(index.len(), shape.len(), "Index {:?} has the wrong rank for shape {:?}", index, shape);
    let mut flat = 0;
    for (&i, &size) in index.iter().zip(shape) {
        assert!(i < size, "Index {:?} is out of bounds for shape {:?}", index, shape);
        flat = flat * size + i;
    }
    flat
}

/// Returns the multi-index whose flat position is `index`.
pub fn from_usize(shape: &[usize], index: usize) -> Vec<usize> {
    let mut ret = vec![0; shape.len()];
    let mut index = index;
    for (axis, &size) in shape.iter().enumerate().rev() {
        let (q, r) = div_mod(index, size);
        ret[axis] = r;
        index = q;
    }
    assert_eq!(index, 0, "Flat index out of bounds for shape {:?}", shape);
    ret
}

/// Equivalent to, but more efficient than,
/// ```text
/// for i in 0..length(shape) { f(&from_usize(shape, i)); }
/// ```
pub fn each(shape: &[usize], mut f: impl FnMut(&[usize])) {
    if shape.iter().any(|&size| size == 0) { return; }
    let mut index = vec![0; shape.len()];
    loop {
        f(&index);
        // Odometer increment.
        let mut axis = shape.len();
        loop {
            if axis == 0 { return; }
            axis -= 1;
            index[axis] += 1;
            if index[axis] < shape[axis] { break; }
            index[axis] = 0;
        }
    }
}

/// Returns `shape` with every axis of length `1` removed.
pub fn squeeze(shape: &[usize]) -> Vec<usize> {
    shape.iter().copied().filter(|&size| size != 1).collect()
}

// ----------------------------------------------------------------------------
