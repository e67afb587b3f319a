use std::fmt::{self, Debug};

use num_complex::{Complex32, Complex64};
use serde::{Deserialize, Serialize};

use super::{layout};

/// The element kind of a [`Tensor`].
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    I8, I16, I32, I64,
    U8, U16, U32, U64,
    F32, F64,
    Complex64, Complex128,
}

impl DType {
    /// Returns `true` for the complex element kinds.
    pub fn is_complex(self) -> bool { matches!(self, DType::Complex64 | DType::Complex128) }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DType::I8 => "int8", DType::I16 => "int16", DType::I32 => "int32", DType::I64 => "int64",
            DType::U8 => "uint8", DType::U16 => "uint16", DType::U32 => "uint32", DType::U64 => "uint64",
            DType::F32 => "float32", DType::F64 => "float64",
            DType::Complex64 => "complex64", DType::Complex128 => "complex128",
        };
        f.write_str(name)
    }
}

// ----------------------------------------------------------------------------

/// Implemented by the element types that a [`Tensor`] can hold.
pub trait Element: 'static + Copy + Debug + PartialEq + Send + Sync {
    /// The run-time tag of `Self`.
    const DTYPE: DType;

    /// Converts a literal to `Self`, as a cast would.
    fn from_f64(value: f64) -> Self;
}

macro_rules! impl_element {
    ($($t:ty => $dtype:ident),* $(,)?) => {
        $(
            impl Element for $t {
                const DTYPE: DType = DType::$dtype;
                #[inline(always)]
                fn from_f64(value: f64) -> Self { value as $t }
            }
        )*
    };
}

impl_element! {
    i8 => I8, i16 => I16, i32 => I32, i64 => I64,
    u8 => U8, u16 => U16, u32 => U32, u64 => U64,
    f32 => F32, f64 => F64,
}

impl Element for Complex32 {
    const DTYPE: DType = DType::Complex64;
    fn from_f64(value: f64) -> Self { Complex32::new(value as f32, 0.0) }
}

impl Element for Complex64 {
    const DTYPE: DType = DType::Complex128;
    fn from_f64(value: f64) -> Self { Complex64::new(value, 0.0) }
}

// ----------------------------------------------------------------------------

/// An inclusive, strided range of positions along one axis: `start`,
/// `start + step`, ... up to and including `end`.
///
/// `end - start` must be a multiple of `step`, and `step` must be positive.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq)]
pub struct Section {
    pub start: usize,
    pub end: usize,
    pub step: usize,
}

impl Section {
    pub fn new(start: usize, end: usize, step: usize) -> Self {
        assert!(step > 0, "Section step must be positive");
        assert!(start <= end, "Section starts at {} but ends at {}", start, end);
        // Trim `end` to the last position actually reached.
        let end = start + (end - start) / step * step;
        Self {start, end, step}
    }

    /// The `Section` containing only `index`.
    pub fn single(index: usize) -> Self { Self {start: index, end: index, step: 1} }

    /// The `Section` containing every position of an axis of length `len`.
    pub fn full(len: usize) -> Self {
        assert!(len > 0, "An empty axis has no full Section");
        Self {start: 0, end: len - 1, step: 1}
    }

    /// The number of positions in `self`.
    pub fn len(&self) -> usize { (self.end - self.start) / self.step + 1 }

    /// Returns the `i`th position of `self`.
    #[inline(always)]
    pub fn at(&self, i: usize) -> usize { self.start + i * self.step }

    /// The positions of `self`, in increasing order.
    pub fn indices(&self) -> impl DoubleEndedIterator<Item=usize> + '_ {
        (0..self.len()).map(move |i| self.at(i))
    }
}

// ----------------------------------------------------------------------------

/// The backend storage of an [`Array`]: a rectangular, multi-dimensional
/// buffer of [`Element`]s.
///
/// All primitives return a new `Tensor` and leave `self` unchanged. Callers
/// that want to mutate an array replace the `Tensor` they own with the
/// result. This is also true of the `set_*()` primitives.
///
/// All primitives panic if their arguments are inconsistent with
/// [`Tensor::shape()`]. The indexing engine checks everything before calling
/// them.
///
/// [`Array`]: super::Array
pub trait Tensor: Clone + Debug {
    /// The element type.
    type T: Element;

    /// Constructs a `Tensor` of shape `shape` with every element `value`.
    fn filled(shape: &[usize], value: Self::T) -> Self;

    /// The length of each axis.
    fn shape(&self) -> &[usize];

    /// The number of axes.
    fn rank(&self) -> usize { self.shape().len() }

    /// The number of elements.
    fn len(&self) -> usize { layout::length(self.shape()) }

    /// Returns `true` if `self` has no elements.
    fn is_empty(&self) -> bool { self.len() == 0 }

    /// The run-time tag of [`Self::T`].
    fn dtype(&self) -> DType { <Self::T as Element>::DTYPE }

    /// Returns the element at `index`.
    fn get_scalar(&self, index: &[usize]) -> Self::T;

    /// Returns a copy of `self` with the element at `index` replaced.
    fn set_scalar(&self, index: &[usize], value: Self::T) -> Self;

    /// Extracts the cartesian product of one [`Section`] per axis.
    fn section(&self, ranges: &[Section]) -> Self;

    /// Extracts the cartesian product of one index list per axis. The lists
    /// may be in any order and may repeat indices.
    fn take(&self, lists: &[Vec<usize>]) -> Self;

    /// Extracts the one-dimensional array whose `i`th element is at
    /// `(lists[0][i], lists[1][i], ...)`. All lists must have the same length.
    fn take_values(&self, lists: &[Vec<usize>]) -> Self;

    /// Reverses the order of the elements along `axis`.
    fn flip(&self, axis: usize) -> Self;

    /// Reinterprets the elements with a new shape of the same length.
    fn reshape(&self, shape: &[usize]) -> Self;

    /// The inverse of [`section()`]: writes `value`, whose shape is that of
    /// the extracted section, back into a copy of `self`.
    ///
    /// [`section()`]: Self::section()
    fn set_section(&self, ranges: &[Section], value: &Self) -> Self;

    /// The inverse of [`take()`].
    ///
    /// [`take()`]: Self::take()
    fn set_take(&self, lists: &[Vec<usize>], value: &Self) -> Self;

    /// The inverse of [`take_values()`].
    ///
    /// [`take_values()`]: Self::take_values()
    fn set_take_values(&self, lists: &[Vec<usize>], value: &Self) -> Self;

    /// Returns a `Tensor` equal to `self` that shares its storage.
    fn view(&self) -> Self;

    /// Returns `true` if `self` and `other` share storage.
    fn shares_storage(&self, other: &Self) -> bool;

    /// Constructs a `Tensor` of shape `shape`, which must have no elements.
    fn empty(shape: &[usize]) -> Self {
        assert_eq!(layout::length(shape), 0, "Shape {:?} is not empty", shape);
        Self::filled(shape, Self::T::from_f64(0.0))
    }
}

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_trims_end() {
        let s = Section::new(1, 8, 3);
        assert_eq!(s, Section {start: 1, end: 7, step: 3});
        assert_eq!(s.len(), 3);
        assert_eq!(s.indices().collect::<Vec<_>>(), [1, 4, 7]);
    }

    #[test]
    fn single_and_full() {
        assert_eq!(Section::single(4).indices().collect::<Vec<_>>(), [4]);
        assert_eq!(Section::full(3).indices().collect::<Vec<_>>(), [0, 1, 2]);
    }

    #[test]
    fn element_coercion() {
        assert_eq!(i32::from_f64(2.7), 2);
        assert_eq!(u8::from_f64(-1.0), 0);
        assert_eq!(Complex64::from_f64(1.5), Complex64::new(1.5, 0.0));
        assert_eq!(<Complex32 as Element>::DTYPE, DType::Complex64);
        assert!(DType::Complex128.is_complex());
        assert_eq!(DType::F64.to_string(), "float64");
    }
}
