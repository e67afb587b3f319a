use super::{assemble, mutate, Dense, DType, Element, IndexItem, IndexOptions, Result, Selected, Tensor, Value};
use super::plan::{plan_expression, Frame};

/// A multi-dimensional array without coordinate metadata.
///
/// An `Array` owns a [`Tensor`] and indexes it with NumPy-like index
/// expressions (see [`IndexItem`]). Its shape and element type are always
/// those of the `Tensor`.
///
/// ```
/// use dimarray::{idx, Array};
/// use dimarray::token::{Slice};
/// let mut a = Array::from_vec([2, 3], vec![0, 1, 2, 3, 4, 5]);
/// assert_eq!(a.read(&idx![1, -1]).unwrap().scalar(), Some(5));
/// a.write(&idx![.., Slice::full().step(-2)], 9.0).unwrap();
/// assert_eq!(a.tensor().as_ref(), [9, 1, 9, 9, 4, 9]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Array<B> {
    tensor: B,
    options: IndexOptions,
}

impl<B: Tensor> Array<B> {
    pub fn new(tensor: B) -> Self { Self {tensor, options: IndexOptions::default()} }

    pub fn tensor(&self) -> &B { &self.tensor }

    pub fn into_tensor(self) -> B { self.tensor }

    pub fn shape(&self) -> &[usize] { self.tensor.shape() }

    /// The number of axes.
    pub fn ndim(&self) -> usize { self.tensor.rank() }

    /// The number of elements.
    pub fn len(&self) -> usize { self.tensor.len() }

    pub fn is_empty(&self) -> bool { self.tensor.is_empty() }

    pub fn dtype(&self) -> DType { self.tensor.dtype() }

    pub fn options(&self) -> &IndexOptions { &self.options }

    pub fn with_options(self, options: IndexOptions) -> Self { Self {options, ..self} }

    /// Returns an `Array` that shares storage with `self`. All other ways of
    /// obtaining an `Array` from `self`, including [`read()`], copy.
    ///
    /// [`read()`]: Self::read()
    pub fn view(&self) -> Self { Self {tensor: self.tensor.view(), options: self.options} }

    /// Returns the element at `index`, which must be inside the array.
    pub fn get(&self, index: &[usize]) -> B::T { self.tensor.get_scalar(index) }

    /// Replaces the element at `index`, which must be inside the array.
    pub fn set(&mut self, index: &[usize], value: B::T) {
        self.tensor = self.tensor.set_scalar(index, value);
    }

    /// Returns the selection `expr`: a scalar if it contains exactly one
    /// element and `expr` inserts no axes, otherwise a new `Array`.
    ///
    /// Coordinate values are not allowed, because an `Array` has no
    /// coordinates.
    pub fn read(&self, expr: &[IndexItem]) -> Result<Selected<Self, B::T>> {
        let (plan, new_axes) = plan_expression(expr, self.shape(), &Frame::bare())?;
        let options = self.options;
        Ok(assemble::assemble(&self.tensor, &plan, new_axes.len()).map(|tensor| Self {tensor, options}))
    }

    /// Writes `value` to the selection `expr`.
    pub fn write(&mut self, expr: &[IndexItem], value: impl Into<Value<B>>) -> Result<()> {
        if let Some(tensor) = mutate::write(&self.tensor, expr, value.into(), &Frame::bare(), &self.options)? {
            self.tensor = tensor;
        }
        Ok(())
    }
}

impl<T: Element> Array<Dense<T>> {
    /// Constructs an `Array` of shape `shape` given its elements in row-major
    /// order.
    pub fn from_vec(shape: impl AsRef<[usize]>, items: Vec<T>) -> Self { Self::new(Dense::new(shape, items)) }
}

impl<B: Tensor> From<B> for Array<B> {
    fn from(tensor: B) -> Self { Self::new(tensor) }
}

// ----------------------------------------------------------------------------
