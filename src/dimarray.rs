use std::sync::{Arc};

use super::{assemble, mutate, rebuild, Array, Dimension, DimensionKind, DType, Element, Geodesy, IndexError, IndexItem, IndexOptions, Projection, Result, Selected, Tensor, Value};
use super::plan::{plan_expression, Frame};

/// The fill value of a [`DimArray`] unless otherwise specified.
pub const DEFAULT_FILL_VALUE: f64 = -9999.0;

/// An [`Array`] with a [`Dimension`] per axis, and optionally a map
/// [`Projection`].
///
/// Besides the index expressions of an `Array`, a `DimArray` accepts
/// coordinate values, which are looked up in the `Dimension`s. If the
/// projection is not geographic, coordinate range literals selecting both
/// the X and the Y axis are read as longitude and latitude, and reprojected
/// into the native units of the `Dimension`s using the [`Geodesy`].
///
/// ```
/// use dimarray::{idx, Array, DimArray, Dimension, DimensionKind};
/// let lat = Dimension::regular(DimensionKind::Y, 80.0, -10.0, 17);
/// let lon = Dimension::regular(DimensionKind::X, 0.0, 10.0, 36);
/// let data = Array::from_vec([17, 36], (0..17 * 36).map(|i| i as f32).collect());
/// let da = DimArray::new(data, vec![lat, lon]).unwrap();
/// let sub = da.read(&idx!["45:15", "100:120"]).unwrap().into_array().unwrap();
/// assert_eq!(sub.shape(), [3, 3]);
/// assert_eq!(sub.dim(0).values(), [40.0, 30.0, 20.0]);
/// assert_eq!(sub.dim(1).values(), [100.0, 110.0, 120.0]);
/// ```
#[derive(Debug, Clone)]
pub struct DimArray<B: Tensor> {
    array: Array<B>,
    dims: Vec<Dimension>,
    fill_value: B::T,
    projection: Option<Arc<Projection>>,
    geodesy: Option<Arc<dyn Geodesy>>,
}

impl<B: Tensor> DimArray<B> {
    /// Fails unless `dims` has one `Dimension` per axis of `array`, of the
    /// same length.
    pub fn new(array: impl Into<Array<B>>, dims: Vec<Dimension>) -> Result<Self> {
        let array = array.into();
        if dims.len() != array.ndim() {
            return Err(IndexError::DimensionCount {expected: array.ndim(), got: dims.len(), shape: array.shape().to_vec()});
        }
        for (axis, (dim, &len)) in dims.iter().zip(array.shape()).enumerate() {
            if dim.len() != len {
                return Err(IndexError::DimensionLength {axis, dim_len: dim.len(), len});
            }
        }
        Ok(Self {
            array,
            dims,
            fill_value: <B::T as Element>::from_f64(DEFAULT_FILL_VALUE),
            projection: None,
            geodesy: None,
        })
    }

    pub fn with_fill_value(self, fill_value: B::T) -> Self { Self {fill_value, ..self} }

    /// Sets the projection of the X and Y `Dimension`s, and the `Geodesy`
    /// used to reproject into it.
    pub fn with_projection(self, projection: impl Into<Arc<Projection>>, geodesy: Option<Arc<dyn Geodesy>>) -> Self {
        Self {projection: Some(projection.into()), geodesy, ..self}
    }

    pub fn with_options(self, options: IndexOptions) -> Self {
        Self {array: self.array.with_options(options), ..self}
    }

    pub fn array(&self) -> &Array<B> { &self.array }

    pub fn dims(&self) -> &[Dimension] { &self.dims }

    pub fn dim(&self, axis: usize) -> &Dimension { &self.dims[axis] }

    /// Returns the first axis of kind `kind`.
    pub fn axis_of(&self, kind: DimensionKind) -> Option<usize> {
        self.dims.iter().position(|d| d.kind() == kind)
    }

    pub fn shape(&self) -> &[usize] { self.array.shape() }

    pub fn ndim(&self) -> usize { self.array.ndim() }

    pub fn dtype(&self) -> DType { self.array.dtype() }

    pub fn fill_value(&self) -> B::T { self.fill_value }

    pub fn projection(&self) -> Option<&Projection> { self.projection.as_deref() }

    pub fn options(&self) -> &IndexOptions { self.array.options() }

    /// Returns a `DimArray` whose data shares storage with `self`.
    pub fn view(&self) -> Self { self.derive(self.array.view(), self.dims.clone()) }

    pub fn into_parts(self) -> (Array<B>, Vec<Dimension>) { (self.array, self.dims) }

    fn frame(&self) -> Frame<'_> {
        Frame {
            dims: Some(&self.dims),
            projection: self.projection.as_deref(),
            geodesy: self.geodesy.as_deref(),
        }
    }

    /// Returns a `DimArray` with the fill value and projection of `self`.
    fn derive(&self, array: Array<B>, dims: Vec<Dimension>) -> Self {
        Self {
            array,
            dims,
            fill_value: self.fill_value,
            projection: self.projection.clone(),
            geodesy: self.geodesy.clone(),
        }
    }

    /// Returns the selection `expr`: a scalar if it contains exactly one
    /// element and `expr` inserts no axes, otherwise a new `DimArray` with
    /// the selected coordinates.
    pub fn read(&self, expr: &[IndexItem]) -> Result<Selected<Self, B::T>> {
        let (plan, new_axes) = plan_expression(expr, self.shape(), &self.frame())?;
        let selected = assemble::assemble(self.array.tensor(), &plan, new_axes.len());
        Ok(selected.map(|tensor| {
            let dims = rebuild::rebuild(&self.dims, &plan, new_axes.len());
            debug_assert_eq!(dims.len(), tensor.rank());
            self.derive(Array::new(tensor).with_options(*self.options()), dims)
        }))
    }

    /// Writes `value` to the selection `expr`.
    pub fn write(&mut self, expr: &[IndexItem], value: impl Into<Value<B>>) -> Result<()> {
        let written = mutate::write(self.array.tensor(), expr, value.into(), &self.frame(), self.options())?;
        if let Some(tensor) = written {
            self.array = Array::new(tensor).with_options(*self.array.options());
        }
        Ok(())
    }
}

impl<B: Tensor + PartialEq> PartialEq for DimArray<B> {
    /// Compares data, coordinates, fill values and projections.
    fn eq(&self, other: &Self) -> bool {
        self.array == other.array &&
        self.dims == other.dims &&
        self.fill_value == other.fill_value &&
        self.projection == other.projection
    }
}

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    use super::*;
    use crate::{idx, Dense, ProjectionError, NEW_AXIS};
    use crate::token::{Slice};

    fn day(d: u32) -> NaiveDateTime { NaiveDate::from_ymd_opt(2020, 1, d).unwrap().and_hms_opt(0, 0, 0).unwrap() }

    /// 4 times, 3 latitudes (descending), 5 longitudes.
    fn field() -> DimArray<Dense<f64>> {
        let data = Dense::from_fn([4, 3, 5], |i| (i[0] * 100 + i[1] * 10 + i[2]) as f64);
        DimArray::new(data, vec![
            Dimension::from_dates(&(1..=4).map(day).collect::<Vec<_>>()),
            Dimension::new(DimensionKind::Y, vec![10.0, 0.0, -10.0]),
            Dimension::regular(DimensionKind::X, 100.0, 5.0, 5),
        ]).unwrap()
    }

    #[test]
    fn construction_is_checked() {
        let data = Dense::<f64>::filled(&[2, 3], 0.0);
        assert_matches!(
            DimArray::new(data.clone(), vec![Dimension::unit()]),
            Err(IndexError::DimensionCount {expected: 2, got: 1, ..})
        );
        assert_matches!(
            DimArray::new(data, vec![Dimension::regular(DimensionKind::Y, 0.0, 1.0, 2), Dimension::unit()]),
            Err(IndexError::DimensionLength {axis: 1, dim_len: 1, len: 3})
        );
    }

    #[test]
    fn metadata() {
        let f = field().with_fill_value(f64::NAN);
        assert!(f.fill_value().is_nan());
        assert_eq!(field().fill_value(), DEFAULT_FILL_VALUE);
        assert_eq!(f.axis_of(DimensionKind::X), Some(2));
        assert_eq!(f.axis_of(DimensionKind::Z), None);
        assert_eq!(f.dtype(), DType::F64);
        assert_eq!(f.ndim(), 3);
        assert!(f.projection().is_none());
    }

    #[test]
    fn coordinates_select_and_rebuild() {
        let sub = field().read(&idx![day(2), "5:-10", "105:115"]).unwrap().into_array().unwrap();
        assert_eq!(sub.shape(), [2, 3]);
        assert_eq!(sub.dims().len(), 2);
        assert_eq!(sub.dim(0).values(), [0.0, -10.0]);
        assert_eq!(sub.dim(1).values(), [105.0, 110.0, 115.0]);
        assert_eq!(sub.array().get(&[0, 0]), 111.0);
    }

    #[test]
    fn time_ranges() {
        let f = field();
        let sub = f.read(&idx![Slice::new(day(2), day(4)).step(Duration::days(2)), 0, 0]).unwrap();
        let sub = sub.into_array().unwrap();
        assert_eq!(sub.dim(0).dates(), [day(2), day(4)]);
        assert_eq!(sub.array().tensor().as_ref(), [100.0, 300.0]);
    }

    #[test]
    fn flips_reverse_coordinates() {
        let sub = field().read(&idx![0, Slice::full().step(-1), 4]).unwrap().into_array().unwrap();
        assert_eq!(sub.dim(0).values(), [-10.0, 0.0, 10.0]);
        assert_eq!(sub.array().tensor().as_ref(), [24.0, 14.0, 4.0]);
    }

    #[test]
    fn scalars_and_new_axes() {
        assert_eq!(field().read(&idx![0, 10.0, 100.0]).unwrap().scalar(), Some(0.0));
        let one = field().read(&idx![0, 10.0, 100.0, NEW_AXIS]).unwrap().into_array().unwrap();
        assert_eq!(one.shape(), [1]);
        assert_eq!(one.dims(), [Dimension::unit()]);
    }

    #[test]
    fn paired_points() {
        let pts = field().read(&idx![1, vec![0, 2], vec![4, 0]]).unwrap().into_array().unwrap();
        assert_eq!(pts.shape(), [2]);
        assert_eq!(pts.dim(0).kind(), DimensionKind::Other);
        assert_eq!(pts.array().tensor().as_ref(), [104.0, 120.0]);
    }

    #[test]
    fn empty_selection() {
        let e = field().read(&idx![2..1, .., "110:120"]).unwrap().into_array().unwrap();
        assert_eq!(e.shape(), [0, 3, 3]);
        assert!(e.dim(0).is_empty());
    }

    #[test]
    fn empty_paired_points() {
        let none = Dense::new([3, 5], vec![false; 15]);
        let e = field().read(&idx![1, none]).unwrap().into_array().unwrap();
        assert_eq!(e.shape(), [0]);
        assert_eq!(e.dims().len(), 1);
        assert!(e.dim(0).is_empty());
    }

    #[test]
    fn uneven_steps() {
        let x = Dimension::new(DimensionKind::X, vec![0.0, 1.0, 2.0, 3.0, 13.0, 23.0]);
        let da = DimArray::new(Dense::new([6], vec![0, 1, 2, 3, 4, 5]), vec![x]).unwrap();
        let sub = da.read(&idx!["3:23:10"]).unwrap().into_array().unwrap();
        assert_eq!(sub.dim(0).values(), [3.0, 13.0, 23.0]);
        assert_eq!(sub.array().tensor().as_ref(), [3, 4, 5]);
    }

    #[test]
    fn writes() {
        let mut f = field();
        f.write(&idx![.., "0", "100:105"], -1.0).unwrap();
        assert_eq!(f.array().get(&[3, 1, 1]), -1.0);
        assert_eq!(f.array().get(&[3, 1, 2]), 312.0);
        assert_matches!(f.write(&idx![4], 0.0), Err(IndexError::IndexOutOfRange {..}));
        let mut f = f.with_options(IndexOptions::lenient());
        f.write(&idx![4], 0.0).unwrap();
    }

    #[test]
    fn views_share() {
        let f = field();
        let v = f.view();
        assert_eq!(v, f);
        assert!(v.array().tensor().shares_storage(f.array().tensor()));
    }

    #[test]
    fn projected_without_geodesy() {
        let f = field().with_projection(Projection::new("+proj=merc"), None);
        assert_matches!(
            f.read(&idx![0, "0:10", "100:110"]),
            Err(IndexError::Projection(ProjectionError::Unavailable {..}))
        );
        assert!(f.read(&idx![0, 0.0, "100:110"]).is_ok());
    }
}
