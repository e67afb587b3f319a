//! A library for indexing multi-dimensional arrays by position and by
//! coordinate.
//!
//! [`Array<B>`] wraps a rectangular buffer `B` that implements [`Tensor`],
//! and accepts NumPy-like index expressions: integers (negative ones count
//! from the end), `start:stop:step` slices, integer lists, boolean masks,
//! [`NEW_AXIS`] and [`ELLIPSIS`]. Build expressions with the [`idx!`] macro,
//! which accepts anything that converts into an [`IndexItem`]:
//!
//! ```
//! use dimarray::{idx, Array, Selected, NEW_AXIS};
//! let a = Array::from_vec([2, 3], vec![0, 1, 2, 3, 4, 5]);
//! let row = a.read(&idx![1]).unwrap().into_array().unwrap();
//! assert_eq!(row.tensor().as_ref(), [3, 4, 5]);
//! assert_eq!(a.read(&idx![1, 2]).unwrap(), Selected::Scalar(5));
//! assert!(!a.read(&idx![1, 2, NEW_AXIS]).unwrap().is_scalar());
//! ```
//!
//! [`DimArray<B>`] adds a [`Dimension`] per axis: a table of coordinate
//! values, such as longitudes or times. Index expressions may then contain
//! coordinate values, datetimes, and coordinate range literals like
//! `"10:20"`, which are resolved against the tables. If a `DimArray` has a
//! projected [`Projection`], range literals on its X and Y axes are taken to
//! be longitude and latitude, and reprojected with a [`Geodesy`].
//!
//! A read copies the selected elements; only `view()` shares storage. A
//! write replaces the array's `Tensor` with an updated copy.
//!
//! Every index expression goes through the same stages: [`normalize`] brings
//! it to one [`IndexToken`] per axis, [`project_bounds()`] reprojects range
//! literals, [`plan`] resolves each axis into an [`AxisPlan`] and chooses
//! a backend primitive, and [`assemble()`] or [`write()`] applies the plan.
//!
//! [`IndexToken`]: token::IndexToken
//! [`project_bounds()`]: projection::project_bounds()
//! [`AxisPlan`]: plan::AxisPlan
//! [`assemble()`]: assemble::assemble()
//! [`write()`]: mutate::write()

pub mod layout;

mod tensor;
pub use tensor::{DType, Element, Section, Tensor};

mod dense;
pub use dense::{Dense};

mod error;
pub use error::{IndexError, Result};

pub mod dimension;
pub use dimension::{Dimension, DimensionKind};

pub mod resolve;

pub mod token;
pub use token::{IndexItem, NEW_AXIS, ELLIPSIS};

pub mod normalize;

pub mod projection;
pub use projection::{Geodesy, Projection, ProjectionError};

pub mod plan;

pub mod rebuild;

pub mod assemble;
pub use assemble::{Selected};

pub mod mutate;
pub use mutate::{Value};

mod options;
pub use options::{IndexOptions, OutOfRangeWrites};

mod array;
pub use array::{Array};

mod dimarray;
pub use dimarray::{DimArray, DEFAULT_FILL_VALUE};
