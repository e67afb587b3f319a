//! Map projections, and the rewriting of longitude/latitude ranges into the
//! native units of a projected array.

use std::fmt::{Debug};

use serde::{Deserialize, Serialize};

use super::{Dimension, DimensionKind};
use super::token::{CoordRange, IndexToken};

/// A coordinate reference system, identified by its PROJ-style definition.
///
/// ```
/// use dimarray::{Projection};
/// assert!(Projection::longlat().is_geographic());
/// assert!(!Projection::new("+proj=merc +datum=WGS84").is_geographic());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Projection {
    definition: String,
    geographic: bool,
}

impl Projection {
    pub fn new(definition: impl Into<String>) -> Self {
        let definition = definition.into();
        let geographic = definition.split_whitespace().any(|p| p == "+proj=longlat" || p == "+proj=latlong");
        Self {definition, geographic}
    }

    /// The geographic coordinate system, in degrees of longitude and latitude.
    pub fn longlat() -> Self { Self::new("+proj=longlat +datum=WGS84 +no_defs") }

    pub fn definition(&self) -> &str { &self.definition }

    /// Returns `true` if coordinates are longitude and latitude.
    pub fn is_geographic(&self) -> bool { self.geographic }
}

impl Default for Projection {
    fn default() -> Self { Self::longlat() }
}

/// Errors from reprojecting coordinates.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProjectionError {
    #[error("no geodesy is available to reproject into `{definition}`")]
    Unavailable { definition: String },

    #[error("cannot reproject ({x}, {y}): {reason}")]
    Transform { x: f64, y: f64, reason: String },
}

/// Reprojection of points between coordinate systems.
///
/// The crate does not implement any projection mathematics. Callers supply
/// an implementation, usually a binding to a geodesy library.
pub trait Geodesy: Debug + Send + Sync {
    /// Returns the coordinates in `to` of the point `(x, y)` in `from`.
    fn reproject_point(&self, x: f64, y: f64, from: &Projection, to: &Projection) -> Result<(f64, f64), ProjectionError>;
}

// ----------------------------------------------------------------------------

/// Returns `(start, stop)` of `range`, with `stop` defaulting to `start`.
fn bounds(range: &CoordRange) -> (f64, f64) { (range.start, range.stop.unwrap_or(range.start)) }

/// Returns `range` moved to `[start, stop]`, with its step scaled as much as
/// its extent.
fn rescale(range: &CoordRange, start: f64, stop: f64) -> CoordRange {
    let (old_start, old_stop) = bounds(range);
    let extent = old_stop - old_start;
    let ratio = if extent == 0.0 { 1.0 } else { (stop - start) / extent };
    CoordRange {
        start,
        stop: range.stop.map(|_| stop),
        step: range.step.map(|step| if ratio == 0.0 { step } else { step * ratio }),
    }
}

/// Rewrites the [`IndexToken::CoordRange`]s selecting the X and Y axes from
/// longitude/latitude into the native units of `projection`.
///
/// Nothing happens unless `projection` is not geographic and both the X axis
/// and the Y axis are selected by coordinate range literals. The corners
/// `(x_start, y_start)` and `(x_stop, y_stop)` are reprojected; literal steps
/// are scaled by the same ratio as the range they belong to.
pub fn project_bounds(
    tokens: &mut [IndexToken],
    dims: &[Dimension],
    projection: &Projection,
    geodesy: Option<&dyn Geodesy>,
) -> Result<(), ProjectionError> {
    if projection.is_geographic() { return Ok(()); }
    let axis_of = |kind| dims.iter().position(|d| d.kind() == kind);
    let (Some(x_axis), Some(y_axis)) = (axis_of(DimensionKind::X), axis_of(DimensionKind::Y)) else { return Ok(()); };
    let (x, y) = match (&tokens[x_axis], &tokens[y_axis]) {
        (IndexToken::CoordRange(x), IndexToken::CoordRange(y)) => (*x, *y),
        _ => return Ok(()),
    };
    let geodesy = geodesy.ok_or_else(|| ProjectionError::Unavailable {definition: projection.definition().to_owned()})?;
    let longlat = Projection::longlat();
    let ((x0, x1), (y0, y1)) = (bounds(&x), bounds(&y));
    let (px0, py0) = geodesy.reproject_point(x0, y0, &longlat, projection)?;
    let (px1, py1) = geodesy.reproject_point(x1, y1, &longlat, projection)?;
    let (x_native, y_native) = (rescale(&x, px0, px1), rescale(&y, py0, py1));
    tracing::debug!(%x, %y, x_native = %x_native, y_native = %y_native, "reprojected coordinate ranges");
    tokens[x_axis] = IndexToken::CoordRange(x_native);
    tokens[y_axis] = IndexToken::CoordRange(y_native);
    Ok(())
}

// ----------------------------------------------------------------------------
