//! The point pen protocol.
//!
//! Outlines are never materialized by the glif codec; they are streamed as a
//! sequence of calls on a [`PointPen`]. A contour is a `begin_path`, any
//! number of `add_point` calls and an `end_path`. Components are a separate
//! call and are never decomposed.
//!
//! This mirrors the [fontTools point pen] protocol.
//!
//! [fontTools point pen]: https://fonttools.readthedocs.io/en/latest/pens/basePen.html

#[cfg(feature = "kurbo")]
mod bezpath;
mod recording;
mod transform;
mod validating;

#[cfg(feature = "kurbo")]
pub use bezpath::BezPathPen;
pub use recording::{PenCall, RecordingPointPen};
pub use transform::TransformPointPen;
pub use validating::ValidatingPointPen;

/// A sink for outline data.
///
/// Every method can fail, so that a sink may reject input it cannot
/// represent; the caller stops drawing on the first error.
pub trait PointPen {
    /// Starts a new contour.
    fn begin_path(&mut self, identifier: Option<&str>) -> Result<(), PenError>;

    /// Adds a point to the current contour.
    fn add_point(
        &mut self,
        pt: (f64, f64),
        segment_type: PointType,
        smooth: bool,
        name: Option<&str>,
        identifier: Option<&str>,
    ) -> Result<(), PenError>;

    /// Ends the current contour.
    fn end_path(&mut self) -> Result<(), PenError>;

    /// Adds a reference to another glyph.
    fn add_component(
        &mut self,
        base: &str,
        transform: AffineTransform,
        identifier: Option<&str>,
    ) -> Result<(), PenError>;
}

impl<P: PointPen + ?Sized> PointPen for &mut P {
    fn begin_path(&mut self, identifier: Option<&str>) -> Result<(), PenError> {
        (**self).begin_path(identifier)
    }

    fn add_point(
        &mut self,
        pt: (f64, f64),
        segment_type: PointType,
        smooth: bool,
        name: Option<&str>,
        identifier: Option<&str>,
    ) -> Result<(), PenError> {
        (**self).add_point(pt, segment_type, smooth, name, identifier)
    }

    fn end_path(&mut self) -> Result<(), PenError> {
        (**self).end_path()
    }

    fn add_component(
        &mut self,
        base: &str,
        transform: AffineTransform,
        identifier: Option<&str>,
    ) -> Result<(), PenError> {
        (**self).add_component(base, transform, identifier)
    }
}

/// An error raised by a pen that rejects a call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum PenError {
    /// The contour pen path was not started.
    #[error("must call begin_path() before calling add_point() or end_path()")]
    PenPathNotStarted,
    /// A path was started, or a component added, before the previous path was ended.
    #[error("unfinished drawing, you must call end_path()")]
    UnfinishedDrawing,
    /// Has an unexpected move definition.
    #[error("unexpected move point, can only occur at start of contour")]
    UnexpectedMove,
    /// Has an unexpected point following an off curve point definition.
    #[error("an off-curve point must be followed by a curve or qcurve")]
    UnexpectedPointAfterOffCurve,
    /// Has too many off curve points in sequence.
    #[error("at most two off-curve points can precede a curve")]
    TooManyOffCurves,
    /// Has an unexpected smooth definition.
    #[error("unexpected smooth attribute on an off-curve point")]
    UnexpectedSmooth,
    /// Has trailing off curve points defined.
    #[error("open contours must not have trailing off-curves")]
    TrailingOffCurves,
    /// A sink refused the call for its own reasons.
    #[error("pen rejected input: {0}")]
    Rejected(String),
}

/// The type of a point in a contour.
///
/// A point of type `Move` must be the first in a contour, and marks the
/// contour as open. A contour that does not start with a move is closed
/// and cyclic: its point list can be rotated freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointType {
    /// The start of an open contour.
    Move,
    /// A straight line from the previous point.
    Line,
    /// A control point of a curve ending at the next `Curve` or `QCurve`.
    OffCurve,
    /// A cubic curve ending here, with zero, one or two preceding off-curves.
    Curve,
    /// A quadratic curve ending here, using implied on-curve points.
    QCurve,
}

/// The error returned when parsing an unknown point type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized point type '{0}'")]
pub struct InvalidPointType(pub String);

impl std::str::FromStr for PointType {
    type Err = InvalidPointType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "move" => Ok(PointType::Move),
            "line" => Ok(PointType::Line),
            "offcurve" => Ok(PointType::OffCurve),
            "curve" => Ok(PointType::Curve),
            "qcurve" => Ok(PointType::QCurve),
            other => Err(InvalidPointType(other.into())),
        }
    }
}

impl PointType {
    /// The name of the type as written in glif files.
    pub fn as_str(&self) -> &'static str {
        match self {
            PointType::Move => "move",
            PointType::Line => "line",
            PointType::OffCurve => "offcurve",
            PointType::Curve => "curve",
            PointType::QCurve => "qcurve",
        }
    }
}

impl std::fmt::Display for PointType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A 2D affine transformation.
///
/// Taken together in order, these fields represent the matrix
/// `[x_scale xy_scale yx_scale y_scale x_offset y_offset]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTransform {
    /// x-scale value.
    pub x_scale: f64,
    /// xy-scale value.
    pub xy_scale: f64,
    /// yx-scale value.
    pub yx_scale: f64,
    /// y-scale value.
    pub y_scale: f64,
    /// x-offset value.
    pub x_offset: f64,
    /// y-offset value.
    pub y_offset: f64,
}

impl AffineTransform {
    ///  [1 0 0 1 0 0]; the identity transformation.
    pub fn identity() -> Self {
        AffineTransform {
            x_scale: 1.0,
            xy_scale: 0.,
            yx_scale: 0.,
            y_scale: 1.0,
            x_offset: 0.,
            y_offset: 0.,
        }
    }

    /// A pure translation.
    pub fn translate(x: f64, y: f64) -> Self {
        AffineTransform { x_offset: x, y_offset: y, ..Self::identity() }
    }

    /// A uniform or non-uniform scale around the origin.
    pub fn scale(x: f64, y: f64) -> Self {
        AffineTransform { x_scale: x, y_scale: y, ..Self::identity() }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// Applies the transformation to a point.
    pub fn apply(&self, (x, y): (f64, f64)) -> (f64, f64) {
        (
            self.x_scale * x + self.yx_scale * y + self.x_offset,
            self.xy_scale * x + self.y_scale * y + self.y_offset,
        )
    }

    /// Returns the transformation that applies `inner` first, then `self`.
    pub fn compose(&self, inner: &AffineTransform) -> AffineTransform {
        AffineTransform {
            x_scale: self.x_scale * inner.x_scale + self.yx_scale * inner.xy_scale,
            xy_scale: self.xy_scale * inner.x_scale + self.y_scale * inner.xy_scale,
            yx_scale: self.x_scale * inner.yx_scale + self.yx_scale * inner.y_scale,
            y_scale: self.xy_scale * inner.yx_scale + self.y_scale * inner.y_scale,
            x_offset: self.x_scale * inner.x_offset + self.yx_scale * inner.y_offset + self.x_offset,
            y_offset: self.xy_scale * inner.x_offset + self.y_scale * inner.y_offset + self.y_offset,
        }
    }
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(feature = "kurbo")]
impl From<AffineTransform> for kurbo::Affine {
    fn from(src: AffineTransform) -> kurbo::Affine {
        kurbo::Affine::new([
            src.x_scale,
            src.xy_scale,
            src.yx_scale,
            src.y_scale,
            src.x_offset,
            src.y_offset,
        ])
    }
}

#[cfg(feature = "kurbo")]
impl From<kurbo::Affine> for AffineTransform {
    fn from(src: kurbo::Affine) -> AffineTransform {
        let coeffs = src.as_coeffs();
        AffineTransform {
            x_scale: coeffs[0],
            xy_scale: coeffs[1],
            yx_scale: coeffs[2],
            y_scale: coeffs[3],
            x_offset: coeffs[4],
            y_offset: coeffs[5],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_type_names() {
        for typ in [PointType::Move, PointType::Line, PointType::OffCurve, PointType::Curve, PointType::QCurve] {
            assert_eq!(typ.as_str().parse::<PointType>(), Ok(typ));
        }
        assert_eq!("Curve".parse::<PointType>(), Err(InvalidPointType("Curve".into())));
    }

    #[test]
    fn compose_applies_inner_first() {
        let scale = AffineTransform::scale(2.0, 3.0);
        let shift = AffineTransform::translate(10.0, 20.0);
        let composed = shift.compose(&scale);
        assert_eq!(composed.apply((1.0, 1.0)), shift.apply(scale.apply((1.0, 1.0))));
        assert_eq!(composed.apply((1.0, 1.0)), (12.0, 23.0));
        assert!(AffineTransform::default().is_identity());
    }

    #[cfg(feature = "kurbo")]
    #[test]
    fn kurbo_matches_apply() {
        let t = AffineTransform { xy_scale: 0.5, yx_scale: 0.25, ..AffineTransform::translate(3.0, 4.0) };
        let (x, y) = t.apply((2.0, 8.0));
        let p = kurbo::Affine::from(t) * kurbo::Point::new(2.0, 8.0);
        assert_eq!((p.x, p.y), (x, y));
    }
}
