use super::{AffineTransform, PenError, PointPen, PointType};

/// A pen that transforms all coordinates before forwarding them.
///
/// Component transformations are composed with the pen's transformation,
/// so the referenced glyph ends up where its outline would.
#[derive(Debug)]
pub struct TransformPointPen<P> {
    inner: P,
    transform: AffineTransform,
}

impl<P: PointPen> TransformPointPen<P> {
    pub fn new(inner: P, transform: AffineTransform) -> Self {
        TransformPointPen { inner, transform }
    }

    pub fn into_inner(self) -> P {
        self.inner
    }
}

impl<P: PointPen> PointPen for TransformPointPen<P> {
    fn begin_path(&mut self, identifier: Option<&str>) -> Result<(), PenError> {
        self.inner.begin_path(identifier)
    }

    fn add_point(
        &mut self,
        pt: (f64, f64),
        segment_type: PointType,
        smooth: bool,
        name: Option<&str>,
        identifier: Option<&str>,
    ) -> Result<(), PenError> {
        self.inner.add_point(self.transform.apply(pt), segment_type, smooth, name, identifier)
    }

    fn end_path(&mut self) -> Result<(), PenError> {
        self.inner.end_path()
    }

    fn add_component(
        &mut self,
        base: &str,
        transform: AffineTransform,
        identifier: Option<&str>,
    ) -> Result<(), PenError> {
        self.inner.add_component(base, self.transform.compose(&transform), identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pen::{PenCall, RecordingPointPen};

    #[test]
    fn transforms_points_and_components() {
        let mut pen = TransformPointPen::new(RecordingPointPen::new(), AffineTransform::scale(2.0, 2.0));
        pen.begin_path(None).unwrap();
        pen.add_point((1.0, 2.0), PointType::Line, false, None, None).unwrap();
        pen.end_path().unwrap();
        pen.add_component("a", AffineTransform::translate(1.0, 1.0), None).unwrap();

        let rec = pen.into_inner();
        assert_eq!(
            rec.calls()[1],
            PenCall::AddPoint {
                pt: (2.0, 4.0),
                segment_type: PointType::Line,
                smooth: false,
                name: None,
                identifier: None
            }
        );
        match &rec.calls()[3] {
            PenCall::AddComponent { transform, .. } => {
                assert_eq!(transform.apply((0.0, 0.0)), (2.0, 2.0));
                assert_eq!(transform.x_scale, 2.0);
            }
            other => panic!("unexpected call {other:?}"),
        }
    }
}
