use super::{AffineTransform, PenError, PointPen, PointType};

/// A single recorded call on a [`PointPen`].
#[derive(Debug, Clone, PartialEq)]
pub enum PenCall {
    /// `begin_path`.
    BeginPath {
        /// The contour identifier.
        identifier: Option<String>,
    },
    /// `add_point`.
    AddPoint {
        /// The point coordinates.
        pt: (f64, f64),
        /// The point type.
        segment_type: PointType,
        /// Whether the point is smooth.
        smooth: bool,
        /// The point name.
        name: Option<String>,
        /// The point identifier.
        identifier: Option<String>,
    },
    /// `end_path`.
    EndPath,
    /// `add_component`.
    AddComponent {
        /// The referenced glyph.
        base: String,
        /// The component transformation.
        transform: AffineTransform,
        /// The component identifier.
        identifier: Option<String>,
    },
}

/// A pen that records every call, for replay into another pen.
///
/// Recording never fails and performs no validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingPointPen {
    calls: Vec<PenCall>,
}

impl RecordingPointPen {
    pub fn new() -> Self {
        Self::default()
    }

    /// The recorded calls, in order.
    pub fn calls(&self) -> &[PenCall] {
        &self.calls
    }

    pub fn into_calls(self) -> Vec<PenCall> {
        self.calls
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Replays every recorded call into `pen`, stopping at the first error.
    pub fn replay(&self, pen: &mut dyn PointPen) -> Result<(), PenError> {
        for call in &self.calls {
            call.replay(pen)?;
        }
        Ok(())
    }
}

impl PenCall {
    /// Makes this call on `pen`.
    pub fn replay(&self, pen: &mut dyn PointPen) -> Result<(), PenError> {
        match self {
            PenCall::BeginPath { identifier } => pen.begin_path(identifier.as_deref()),
            PenCall::AddPoint { pt, segment_type, smooth, name, identifier } => pen.add_point(
                *pt,
                *segment_type,
                *smooth,
                name.as_deref(),
                identifier.as_deref(),
            ),
            PenCall::EndPath => pen.end_path(),
            PenCall::AddComponent { base, transform, identifier } => {
                pen.add_component(base, *transform, identifier.as_deref())
            }
        }
    }
}

impl From<Vec<PenCall>> for RecordingPointPen {
    fn from(calls: Vec<PenCall>) -> Self {
        RecordingPointPen { calls }
    }
}

impl PointPen for RecordingPointPen {
    fn begin_path(&mut self, identifier: Option<&str>) -> Result<(), PenError> {
        self.calls.push(PenCall::BeginPath { identifier: identifier.map(Into::into) });
        Ok(())
    }

    fn add_point(
        &mut self,
        pt: (f64, f64),
        segment_type: PointType,
        smooth: bool,
        name: Option<&str>,
        identifier: Option<&str>,
    ) -> Result<(), PenError> {
        self.calls.push(PenCall::AddPoint {
            pt,
            segment_type,
            smooth,
            name: name.map(Into::into),
            identifier: identifier.map(Into::into),
        });
        Ok(())
    }

    fn end_path(&mut self) -> Result<(), PenError> {
        self.calls.push(PenCall::EndPath);
        Ok(())
    }

    fn add_component(
        &mut self,
        base: &str,
        transform: AffineTransform,
        identifier: Option<&str>,
    ) -> Result<(), PenError> {
        self.calls.push(PenCall::AddComponent {
            base: base.into(),
            transform,
            identifier: identifier.map(Into::into),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replay_is_identical() {
        let mut pen = RecordingPointPen::new();
        pen.begin_path(Some("c0")).unwrap();
        pen.add_point((0.0, 0.0), PointType::Move, false, Some("start"), None).unwrap();
        pen.add_point((10.0, 0.0), PointType::Line, false, None, Some("p1")).unwrap();
        pen.end_path().unwrap();
        pen.add_component("A", AffineTransform::translate(5.0, 0.0), None).unwrap();

        let mut copy = RecordingPointPen::new();
        pen.replay(&mut copy).unwrap();
        assert_eq!(copy, pen);
        assert_eq!(copy.calls().len(), 5);
    }
}
