use super::{AffineTransform, PenError, PointPen, PointType};

/// A pen that checks the point sequence rules of contours before forwarding.
///
/// Rejected calls are not forwarded. Beyond what the glif format requires,
/// empty contours and contours made only of off-curve points (quadratic
/// contours with no on-curve point) are accepted.
///
/// Does not keep track of identifier uniqueness.
#[derive(Debug)]
pub struct ValidatingPointPen<P> {
    inner: P,
    state: State,
}

#[derive(Debug, Default)]
enum State {
    #[default]
    Idle,
    Drawing { types: Vec<PointType>, number_of_offcurves: u32 },
}

impl<P: PointPen> ValidatingPointPen<P> {
    pub fn new(inner: P) -> Self {
        ValidatingPointPen { inner, state: State::Idle }
    }

    /// Returns the wrapped pen.
    ///
    /// Errors when a path has been begun but not ended.
    pub fn finish(self) -> Result<P, PenError> {
        match self.state {
            State::Idle => Ok(self.inner),
            State::Drawing { .. } => Err(PenError::UnfinishedDrawing),
        }
    }
}

impl<P: PointPen> PointPen for ValidatingPointPen<P> {
    fn begin_path(&mut self, identifier: Option<&str>) -> Result<(), PenError> {
        match self.state {
            State::Idle => {
                self.inner.begin_path(identifier)?;
                self.state = State::Drawing { types: Vec::new(), number_of_offcurves: 0 };
                Ok(())
            }
            State::Drawing { .. } => Err(PenError::UnfinishedDrawing),
        }
    }

    fn add_point(
        &mut self,
        pt: (f64, f64),
        segment_type: PointType,
        smooth: bool,
        name: Option<&str>,
        identifier: Option<&str>,
    ) -> Result<(), PenError> {
        let State::Drawing { types, number_of_offcurves } = &mut self.state else {
            return Err(PenError::PenPathNotStarted);
        };
        let offcurves_after = match segment_type {
            PointType::Move => {
                if !types.is_empty() {
                    return Err(PenError::UnexpectedMove);
                }
                0
            }
            PointType::Line => {
                if *number_of_offcurves > 0 {
                    return Err(PenError::UnexpectedPointAfterOffCurve);
                }
                0
            }
            PointType::OffCurve => {
                if smooth {
                    return Err(PenError::UnexpectedSmooth);
                }
                number_of_offcurves.saturating_add(1)
            }
            PointType::QCurve => 0,
            PointType::Curve => {
                if *number_of_offcurves > 2 {
                    return Err(PenError::TooManyOffCurves);
                }
                0
            }
        };
        self.inner.add_point(pt, segment_type, smooth, name, identifier)?;
        types.push(segment_type);
        *number_of_offcurves = offcurves_after;
        Ok(())
    }

    fn end_path(&mut self) -> Result<(), PenError> {
        let State::Drawing { types, mut number_of_offcurves } = std::mem::take(&mut self.state)
        else {
            return Err(PenError::PenPathNotStarted);
        };
        // A closed contour ending in off-curves wraps around to its first
        // on-curve point, which must be a curve or qcurve.
        if number_of_offcurves > 0 {
            let is_closed = types.first() != Some(&PointType::Move);
            if !is_closed {
                return Err(PenError::TrailingOffCurves);
            }
            for typ in &types {
                match typ {
                    PointType::OffCurve => number_of_offcurves = number_of_offcurves.saturating_add(1),
                    PointType::QCurve => break,
                    PointType::Curve => {
                        if number_of_offcurves > 2 {
                            return Err(PenError::TooManyOffCurves);
                        }
                        break;
                    }
                    PointType::Line => return Err(PenError::UnexpectedPointAfterOffCurve),
                    PointType::Move => unreachable!("a closed contour has no move point"),
                }
            }
        }
        self.inner.end_path()
    }

    fn add_component(
        &mut self,
        base: &str,
        transform: AffineTransform,
        identifier: Option<&str>,
    ) -> Result<(), PenError> {
        match self.state {
            State::Idle => self.inner.add_component(base, transform, identifier),
            State::Drawing { .. } => Err(PenError::UnfinishedDrawing),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pen::RecordingPointPen;
    use crate::pen::PointType::*;

    fn draw(points: &[PointType]) -> Result<RecordingPointPen, PenError> {
        let mut pen = ValidatingPointPen::new(RecordingPointPen::new());
        pen.begin_path(None)?;
        for (i, typ) in points.iter().enumerate() {
            pen.add_point((i as f64, 0.0), *typ, false, None, None)?;
        }
        pen.end_path()?;
        pen.finish()
    }

    #[test]
    fn valid_sequences() {
        draw(&[]).unwrap();
        draw(&[OffCurve]).unwrap();
        draw(&[OffCurve, OffCurve, OffCurve]).unwrap();
        draw(&[Move, Line]).unwrap();
        draw(&[Move, OffCurve, OffCurve, Curve]).unwrap();
        draw(&[Curve, Line, OffCurve, OffCurve]).unwrap();
        draw(&[OffCurve, QCurve, OffCurve, OffCurve, OffCurve]).unwrap();
    }

    #[test]
    fn invalid_sequences() {
        assert_eq!(draw(&[Line, Move]).unwrap_err(), PenError::UnexpectedMove);
        assert_eq!(draw(&[Move, OffCurve, Line]).unwrap_err(), PenError::UnexpectedPointAfterOffCurve);
        assert_eq!(
            draw(&[Move, OffCurve, OffCurve, OffCurve, Curve]).unwrap_err(),
            PenError::TooManyOffCurves
        );
        assert_eq!(draw(&[Move, Line, OffCurve]).unwrap_err(), PenError::TrailingOffCurves);
        assert_eq!(draw(&[Line, OffCurve]).unwrap_err(), PenError::UnexpectedPointAfterOffCurve);
        assert_eq!(
            draw(&[OffCurve, Curve, OffCurve, OffCurve]).unwrap_err(),
            PenError::TooManyOffCurves
        );
    }

    #[test]
    fn state_errors() {
        let mut pen = ValidatingPointPen::new(RecordingPointPen::new());
        assert_eq!(pen.end_path(), Err(PenError::PenPathNotStarted));
        assert_eq!(
            pen.add_point((0.0, 0.0), Line, false, None, None),
            Err(PenError::PenPathNotStarted)
        );
        pen.begin_path(None).unwrap();
        assert_eq!(pen.begin_path(None), Err(PenError::UnfinishedDrawing));
        assert_eq!(
            pen.add_component("a", AffineTransform::identity(), None),
            Err(PenError::UnfinishedDrawing)
        );
        assert_eq!(
            pen.add_point((0.0, 0.0), OffCurve, true, None, None),
            Err(PenError::UnexpectedSmooth)
        );
        assert!(matches!(pen.finish(), Err(PenError::UnfinishedDrawing)));
    }
}
