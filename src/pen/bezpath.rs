use std::collections::VecDeque;

use kurbo::{BezPath, Point};

use super::{AffineTransform, PenError, PointPen, PointType};

/// A pen that builds a [`kurbo::BezPath`] from contours.
///
/// Components are not resolved; they are collected as (base, transform)
/// pairs for the caller to look up.
#[derive(Debug, Default)]
pub struct BezPathPen {
    path: BezPath,
    components: Vec<(String, kurbo::Affine)>,
    current: Option<Vec<(Point, PointType)>>,
}

impl BezPathPen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the finished path and the collected components.
    pub fn finish(self) -> Result<(BezPath, Vec<(String, kurbo::Affine)>), PenError> {
        match self.current {
            None => Ok((self.path, self.components)),
            Some(_) => Err(PenError::UnfinishedDrawing),
        }
    }

    fn append_contour(&mut self, points: &[(Point, PointType)]) -> Result<(), PenError> {
        if points.is_empty() {
            return Ok(());
        }
        if points.iter().all(|(_, typ)| *typ == PointType::OffCurve) {
            self.append_implied_quadratic(points);
            return Ok(());
        }
        let closed = points[0].1 != PointType::Move;
        let mut offs = VecDeque::new();
        let mut iter = if closed {
            // start at the last on-curve point, so trailing off-curves are queued first
            let rotate = points
                .iter()
                .rev()
                .position(|(_, typ)| *typ != PointType::OffCurve)
                .map(|idx| points.len() - 1 - idx);
            points.iter().cycle().skip(rotate.unwrap_or(0)).take(points.len() + 1)
        } else {
            #[allow(clippy::iter_skip_zero)]
            points.iter().cycle().skip(0).take(points.len())
        };
        if let Some((start, _)) = iter.next() {
            self.path.move_to(*start);
        }
        for (pt, typ) in iter {
            match typ {
                PointType::Move => self.path.move_to(*pt),
                PointType::Line => self.path.line_to(*pt),
                PointType::OffCurve => offs.push_back(*pt),
                PointType::Curve => {
                    match offs.make_contiguous() {
                        [] => self.path.line_to(*pt),
                        [p1] => self.path.quad_to(*p1, *pt),
                        [p1, p2] => self.path.curve_to(*p1, *p2, *pt),
                        _ => return Err(PenError::TooManyOffCurves),
                    };
                    offs.clear();
                }
                PointType::QCurve => {
                    if offs.is_empty() {
                        self.path.line_to(*pt);
                    }
                    while let Some(off) = offs.pop_front() {
                        match offs.front() {
                            Some(next) => self.path.quad_to(off, off.midpoint(*next)),
                            None => self.path.quad_to(off, *pt),
                        }
                    }
                }
            }
        }
        if closed {
            self.path.close_path();
        }
        Ok(())
    }

    /// A closed quadratic contour with no on-curve points at all.
    fn append_implied_quadratic(&mut self, points: &[(Point, PointType)]) {
        let first = points[0].0;
        let last = points[points.len() - 1].0;
        let start = last.midpoint(first);
        self.path.move_to(start);
        for (i, (off, _)) in points.iter().enumerate() {
            let on = match points.get(i + 1) {
                Some((next, _)) => off.midpoint(*next),
                None => start,
            };
            self.path.quad_to(*off, on);
        }
        self.path.close_path();
    }
}

impl PointPen for BezPathPen {
    fn begin_path(&mut self, _identifier: Option<&str>) -> Result<(), PenError> {
        if self.current.is_some() {
            return Err(PenError::UnfinishedDrawing);
        }
        self.current = Some(Vec::new());
        Ok(())
    }

    fn add_point(
        &mut self,
        (x, y): (f64, f64),
        segment_type: PointType,
        _smooth: bool,
        _name: Option<&str>,
        _identifier: Option<&str>,
    ) -> Result<(), PenError> {
        let current = self.current.as_mut().ok_or(PenError::PenPathNotStarted)?;
        current.push((Point::new(x, y), segment_type));
        Ok(())
    }

    fn end_path(&mut self) -> Result<(), PenError> {
        let points = self.current.take().ok_or(PenError::PenPathNotStarted)?;
        self.append_contour(&points)
    }

    fn add_component(
        &mut self,
        base: &str,
        transform: AffineTransform,
        _identifier: Option<&str>,
    ) -> Result<(), PenError> {
        self.components.push((base.into(), transform.into()));
        Ok(())
    }
}
