//! Simple benchmarks of glyph parsing.
//!
//! This should be run when making any changes to glyph parsing.

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use ufokit::{glif, AffineTransform, Glyph, PenError, PointPen, PointType, RecordingPointPen};

/// Draws `contours` closed cubic contours of eight points each.
fn draw_contours(pen: &mut dyn PointPen, contours: usize) -> Result<(), PenError> {
    for i in 0..contours {
        let x = (i % 40) as f64 * 25.0;
        let y = (i / 40) as f64 * 25.0;
        pen.begin_path(None)?;
        for (dx, dy, kind) in [
            (0.0, 0.0, PointType::Curve),
            (5.0, 0.0, PointType::OffCurve),
            (10.0, 5.0, PointType::OffCurve),
            (10.0, 10.0, PointType::Curve),
            (10.0, 15.0, PointType::OffCurve),
            (5.0, 20.0, PointType::OffCurve),
            (0.0, 20.0, PointType::Curve),
            (0.0, 10.0, PointType::Line),
        ] {
            pen.add_point((x + dx, y + dy), kind, kind == PointType::Curve, None, None)?;
        }
        pen.end_path()?;
    }
    Ok(())
}

fn glif_bytes(contours: usize, components: &[&str]) -> Vec<u8> {
    let mut glyph = Glyph::try_new("bench").unwrap();
    glyph.width = Some(1000.0);
    glif::write_glyph(&glyph, |pen| {
        draw_contours(pen, contours)?;
        for (i, base) in components.iter().enumerate() {
            pen.add_component(base, AffineTransform::translate(i as f64 * 100.0, 0.0), None)?;
        }
        Ok(())
    })
    .unwrap()
}

pub fn criterion_benchmark(c: &mut Criterion) {
    // a normal glyph
    c.bench_function("parse S", |b| {
        let bytes = glif_bytes(3, &[]);
        b.iter(|| {
            glif::read_glyph(black_box(&bytes), &mut RecordingPointPen::new()).unwrap();
        })
    });
    // a very small glyph
    c.bench_function("parse dot", |b| {
        let bytes = glif_bytes(1, &[]);
        b.iter(|| {
            glif::read_glyph(black_box(&bytes), &mut RecordingPointPen::new()).unwrap();
        })
    });
    // a very large glyph, the size of the largest in noto cjk
    c.bench_function("parse large CJK glyph", |b| {
        let bytes = glif_bytes(600, &[]);
        b.iter(|| {
            glif::read_glyph(black_box(&bytes), &mut RecordingPointPen::new()).unwrap();
        })
    });
    // a component glyph
    c.bench_function("parse A_acute", |b| {
        let bytes = glif_bytes(0, &["A", "acutecomb"]);
        b.iter(|| {
            glif::read_glyph(black_box(&bytes), &mut RecordingPointPen::new()).unwrap();
        })
    });
    c.bench_function("write large CJK glyph", |b| {
        let mut outline = RecordingPointPen::new();
        draw_contours(&mut outline, 600).unwrap();
        let glyph = Glyph::try_new("bench").unwrap();
        b.iter(|| glif::write_glyph(black_box(&glyph), |pen| outline.replay(pen)).unwrap())
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
