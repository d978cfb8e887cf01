//! Prints the pen calls made while reading a glif file.

use std::ffi::OsStr;
use std::path::PathBuf;
use std::{env, fs};

use ufokit::{glif, AffineTransform, PenError, PointPen, PointType};

fn main() {
    env_logger::init();
    let path = match env::args().nth(1).map(PathBuf::from) {
        Some(ref p) if p.exists() && p.extension() == Some(OsStr::new("glif")) => p.to_owned(),
        Some(ref p) => {
            eprintln!("path {p:?} is not an existing .glif file, exiting");
            std::process::exit(1);
        }
        None => {
            eprintln!("Please supply a path to a glif file");
            std::process::exit(1);
        }
    };

    let xml = match fs::read(&path) {
        Ok(xml) => xml,
        Err(e) => {
            eprintln!("failed to read {path:?}: {e}");
            std::process::exit(1);
        }
    };
    let mut pen = PrintingPen { level: 0 };
    match glif::read_glyph(&xml, &mut pen) {
        Ok(glyph) => {
            println!("glyph '{}', format {:?}", glyph.name, glyph.format);
            if let Some(width) = glyph.width {
                println!("advance width {width}");
            }
            for codepoint in glyph.codepoints.iter() {
                println!("unicode U+{:04X}", codepoint as u32);
            }
            for anchor in &glyph.anchors {
                println!("anchor {:?} at ({}, {})", anchor.name, anchor.x, anchor.y);
            }
            if !glyph.lib.is_empty() {
                println!("lib keys: {:?}", glyph.lib.keys().collect::<Vec<_>>());
            }
        }
        Err(e) => {
            eprintln!("error {e}");
            std::process::exit(1);
        }
    }
}

struct PrintingPen {
    level: usize,
}

impl PointPen for PrintingPen {
    fn begin_path(&mut self, identifier: Option<&str>) -> Result<(), PenError> {
        println!("{}begin_path({identifier:?})", spaces_for_level(self.level));
        self.level += 1;
        Ok(())
    }

    fn add_point(
        &mut self,
        (x, y): (f64, f64),
        segment_type: PointType,
        smooth: bool,
        name: Option<&str>,
        identifier: Option<&str>,
    ) -> Result<(), PenError> {
        println!(
            "{}add_point(({x}, {y}), {segment_type}, smooth={smooth}, name={name:?}, id={identifier:?})",
            spaces_for_level(self.level)
        );
        Ok(())
    }

    fn end_path(&mut self) -> Result<(), PenError> {
        self.level = self.level.saturating_sub(1);
        println!("{}end_path()", spaces_for_level(self.level));
        Ok(())
    }

    fn add_component(
        &mut self,
        base: &str,
        transform: AffineTransform,
        identifier: Option<&str>,
    ) -> Result<(), PenError> {
        println!("{}add_component({base:?}, {transform:?}, {identifier:?})", spaces_for_level(self.level));
        Ok(())
    }
}

fn spaces_for_level(level: usize) -> String {
    "  ".repeat(level)
}
