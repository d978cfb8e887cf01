//! Loads a UFO and writes it back out, reporting the time taken.
//!
//! Set `RUST_LOG=debug` to see each file as it is written.

use std::env;
use std::ffi::OsStr;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use ufokit::Font;

fn main() {
    env_logger::init();
    let (input, output) = get_path_or_exit();

    let start_load = Instant::now();
    let font = match Font::open(&input) {
        Ok(font) => font,
        Err(e) => exit_with_error(&e),
    };
    let duration_load = start_load.elapsed();

    let glyphs: usize = font.layers.iter().map(|layer| layer.len()).sum();

    let start_write = Instant::now();
    if let Err(e) = font.save(&output) {
        exit_with_error(&e);
    }
    let duration_write = start_write.elapsed();

    println!(
        "Loaded {} glyphs in {} layers in {}, wrote them in {}.",
        glyphs,
        font.layers.len(),
        format_time(duration_load),
        format_time(duration_write)
    );
}

fn exit_with_error(error: &dyn std::error::Error) -> ! {
    eprintln!("error: {error}");
    let mut source = error.source();
    while let Some(e) = source {
        eprintln!("  caused by: {e}");
        source = e.source();
    }
    std::process::exit(1);
}

fn get_path_or_exit() -> (PathBuf, PathBuf) {
    let mut args = env::args().skip(1);

    let input = match args.next().map(PathBuf::from) {
        Some(ref p) if p.exists() && p.extension() == Some(OsStr::new("ufo")) => p.to_owned(),
        _ => {
            eprintln!("Please supply a path to a UFO to read from");
            std::process::exit(1);
        }
    };
    let output = match args.next().map(PathBuf::from) {
        Some(ref p) if p.extension() == Some(OsStr::new("ufo")) => p.to_owned(),
        _ => {
            eprintln!("Please supply a path to write the UFO to");
            std::process::exit(1);
        }
    };

    (input, output)
}

fn format_time(duration: Duration) -> String {
    format!("{}.{:03}s", duration.as_secs(), duration.subsec_millis())
}
