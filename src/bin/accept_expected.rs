//! Binary to generate/update the `.expected.*` fixture outputs
//!
//! Usage:
//!   cargo run --bin accept_expected            # Update all
//!   cargo run --bin accept_expected -- card    # Update only fixtures matching "card"

use modifier_attrs::Pipeline;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

fn main() {
    let filter: Option<String> = std::env::args().nth(1);
    let fixture_dir = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures");

    let pipeline = Pipeline::standard();
    let mut updated = 0;
    let mut skipped = 0;

    for entry in WalkDir::new(&fixture_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| !e.file_name().to_string_lossy().contains(".expected."))
    {
        let path = entry.path();

        if let Some(ref f) = filter {
            if !path.to_string_lossy().contains(f) {
                skipped += 1;
                continue;
            }
        }

        process_file(&pipeline, path);
        updated += 1;
    }

    println!("Updated {} files, skipped {}", updated, skipped);
}

fn process_file(pipeline: &Pipeline, path: &Path) {
    let source = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to read {:?}: {}", path, e);
            return;
        }
    };

    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    let expected = match path.extension().and_then(|s| s.to_str()) {
        Some(ext) => path.with_file_name(format!("{stem}.expected.{ext}")),
        None => path.with_file_name(format!("{stem}.expected")),
    };

    let result = pipeline.transform_path(path, &source);
    if let Err(e) = fs::write(&expected, &result.code) {
        eprintln!("Failed to write {:?}: {}", expected, e);
    } else {
        println!("  wrote {}", expected.display());
    }
}
