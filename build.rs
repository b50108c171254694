//! Build script
//!
//! Embeds every `assets/bundled/*.zip` into the binary. The generated
//! `bundled_archives.rs` holds a sorted static slice of `BundledArchive`
//! entries that `src/provision/bundled.rs` includes.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const BUNDLED_DIR: &str = "assets/bundled";

fn main() {
    println!("cargo:rerun-if-changed={BUNDLED_DIR}");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap_or_default());
    let bundled_dir = manifest_dir.join(BUNDLED_DIR);

    let mut archives = zip_files_in(&bundled_dir);
    archives.sort();

    let mut generated = String::from("pub static BUNDLED_ARCHIVES: &[BundledArchive<'static>] = &[\n");
    for path in &archives {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        println!("cargo:rerun-if-changed={}", path.display());
        generated.push_str(&format!(
            "    BundledArchive {{ name: {:?}, bytes: include_bytes!({:?}) }},\n",
            name,
            path.display().to_string()
        ));
    }
    generated.push_str("];\n");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap_or_default());
    if let Err(e) = fs::write(out_dir.join("bundled_archives.rs"), generated) {
        println!("cargo:warning=failed to write bundled archive table: {e}");
    }
}

fn zip_files_in(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        println!("cargo:warning=no {BUNDLED_DIR} directory, building without bundled tools");
        return Vec::new();
    };

    entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| path.extension().is_some_and(|ext| ext == "zip"))
        .collect()
}
