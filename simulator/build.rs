//! Build script for roundy-simulator.
//!
//! On Windows, SDL2 is not on the default library path. The SDL2 import
//! library and DLL are taken from `$SDL2_DIR` or, if unset, from
//! `vendor/sdl2/` at the workspace root. The DLL is copied next to the
//! built binary so `cargo run` works without touching `PATH`.

use std::path::{Path, PathBuf};
use std::{env, fs};

fn main() {
    println!("cargo:rerun-if-env-changed=SDL2_DIR");

    if env::var("CARGO_CFG_TARGET_OS").unwrap_or_default() != "windows" {
        return;
    }

    let Some(sdl2_dir) = sdl2_dir() else {
        println!("cargo:warning=SDL2 not found: set SDL2_DIR or place SDL2.lib and SDL2.dll in vendor/sdl2/");
        return;
    };
    println!("cargo:rerun-if-changed={}", sdl2_dir.display());
    println!("cargo:rustc-link-search=native={}", sdl2_dir.display());

    if let Some(profile_dir) = env::var_os("OUT_DIR").as_deref().map(Path::new).and_then(profile_dir) {
        copy_dll(&sdl2_dir, profile_dir);
    }
}

fn sdl2_dir() -> Option<PathBuf> {
    if let Some(dir) = env::var_os("SDL2_DIR") {
        return Some(PathBuf::from(dir));
    }
    let manifest_dir = PathBuf::from(env::var_os("CARGO_MANIFEST_DIR")?);
    let vendored = manifest_dir.parent()?.join("vendor").join("sdl2");
    vendored.exists().then_some(vendored)
}

/// `target/<profile>` from `target/<profile>/build/roundy-simulator-<hash>/out`.
fn profile_dir(out_dir: &Path) -> Option<&Path> {
    out_dir
        .ancestors()
        .find(|p| p.file_name().is_some_and(|n| n == "release" || n == "debug"))
}

fn copy_dll(
    sdl2_dir: &Path,
    profile_dir: &Path,
) {
    let src = sdl2_dir.join("SDL2.dll");
    let dst = profile_dir.join("SDL2.dll");
    if !src.exists() || dst.exists() {
        return;
    }
    if let Err(e) = fs::copy(&src, &dst) {
        println!("cargo:warning=Failed to copy SDL2.dll: {e}");
    }
}
