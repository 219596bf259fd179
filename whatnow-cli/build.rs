//! Stamps `WHATNOW_BUILD_SHA` (short commit of the workspace checkout, or
//! `unknown` outside git) for `whatnow --version`.

use std::path::{Path, PathBuf};
use std::process::Command;

fn short_head(workspace: &Path) -> Option<String> {
    let out = Command::new("git")
        .arg("-C")
        .arg(workspace)
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let sha = String::from_utf8(out.stdout).ok()?.trim().to_owned();
    (!sha.is_empty()).then_some(sha)
}

fn main() {
    let crate_dir = PathBuf::from(std::env::var_os("CARGO_MANIFEST_DIR").unwrap_or_else(|| ".".into()));
    let workspace = crate_dir.parent().map(Path::to_path_buf).unwrap_or(crate_dir);

    let head = workspace.join(".git").join("HEAD");
    if head.exists() {
        println!("cargo:rerun-if-changed={}", head.display());
    }

    let sha = short_head(&workspace).unwrap_or_else(|| "unknown".to_owned());
    println!("cargo:rustc-env=WHATNOW_BUILD_SHA={sha}");
}
