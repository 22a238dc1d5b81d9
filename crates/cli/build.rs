use std::process::Command;

fn main() {
    // Prefer the latest git tag for the reported version, falling back to
    // the crate version when building outside a tagged checkout.
    let version = git_tag_version().unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());

    println!("cargo:rustc-env=APP_VERSION={}", version);
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/tags");
}

fn git_tag_version() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--tags", "--abbrev=0"])
        .output()
        .ok()
        .filter(|o| o.status.success())?;

    let tag = String::from_utf8(output.stdout).ok()?;
    let tag = tag.trim();
    Some(tag.strip_prefix('v').unwrap_or(tag).to_string())
}
