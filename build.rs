//! Embeds the git commit and build time shown by `calcline --version`.
//!
//! Missing git/date tooling degrades to "unknown" rather than failing the build.

use std::env;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

const HASH_VAR: &str = "CALCLINE_BUILD_GIT_HASH";
const TIME_VAR: &str = "CALCLINE_BUILD_TIMESTAMP";

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-env-changed={HASH_VAR}");
    println!("cargo:rerun-if-env-changed={TIME_VAR}");

    let hash = env::var(HASH_VAR).ok().or_else(|| {
        capture("git", &["rev-parse", "--short=12", "HEAD"])
    });
    let built = env::var(TIME_VAR)
        .ok()
        .or_else(|| capture("date", &["-u", "+%Y-%m-%dT%H:%M:%SZ"]))
        .unwrap_or_else(unix_timestamp);

    println!(
        "cargo:rustc-env={HASH_VAR}={}",
        hash.unwrap_or_else(|| "unknown".to_string())
    );
    println!("cargo:rustc-env={TIME_VAR}={built}");
}

fn unix_timestamp() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("unix:{secs}")
}

fn capture(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
