use std::env;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs");

    let hash = run("git", &["rev-parse", "--short", "HEAD"]).filter(|value| !value.is_empty());
    let commit = match (hash, run("git", &["status", "--porcelain"])) {
        (Some(hash), Some(changes)) if !changes.is_empty() => format!("{hash}-dirty"),
        (Some(hash), _) => hash,
        (None, _) => "unknown".to_string(),
    };
    emit("SUBTRACK_COMMIT", &commit);
    emit(
        "SUBTRACK_BUILT_AT",
        &chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
    );
    for (key, var) in [("SUBTRACK_TARGET", "TARGET"), ("SUBTRACK_PROFILE", "PROFILE")] {
        emit(key, &env::var(var).unwrap_or_else(|_| "unknown".to_string()));
    }
}

fn emit(key: &str, value: &str) {
    println!("cargo:rustc-env={key}={value}");
}

/// Runs a tool and returns its trimmed stdout, or `None` when it is missing or fails.
fn run(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|text| text.trim().to_string())
}
