use std::process::Command;

fn main() {
    println!("cargo:rerun-if-env-changed=BLUERAIN_BUILD");
    println!("cargo:rerun-if-env-changed=GITHUB_SHA");
    println!("cargo:rerun-if-changed=.git/HEAD");

    let build_id = match std::env::var("BLUERAIN_BUILD") {
        Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => infer_build_id(),
    };
    println!("cargo:rustc-env=BLUERAIN_BUILD={}", build_id);
}

fn short_sha(raw: &str) -> Option<String> {
    let short: String = raw.trim().chars().take(7).collect();
    if short.is_empty() || !short.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    Some(short.to_ascii_lowercase())
}

fn git_sha() -> Option<String> {
    let out = Command::new("git")
        .args(["rev-parse", "--short=7", "HEAD"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    short_sha(&String::from_utf8(out.stdout).ok()?)
}

/// `<os>-<arch>`, with the commit appended when one is known.
fn infer_build_id() -> String {
    let os = std::env::var("CARGO_CFG_TARGET_OS").unwrap_or_else(|_| "unknown".to_string());
    let os = if os == "macos" { "darwin".to_string() } else { os };
    let arch = std::env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_else(|_| "unknown".to_string());

    let sha = git_sha().or_else(|| std::env::var("GITHUB_SHA").ok().and_then(|v| short_sha(&v)));
    match sha {
        Some(sha) => format!("{os}-{arch}+{sha}"),
        None => format!("{os}-{arch}"),
    }
}
