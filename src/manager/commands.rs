// src/manager/commands.rs

//! Argument vectors for every external invocation the manager performs.
//!
//! These are pure functions over the static configuration so they can be
//! unit tested without an executor. The executor never interprets a shell;
//! the one operation that needs shell interpretation (the config write,
//! which must redirect into a file inside the container) constructs an
//! explicit `sh -c` vector here, with the content passed through
//! [`shell_quote`].

use crate::config::{ManagerSection, TargetSpec};
use crate::types::Target;

fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

/// `docker images -q <tag>`: non-empty stdout means the image exists.
pub fn image_check(manager: &ManagerSection) -> Vec<String> {
    argv(&["docker", "images", "-q", &manager.image_tag])
}

/// `docker compose -f <file> build <service>`.
pub fn compose_build(manager: &ManagerSection, spec: &TargetSpec) -> Vec<String> {
    argv(&[
        "docker",
        "compose",
        "-f",
        &manager.compose_file,
        "build",
        &spec.service,
    ])
}

/// `docker compose -f <file> --profile <profile> up -d <service>`.
pub fn compose_up(manager: &ManagerSection, spec: &TargetSpec) -> Vec<String> {
    argv(&[
        "docker",
        "compose",
        "-f",
        &manager.compose_file,
        "--profile",
        &spec.profile,
        "up",
        "-d",
        &spec.service,
    ])
}

pub fn stop(spec: &TargetSpec) -> Vec<String> {
    argv(&["docker", "stop", &spec.container])
}

pub fn remove(spec: &TargetSpec) -> Vec<String> {
    argv(&["docker", "rm", &spec.container])
}

pub fn restart(spec: &TargetSpec) -> Vec<String> {
    argv(&["docker", "restart", &spec.container])
}

/// `docker inspect <container> --format '{{json .}}'`.
pub fn inspect(spec: &TargetSpec) -> Vec<String> {
    argv(&["docker", "inspect", &spec.container, "--format", "{{json .}}"])
}

pub fn logs(spec: &TargetSpec, lines: u32) -> Vec<String> {
    argv(&["docker", "logs", "--tail", &lines.to_string(), &spec.container])
}

/// `docker exec <container> bitcoin-cli <auth> [-testnet4] getblockchaininfo`.
pub fn chain_info(manager: &ManagerSection, spec: &TargetSpec, target: Target) -> Vec<String> {
    let mut cmd = argv(&["docker", "exec", &spec.container, "bitcoin-cli"]);
    cmd.push(format!("-rpcuser={}", manager.rpc_user));
    cmd.push(format!("-rpcpassword={}", manager.rpc_password));
    if target == Target::Testnet {
        cmd.push("-testnet4".to_string());
    }
    cmd.push("getblockchaininfo".to_string());
    cmd
}

pub fn read_config(spec: &TargetSpec) -> Vec<String> {
    argv(&["docker", "exec", &spec.container, "cat", &spec.config_path])
}

pub fn make_config_dir(spec: &TargetSpec) -> Vec<String> {
    argv(&["docker", "exec", &spec.container, "mkdir", "-p", &spec.config_dir])
}

/// Write `content` to the target's config file through the container's
/// shell.
///
/// `printf '%s'` rather than `echo`: echo interprets backslash escapes in
/// some shells and always appends a newline, either of which would corrupt
/// the round trip. The content and the path are both single-quoted.
pub fn write_config(spec: &TargetSpec, content: &str) -> Vec<String> {
    let script = format!(
        "printf '%s' {} > {}",
        shell_quote(content),
        shell_quote(&spec.config_path)
    );
    argv(&["docker", "exec", &spec.container, "sh", "-c", &script])
}

/// POSIX single-quote escaping.
///
/// The whole string is wrapped in single quotes; each embedded quote
/// closes the quoting, emits an escaped quote and reopens (`'` becomes
/// `'\''`). Inside single quotes the shell treats every other byte
/// literally, so this is lossless for arbitrary content.
pub fn shell_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for ch in s.chars() {
        if ch == '\'' {
            out.push_str(r"'\''");
        } else {
            out.push(ch);
        }
    }
    out.push('\'');
    out
}
