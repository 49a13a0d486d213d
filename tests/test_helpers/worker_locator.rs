//! Finds the `pg_worker` helper binary for clusters started as root.

use camino::Utf8PathBuf;
use std::env;
use std::ffi::OsStr;

const fn pg_worker_binary_name() -> &'static str {
    if cfg!(windows) {
        "pg_worker.exe"
    } else {
        "pg_worker"
    }
}

/// Locates `pg_worker`, preferring the binary Cargo built for this test run.
///
/// Falls back to `PG_EMBEDDED_WORKER`, the target directory next to the test
/// executable, and finally `PATH`.
pub fn locate_pg_worker_path() -> Option<Utf8PathBuf> {
    option_env!("CARGO_BIN_EXE_pg_worker")
        .map(Utf8PathBuf::from)
        .filter(|path| path.is_file())
        .or_else(from_worker_env)
        .or_else(near_target_dir)
        .or_else(on_path)
}

fn from_worker_env() -> Option<Utf8PathBuf> {
    let configured = env::var_os("PG_EMBEDDED_WORKER")?;
    let path = utf8_path(&configured)?;
    (path.file_stem() == Some("pg_worker") && path.is_file()).then_some(path)
}

fn near_target_dir() -> Option<Utf8PathBuf> {
    let exe = env::current_exe().ok()?;
    let exe = utf8_path(exe.as_os_str())?;
    let target_dir = exe.parent()?.parent()?;
    let candidate = target_dir.join(pg_worker_binary_name());
    candidate.is_file().then_some(candidate)
}

fn on_path() -> Option<Utf8PathBuf> {
    let path = env::var_os("PATH")?;
    env::split_paths(&path)
        .filter_map(|entry| utf8_path(entry.as_os_str()))
        .map(|dir| dir.join(pg_worker_binary_name()))
        .find(|candidate| candidate.is_file())
}

fn utf8_path(value: &OsStr) -> Option<Utf8PathBuf> {
    value.to_str().map(Utf8PathBuf::from)
}
