//! Copies `pg_worker` somewhere the unprivileged `nobody` user can run it.

use super::BoxError;
use super::fs_utils::open_parent_dir;
use camino::{Utf8Path, Utf8PathBuf};
#[cfg(unix)]
use cap_std::fs::{Permissions, PermissionsExt};
use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::io::{ErrorKind, Write};
use std::sync::{Mutex, OnceLock};

static WORKER_CACHE: OnceLock<Mutex<HashMap<Utf8PathBuf, Utf8PathBuf>>> = OnceLock::new();

pub(super) fn locate_pg_worker_path() -> Option<Utf8PathBuf> {
    crate::test_helpers::locate_pg_worker_path()
}

/// Copies `worker` into the temp directory behind a wrapper script that
/// re-executes it as `nobody` when invoked by root.
///
/// Repeated calls for the same worker return the first prepared path.
pub(super) fn prepare_pg_worker(worker: &Utf8Path) -> Result<Utf8PathBuf, BoxError> {
    let cache = WORKER_CACHE.get_or_init(|| Mutex::new(HashMap::new()));
    let mut prepared = cache
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    if let Some(path) = prepared.get(worker) {
        return Ok(path.clone());
    }

    let temp_dir = Utf8PathBuf::try_from(std::env::temp_dir()).map_err(|err| {
        Box::new(std::io::Error::new(
            ErrorKind::InvalidData,
            format!("temp directory path is not valid UTF-8: {err}"),
        )) as BoxError
    })?;
    let mut hasher = DefaultHasher::new();
    worker.as_str().hash(&mut hasher);
    let wrapper_path = temp_dir.join(format!(
        "teamtask_pg_worker_{pid}_{hash:x}",
        pid = std::process::id(),
        hash = hasher.finish(),
    ));
    let binary_path = wrapper_path.with_extension("bin");

    let (source_dir, source_name) = open_parent_dir(worker)?;
    let (wrapper_dir, wrapper_name) = open_parent_dir(&wrapper_path)?;
    let (binary_dir, binary_name) = open_parent_dir(&binary_path)?;
    for (dir, name) in [(&wrapper_dir, wrapper_name), (&binary_dir, binary_name)] {
        match dir.remove_file(name) {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => return Err(Box::new(err) as BoxError),
        }
    }

    source_dir
        .copy(source_name, &binary_dir, binary_name)
        .map_err(|err| Box::new(err) as BoxError)?;
    let script = format!(
        concat!(
            "#!/bin/sh\n",
            "if [ \"$(id -u)\" -eq 0 ]; then\n",
            "  exec /usr/sbin/runuser -u nobody -- {worker} \"$@\"\n",
            "fi\n",
            "exec {worker} \"$@\"\n",
        ),
        worker = binary_path.as_str(),
    );
    wrapper_dir
        .create(wrapper_name)
        .and_then(|mut file| file.write_all(script.as_bytes()))
        .map_err(|err| Box::new(err) as BoxError)?;

    #[cfg(unix)]
    for (dir, name) in [(&wrapper_dir, wrapper_name), (&binary_dir, binary_name)] {
        dir.set_permissions(name, Permissions::from_mode(0o755))
            .map_err(|err| Box::new(err) as BoxError)?;
    }

    prepared.insert(worker.to_path_buf(), wrapper_path.clone());
    Ok(wrapper_path)
}

#[cfg(test)]
mod tests {
    //! Worker preparation against throwaway scripts.

    use super::prepare_pg_worker;
    use camino::{Utf8Path, Utf8PathBuf};
    use cap_std::ambient_authority;
    use cap_std::fs_utf8::Dir;
    use eyre::ensure;
    use std::io::Write;

    fn scratch_worker() -> eyre::Result<Utf8PathBuf> {
        let base = Utf8PathBuf::try_from(std::env::temp_dir())?;
        let dir_name = format!("teamtask_worker_src_{}", uuid::Uuid::new_v4());
        Dir::open_ambient_dir(&base, ambient_authority())?.create_dir(&dir_name)?;
        let dir_path = base.join(dir_name);
        let mut file = Dir::open_ambient_dir(&dir_path, ambient_authority())?.create("pg_worker")?;
        file.write_all(b"#!/bin/sh\nexit 0\n")?;
        Ok(dir_path.join("pg_worker"))
    }

    fn read(path: &Utf8Path) -> eyre::Result<String> {
        let parent = path
            .parent()
            .ok_or_else(|| eyre::eyre!("prepared worker has no parent"))?;
        let name = path
            .file_name()
            .ok_or_else(|| eyre::eyre!("prepared worker has no file name"))?;
        Ok(Dir::open_ambient_dir(parent, ambient_authority())?.read_to_string(name)?)
    }

    #[test]
    fn preparation_is_cached_and_wraps_the_copy() -> eyre::Result<()> {
        let worker = scratch_worker()?;

        let prepared = prepare_pg_worker(&worker).map_err(|err| eyre::eyre!(err))?;
        let again = prepare_pg_worker(&worker).map_err(|err| eyre::eyre!(err))?;

        ensure!(prepared == again, "second preparation should reuse the cached path");
        let script = read(&prepared)?;
        ensure!(script.starts_with("#!/bin/sh\n"));
        ensure!(script.contains("runuser -u nobody"));
        ensure!(prepared.with_extension("bin").is_file());
        Ok(())
    }
}
