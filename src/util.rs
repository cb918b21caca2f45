use std::path::{Path, PathBuf};

/// build a relative path from segments
pub fn relative_path<I, S>(segments: I) -> PathBuf
where
    I: IntoIterator<Item = S>,
    S: AsRef<Path>,
{
    let mut path = PathBuf::new();
    for segment in segments {
        path.push(segment);
    }

    path
}

/// the platform-specific file name of an executable, ie 'slangc.exe' on windows
pub fn executable_file_name(name: &str) -> String {
    format!("{name}{}", std::env::consts::EXE_SUFFIX)
}

/// a fresh, unique directory under the system temp dir
#[cfg(test)]
pub fn tmp_dir(prefix: &str) -> PathBuf {
    let tmp_prefix = format!("{prefix}-{}", uuid::Uuid::new_v4());
    let tmp_dir_path = std::env::temp_dir().join(tmp_prefix);
    std::fs::create_dir_all(&tmp_dir_path).unwrap();

    tmp_dir_path
}

/// writes an executable shell script, for standing in for slangc
#[cfg(all(test, unix))]
pub fn write_script(path: &Path, body: &str) {
    use std::os::unix::fs::PermissionsExt;

    std::fs::write(path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
}
