//! Filesystem helpers built on `cap-std` and `camino`.
#![forbid(unsafe_code)]

use std::io;
use std::path::Component;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{
    ambient_authority,
    fs_utf8::{Dir, File},
};

/// Open a UTF-8 path for reading using ambient authority.
///
/// # Errors
/// Returns the IO error raised by the open call.
pub fn open_utf8_file(path: &Utf8Path) -> io::Result<File> {
    File::open_ambient(path, ambient_authority())
}

/// Create the directory that will hold `path`, if it is missing.
///
/// Paths without a parent, or whose parent is the filesystem root, need no
/// work and succeed immediately.
///
/// # Errors
/// Returns the IO error raised while opening the base directory or creating
/// the missing components.
pub fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_str().is_empty() {
        return Ok(());
    }
    let (base, relative) = split_base(parent)?;
    if relative.as_str().is_empty() {
        return Ok(());
    }
    Dir::open_ambient_dir(&base, ambient_authority())?.create_dir_all(&relative)
}

/// Split `dir` into an ambient base (root, drive prefix or `.`) and the
/// relative remainder cap-std can walk.
fn split_base(dir: &Utf8Path) -> io::Result<(Utf8PathBuf, Utf8PathBuf)> {
    let std_dir = dir.as_std_path();
    let base = match std_dir.components().next() {
        Some(Component::Prefix(prefix)) => {
            let drive = prefix
                .as_os_str()
                .to_str()
                .ok_or_else(|| io::Error::other("non-UTF-8 path prefix"))?;
            Utf8PathBuf::from(drive).join(std::path::MAIN_SEPARATOR_STR)
        }
        Some(Component::RootDir) => Utf8PathBuf::from(std::path::MAIN_SEPARATOR_STR),
        _ => return Ok((Utf8PathBuf::from("."), dir.to_owned())),
    };
    let relative = dir
        .strip_prefix(&base)
        .map_err(|_| io::Error::other(format!("cannot strip {base} from {dir}")))?;
    Ok((base, relative.to_owned()))
}
