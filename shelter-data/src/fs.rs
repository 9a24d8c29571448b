//! Filesystem helpers built on `cap-std` and `camino`.

use std::collections::VecDeque;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};

/// Open a UTF-8 file path using ambient authority.
pub fn open_utf8_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

/// Open the parent directory of `path` and return it with the file name.
pub fn open_dir_and_file(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other("path should include a file name"))?
        .to_owned();
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, file_name))
}

/// Return whether `path` is a regular file.
///
/// A missing path is reported as an [`io::ErrorKind::NotFound`] error.
pub fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = open_dir_and_file(path)?;
    dir.metadata(name.as_str()).map(|meta| meta.is_file())
}

/// Return whether `path` exists and is a directory.
pub fn dir_exists(path: &Utf8Path) -> bool {
    fs_utf8::Dir::open_ambient_dir(path, ambient_authority()).is_ok()
}

/// Search `root` breadth-first for a regular file called `file_name`.
///
/// Shallower matches win; siblings are visited in name order. Returns the
/// match joined onto `root`.
pub fn find_file(root: &Utf8Path, file_name: &str) -> io::Result<Option<Utf8PathBuf>> {
    let start = fs_utf8::Dir::open_ambient_dir(root, ambient_authority())?;
    let mut pending = VecDeque::from([(start, root.to_owned())]);
    while let Some((dir, path)) = pending.pop_front() {
        let mut subdirs = Vec::new();
        for entry in dir.entries()? {
            let entry = entry?;
            let name = entry.file_name()?;
            let file_type = entry.file_type()?;
            if file_type.is_file() && name == file_name {
                return Ok(Some(path.join(name)));
            }
            if file_type.is_dir() {
                subdirs.push(name);
            }
        }
        subdirs.sort();
        for name in subdirs {
            let child = dir.open_dir(&name)?;
            pending.push_back((child, path.join(name)));
        }
    }
    Ok(None)
}
