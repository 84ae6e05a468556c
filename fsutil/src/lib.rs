use std::{
    fs,
    path::{Path, PathBuf},
};

pub mod error {
    use std::{io, path::PathBuf};

    pub type Result<T> = std::result::Result<T, self::Error>;

    type Msg = &'static str;

    #[derive(Debug, thiserror::Error)]
    pub enum Error {
        #[error("{0} ({1}): {2}")]
        SingleIO(Msg, PathBuf, #[source] io::Error),

        #[error("No entry matched glob '{0}' in '{1}'")]
        NoEntryMatchedGlob(::glob::Pattern, PathBuf),
    }
}
pub use error::{Error, Result};

#[must_use]
pub fn mkdir_all(path: impl AsRef<Path>) -> Result<()> {
    let dir = path.as_ref();
    fs::create_dir_all(dir).map_err(|e| Error::SingleIO("Cannot create dir", dir.to_owned(), e))
}

#[must_use]
pub fn write<P, C>(filepath: P, contents: C) -> Result<()>
where
    P: AsRef<Path>,
    C: AsRef<[u8]>,
{
    fs::write(&filepath, contents)
        .map_err(|e| Error::SingleIO("Cannot write file", filepath.as_ref().to_owned(), e))
}

#[must_use]
pub fn write_with_mkdir<P, C>(filepath: P, contents: C) -> Result<()>
where
    P: AsRef<Path>,
    C: AsRef<[u8]>,
{
    if let Some(dir) = filepath.as_ref().parent() {
        self::mkdir_all(dir)?;
    }
    self::write(filepath, contents)
}

#[must_use]
pub fn read(filepath: impl AsRef<Path>) -> Result<Vec<u8>> {
    fs::read(&filepath)
        .map_err(|e| Error::SingleIO("Cannot read file", filepath.as_ref().to_owned(), e))
}

#[must_use]
pub fn read_to_string(filepath: impl AsRef<Path>) -> Result<String> {
    fs::read_to_string(&filepath)
        .map_err(|e| Error::SingleIO("Cannot read file", filepath.as_ref().to_owned(), e))
}

/// Enumerate regular files directly under `dir` whose *filename* matches
/// `pattern`, sorted by filename so batch uploads are deterministic.
#[must_use]
pub fn find_files_matching_glob(
    dir: impl AsRef<Path>,
    pattern: &glob::Pattern,
) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let entries =
        fs::read_dir(dir).map_err(|e| Error::SingleIO("Cannot read dir", dir.to_owned(), e))?;

    let mut matched: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .map(|name| pattern.matches(&name.to_string_lossy()))
                .unwrap_or(false)
        })
        .collect();

    if matched.is_empty() {
        return Err(Error::NoEntryMatchedGlob(pattern.clone(), dir.to_owned()));
    }
    matched.sort();
    Ok(matched)
}
