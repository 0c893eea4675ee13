use regex::Regex;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

/// `000007.pdf` or `000007-some-slug.pdf`
static SEQUENCED_FILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)(?:\.pdf|-.+\.pdf)$").expect("valid sequence pattern"));

const LOCK_FILE: &str = ".sequence.lock";

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("no sequence number left after {0}")]
    SequenceExhausted(u64),
}

pub type Result<T> = std::result::Result<T, OutputError>;

trait IoContext<T> {
    fn at(self, path: &Path) -> Result<T>;
}

impl<T> IoContext<T> for io::Result<T> {
    fn at(self, path: &Path) -> Result<T> {
        self.map_err(|source| OutputError::Io { path: path.to_path_buf(), source })
    }
}

/// Extracts the numeric prefix of a previously produced file, if it has one.
pub fn sequence_number(filename: &str) -> Option<u64> {
    SEQUENCED_FILE
        .captures(filename)
        .and_then(|caps| caps[1].parse().ok())
}

fn successor(sequence: u64) -> Result<u64> {
    sequence
        .checked_add(1)
        .ok_or(OutputError::SequenceExhausted(sequence))
}

/// `max + 1` over every sequenced filename, or 0 when there is none.
pub fn next_sequence<I, S>(filenames: I) -> Result<u64>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    filenames
        .into_iter()
        .filter_map(|name| sequence_number(name.as_ref()))
        .max()
        .map_or(Ok(0), successor)
}

pub fn format_prefix(sequence: u64) -> String {
    format!("{:06}", sequence)
}

pub fn file_name(sequence: u64, slug: Option<&str>) -> String {
    match slug {
        Some(slug) => format!("{}-{}.pdf", format_prefix(sequence), slug),
        None => format!("{}.pdf", format_prefix(sequence)),
    }
}

/// The flat directory PDFs are written to.
#[derive(Debug, Clone)]
pub struct OutputDirectory {
    path: PathBuf,
}

impl OutputDirectory {
    /// Creates the directory (and missing parents) if needed.
    pub fn ensure(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        fs::create_dir_all(&path).at(&path)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn file_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.path).at(&self.path)? {
            let entry = entry.at(&self.path)?;
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }

    /// Next number as seen right now. Only a preview: another run may take it
    /// before [`OutputDirectory::write_next`] is called.
    pub fn peek_next(&self) -> Result<u64> {
        next_sequence(self.file_names()?)
    }

    /// Allocates the next sequence number and writes `bytes` under it.
    ///
    /// Scan and write happen under an exclusive lock on the directory's lock
    /// file, and the target is opened with `create_new`, so concurrent runs
    /// never share a number or overwrite each other.
    pub fn write_next(&self, slug: Option<&str>, bytes: &[u8]) -> Result<PathBuf> {
        let lock_path = self.path.join(LOCK_FILE);
        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .at(&lock_path)?;
        lock.lock().at(&lock_path)?;

        let mut sequence = self.peek_next()?;
        let (mut file, path) = loop {
            let path = self.path.join(file_name(sequence, slug));
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => break (file, path),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    sequence = successor(sequence)?
                }
                Err(e) => return Err(e).at(&path),
            }
        };

        file.write_all(bytes).at(&path)?;
        file.sync_all().at(&path)?;
        lock.unlock().at(&lock_path)?;

        tracing::debug!(sequence, path = %path.display(), "allocated output file");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn matches_plain_and_slugged_names() {
        assert_eq!(sequence_number("000000.pdf"), Some(0));
        assert_eq!(sequence_number("000007-foo.pdf"), Some(7));
        assert_eq!(sequence_number("12.pdf"), Some(12));
    }

    #[test]
    fn ignores_malformed_names() {
        assert_eq!(sequence_number("abc.pdf"), None);
        assert_eq!(sequence_number("000001.txt"), None);
        assert_eq!(sequence_number("000001-.pdf"), None);
        assert_eq!(sequence_number("x000001.pdf"), None);
        assert_eq!(sequence_number(".sequence.lock"), None);
    }

    #[test]
    fn next_is_max_plus_one() {
        let names = ["000000.pdf", "000003.pdf", "000007-foo.pdf", "notes.md"];
        assert_eq!(next_sequence(names).unwrap(), 8);
    }

    #[test]
    fn next_is_zero_when_empty() {
        assert_eq!(next_sequence(Vec::<String>::new()).unwrap(), 0);
        assert_eq!(file_name(0, None), "000000.pdf");
        assert_eq!(file_name(0, Some("intro")), "000000-intro.pdf");
    }

    #[test]
    fn largest_prefix_cannot_be_followed() {
        let names = ["000001.pdf", "18446744073709551615.pdf"];
        assert!(matches!(
            next_sequence(names),
            Err(OutputError::SequenceExhausted(u64::MAX))
        ));

        // too large for u64: not a sequence number at all
        assert_eq!(next_sequence(["99999999999999999999.pdf"]).unwrap(), 0);
    }

    #[test]
    fn exhausted_directory_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let dir = OutputDirectory::ensure(tmp.path()).unwrap();
        fs::write(tmp.path().join("18446744073709551615-last.pdf"), b"last").unwrap();

        assert!(matches!(
            dir.write_next(None, b"new"),
            Err(OutputError::SequenceExhausted(_))
        ));
        assert!(!tmp.path().join("000000.pdf").exists());
    }

    #[test]
    fn ensure_creates_missing_parents() {
        let tmp = TempDir::new().unwrap();
        let dir = OutputDirectory::ensure(tmp.path().join("a/b/pdf")).unwrap();
        assert!(dir.path().is_dir());
        OutputDirectory::ensure(tmp.path().join("a/b/pdf")).unwrap();
    }

    #[test]
    fn consecutive_writes_never_overwrite() {
        let tmp = TempDir::new().unwrap();
        let dir = OutputDirectory::ensure(tmp.path().join("pdf")).unwrap();

        let first = dir.write_next(None, b"first").unwrap();
        let second = dir.write_next(Some("second"), b"second").unwrap();

        assert!(first.ends_with("000000.pdf"));
        assert!(second.ends_with("000001-second.pdf"));
        assert_eq!(fs::read(&first).unwrap(), b"first");
        assert_eq!(dir.peek_next().unwrap(), 2);
    }

    #[test]
    fn skips_a_name_that_already_exists() {
        let tmp = TempDir::new().unwrap();
        let dir = OutputDirectory::ensure(tmp.path()).unwrap();
        fs::write(tmp.path().join("000004.pdf"), b"old").unwrap();

        let path = dir.write_next(None, b"new").unwrap();

        assert!(path.ends_with("000005.pdf"));
        assert_eq!(fs::read(tmp.path().join("000004.pdf")).unwrap(), b"old");
    }
}
