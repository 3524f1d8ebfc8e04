//! Plain-text snapshots of a skiplist.
//!
//! A snapshot holds one record per line, `key:value`, in ascending key order:
//!
//! ```text
//! 1:a
//! 8:d
//! 9:e
//! 19:f
//! ```
//!
//! Nothing is escaped. On load, the first `:` of a line splits the key from
//! the value, so a key containing `:` will not survive a round trip.

use std::{
    fmt,
    fs::{self, File},
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::Path,
    str::{self, FromStr},
};

use thiserror::Error;

use crate::{level_generator::LevelGenerator, skiplist::SkipList};

/// Separator between the key and the value of a record.
pub const DELIMITER: char = ':';

#[derive(Error, Debug)]
/// Errors that can occur while writing or reading a snapshot.
#[expect(
    clippy::module_name_repetitions,
    reason = "Using 'Error' would be too generic and may cause confusion."
)]
#[non_exhaustive]
pub enum SnapshotError {
    /// The underlying sink or source failed.
    #[error("snapshot I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// Outcome of merging a snapshot into a skiplist.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Records inserted.
    pub inserted: usize,
    /// Records dropped because their key was already present.
    pub duplicates: usize,
    /// Lines that could not be parsed into a record.
    pub skipped: usize,
}

/// Why a line was not turned into a record.
#[derive(Debug, PartialEq, Eq)]
enum Malformed {
    InvalidUtf8,
    Empty,
    MissingDelimiter,
    EmptyKey,
    EmptyValue,
    BadKey,
    BadValue,
}

impl fmt::Display for Malformed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Malformed::InvalidUtf8 => "not valid UTF-8",
            Malformed::Empty => "empty line",
            Malformed::MissingDelimiter => "missing ':' delimiter",
            Malformed::EmptyKey => "empty key",
            Malformed::EmptyValue => "empty value",
            Malformed::BadKey => "key does not parse",
            Malformed::BadValue => "value does not parse",
        };
        f.write_str(reason)
    }
}

/// Decode `line`, split it on its first `:` and parse both halves.
///
/// The trailing `\n` or `\r\n`, if any, is not part of the record.
fn parse_record<K, V>(line: &[u8]) -> Result<(K, V), Malformed>
where
    K: FromStr,
    V: FromStr,
{
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    let line = str::from_utf8(line).map_err(|_err| Malformed::InvalidUtf8)?;
    if line.is_empty() {
        return Err(Malformed::Empty);
    }
    let (key, value) = line
        .split_once(DELIMITER)
        .ok_or(Malformed::MissingDelimiter)?;
    if key.is_empty() {
        return Err(Malformed::EmptyKey);
    }
    if value.is_empty() {
        return Err(Malformed::EmptyValue);
    }
    let key = key.parse().map_err(|_err| Malformed::BadKey)?;
    let value = value.parse().map_err(|_err| Malformed::BadValue)?;
    Ok((key, value))
}

impl<K, V, G> SkipList<K, V, G>
where
    K: fmt::Display,
    V: fmt::Display,
{
    /// Writes every entry to `writer` as `key:value` lines, in ascending key
    /// order, and returns the number of records written.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Io`] if writing fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipkv::SkipList;
    ///
    /// let mut skiplist = SkipList::new(6)?;
    /// skiplist.extend([(9, "e"), (1, "a"), (8, "d")]);
    ///
    /// let mut out = Vec::new();
    /// assert_eq!(skiplist.dump(&mut out)?, 3);
    /// assert_eq!(String::from_utf8(out)?, "1:a\n8:d\n9:e\n");
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn dump<W: Write>(&self, mut writer: W) -> Result<usize, SnapshotError> {
        let mut written = 0;
        for (key, value) in self {
            writeln!(writer, "{key}{DELIMITER}{value}")?;
            written += 1;
        }
        writer.flush()?;
        log::debug!("Dumped {written} records");
        Ok(written)
    }

    /// Writes a snapshot to the file at `path`, replacing it if it exists.
    ///
    /// Missing parent directories are created.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Io`] if the file cannot be created or written.
    pub fn dump_file<P: AsRef<Path>>(&self, path: P) -> Result<usize, SnapshotError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let written = self.dump(BufWriter::new(File::create(path)?))?;
        log::info!("Dumped {written} records to {}", path.display());
        Ok(written)
    }
}

impl<K, V, G> SkipList<K, V, G>
where
    K: Ord + FromStr,
    V: FromStr,
    G: LevelGenerator,
{
    /// Reads `key:value` lines from `reader` and inserts them.
    ///
    /// The skiplist is not cleared first; records are merged into whatever it
    /// already holds. A record whose key is already present is dropped, so
    /// within one snapshot the first occurrence of a key wins. Lines which
    /// are not valid UTF-8, are empty, have no `:`, have an empty key or
    /// value, or do not parse are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Io`] if reading fails. Records read before
    /// the failure stay inserted.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipkv::SkipList;
    ///
    /// let mut skiplist: SkipList<u32, String> = SkipList::new(6)?;
    /// let report = skiplist.load("1:a\n\nbroken\n1:b\n8:d\n".as_bytes())?;
    ///
    /// assert_eq!(report.inserted, 2);
    /// assert_eq!(report.duplicates, 1);
    /// assert_eq!(report.skipped, 2);
    /// assert_eq!(skiplist.search(&1).map(String::as_str), Some("a"));
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<R: BufRead>(&mut self, mut reader: R) -> Result<LoadReport, SnapshotError> {
        let mut report = LoadReport::default();
        let mut line = Vec::new();
        for number in 0_usize.. {
            line.clear();
            if reader.read_until(b'\n', &mut line)? == 0 {
                break;
            }
            match parse_record(&line) {
                Ok((key, value)) => {
                    if self.insert(key, value) {
                        report.inserted += 1;
                    } else {
                        log::debug!("Line {}: duplicate key dropped", number + 1);
                        report.duplicates += 1;
                    }
                }
                Err(reason) => {
                    log::warn!("Line {}: skipped ({reason})", number + 1);
                    report.skipped += 1;
                }
            }
        }
        log::debug!("Loaded snapshot: {report:?}");
        Ok(report)
    }

    /// Reads a snapshot from the file at `path` and inserts its records.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Io`] if the file cannot be opened or read.
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<LoadReport, SnapshotError> {
        let path = path.as_ref();
        let report = self.load(BufReader::new(File::open(path)?))?;
        log::info!(
            "Loaded {} records from {} ({} duplicates, {} skipped)",
            report.inserted,
            path.display(),
            report.duplicates,
            report.skipped
        );
        Ok(report)
    }
}

// ////////////////////////////////////////////////////////////////////////////
// Tests
// ////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use std::io::{self, Read};

    use anyhow::Result;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::{LoadReport, Malformed, SnapshotError, parse_record};
    use crate::skiplist::SkipList;

    #[rstest]
    #[case("", Malformed::Empty)]
    #[case("no delimiter", Malformed::MissingDelimiter)]
    #[case(":value", Malformed::EmptyKey)]
    #[case("12:", Malformed::EmptyValue)]
    #[case("twelve:value", Malformed::BadKey)]
    fn malformed_lines(#[case] line: &str, #[case] expected: Malformed) {
        assert_eq!(
            parse_record::<u32, String>(line.as_bytes()).err(),
            Some(expected)
        );
    }

    #[test]
    fn bad_value() {
        assert_eq!(
            parse_record::<u32, u32>(b"1:x").err(),
            Some(Malformed::BadValue)
        );
    }

    #[test]
    fn splits_on_first_delimiter() {
        assert_eq!(
            parse_record::<String, String>(b"a:b:c\r\n").ok(),
            Some(("a".to_owned(), "b:c".to_owned()))
        );
    }

    #[rstest]
    #[case(b"\n")]
    #[case(b"\r\n")]
    #[case(b"\xff\xfe")]
    #[case(b"2:\xff\xfe\n")]
    fn unusable_bytes(#[case] line: &[u8]) {
        assert!(parse_record::<u32, String>(line).is_err());
    }

    #[test_log::test]
    fn load_skips_invalid_utf8() -> Result<()> {
        let mut sl: SkipList<u32, String> = SkipList::new(6)?;
        let report = sl.load(&b"1:a\n2:\xff\xfe\n3:c\r\n4:d"[..])?;
        assert_eq!(
            report,
            LoadReport {
                inserted: 3,
                duplicates: 0,
                skipped: 1,
            }
        );
        assert_eq!(sl.search(&3).map(String::as_str), Some("c"));
        assert_eq!(sl.search(&4).map(String::as_str), Some("d"));
        assert!(!sl.contains_key(&2));
        sl.check();
        Ok(())
    }

    #[test]
    fn dump_is_sorted() -> Result<()> {
        let mut sl = SkipList::new(6)?;
        sl.extend([(19, "f"), (1, "a"), (9, "e"), (8, "d")]);

        let mut out = Vec::new();
        assert_eq!(sl.dump(&mut out)?, 4);
        assert_eq!(String::from_utf8(out)?, "1:a\n8:d\n9:e\n19:f\n");
        Ok(())
    }

    #[test]
    fn dump_empty() -> Result<()> {
        let sl: SkipList<u8, u8> = SkipList::new(2)?;
        let mut out = Vec::new();
        assert_eq!(sl.dump(&mut out)?, 0);
        assert!(out.is_empty());
        Ok(())
    }

    #[test_log::test]
    fn load_merges_into_existing() -> Result<()> {
        let mut sl: SkipList<u32, String> = SkipList::new(6)?;
        sl.insert(8, "kept".to_owned());

        let report = sl.load("1:a\n8:d\n9:e\n9:x\n".as_bytes())?;
        assert_eq!(
            report,
            LoadReport {
                inserted: 2,
                duplicates: 2,
                skipped: 0,
            }
        );
        assert_eq!(sl.len(), 3);
        assert_eq!(sl.search(&8).map(String::as_str), Some("kept"));
        assert_eq!(sl.search(&9).map(String::as_str), Some("e"));
        sl.check();
        Ok(())
    }

    #[test]
    fn round_trip() -> Result<()> {
        let mut original: SkipList<i64, String> = SkipList::new(8)?;
        original.extend((0..300).map(|i| ((i * 7919) % 1_000 - 500, format!("v{i}"))));

        let mut buffer = Vec::new();
        original.dump(&mut buffer)?;

        let mut restored: SkipList<i64, String> = SkipList::new(8)?;
        let report = restored.load(buffer.as_slice())?;
        assert_eq!(report.inserted, original.len());
        assert!(original.iter().eq(restored.iter()));
        restored.check();
        Ok(())
    }

    #[test_log::test]
    fn file_round_trip() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("store").join("dumpfile");

        let mut sl = SkipList::new(6)?;
        sl.extend([(1, 'a'), (8, 'd'), (9, 'e'), (19, 'f')]);
        assert_eq!(sl.dump_file(&path)?, 4);
        assert_eq!(std::fs::read_to_string(&path)?, "1:a\n8:d\n9:e\n19:f\n");

        let mut restored: SkipList<u32, char> = SkipList::new(6)?;
        assert_eq!(restored.load_file(&path)?.inserted, 4);
        assert_eq!(restored.search(&8), Some(&'d'));
        Ok(())
    }

    #[test]
    fn load_missing_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut sl: SkipList<u32, String> = SkipList::new(6)?;
        let err = sl.load_file(dir.path().join("absent"));
        assert!(matches!(err, Err(SnapshotError::Io(ref e)) if e.kind() == io::ErrorKind::NotFound));
        Ok(())
    }

    /// A reader which yields a few lines and then fails.
    struct Flaky<'a>(&'a [u8]);

    impl Read for Flaky<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.0.is_empty() {
                return Err(io::Error::other("disk on fire"));
            }
            let n = self.0.len().min(buf.len());
            buf[..n].copy_from_slice(&self.0[..n]);
            self.0 = &self.0[n..];
            Ok(n)
        }
    }

    #[test]
    fn load_keeps_records_before_io_error() -> Result<()> {
        let mut sl: SkipList<u32, String> = SkipList::new(6)?;
        let reader = io::BufReader::new(Flaky(b"1:a\n2:b\n"));
        assert!(matches!(sl.load(reader), Err(SnapshotError::Io(_))));
        assert_eq!(sl.len(), 2);
        Ok(())
    }
}
