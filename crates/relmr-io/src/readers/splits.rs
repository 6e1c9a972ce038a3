//! Line-record reader that cuts a relation file into map splits.
//!
//! One record per line. Blank lines are not records. A line that is not
//! valid UTF-8 is a malformed record: it is logged, counted on its split and
//! skipped. Each split carries the zero-based line number of its first record
//! so skipped-record warnings can point back at the source.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{Error, Result};

const READ_BUFFER_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub index: usize,
    pub first_line: usize,
    pub records: Vec<String>,
    /// Lines dropped while reading this split.
    pub skipped: u64,
}

impl Split {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Read `reader` into splits of at most `split_records` records.
///
/// A trailing split with no records is still returned when it skipped lines,
/// so every malformed line is accounted for.
pub fn splits_from_reader<R: BufRead>(mut reader: R, split_records: usize) -> Result<Vec<Split>> {
    let per_split = split_records.max(1);
    let mut splits = Vec::new();
    let mut current = Split {
        index: 0,
        first_line: 0,
        records: Vec::with_capacity(per_split.min(1024)),
        skipped: 0,
    };
    let mut buf = Vec::new();
    let mut line_no = 0;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let this_line = line_no;
        line_no += 1;

        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line,
            Err(e) => {
                warn!(line = this_line, error = %e, "skipping record that is not valid UTF-8");
                current.skipped += 1;
                continue;
            }
        };
        let record = line.trim_end_matches('\n').trim_end_matches('\r');
        if record.trim().is_empty() {
            continue;
        }
        if current.records.is_empty() {
            current.first_line = this_line;
        }
        current.records.push(record.to_string());
        if current.records.len() == per_split {
            let next = Split {
                index: current.index + 1,
                first_line: 0,
                records: Vec::new(),
                skipped: 0,
            };
            splits.push(std::mem::replace(&mut current, next));
        }
    }
    if !current.is_empty() || current.skipped > 0 {
        splits.push(current);
    }
    Ok(splits)
}

/// Open `path` and read it into splits. A missing file is an error, never an
/// empty relation.
pub fn read_splits<P: AsRef<Path>>(path: P, split_records: usize) -> Result<Vec<Split>> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(Error::MissingInput(path.display().to_string()));
    }
    let file = File::open(path)?;
    let splits = splits_from_reader(BufReader::with_capacity(READ_BUFFER_BYTES, file), split_records)?;
    debug!(
        path = %path.display(),
        splits = splits.len(),
        records = splits.iter().map(Split::len).sum::<usize>(),
        skipped = splits.iter().map(|s| s.skipped).sum::<u64>(),
        "read input"
    );
    Ok(splits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    #[test]
    fn cuts_at_split_size_and_skips_blank_lines() {
        let src = "a,1\nb,2\n\nc,3\r\nd,4\ne,5\n";
        let splits = splits_from_reader(Cursor::new(src), 2).unwrap();
        assert_eq!(splits.len(), 3);
        assert_eq!(splits[0].records, vec!["a,1", "b,2"]);
        assert_eq!(splits[1].records, vec!["c,3", "d,4"]);
        assert_eq!(splits[1].first_line, 3);
        assert_eq!(splits[2].records, vec!["e,5"]);
        assert_eq!(splits[2].index, 2);
    }

    #[test]
    fn invalid_utf8_lines_are_skipped_and_counted() {
        let mut src = b"1,10,4,0\n2,10,5,0\n".to_vec();
        src.extend_from_slice(b"3,10,\xff\xfe,0\n");
        src.extend_from_slice(b"4,20,2,0");
        let splits = splits_from_reader(Cursor::new(src), 2).unwrap();
        assert_eq!(splits.len(), 2);
        assert_eq!(splits[0].skipped, 0);
        assert_eq!(splits[1].records, vec!["4,20,2,0"]);
        assert_eq!(splits[1].first_line, 3);
        assert_eq!(splits[1].skipped, 1);
    }

    #[test]
    fn skipped_tail_still_yields_a_split() {
        let splits = splits_from_reader(Cursor::new(b"a,1\n\xff\n".to_vec()), 1).unwrap();
        assert_eq!(splits.len(), 2);
        assert!(splits[1].is_empty());
        assert_eq!(splits[1].skipped, 1);
    }

    #[test]
    fn empty_input_has_no_splits() {
        assert!(splits_from_reader(Cursor::new(""), 10).unwrap().is_empty());
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_splits(dir.path().join("users.csv"), 10).unwrap_err();
        assert!(matches!(err, Error::MissingInput(_)));
    }

    #[test]
    fn reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rating.csv");
        let mut f = File::create(&path).unwrap();
        writeln!(f, "196,242,3,881250949").unwrap();
        writeln!(f, "186,302,3,891717742").unwrap();
        drop(f);

        let splits = read_splits(&path, 1).unwrap();
        assert_eq!(splits.len(), 2);
        assert_eq!(splits[1].records[0], "186,302,3,891717742");
    }
}
