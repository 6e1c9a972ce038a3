//! `part-r-NNNNN` writer: one `key,value` line per reduce output pair.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use csv::{QuoteStyle, Writer, WriterBuilder};
use relmr_core::types::KeyValue;

use crate::error::Result;

pub struct PartWriter<W: Write> {
    writer: Writer<W>,
    records: u64,
}

impl PartWriter<File> {
    pub fn create(path: &Path) -> Result<Self> {
        let f = File::create(path)?;
        Ok(Self::to_writer(f))
    }
}

impl PartWriter<File> {
    /// `dir/part-r-NNNNN` for the given file name.
    pub fn in_dir(dir: &Path, file_name: &str) -> Result<(PathBuf, Self)> {
        let path = dir.join(file_name);
        let writer = Self::create(&path)?;
        Ok((path, writer))
    }
}

impl<W: Write> PartWriter<W> {
    pub fn to_writer(writer: W) -> Self {
        // Keys and values are already comma-joined field lists, so they are
        // written as-is: no quoting, no header.
        let writer = WriterBuilder::new()
            .has_headers(false)
            .quote_style(QuoteStyle::Never)
            .flexible(true)
            .from_writer(writer);
        Self { writer, records: 0 }
    }

    pub fn write(&mut self, kv: &KeyValue) -> Result<()> {
        self.writer.write_record([kv.key.as_str(), kv.value.as_str()])?;
        self.records += 1;
        Ok(())
    }

    /// Flush and hand back the record count.
    pub fn finish(mut self) -> Result<u64> {
        self.writer.flush()?;
        Ok(self.records)
    }
}
