#![forbid(unsafe_code)]
//! relmr-io: reading relation files as map splits, writing reduce output as
//! `part-r-NNNNN` files, and managing the job output directory.

pub mod error;
pub mod readers;
pub mod storage;
pub mod writers;

pub use error::{Error, Result};
pub use readers::splits::{read_splits, Split};
pub use storage::fs::{list_part_files, prepare_output_dir};
pub use writers::part::PartWriter;
