//! Local filesystem handling for job output directories.

pub mod fs;
