//! Input readers.

pub mod splits;
