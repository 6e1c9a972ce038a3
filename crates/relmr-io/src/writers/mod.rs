//! Output writers.

pub mod part;
