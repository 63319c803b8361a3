//! Filesystem and checksum helpers shared by the pipeline stages.

pub mod checksum;
pub mod fs;
