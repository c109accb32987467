//! A3S Inspect CLI - low-level metadata for containers and images.

pub mod commands;
