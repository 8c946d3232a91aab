// src/lib.rs — Library root for visitlog

pub mod api;
pub mod cli;
pub mod infra;
pub mod recorder;
pub mod registry;
