//! Core library for k8x: chart evaluation boundary, document assembly, apply
//! sequencing, configuration, and environment loading.

pub mod apply;
pub mod assemble;
pub mod chart;
pub mod config;
pub mod dotenv;
pub mod logging;
