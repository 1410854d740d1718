#![forbid(unsafe_code)]

//! Marquee headless demo.
//!
//! Builds a stage from configuration, binds a small scripted scene, and runs
//! it at a fixed frame rate, optionally printing every snapshot as one JSON
//! line on stdout.

pub mod cli;
pub mod scene;
