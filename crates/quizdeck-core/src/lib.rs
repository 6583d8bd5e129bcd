//! quizdeck-core: Question parsing, quiz sessions, timing, and scoring.
//!
//! This crate defines the question model, the spreadsheet-row parser, and the
//! session state machine that the quizdeck CLI and report exporters build on.

pub mod config;
pub mod error;
pub mod loader;
pub mod model;
pub mod parser;
pub mod persistence;
pub mod report;
pub mod runner;
pub mod scoring;
pub mod session;
pub mod timer;
pub mod view;

pub use error::{FormatError, QuizError};
