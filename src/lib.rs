//! xpboard: a terminal dashboard for a learner's XP and results
//!
//! Data flows from the [`session`] through the fetch [`hooks`] into the
//! [`aggregate`] reductions and on to the [`charts`], which produce
//! renderer-independent [`scene`]s for the TUI and the [`svg`] exporter.

pub mod aggregate;
pub mod charts;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod hooks;
pub mod interactive;
pub mod logging;
pub mod models;
pub mod prompt;
pub mod queries;
pub mod report;
pub mod scale;
pub mod scene;
pub mod session;
pub mod storage;
pub mod summary;
pub mod svg;
pub mod theme;
pub mod utils;

pub use error::{AppError, Result};
