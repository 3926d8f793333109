pub mod analyzer;
pub mod boundary;
pub mod changelog;
pub mod cli;
pub mod config;
pub mod conventional;
pub mod domain;
pub mod error;
pub mod git;
pub mod resolver;
pub mod scope;
pub mod storage;
pub mod ui;

pub use error::{Result, VersionizeError};
