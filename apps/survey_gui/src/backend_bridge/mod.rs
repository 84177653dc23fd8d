//! Backend worker: owns the tokio runtime and the survey session.

pub mod commands;
pub mod runtime;
