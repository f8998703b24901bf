//! Backend worker: owns the HTTP transport and executes queued uploads.

pub mod commands;
pub mod runtime;
