//! HTTP service that splits an uploaded video into a muted visual-only file
//! and a black-video audio-only file with ffmpeg, serves both for download,
//! and deletes them after a retention delay.

pub mod app;
pub mod common;
pub mod config;
pub mod docs;
pub mod infrastructure;
pub mod middleware;
pub mod modules;
pub mod routes;
pub mod state;
pub mod workers;
