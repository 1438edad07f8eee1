//! Subfetch - Batch Video Organizer and Subtitle Downloader
//!
//! Organizes a directory of video files into per-episode folders and fetches
//! matching subtitles from a remote lookup service, normalizing the payload
//! to BOM-prefixed UTF-8.

pub mod cli;
pub mod config;
pub mod error;
pub mod organizer;
pub mod scanner;
pub mod service;
pub mod transfer;
pub mod workflow;
