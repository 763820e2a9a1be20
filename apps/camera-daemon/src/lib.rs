//! camera-daemon: HTTP front end for camera-core capture loops

pub mod config;
pub mod jpeg;
pub mod web;
