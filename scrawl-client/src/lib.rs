//! # scrawl-client — terminal drawing client
//!
//! Joins a topic on a relay, turns stdin commands into strokes and clears,
//! and renders everything it draws or receives into an in-memory raster
//! that can be saved as a PPM snapshot.

pub mod config;
pub mod connection;
pub mod display;
pub mod input;
