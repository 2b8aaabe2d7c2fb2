//! imagemark Replay
//!
//! A headless host for the marker board: loads a JSON scene, forwards its
//! scripted input the way a rendering adapter would, and writes every
//! reported change as a JSON line.

mod error;
mod runner;
mod scene;

pub use error::{ReplayError, ReplayResult};
pub use runner::{Record, Replay, replay_scene};
pub use scene::{ImageSize, Scene, Step};
