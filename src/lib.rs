pub mod config;
pub mod design;
pub mod error;
pub mod export;
pub mod pool;
pub mod runner;
pub mod scoring;
pub mod sequencer;
pub mod session;
pub mod stimuli;
// cmd and reports belong to the binary (main.rs).

pub use error::{WagerError, WagerResult};
