pub mod callbacks;
pub mod config;
pub mod host;
mod scheduler;

pub use scheduler::Engine;
