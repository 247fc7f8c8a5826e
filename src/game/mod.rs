//! Hand lifecycle: start, blind alerts, declared winner, committed win.

pub mod engine;
pub mod errors;
pub mod input;

pub use engine::*;
pub use errors::*;
pub use input::*;

#[cfg(test)]
mod tests;
