//! Report module - console summary and file exports

pub mod curves;
pub mod export;
pub mod summary;

pub use curves::*;
pub use export::*;
pub use summary::*;
