//! Core types for toolchat.

pub mod generation;
pub mod message;
pub mod response;
pub mod usage;

pub use generation::*;
pub use message::*;
pub use response::*;
pub use usage::*;
