//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod elevenlabs;
pub mod fetch;
pub mod secrets;

pub use elevenlabs::*;
pub use fetch::*;
pub use secrets::*;
