//! 应用层 - 命令（写操作）

mod voice_commands;

pub mod handlers;

pub use voice_commands::*;
