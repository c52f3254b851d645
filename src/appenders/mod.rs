//! Appender implementations

pub mod console;
pub mod file;
pub mod rotating_file;

pub use console::{ConsoleAppender, ConsoleTarget};
pub use file::{FileAppender, FileMode};
pub use rotating_file::{RotatingFileAppender, RotationPolicy};

pub use crate::core::Appender;
