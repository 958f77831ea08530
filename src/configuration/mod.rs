pub mod command_line;
pub mod constants;
pub mod deserialize;
pub mod settings;

pub use settings::{Configuration, LoggingMode, RunSelector, StatusCodes};
