pub mod cli;
pub mod tui;

pub use cli::CliApp;
