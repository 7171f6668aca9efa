pub mod loader;
pub mod program;

pub use loader::{load_program, parse_program, parse_program_str};
pub use program::Program;
