pub mod formatter;
pub mod presentation;

pub use formatter::NodeFormatter;
pub use presentation::*;
