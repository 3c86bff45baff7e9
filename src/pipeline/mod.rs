pub mod edit;
pub mod operator;
pub mod params;
pub mod prompt;

pub use edit::*;
pub use operator::*;
pub use params::*;
pub use prompt::*;
