pub mod seed;
pub mod tables;
pub mod types;

pub use seed::*;
pub use tables::*;
pub use types::*;
