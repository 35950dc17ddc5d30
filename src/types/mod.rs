pub mod error;
pub mod model;
pub mod outcome;

pub use outcome::Outcome;
