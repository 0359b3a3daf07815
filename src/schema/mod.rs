pub mod definition;
pub mod field;
pub mod json;
pub mod synthesizer;

pub use definition::*;
pub use field::*;
pub use synthesizer::*;
