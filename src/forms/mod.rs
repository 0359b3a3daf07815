//! Forms shipped with the crate.

pub mod creative_version;

pub use creative_version::creative_version;
