//! Dispatch of automation requests and tracking of their remote progress.

pub mod dispatcher;
pub mod endpoint;
pub mod invocation;
pub mod tracker;

pub use dispatcher::*;
pub use endpoint::*;
pub use invocation::*;
pub use tracker::*;
