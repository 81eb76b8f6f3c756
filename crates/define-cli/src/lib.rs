//! Library surface of the `define-cli` binary, exposed for tests.

pub mod logging;
pub mod summary;
