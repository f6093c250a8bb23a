//! Internals of the `chanspan` binary, exposed for integration tests.
pub mod cli;
pub mod render;
