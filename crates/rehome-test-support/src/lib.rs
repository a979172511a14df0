//! Test support utilities and fixtures for rehome tests

pub mod workspace;

pub use workspace::TestWorkspace;
