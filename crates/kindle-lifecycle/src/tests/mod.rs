//! Test suites for the startup lifecycle.

pub(crate) mod support;
