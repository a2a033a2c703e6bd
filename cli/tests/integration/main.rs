//! Integration tests for datacats CLI
//!
//! These tests spawn the actual binary and test end-to-end behavior. The
//! container runtime is replaced by small shell scripts via the config file.

mod cli_tests;
