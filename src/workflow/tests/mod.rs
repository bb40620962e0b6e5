//! Unit tests for the workflow module.

mod reconcile_tests;
