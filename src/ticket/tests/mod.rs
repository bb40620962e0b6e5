//! Unit tests for the ticket module.
