//! Unit tests for the board facade.
