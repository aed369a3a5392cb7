//! Consolidated end-to-end tests.
//!
//! These drive the resource adapters against a mock Silo API.
