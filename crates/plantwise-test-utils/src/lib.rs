// SPDX-FileCopyrightText: 2026 Plantwise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Plantwise integration tests.
//!
//! Provides a scripted model backend and a harness that wires a complete
//! engine around it, so tests run without network access.
//!
//! # Components
//!
//! - [`MockModel`] - Model backend replaying queued replies and recording calls
//! - [`TestHarness`] - Engine over the mock model, an in-memory store and the seed corpus

pub mod harness;
pub mod mock_model;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_model::MockModel;
