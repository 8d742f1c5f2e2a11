// SPDX-FileCopyrightText: 2026 Hark Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Hark integration tests.
//!
//! # Components
//!
//! - [`MockTransport`] - Transport that records prompts and callback answers
//! - [`fixtures`] - Builders for message and callback query updates

pub mod fixtures;
pub mod mock_transport;

pub use mock_transport::{AnsweredQuery, MockTransport, SentMessage};
