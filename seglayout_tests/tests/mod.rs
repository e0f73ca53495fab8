// Copyright 2026 the Seglayout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! This crate contains the integration test suite for `seglayout`.
//!
//! - The `util` module contains shared utility functions that are needed by different
//!   test methods.
//! - We do not use the default Rust test harness, but instead use this `mod.rs` file as the
//!   entry point to run all other tests, so shared helpers live in one place.
//! - Put new tests into the module of their topic (`break_search`, `cursor`, `draw`,
//!   `segment`, `shaped`, and `harfrust` behind the feature of that name) and start the test name with that topic, e.g.
//!   `cursor_round_trip` rather than `round_trip_cursor`.

#![allow(missing_docs, reason = "we don't need docs for testing")]
#![allow(clippy::cast_possible_truncation, reason = "not critical for testing")]

#[cfg(feature = "harfrust")]
mod harfrust;
mod util;
