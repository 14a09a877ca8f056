// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Common test utilities for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - Calendar feed fixtures served by a mock server
//! - Temporary state directories with auto-cleanup

mod fixtures;

#[allow(unused_imports)]
pub use fixtures::{
    TestConfigBuilder, airbnb_feed, mount_feed, test_property, vevent, write_config,
};
pub use temp_dir::TempState;
