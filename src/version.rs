// Copyright (c) 2026 Egyfood
// SPDX-License-Identifier: MIT

/// Crate version reported at startup.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
