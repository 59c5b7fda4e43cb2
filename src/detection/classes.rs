// Copyright (c) 2026 Egyfood
// SPDX-License-Identifier: MIT

/// Class names from the training data.yaml, in model output order.
pub const CLASS_NAMES: [&str; 9] = [
    "Bechamel", "Molokhya", "ataif", "besala", "fool", "konafa", "koshary", "pasposa", "taamia",
];
