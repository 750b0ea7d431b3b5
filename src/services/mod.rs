// SPDX-License-Identifier: MIT

//! Services module - business logic layer.

pub mod attendance;
pub mod classifier;
pub mod points;
pub mod storage;

pub use attendance::{flip_membership, toggle_attendance, ToggleOutcome};
pub use classifier::ClassifierClient;
pub use points::{LedgerOutcome, PointsLedger};
pub use storage::StorageClient;
