// SPDX-License-Identifier: MIT

//! Jelloverse: community event scheduling with gamification points.
//!
//! This crate provides the backend API for browsing and hosting "jams"
//! (community events), toggling attendance, and earning points for
//! completed tasks.

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use services::{ClassifierClient, PointsLedger, StorageClient};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub ledger: PointsLedger,
    pub classifier: ClassifierClient,
    pub storage: StorageClient,
}
