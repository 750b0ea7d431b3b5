// SPDX-License-Identifier: MIT

//! Axum middleware.

pub mod auth;
