// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod event;
pub mod user;

pub use event::Event;
pub use user::User;
