//! Request extractors shared by every authenticated route.

pub mod auth;
