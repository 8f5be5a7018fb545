//! HTTP handlers

pub mod cache_admin;
pub mod health;
pub mod predict;
