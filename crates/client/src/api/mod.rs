//! Typed endpoint surface, one module per REST resource.
//!
//! Each method is a thin wrapper: build the path, delegate to the request
//! helpers in [`crate::http`], return the decoded DTO.

mod auth;
mod budgets;
mod categories;
mod comments;
mod entries;
mod members;
mod notifications;
mod profile;
mod summary;
mod transfers;
