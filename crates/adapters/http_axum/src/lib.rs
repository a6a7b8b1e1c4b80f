//! # plantwatch-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the **plant dashboard** as server-side-rendered HTML that works
//!   with **zero JavaScript**: pure HTML forms + `<meta http-equiv="refresh">`
//!   for live updates
//! - Serve a small **JSON API** (`/api/state`, `/api/controls/*`) and a
//!   **server-sent-event** stream of state changes (`/api/stream`)
//! - Map HTTP requests into application service calls (driving adapter)
//!
//! ## No-JS dashboard approach
//! - The page is rendered server-side as complete HTML.
//! - The power, mode and pump buttons are `<form>` elements that POST back to
//!   the server and redirect (PRG pattern).
//! - The page reloads itself every few seconds.
//!
//! ## Dependency rule
//! Depends on `plantwatch-app` (for port traits and services) and
//! `plantwatch-domain` (for the view model). Never leaks axum types into the
//! domain.

pub mod api;
pub mod dashboard;
pub mod error;
pub mod router;
pub mod state;
