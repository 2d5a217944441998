//! What-if calculators for small recurring habits.
//!
//! `core` holds the pure projection arithmetic shared by every calculator;
//! `api` exposes it over HTTP next to the static front-end bundle.

pub mod api;
pub mod core;
