//! # ghfetch
//!
//! `ghfetch` searches the GitHub API for users matching a location and follower
//! filter, enriches every match with its full profile and repository listing,
//! and writes the results to two CSV files:
//!
//! - `users.csv`: one row per user profile.
//! - `repositories.csv`: one row per repository, tagged with its owner login.
//!
//! ## Pipeline
//!
//! 1. [`github::search`] pages through `/search/users` until a short page.
//! 2. [`enrich::fetch_user_details`] fetches every profile concurrently.
//! 3. [`enrich::fetch_user_repos`] fetches every repository list concurrently.
//! 4. [`output`] serializes both collections.
//!
//! Per-user fetch failures are dropped silently; only the initial search is
//! fatal. See [`fanout`] for the shared fan-out/fan-in primitive.

pub mod cli;
pub mod enrich;
pub mod fanout;
pub mod github;
pub mod output;

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
