//! Woodshed - guitar practice tracker backend
//!
//! Serves markdown lesson content and tracks practice: per-lesson
//! checklist completion, daily practice logs with streaks, achievement
//! badges, and a daily practice menu.
//!
//! ## Services
//!
//! - **Content**: markdown catalog with forward links and backlinks
//! - **Progress**: per-user per-article checklist state
//! - **Practice log**: one record per user per day, merged on toggle
//! - **Achievements**: fixed badge conditions re-evaluated per toggle
//! - **Daily menu**: continue / review / new recommendations

pub mod achievements;
pub mod badges;
pub mod catalog;
pub mod config;
pub mod db;
pub mod practice;
pub mod routes;
pub mod server;
pub mod types;

pub use config::Args;
pub use server::{run, AppState};
pub use types::{Result, WoodshedError};
