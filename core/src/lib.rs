//! Shift skill assignment for a call-center roster.
//!
//! Flow: roster text → `roster::parse` → `engine::AssignmentEngine::assign`
//! (with a `config::QuotaTable` and exception names) → `export::skills_csv`.

pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod rng;
pub mod roster;
pub mod types;
