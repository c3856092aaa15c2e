//! Evaluation Scoring & Consolidation Engine.
//!
//! This crate scores operators (employees) against weighted evaluation
//! criteria each month, consolidates multiple evaluators' inputs into one
//! authoritative value per criterion and operator, and derives per-operator
//! completion status across the giving and receiving roles.

#![warn(missing_docs)]

pub mod api;
pub mod backup;
pub mod config;
pub mod error;
pub mod import;
pub mod models;
pub mod scoring;
pub mod store;
