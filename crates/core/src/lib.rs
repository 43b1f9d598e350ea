//! Core business logic for Fintrack.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. All domain types, validation rules, and calculations live
//! here.
//!
//! # Modules
//!
//! - `transaction` - Transaction kinds and amount rules
//! - `budget` - Budget windows and progress computation
//! - `auth` - Password hashing and user roles

pub mod auth;
pub mod budget;
pub mod transaction;
