//! Domain layer for the critiq review service.
//!
//! Holds everything that does not need a database: identifier types, the
//! shared error type, catalog and review validation rules, and the review
//! gate that decides whether a review write may proceed.

pub mod catalog;
pub mod error;
pub mod review;
pub mod roles;
pub mod types;
pub mod validation;
