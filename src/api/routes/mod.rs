//! API Routes
//!
//! Route handlers organized by functionality.

pub mod columns;
pub mod compensation;
pub mod health;
