//! Database models and DTOs for all domain entities.

pub mod activity;
pub mod finance;
pub mod goal;
pub mod habit;
pub mod note;
pub mod pagination;
pub mod task;
pub mod user;
