//! Business logic services.

pub mod activity;
pub mod analytics;
pub mod auth;
pub mod dashboard;
pub mod gateway;
pub mod timeseries;
