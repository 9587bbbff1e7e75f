//! Aggregation services behind the dashboard endpoints.

pub mod activities;
pub mod agents;
pub mod analytics;
pub mod clock;
pub mod credentials;
pub mod overview;
pub mod systems;
