//! Domain model for planner activities.

pub mod activity;
pub mod schedule;
