//! Use-case services over the activity store.

pub mod planner_service;

pub use planner_service::PlannerService;
