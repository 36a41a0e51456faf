//! Employee CRUD and the dashboard.

pub mod dashboard;
pub mod handlers;
pub mod repository;
