pub mod dashboard;
pub mod logs;
pub mod not_found;
pub mod organizations;
pub mod payments;
pub mod plans;
pub mod subscriptions;
