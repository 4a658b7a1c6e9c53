// Goals domain - goal lifecycle and the creation pipeline that triggers
// connection formation

pub mod actions;
pub mod errors;
pub mod models;
pub mod store;

pub use errors::GoalError;
pub use models::goal::{Goal, NewGoalRecord};
