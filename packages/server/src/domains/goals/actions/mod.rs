pub mod create_goal;
pub mod manage;

pub use create_goal::{create_goal, CreateGoal, CreatedGoal};
pub use manage::{delete_goal, update_progress};
