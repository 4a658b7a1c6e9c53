// Connections domain - helper/seeker match records and the two-sided
// accept/reject decision machine

pub mod actions;
pub mod errors;
pub mod models;
pub mod store;

pub use errors::ConnectionError;
pub use models::connection::{Connection, ConnectionStatus, Decision, NewConnection, Side};
