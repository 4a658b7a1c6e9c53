pub mod decide;
pub mod list;

pub use decide::{accept_connection, reject_connection};
pub use list::{list_connections, ConnectionView};
