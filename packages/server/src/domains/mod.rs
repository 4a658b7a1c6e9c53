// Domain modules

pub mod chatrooms;
pub mod connections;
pub mod goals;
pub mod help_offers;
pub mod matching;
pub mod notifications;
pub mod users;
