// Users domain - read-only mini-profiles. Account writes belong to the auth
// service; the matching core only needs names, avatars, and push tokens.

pub mod models;
pub mod store;

pub use models::user::UserProfile;
