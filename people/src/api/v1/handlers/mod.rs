pub mod ping;
pub mod profiles;
pub mod user;
