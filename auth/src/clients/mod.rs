pub mod people;

pub use people::{AccountDirectory, PeopleClient};
