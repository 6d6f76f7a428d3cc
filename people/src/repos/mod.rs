pub mod account_repo;
pub mod error;
#[cfg(test)]
pub mod memory;
pub mod profile_repo;

pub use account_repo::{AccountRow, AccountStore, PgAccountStore};
pub use error::RepoError;
pub use profile_repo::{PgProfileStore, ProfileRow, ProfileStore};
