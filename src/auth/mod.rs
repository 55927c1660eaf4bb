//! Account credentials. Independent of the scraper.

mod password;
mod user;

pub use password::{authenticate, hash_password, reset_password};
pub use user::{User, UserType};
