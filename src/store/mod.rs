// store - in-memory user persistence

pub mod memory;
pub mod user;

pub use memory::{StoreError, UserStore};
pub use user::{User, UserView};
