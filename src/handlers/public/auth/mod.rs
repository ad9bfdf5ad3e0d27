// handlers/public/auth/mod.rs - credential exchange

pub mod login;

pub use login::login;
