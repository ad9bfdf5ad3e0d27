// handlers/public/users/mod.rs - open registration

pub mod register;

pub use register::create_user;
