// handlers/protected/auth/mod.rs - session introspection and renewal

pub mod refresh;
pub mod whoami;

pub use refresh::refresh;
pub use whoami::whoami;
