// handlers/protected/users/mod.rs - user resource handlers

pub mod delete;
pub mod list;
pub mod patch;
pub mod permission_flags;
pub mod replace;
pub mod show;

pub use delete::delete_user;
pub use list::list_users;
pub use patch::patch_user;
pub use permission_flags::set_permission_flags;
pub use replace::replace_user;
pub use show::show_user;
