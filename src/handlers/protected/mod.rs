// handlers/protected/mod.rs - handlers behind the authentication gate
//
// Every route in this tree is wrapped by `require_authentication`, so
// handlers can rely on validated `TokenClaims` being present in request
// extensions. Per-route authorization (ownership, flag requirements) stays
// in the handlers themselves: guard ordering is route policy, not a fixed
// pipeline.

pub mod auth;
pub mod users;
