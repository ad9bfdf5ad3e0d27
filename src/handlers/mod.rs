// handlers - HTTP route handlers
//
// public/    endpoints reachable without a token (registration, login)
// protected/ endpoints behind the authentication gate

pub mod protected;
pub mod public;
