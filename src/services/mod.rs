pub mod auth;
pub mod cache;
pub mod nav;
pub mod session;
pub mod upstream;
