pub mod ai;
pub mod auth;
pub mod backend;
pub mod policy;
