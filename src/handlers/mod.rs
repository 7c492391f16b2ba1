pub mod account;
pub mod admin;
pub mod course;
pub mod home;
pub mod policy;
