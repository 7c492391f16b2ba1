pub mod admin;
pub mod components;
pub mod course;
pub mod home;
pub mod layout;
pub mod policy;

// Re-export commonly used functions from layout
pub use layout::{page, render, titled};
