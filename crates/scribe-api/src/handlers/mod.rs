//! Request handlers, grouped by surface

pub mod auth;
pub mod author;
pub mod blogs;
pub mod contact;
pub mod editor;
pub mod health;
pub mod users;
