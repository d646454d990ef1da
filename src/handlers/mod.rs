// src/handlers/mod.rs

pub mod auth;
pub mod feed;
pub mod posts;
pub mod profile;
pub mod subscribers;
