// src/models/mod.rs

pub mod category;
pub mod post;
pub mod subscriber;
pub mod user;
