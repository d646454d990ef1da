// src/utils/mod.rs

pub mod authoring;
pub mod html;
pub mod jwt;
pub mod password;
