#![forbid(unsafe_code)]

pub mod hosted;
pub mod repository;
pub mod sqlite;
