// src/lib.rs
pub mod config;
pub mod fetch;
pub mod jtac;
pub mod ops;
pub mod session;
