// src/ops/mod.rs
//
// High-level device operations: each one a short sequential composition of
// `DeviceSession` calls, shared by the binaries.

pub mod reboot;
pub mod restart;
pub mod support;
pub mod template;
