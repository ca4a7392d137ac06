// file: src/logging/mod.rs
// version: 1.0.0
// guid: e49cb5f8-3a6d-4ba2-c75e-0d8dbea962b5

//! Logging setup

pub mod logger;
