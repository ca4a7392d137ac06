// file: src/cli/mod.rs
// version: 1.0.0
// guid: a61ed710-5c8f-4dc4-e97a-2fa0d0cb84d7

//! Command line interface

pub mod args;
pub mod commands;
