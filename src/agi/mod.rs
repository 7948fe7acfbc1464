// File: src/agi/mod.rs

pub mod channel;
pub mod connection;
#[cfg(test)]
pub mod memory;
pub mod request;
pub mod server;
