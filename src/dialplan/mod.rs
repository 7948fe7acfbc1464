// File: src/dialplan/mod.rs

pub mod interfaces;
pub mod path;
pub mod session;
pub mod variables;

pub use session::Session;
pub use variables::DialplanVar;
