//! Like/Match decision engine and its storage seams.

pub mod engine;
pub mod errors;
pub mod handlers;
#[cfg(test)]
pub mod memory;
pub mod postgres;
pub mod profiles;
pub mod skills;
pub mod store;
