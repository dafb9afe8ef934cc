// --- File: crates/slotbook_booking/src/lib.rs ---
// Declare modules within this crate
pub mod handlers;
pub mod logic;
#[cfg(test)]
mod logic_test;
pub mod routes;
