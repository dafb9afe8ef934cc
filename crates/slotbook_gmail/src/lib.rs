// --- File: crates/slotbook_gmail/src/lib.rs ---
// Declare modules within this crate
pub mod auth;
pub mod service;
