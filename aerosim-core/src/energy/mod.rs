//! Energy network topology and the per-segment conditions it writes.

pub mod bus;
pub mod conditions;
pub mod network;
pub mod propulsor;
pub mod segment;
