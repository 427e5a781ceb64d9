/// Battery state-of-charge model.
pub mod battery;
pub mod engine;
pub mod power_balance;
pub mod types;
