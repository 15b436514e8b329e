//! Dice subsystem.
//!
//! # Data Flow
//! ```text
//! /rolldice handler
//!     → delay.rs (optional slow-roll pause, injected strategy)
//!     → die.rs (uniform draw over the six faces)
//!     → Roll (1..=6) returned to the handler for span, counter and body
//! ```
//!
//! # Design Decisions
//! - `Roll` cannot hold a value outside 1..=6
//! - Randomness comes from the thread-local non-cryptographic RNG
//! - The delay is a trait object so tests never sleep real time

pub mod delay;
pub mod die;

pub use delay::{Delay, NoDelay, TokioSleep};
pub use die::{Roll, FACES};
