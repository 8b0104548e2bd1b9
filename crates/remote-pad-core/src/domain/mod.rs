//! Domain layer: pure input-tracking logic with no I/O.
//!
//! # Modules
//!
//! - [`tracking`]    – `Position`, `MotionEvent`, and the `DeltaTracker` state
//!   machine that converts absolute samples into scaled relative motion.
//! - [`sensitivity`] – The bounded, stepped sensitivity multiplier.
//! - [`throttle`]    – A leaky admission gate that bounds the move-event rate.
//! - [`status`]      – The transport connection status and its transitions.

pub mod sensitivity;
pub mod status;
pub mod throttle;
pub mod tracking;
