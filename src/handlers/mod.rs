//! Event Handling Module
//!
//! Turns raw terminal events into playground actions.
//!
//! # Module Organization
//!
//! - **`keys`**: keyboard dispatch for the editor, the snippet manager and prompts
//! - **`debounce`**: the auto-run timer
//!

pub mod debounce;
pub mod keys;
