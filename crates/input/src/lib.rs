//! Input: discrete commands and held-key controls.
//!
//! # Invariants
//! - Devices never touch entities directly; everything becomes a
//!   [`Command`] applied to the world.
//! - Keyboard and pointer share the same command set.

pub mod action;
pub mod controls;

pub use action::{Command, Outcome};
pub use controls::{Controls, Key};

pub fn crate_info() -> &'static str {
    "tilewalk-input v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("input"));
    }
}
