//! Domain types for BarLens

pub mod bar;
pub mod raw;

pub use bar::{Bar, Direction};
pub use raw::{RawRow, RawValue};
