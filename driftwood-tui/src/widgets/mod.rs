//! Reusable widgets.

pub mod field;

pub use field::TextField;
