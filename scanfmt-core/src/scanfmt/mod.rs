//! Main module for scanfmt library functionality

pub mod formatting;
pub mod indent;
pub mod lexing;
pub mod testing;
pub mod token;
