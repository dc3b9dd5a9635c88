//! # CLI Command Implementations
//!
//! Each command lives in its own file with:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args`, builds the
//!   collaborators and calls into the `forklift` library.

pub mod harvest;
