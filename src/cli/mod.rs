//! Command-line interface for the compiler.
//!
//! Holds the argument definitions, the ordered output verbosity levels
//! and the debug dump formats. The selected options are read-only for
//! the compilation passes.

pub mod cli;
