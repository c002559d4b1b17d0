//! Interactive debugger front ends

pub mod repl;
