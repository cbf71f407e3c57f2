//! # CLI Behavior
//!
//! The binary wraps the ginfo library. Everything here deals with the terminal:
//! argument parsing, defaults from the environment, and printing.
//!
//! ```text
//! ginfo [OPTIONS] [OBJECT]... [ATTR=VALUE]... [ATTRIBUTE]...
//! ```
//!
//! ### Naked Execution (`ginfo`)
//!
//! Without a host or an LDIF snapshot there is nothing to query, so ginfo prints its
//! help and exits successfully.
//!
//! ### Listing
//!
//! - `ginfo -l`: attributes usable as filters, and the object types
//! - `ginfo -l Endpoint`: every attribute of an object
//! - `ginfo -l cap`: every distinct value of an attribute, after filtering
//!
//! ### Output
//!
//! Verbose messages go to stdout followed by a blank line, warnings go to stderr,
//! and the rendered result comes last.
//!
//! ## Module Structure
//!
//! - `commands`: builds the query from the command line and runs it
//! - `print`: message printing and attribute tables
//! - `setup`: argument parsing via clap, including one flag per attribute

mod commands;
mod print;
pub mod setup;

pub use commands::run;
