//! Command handlers
//!
//! Each subcommand of the `shadowsync` binary lives in its own module and
//! drives the library the same way a graphical front end would.

pub mod analyze;
pub mod sports;
