//! One module per `pinauth` subcommand.

pub mod add;
pub mod audit_cmd;
pub mod authenticate;
pub mod check;
pub mod completions;
pub mod list;
pub mod remove;
pub mod reset;
pub mod version;
