//! CLI module for the translation relay
//!
//! Subcommands:
//! - `serve`: run the relay against the console transport
//! - `stats`: print persisted translation counts and provider usage

pub mod serve;
pub mod stats;

use clap::{Parser, Subcommand};

/// Translation relay - cached, persistent chat translation pipeline
#[derive(Parser)]
#[command(name = "translation-relay")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the relay, reading requests from stdin
    Serve,

    /// Show store and provider usage statistics
    Stats,
}
