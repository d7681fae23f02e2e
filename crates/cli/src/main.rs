// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use cafecli::logging::{self, LogTarget};
use cafecli::Cli;
use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose, LogTarget::for_command(&cli.command));
    if let Err(e) = cafecli::run(cli).await {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
