// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use acl_risk_node::cli::{execute, Cli};
use anyhow::Result;
use clap::Parser;
use std::env;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before clap reads env-backed flags
    dotenv::dotenv().ok();

    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    execute(cli).await
}
