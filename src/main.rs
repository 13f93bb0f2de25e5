//! branch-release: publish build artifacts to a release branch and tag.

use branch_release::cli;
use std::process;

#[tokio::main]
async fn main() {
    process::exit(cli::run().await);
}
