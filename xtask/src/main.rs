// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

// Build automation and asset packing for the Blammo resource crates.
// Run with: cargo xtask <command>

mod commands;
mod helpers;

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::{Builder, Env};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "xtask", about = "Build automation and asset packing", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build all crates in the workspace.
    Build,
    /// Run all tests in the workspace.
    Test,
    /// Run `cargo check` on all crates.
    Check,
    /// Format all code in the workspace.
    Format,
    /// Run clippy on all crates with warnings as errors.
    Clippy,
    /// Run every CI task in order.
    All,
    /// Asset pipeline commands.
    #[command(subcommand)]
    Assets(AssetsCommand),
}

#[derive(Subcommand, Debug)]
enum AssetsCommand {
    /// Pack the manifest's source directories into `index.bin` + `data.pack`.
    Pack {
        /// Manifest listing the directories to pack.
        #[arg(short, long, default_value = "Assets.toml")]
        manifest: PathBuf,
        /// Output directory, overriding the manifest's.
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// List the entries of a packed archive.
    List {
        /// Directory holding `index.bin` and `data.pack`.
        #[arg(default_value = ".dist/assets")]
        dir: PathBuf,
    },
}

fn main() -> Result<()> {
    Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        helpers::print_banner();
        println!("Run `cargo xtask help` for the list of commands.");
        return Ok(());
    };

    match command {
        Command::Build => commands::ci::run(commands::ci::Task::Build),
        Command::Test => commands::ci::run(commands::ci::Task::Test),
        Command::Check => commands::ci::run(commands::ci::Task::Check),
        Command::Format => commands::ci::run(commands::ci::Task::Format),
        Command::Clippy => commands::ci::run(commands::ci::Task::Clippy),
        Command::All => commands::ci::all(),
        Command::Assets(AssetsCommand::Pack { manifest, out }) => {
            commands::assets::pack(&manifest, out)
        }
        Command::Assets(AssetsCommand::List { dir }) => commands::assets::list(&dir),
    }
}
