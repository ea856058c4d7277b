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

use crate::helpers::*;
use anyhow::Result;
use std::time::Instant;

/// One cargo invocation of the CI pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    Build,
    Test,
    Check,
    Format,
    Clippy,
}

impl Task {
    /// Pipeline order used by `all`.
    pub const PIPELINE: [Task; 5] = [
        Task::Build,
        Task::Test,
        Task::Check,
        Task::Format,
        Task::Clippy,
    ];

    fn title(self) -> &'static str {
        match self {
            Task::Build => "Build",
            Task::Test => "Tests",
            Task::Check => "Check",
            Task::Format => "Format",
            Task::Clippy => "Clippy",
        }
    }

    fn info(self) -> &'static str {
        match self {
            Task::Build => "Compiling all workspace crates in debug mode",
            Task::Test => "Running unit tests, integration tests and doc tests",
            Task::Check => "Checking code for errors without building executables",
            Task::Format => "Formatting code using rustfmt with default settings",
            Task::Clippy => "Running Clippy linter with warnings as errors",
        }
    }

    fn style(self) -> (&'static str, &'static str) {
        match self {
            Task::Build => (HAMMER, BLUE),
            Task::Test => (TEST_TUBE, GREEN),
            Task::Check => (MAGNIFIER, CYAN),
            Task::Format => (BRUSH, MAGENTA),
            Task::Clippy => (CLIPPY, YELLOW),
        }
    }

    fn args(self) -> &'static [&'static str] {
        match self {
            Task::Build => &["build", "--workspace", "--exclude", "xtask"],
            Task::Test => &["test", "--workspace"],
            Task::Check => &["check", "--workspace"],
            // `fmt` takes `--all`, not `--workspace`
            Task::Format => &["fmt", "--all"],
            Task::Clippy => &["clippy", "--workspace", "--", "-D", "warnings"],
        }
    }
}

/// Runs a single task.
pub fn run(task: Task) -> Result<()> {
    let (emoji, color) = task.style();
    print_task_start(task.title(), emoji, color);
    println!("{}💡 Info:{} {}", BOLD, RESET, task.info());
    execute_command("cargo", task.args(), task.title())
}

/// Runs the whole pipeline, continuing past failures, and fails if any task did.
pub fn all() -> Result<()> {
    print_banner();
    let start_time = Instant::now();
    let total = Task::PIPELINE.len();

    let failed: Vec<&str> = Task::PIPELINE
        .iter()
        .enumerate()
        .filter_map(|(step, &task)| {
            let (_, color) = task.style();
            println!(
                "\n{}{}[{}/{}] {}{}",
                BOLD,
                color,
                step + 1,
                total,
                task.title(),
                RESET
            );
            run(task).err().map(|_| task.title())
        })
        .collect();

    println!(
        "\n{}{}Total time: {:.2}s{}",
        BOLD,
        BLUE,
        start_time.elapsed().as_secs_f64(),
        RESET
    );
    if failed.is_empty() {
        print_success(&format!("All {} tasks completed successfully! {}", total, ROCKET));
        Ok(())
    } else {
        print_error(&format!("{}/{} tasks failed: {}", failed.len(), total, failed.join(", ")));
        anyhow::bail!("CI pipeline failed")
    }
}
