// Copyright 2025 Fernando Borretti
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

use clap::Parser;

use crate::cmd::check::check_workspace;
use crate::cmd::serve::server::ServeConfig;
use crate::cmd::serve::server::start_server;
use crate::cmd::stats::StatsFormat;
use crate::cmd::stats::print_stats;
use crate::error::Fallible;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Serve the course in the browser.
    Serve {
        /// Path to the workspace directory. By default, the current working directory is used.
        directory: Option<String>,
        /// The port to use for the web server.
        #[arg(long, default_value_t = 8000)]
        port: u16,
        /// Don't open the browser automatically.
        #[arg(long)]
        no_open: bool,
        /// Keep progress in memory only; nothing is written to disk.
        #[arg(long)]
        ephemeral: bool,
    },
    /// Print the learner's progress.
    Stats {
        /// Path to the workspace directory. By default, the current working directory is used.
        directory: Option<String>,
        /// Which output format to use.
        #[arg(long, default_value_t = StatsFormat::Json)]
        format: StatsFormat,
    },
    /// Check that the workspace and its catalog are valid.
    Check {
        /// Path to the workspace directory. By default, the current working directory is used.
        directory: Option<String>,
    },
}

pub async fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Serve {
            directory,
            port,
            no_open,
            ephemeral,
        } => {
            let config = ServeConfig {
                directory,
                port,
                open_browser: !no_open,
                ephemeral,
            };
            start_server(config).await
        }
        Command::Stats { directory, format } => print_stats(directory, format),
        Command::Check { directory } => check_workspace(directory),
    }
}
