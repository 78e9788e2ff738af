use crate::config::{OutputFormat, OutputOrder, StatusConfig};
use crate::domain::StatusRequest;
use crate::error::AppError;
use std::path::PathBuf;

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderArg {
    /// Lines in the order projects were given
    Input,
    /// Lines as each repository finishes
    Completion,
}

#[derive(clap::Parser, Debug)]
#[command(name = "projstat", version, about = "Status of many git working copies at once")]
pub struct Args {
    /// Space separated names of project folders
    #[arg(short = 'n', long, required = true, num_args = 1..)]
    pub projects: Vec<String>,

    /// Folder holding the projects (overrides $MYPROJECTS)
    #[arg(short, long, env = "MYPROJECTS")]
    pub root: Option<PathBuf>,

    /// Fetch from the remote and show ahead/behind counts
    #[arg(short, long)]
    pub fetch: bool,

    /// Repositories probed at once (0 = available parallelism)
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Seconds before a single git query is abandoned
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Output order: input|completion
    #[arg(long, value_enum)]
    pub order: Option<OrderArg>,

    /// Emit one JSON object per project instead of colored text
    #[arg(long)]
    pub json: bool,

    /// Disable colors (also honors NO_COLOR)
    #[arg(long)]
    pub no_color: bool,

    /// Extra configuration file layered over the user config
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Args {
    pub fn parse() -> Self {
        <Args as clap::Parser>::parse()
    }

    /// Layer command-line overrides on top of loaded configuration
    pub fn apply(&self, config: &mut StatusConfig) {
        if let Some(jobs) = self.jobs {
            config.probe.max_concurrency = jobs;
        }
        if let Some(timeout) = self.timeout {
            config.probe.timeout_seconds = timeout;
        }
        if let Some(order) = self.order {
            config.output.order = match order {
                OrderArg::Input => OutputOrder::Input,
                OrderArg::Completion => OutputOrder::Completion,
            };
        }
        if self.json {
            config.output.format = OutputFormat::Json;
        }
        if self.no_color {
            config.output.color = false;
        }
    }

    /// Immutable description of what to probe
    pub fn request(&self) -> Result<StatusRequest, AppError> {
        let root = self.root.as_deref().ok_or(AppError::RootUnset)?;
        Ok(StatusRequest::new(root, self.projects.iter().cloned(), self.fetch))
    }
}
