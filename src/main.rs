//! CLI entry point for rfind

use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process;

use clap::error::ErrorKind;
use clap::{ArgAction, CommandFactory, Parser, ValueEnum};
use rfind::{Action, ArgError, Criteria, FindConfig, FindError, ModAge, Walker};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Exit status when the walk completed but reported I/O errors.
const EXIT_IO_ERROR: i32 = 1;

/// Action names accepted by `-a`
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ActionName {
    /// Run the viewer on each match
    Cat,
    /// Delete each match
    Delete,
    /// Same as delete
    Rm,
    /// Move each match to the destination given after the options
    Mv,
}

#[derive(Parser, Debug)]
#[command(name = "rfind")]
#[command(about = "Walk a directory tree and act on entries matching a name, age or inode")]
#[command(version)]
struct Args {
    /// Directory to search
    #[arg(short = 'w', long = "where", value_name = "PATH", default_value = ".")]
    root: PathBuf,

    /// Select entries with exactly this name
    #[arg(short = 'n', long = "name")]
    name: Option<String>,

    /// Select entries modified more (+N), less (-N) or exactly (N) minutes ago
    #[arg(
        short = 'm',
        long = "mmin",
        value_name = "[+|-]MINUTES",
        allow_hyphen_values = true
    )]
    mmin: Option<ModAge>,

    /// Select the entry with this inode number
    #[arg(short = 'i', long = "inum")]
    inum: Option<u64>,

    /// Action to run on selected entries (default: print the path)
    #[arg(short = 'a', long = "action", value_enum)]
    action: Option<ActionName>,

    /// Follow symbolic links to directories (cycles are detected and skipped)
    #[arg(short = 'L', long = "follow")]
    follow: bool,

    /// Program used by the cat action
    #[arg(long = "viewer", env = "RFIND_VIEWER", default_value = "cat")]
    viewer: String,

    /// Program used by the mv action
    #[arg(long = "mover", env = "RFIND_MOVER", default_value = "mv")]
    mover: String,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,

    /// Remaining arguments; the mv action takes its destination from the first
    #[arg(value_name = "ARGS")]
    rest: Vec<PathBuf>,
}

impl Args {
    fn into_config(self) -> Result<(PathBuf, FindConfig), ArgError> {
        let action = match self.action {
            None => Action::Print,
            Some(ActionName::Cat) => Action::View,
            Some(ActionName::Delete | ActionName::Rm) => Action::Delete,
            Some(ActionName::Mv) => {
                let destination = self
                    .rest
                    .into_iter()
                    .next()
                    .ok_or(ArgError::MissingDestination)?;
                Action::Move { destination }
            }
        };

        let config = FindConfig {
            criteria: Criteria {
                name: self.name,
                mod_age: self.mmin,
                inode: self.inum,
            },
            action,
            follow_links: self.follow,
            viewer: self.viewer,
            mover: self.mover,
        };
        Ok((self.root, config))
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let (root, config) = args.into_config().unwrap_or_else(|e| {
        let kind = match e {
            ArgError::MissingDestination => ErrorKind::MissingRequiredArgument,
            ArgError::InvalidModAge(_) => ErrorKind::ValueValidation,
        };
        Args::command().error(kind, e).exit()
    });

    debug!(root = %root.display(), "where");
    if let Some(name) = &config.criteria.name {
        debug!(%name, "name");
    }
    if let Some(age) = &config.criteria.mod_age {
        debug!(%age, "mmin");
    }
    if let Some(inode) = config.criteria.inode {
        debug!(inode, "inum");
    }
    debug!(action = ?config.action, follow = config.follow_links, "action");

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let result = Walker::new(&config).walk(&root, &mut out, |e| eprintln!("rfind: {}", e));

    match result {
        Ok(summary) => {
            debug!(
                matched = summary.matched,
                directories = summary.directories,
                errors = summary.errors.len(),
                "done"
            );
            if !summary.is_clean() {
                process::exit(EXIT_IO_ERROR);
            }
        }
        Err(FindError::Output(e)) if e.kind() == io::ErrorKind::BrokenPipe => {
            process::exit(EXIT_IO_ERROR);
        }
        Err(e) => {
            eprintln!("rfind: {}", e);
            process::exit(EXIT_IO_ERROR);
        }
    }
}
