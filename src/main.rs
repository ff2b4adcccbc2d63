//! extforge - configure and build CMake-based native extensions.
//!
//! `extforge configure` validates the project's build options and stores
//! them; `extforge build` reads them back and drives CMake for every
//! extension declared in `extforge.json`.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use extforge::commands;
use extforge::config::Config;
use extforge::error::{Error, EXIT_FAILURE};
use extforge::options::OptionSchema;
use extforge::project::Project;
use extforge::version;

#[derive(Parser)]
#[command(name = "extforge")]
#[command(about = "Configure and build CMake-based native extensions")]
#[command(
    after_help = "QUICK START:\n  extforge configure   Resolve and store build options\n  extforge build       Generate, compile and install extensions\n  extforge test        Run compiled test binaries\n  extforge clean       Remove build artifacts"
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve, validate and store build options (one flag per declared option)
    Configure,

    /// Generate, compile and install every declared extension
    Build {
        /// Number of parallel compile jobs
        #[arg(short = 'j', long)]
        parallel: Option<usize>,
    },

    /// Show information
    Show {
        #[command(subcommand)]
        what: ShowTarget,
    },

    /// Run preflight checks (verify tools and project before a build)
    Preflight {
        /// Fail if any checks fail (exit code 1)
        #[arg(long)]
        strict: bool,
    },

    /// Clean build artifacts (default: build directories, keeps configuration)
    Clean {
        #[command(subcommand)]
        what: Option<CleanTarget>,
    },

    /// Copy a compiled binary into the test-binary directory
    CopyTestBinary {
        /// Binary to copy
        file: PathBuf,
    },

    /// Run every compiled test binary
    Test,

    /// Build API documentation with doxygen
    Docs,

    /// Print the project version derived from git tags
    Version {
        /// Release number only (no commit count, hash or dirty marker)
        #[arg(long)]
        plain: bool,
    },
}

#[derive(Subcommand)]
enum ShowTarget {
    /// Show paths and the stored configuration
    Config,
    /// Show extension build directory state
    Status,
}

#[derive(Subcommand)]
enum CleanTarget {
    /// Build directories and compiled extensions
    Build,
    /// Stored configuration
    Config,
    /// Collected test binaries
    Tests,
    /// Everything
    All,
}

fn init_tracing() {
    // The subscriber has to exist before the schema is built, which is
    // before clap has parsed anything.
    let verbose = std::env::args().any(|a| a == "-v" || a == "--verbose");
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

fn exit_code(err: &anyhow::Error) -> u8 {
    let code = err
        .downcast_ref::<Error>()
        .map(Error::exit_code)
        .unwrap_or(EXIT_FAILURE);
    u8::try_from(code).unwrap_or(1)
}

fn main() -> ExitCode {
    init_tracing();

    let root = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("error: cannot determine working directory: {}", e);
            return ExitCode::from(1);
        }
    };
    let config = Config::load(&root);

    // The schema decides the configure flags, so a malformed descriptor and
    // declaration errors are fatal before any command runs. Without a
    // descriptor only the built-in options exist.
    let loaded = Project::load_optional(&config.project_file).and_then(|project| {
        let schema = match &project {
            Some(project) => project.schema()?,
            None => OptionSchema::build(&[])?,
        };
        Ok((project, schema))
    });
    let (project, schema) = match loaded {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1));
        }
    };

    let matches = Cli::command()
        .mut_subcommand("configure", |cmd| cmd.args(commands::option_args(&schema)))
        .get_matches();
    let cli = match Cli::from_arg_matches(&matches) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };

    match run(cli, &matches, &config, project, &schema) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(exit_code(&e))
        }
    }
}

fn run(
    cli: Cli,
    matches: &ArgMatches,
    config: &Config,
    project: Option<Project>,
    schema: &OptionSchema,
) -> Result<()> {
    tracing::debug!(?config, "loaded configuration");

    match cli.command {
        Commands::Configure => {
            let sub = matches
                .subcommand_matches("configure")
                .ok_or_else(|| anyhow::anyhow!("missing configure arguments"))?;
            commands::cmd_configure(config, schema, sub)?;
        }

        Commands::Build { parallel } => {
            let project = Project::required(project, &config.project_file)?;
            commands::cmd_build(config, &project, parallel)?;
        }

        Commands::Show { what } => {
            let show_target = match what {
                ShowTarget::Config => commands::show::ShowTarget::Config,
                ShowTarget::Status => commands::show::ShowTarget::Status,
            };
            commands::cmd_show(config, project.as_ref(), show_target)?;
        }

        Commands::Preflight { strict } => {
            commands::cmd_preflight(config, project.as_ref(), strict)?;
        }

        Commands::Clean { what } => {
            let clean_target = match what {
                None | Some(CleanTarget::Build) => commands::clean::CleanTarget::Build,
                Some(CleanTarget::Config) => commands::clean::CleanTarget::Config,
                Some(CleanTarget::Tests) => commands::clean::CleanTarget::Tests,
                Some(CleanTarget::All) => commands::clean::CleanTarget::All,
            };
            commands::cmd_clean(config, clean_target)?;
        }

        Commands::CopyTestBinary { file } => {
            commands::cmd_copy_test_binary(config, &file)?;
        }

        Commands::Test => {
            commands::cmd_test(config)?;
        }

        Commands::Docs => {
            let project = Project::required(project, &config.project_file)?;
            commands::cmd_docs(config, &project)?;
        }

        Commands::Version { plain } => {
            println!("{}", version::version_from_git(&config.root, plain));
        }
    }

    Ok(())
}
