//! Main CLI application

use crate::cli::prompt::prompt_choice;
use crate::config::{parse_config_auto, parse_config_file, validate_config, Config};
use crate::dispatch::{Dispatcher, Module, Outcome};
use crate::engine::{Arch, EmulatorHandle, Mode};
use crate::error::UdbgError;
use crate::modules::{builtin_modules, marker, module_name};
use anyhow::Context as _;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use clap_complete::Shell;
use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Verbosity levels for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Silent = 0,
    Quiet = 1,
    Normal = 2,
    Verbose = 3,
}

impl Verbosity {
    /// Default log filter for this level (RUST_LOG still wins)
    pub fn log_filter(self) -> &'static str {
        match self {
            Verbosity::Silent => "off",
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warn",
            Verbosity::Verbose => "debug",
        }
    }
}

/// CLI application
pub struct App {
    /// The clap command
    command: Command,
    /// Parsed configuration
    config: Config,
    /// Config file path, if one was found
    config_path: Option<PathBuf>,
}

impl App {
    /// Create a new app, discovering the configuration file
    pub fn new() -> Result<Self, UdbgError> {
        let (config, config_path) = parse_config_auto()?;
        Self::from_config(config, config_path)
    }

    /// Create app with a specific config file
    pub fn with_config_file(path: PathBuf) -> Result<Self, UdbgError> {
        let config = parse_config_file(&path)?;
        Self::from_config(config, Some(path))
    }

    /// Create app from an already parsed configuration
    pub fn from_config(config: Config, config_path: Option<PathBuf>) -> Result<Self, UdbgError> {
        validate_config(&config)?;

        Ok(App {
            command: build_command(),
            config,
            config_path,
        })
    }

    /// Run the application with the process arguments and terminal
    pub fn run(self) -> Result<(), UdbgError> {
        let args: Vec<String> = std::env::args().collect();
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.run_with(args, stdin.lock(), &mut stdout.lock())
    }

    /// Run the application with explicit arguments, input and output
    pub fn run_with<R, W>(mut self, args: Vec<String>, mut input: R, out: &mut W) -> Result<(), UdbgError>
    where
        R: BufRead,
        W: Write,
    {
        let matches = self.command.clone().get_matches_from(args);

        let verbosity = get_verbosity(&matches);
        init_logging(verbosity);

        if let Some(shell) = matches.get_one::<Shell>("completions") {
            clap_complete::generate(*shell, &mut self.command, "udbg", out);
            return Ok(());
        }

        if let Some(path) = &self.config_path {
            log::info!("Using config {}", path.display());
        }

        let mut dispatcher = Dispatcher::new();
        attach_modules(&mut dispatcher, &self.config, out)?;

        let arch = match matches.get_one::<Arch>("arch").copied().or(self.config.arch) {
            Some(arch) => arch,
            None => prompt_choice::<Arch, _, _>("Select arch", &mut input, out)?,
        };
        let mode = match matches.get_one::<Mode>("mode").copied().or(self.config.mode) {
            Some(mode) => mode,
            None => prompt_choice::<Mode, _, _>("Select mode", &mut input, out)?,
        };
        dispatcher.set_emulator(EmulatorHandle::open(arch, mode));
        log::info!("Session started for {}/{}", arch, mode);

        run_session(&mut dispatcher, &self.config.prompt, input, out)?;
        Ok(())
    }
}

/// Build the clap command
pub fn build_command() -> Command {
    Command::new("udbg")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Interactive command shell for CPU emulator debugging")
        .arg(
            Arg::new("arch")
                .short('a')
                .long("arch")
                .value_name("ARCH")
                .help("CPU architecture to emulate")
                .value_parser(value_parser!(Arch)),
        )
        .arg(
            Arg::new("mode")
                .short('m')
                .long("mode")
                .value_name("MODE")
                .help("Engine mode")
                .value_parser(value_parser!(Mode)),
        )
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("FILE")
                .help("Path to udbg.yml config file"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only log errors")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("silent")
                .short('s')
                .long("silent")
                .help("Log nothing")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log dispatch details")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("completions")
                .long("completions")
                .value_name("SHELL")
                .help("Print a shell completion script and exit")
                .value_parser(value_parser!(Shell)),
        )
}

/// Get verbosity level from matches
fn get_verbosity(matches: &ArgMatches) -> Verbosity {
    if matches.get_flag("silent") {
        Verbosity::Silent
    } else if matches.get_flag("quiet") {
        Verbosity::Quiet
    } else if matches.get_flag("verbose") {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    }
}

fn init_logging(verbosity: Verbosity) {
    let env = env_logger::Env::default().default_filter_or(verbosity.log_filter());
    // A second init (tests, embedding) keeps the first logger
    let _ = env_logger::Builder::from_env(env).try_init();
}

/// Attach the built-in modules, reporting each result
///
/// A module that fails to attach is reported and skipped.
pub fn attach_modules<W: Write>(
    dispatcher: &mut Dispatcher,
    config: &Config,
    out: &mut W,
) -> io::Result<()> {
    for module in builtin_modules(config) {
        let context_id = module.context_id().to_string();
        match dispatcher.attach_boxed(module) {
            Ok(()) => writeln!(out, "{} Module {} loaded", marker(), module_name(&context_id))?,
            Err(e) => {
                log::error!("{}", e);
                writeln!(
                    out,
                    "{} Error in adding '{}' module: {}",
                    "[!]".red().bold(),
                    context_id,
                    e
                )?;
            }
        }
    }
    Ok(())
}

/// Read, dispatch and print lines until quit or end of input
pub fn run_session<R, W>(
    dispatcher: &mut Dispatcher,
    prompt: &str,
    mut input: R,
    out: &mut W,
) -> io::Result<()>
where
    R: BufRead,
    W: Write,
{
    let prompt = format!("{} ", prompt).red().bold().dimmed();

    loop {
        write!(out, "{}", prompt)?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            let count = dispatcher.shutdown();
            log::info!("End of input, shut down {} module(s)", count);
            return Ok(());
        }

        match dispatcher.execute_line(&line) {
            Outcome::Text(text) => writeln!(out, "{}", text)?,
            Outcome::None => {}
            Outcome::Quit => return Ok(()),
        }
    }
}

/// Run the CLI application with the process arguments
pub fn run() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();

    let app = match extract_file_arg(&args) {
        Some(path) => App::with_config_file(path.clone())
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => App::new().context("failed to load configuration")?,
    };

    app.run().context("session aborted")?;
    Ok(())
}

/// Extract --file argument before clap parsing
fn extract_file_arg(args: &[String]) -> Option<PathBuf> {
    for i in 0..args.len() {
        if (args[i] == "--file" || args[i] == "-f") && i + 1 < args.len() {
            return Some(PathBuf::from(&args[i + 1]));
        }
    }
    None
}
