//! minish - a threaded mini POSIX shell
//!
//! Binary entry point: argument parsing, logging and configuration setup,
//! process-group/terminal bootstrap, then the actor threads.

use std::env;
use std::io;
use std::path::PathBuf;
use std::process;

use nix::errno::Errno;
use nix::unistd::{getpgrp, getpid, isatty, setpgid, tcsetpgrp};
use tracing::{debug, warn};

use minish::error::{Error, Result};
use minish::{Config, ConfigLoader, Shell, NAME, VERSION};

/// Command-line options
#[derive(Debug, Default)]
struct AppArgs {
    /// Configuration file path
    config_path: Option<PathBuf>,
    /// Enable debug logging
    debug: bool,
}

impl AppArgs {
    /// Parse command line arguments
    fn parse() -> Result<Self> {
        let args: Vec<String> = env::args().collect();
        let mut app_args = AppArgs::default();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--config" | "-c" => {
                    if i + 1 < args.len() {
                        app_args.config_path = Some(PathBuf::from(&args[i + 1]));
                        i += 1;
                    } else {
                        return Err("missing config file path".into());
                    }
                }
                "--debug" | "-d" => {
                    app_args.debug = true;
                }
                "--help" | "-h" => {
                    print_help();
                    process::exit(0);
                }
                "--version" | "-v" => {
                    println!("{} v{}", NAME, VERSION);
                    process::exit(0);
                }
                arg if arg.starts_with('-') => {
                    return Err(format!("unknown option: {}", arg).into());
                }
                arg => {
                    warn!("ignoring positional argument: {}", arg);
                }
            }
            i += 1;
        }

        Ok(app_args)
    }
}

/// Print help information
fn print_help() {
    println!("{} - a threaded mini POSIX shell", NAME);
    println!();
    println!("USAGE:");
    println!("    {} [OPTIONS]", NAME);
    println!();
    println!("OPTIONS:");
    println!("    -c, --config <PATH>    Path to configuration file");
    println!("    -d, --debug            Enable debug logging");
    println!("    -h, --help             Print this help message");
    println!("    -v, --version          Print version information");
    println!();
    println!("CONFIGURATION:");
    println!("    {} looks for configuration files in the following order:", NAME);
    println!("    1. Path specified with --config");
    println!("    2. $MINISH_CONFIG");
    println!("    3. $XDG_CONFIG_HOME/minish/config.toml");
    println!("    4. ~/.config/minish/config.toml");
    println!("    5. Built-in defaults");
    println!();
    println!("ENVIRONMENT:");
    println!("    MINISH_CONFIG    Path to configuration file");
    println!("    RUST_LOG         Log level (error, warn, info, debug, trace)");
}

fn main() {
    let args = AppArgs::parse().unwrap_or_else(|err| {
        eprintln!("{}: {}", NAME, err);
        print_help();
        process::exit(1);
    });

    // Logs go to stderr; default to warn so they never interleave with the
    // prompt during normal use.
    let default_level = if args.debug { "debug" } else { "warn" };
    let env_filter = env::var("RUST_LOG").unwrap_or_else(|_| default_level.to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(env_filter))
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();

    debug!("starting {} v{}", NAME, VERSION);

    let config = load_configuration(&args);

    if let Err(err) = bootstrap() {
        eprintln!("{}: {}", NAME, err);
        process::exit(1);
    }

    if let Err(err) = Shell::new(config).run() {
        eprintln!("{}: {}", NAME, err);
        process::exit(1);
    }

    debug!("{} shutdown complete", NAME);
}

/// Load configuration from file or fall back to defaults
fn load_configuration(args: &AppArgs) -> Config {
    let result = match &args.config_path {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    };
    match result {
        Ok(config) => config,
        Err(err) => {
            warn!("{}; using defaults", err);
            Config::default()
        }
    }
}

/// Make the shell lead its own process group and own the terminal's
/// foreground group, so background children can be fenced off from stdin.
fn bootstrap() -> Result<()> {
    let pid = getpid();
    match setpgid(pid, pid) {
        Ok(()) => {}
        // A session leader already leads its group.
        Err(Errno::EPERM) if getpgrp() == pid => {
            debug!("already a process-group leader");
        }
        Err(errno) => {
            return Err(Error::TerminalSetupFailed {
                reason: format!("setpgid: {}", errno.desc()),
            });
        }
    }

    let stdin = io::stdin();
    if isatty(&stdin).unwrap_or(false) {
        tcsetpgrp(&stdin, getpgrp()).map_err(|errno| Error::TerminalSetupFailed {
            reason: format!("tcsetpgrp: {}", errno.desc()),
        })?;
    } else {
        debug!("stdin is not a tty, skipping foreground-group assignment");
    }

    Ok(())
}
