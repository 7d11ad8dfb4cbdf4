// SPDX-License-Identifier: Apache-2.0

//! Command line driver that turns a JSON kernel description into the TCL
//! script that packages the kernel's RTL into an XO archive.
//!
//! Commands are given like:
//!
//! ```text
//! kernelpack-driver <global-options> <command> <command-args-and-options>
//! ```
//!
//! Commands are:
//!
//! - package: Emits the packaging script (default `package_kernel.tcl`).
//! - address-map: Prints the kernel's register layout as JSON.
//! - version: Prints the driver version.
//!
//! Sample usage:
//!
//! ```shell
//! $ cargo run -- package kernel.json -o package_kernel.tcl --force
//! $ cargo run -- package kernel.json --strict=true --clock_freq_hz=300000000
//! $ cargo run -- address-map kernel.json
//! ```
//!
//! Defaults for `package` flags may be given in a `kernelpack.toml` settings
//! file (see `driver_config`), passed via `--settings` or found in the
//! current directory.

mod address_map_report;
mod common;
mod driver_config;
mod package;
mod report_cli_error;

use clap::{Arg, ArgAction};
use driver_config::{load_settings, PackageSettings, SETTINGS_FILE_NAME};
use report_cli_error::{report_cli_error_and_exit, report_error_chain_and_exit};

trait AppExt {
    fn add_config_input_arg(self) -> Self;
    fn add_bool_arg(self, long: &'static str, help: &'static str) -> Self;
}

impl AppExt for clap::Command {
    fn add_config_input_arg(self) -> Self {
        (self as clap::Command).arg(
            Arg::new("config")
                .value_name("CONFIG")
                .help("The JSON file describing the kernel")
                .required(true)
                .index(1),
        )
    }

    /// Adds a boolean argument to the command -- the helper ensures we have a
    /// uniform style/handling for boolean arguments.
    fn add_bool_arg(self, long: &'static str, help: &'static str) -> Self {
        (self as clap::Command).arg(
            Arg::new(long)
                .long(long)
                .value_name("BOOL")
                .action(ArgAction::Set)
                .value_parser(["true", "false"])
                .num_args(1)
                .help(help),
        )
    }
}

/// Loads the settings named by `--settings`, falling back to a
/// `kernelpack.toml` in the current directory. Only commands that consume
/// settings call this, so a broken settings file never blocks `version`.
fn resolve_settings(matches: &clap::ArgMatches) -> Option<PackageSettings> {
    let mut settings_path: Option<String> = matches
        .get_one::<String>("settings")
        .map(|s| s.to_string());

    // If there is no settings flag specified, but there is a kernelpack.toml
    // in the current directory, use that.
    if settings_path.is_none() {
        let cwd_settings_path = std::path::Path::new(SETTINGS_FILE_NAME);
        if cwd_settings_path.exists() {
            log::info!("Using {} in current directory", SETTINGS_FILE_NAME);
            settings_path = Some(SETTINGS_FILE_NAME.to_string());
        }
    }

    settings_path.map(|path| {
        if !std::path::Path::new(&path).exists() {
            let cwd = std::env::current_dir()
                .map(|d| d.display().to_string())
                .unwrap_or_default();
            report_cli_error_and_exit(
                "settings file does not exist",
                None,
                vec![("path", &path), ("working directory", &cwd)],
            );
        }
        match load_settings(std::path::Path::new(&path)) {
            Ok(settings) => settings,
            Err(e) => report_error_chain_and_exit("invalid settings file", None, &e),
        }
    })
}

fn main() {
    let _ = env_logger::try_init();

    log::info!(
        "kernelpack-driver starting; version: {}",
        env!("CARGO_PKG_VERSION")
    );

    let matches = clap::Command::new("kernelpack-driver")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Generates XO packaging scripts for RTL kernels")
        .arg(
            Arg::new("settings")
                .long("settings")
                .value_name("SETTINGS")
                .help("Path to a kernelpack.toml settings file")
                .action(ArgAction::Set),
        )
        .subcommand(clap::Command::new("version").about("Prints the version of the driver"))
        .subcommand(
            clap::Command::new("package")
                .about("Emits the TCL script that packages the kernel")
                .add_config_input_arg()
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("FILE")
                        .help("The output path for the resulting TCL script (`-` for stdout)")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("force")
                        .short('f')
                        .long("force")
                        .help("Overwrite the output file if it already exists")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("clock_freq_hz")
                        .long("clock_freq_hz")
                        .value_name("HZ")
                        .help("FREQ_HZ advertised for every kernel clock")
                        .action(ArgAction::Set),
                )
                .add_bool_arg("strict", "Validate the kernel description before generating"),
        )
        .subcommand(
            clap::Command::new("address-map")
                .about("Prints the kernel's control register layout as JSON")
                .add_config_input_arg()
                .add_bool_arg("strict", "Validate the kernel description first"),
        )
        .get_matches();

    if let Some(sub_matches) = matches.subcommand_matches("package") {
        let settings = resolve_settings(&matches);
        package::handle_package(sub_matches, &settings);
    } else if let Some(sub_matches) = matches.subcommand_matches("address-map") {
        let settings = resolve_settings(&matches);
        address_map_report::handle_address_map(sub_matches, &settings);
    } else if let Some(_matches) = matches.subcommand_matches("version") {
        println!("{}", env!("CARGO_PKG_VERSION"));
    } else {
        report_cli_error_and_exit("No valid subcommand provided.", None, vec![]);
    }
}
