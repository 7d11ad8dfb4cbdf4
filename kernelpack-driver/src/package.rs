// SPDX-License-Identifier: Apache-2.0

use clap::ArgMatches;
use kernelpack::{generate_package_script, PackageOptions};

use crate::common::{read_kernel_config, write_output, OutputTarget};
use crate::driver_config::{get_clock_freq_hz, get_output_path, get_strict, PackageSettings};
use crate::report_cli_error::{report_cli_error_and_exit, report_error_chain_and_exit};

const SUBCOMMAND: &str = "package";

pub fn handle_package(matches: &ArgMatches, settings: &Option<PackageSettings>) {
    log::info!("handle_package");
    let config_path = matches
        .get_one::<String>("config")
        .expect("config is required");
    let strict = get_strict(matches, settings);
    let config = read_kernel_config(config_path, strict, SUBCOMMAND);

    let clock_freq_hz = match get_clock_freq_hz(matches, settings) {
        Ok(freq) => freq,
        Err(e) => report_error_chain_and_exit("invalid clock frequency", Some(SUBCOMMAND), &e),
    };
    let script = generate_package_script(&config, &PackageOptions { clock_freq_hz });

    let output = get_output_path(matches, settings);
    let target = OutputTarget::from_arg(&output);
    let force = matches.get_flag("force");
    if !force && target.would_clobber() {
        report_cli_error_and_exit(
            "output file already exists; add -f/--force to overwrite",
            Some(SUBCOMMAND),
            vec![("path", &output)],
        );
    }
    log::info!("writing packaging script to {}", output);
    if let Err(e) = write_output(&target, &script, force) {
        report_error_chain_and_exit("failed to write packaging script", Some(SUBCOMMAND), &e);
    }
}
