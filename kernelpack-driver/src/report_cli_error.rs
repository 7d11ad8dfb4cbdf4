// SPDX-License-Identifier: Apache-2.0

use colored::Colorize;

/// Prints `message` (plus any `key: value` details) to stderr and exits with
/// status 1. Every fatal driver error goes through here so the format stays
/// uniform for scripts that scrape it.
pub fn report_cli_error_and_exit(
    message: &str,
    subcommand: Option<&str>,
    details: Vec<(&str, &str)>,
) -> ! {
    let prefix = match subcommand {
        Some(subcommand) => format!("kernelpack-driver: {subcommand}: "),
        None => "kernelpack-driver: ".to_string(),
    };
    eprintln!("{}{}", prefix, message.red().bold());
    for (key, value) in details {
        eprintln!("  {}: {}", key, value);
    }
    std::process::exit(1);
}

/// Like [`report_cli_error_and_exit`] but for an `anyhow` error; each cause in
/// the chain becomes a `caused by` detail line.
pub fn report_error_chain_and_exit(
    message: &str,
    subcommand: Option<&str>,
    error: &anyhow::Error,
) -> ! {
    let causes: Vec<String> = error.chain().map(|cause| cause.to_string()).collect();
    let details = causes.iter().map(|c| ("caused by", c.as_str())).collect();
    report_cli_error_and_exit(message, subcommand, details)
}
