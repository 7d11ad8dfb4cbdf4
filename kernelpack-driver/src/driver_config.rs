// SPDX-License-Identifier: Apache-2.0

//! Optional `kernelpack.toml` settings that supply defaults for the
//! command-line flags.
//!
//! ```toml
//! [package]
//! output = "package_kernel.tcl"
//! clock_freq_hz = 250000000
//! strict = false
//! ```

use anyhow::Context;
use clap::ArgMatches;
use serde::Deserialize;

/// Settings file picked up from the working directory when `--settings` is
/// not given.
pub const SETTINGS_FILE_NAME: &str = "kernelpack.toml";

pub const DEFAULT_OUTPUT_PATH: &str = "package_kernel.tcl";

#[derive(Deserialize)]
struct KernelpackSettings {
    #[serde(default)]
    package: PackageSettings,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PackageSettings {
    /// Where `package` writes the script when `--output` is not given.
    pub output: Option<String>,

    /// `FREQ_HZ` advertised for each kernel clock.
    pub clock_freq_hz: Option<u64>,

    /// Validate the kernel description before generating anything.
    pub strict: Option<bool>,
}

pub fn parse_settings(toml_str: &str) -> anyhow::Result<PackageSettings> {
    let settings: KernelpackSettings =
        toml::from_str(toml_str).context("parse kernelpack settings")?;
    Ok(settings.package)
}

pub fn load_settings(path: &std::path::Path) -> anyhow::Result<PackageSettings> {
    let toml_str = std::fs::read_to_string(path)
        .with_context(|| format!("read settings file {}", path.display()))?;
    parse_settings(&toml_str)
}

/// Output path from the `--output` flag, else the settings file, else
/// [`DEFAULT_OUTPUT_PATH`].
pub fn get_output_path(matches: &ArgMatches, settings: &Option<PackageSettings>) -> String {
    if let Some(output) = matches.get_one::<String>("output") {
        output.to_string()
    } else if let Some(output) = settings.as_ref().and_then(|s| s.output.clone()) {
        output
    } else {
        DEFAULT_OUTPUT_PATH.to_string()
    }
}

pub fn get_clock_freq_hz(
    matches: &ArgMatches,
    settings: &Option<PackageSettings>,
) -> anyhow::Result<u64> {
    if let Some(freq) = matches.get_one::<String>("clock_freq_hz") {
        freq.parse::<u64>()
            .with_context(|| format!("--clock_freq_hz value `{freq}` is not an integer"))
    } else if let Some(freq) = settings.as_ref().and_then(|s| s.clock_freq_hz) {
        Ok(freq)
    } else {
        Ok(kernelpack::tcl_fragments::DEFAULT_CLOCK_FREQ_HZ)
    }
}

/// Boolean flags are given as `--strict=true|false`; absent means defer to
/// the settings file, which in turn defaults to off.
pub fn get_strict(matches: &ArgMatches, settings: &Option<PackageSettings>) -> bool {
    if let Some(strict) = matches.get_one::<String>("strict") {
        strict == "true"
    } else {
        settings.as_ref().and_then(|s| s.strict).unwrap_or(false)
    }
}
