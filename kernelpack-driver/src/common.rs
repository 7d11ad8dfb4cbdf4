// SPDX-License-Identifier: Apache-2.0

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use kernelpack::KernelConfig;

use crate::report_cli_error::report_cli_error_and_exit;

/// Reads and parses the kernel description named by the `config` positional
/// argument, optionally validating it. Any failure is fatal.
pub fn read_kernel_config(config_path: &str, strict: bool, subcommand: &str) -> KernelConfig {
    let path = Path::new(config_path);
    if !path.exists() {
        report_cli_error_and_exit(
            "kernel config file does not exist",
            Some(subcommand),
            vec![("path", config_path)],
        );
    }
    let json = match std::fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) => report_cli_error_and_exit(
            &format!("failed to read kernel config: {e}"),
            Some(subcommand),
            vec![("path", config_path)],
        ),
    };
    let config = match KernelConfig::from_json_str(&json) {
        Ok(config) => config,
        Err(e) => report_cli_error_and_exit(
            &e.to_string(),
            Some(subcommand),
            vec![("path", config_path)],
        ),
    };
    if strict {
        log::info!("validating kernel config {}", config_path);
        if let Err(e) = config.validate() {
            report_cli_error_and_exit(
                &e.to_string(),
                Some(subcommand),
                vec![("path", config_path)],
            );
        }
    }
    config
}

/// Where generated text goes; `-` on the command line means stdout.
#[derive(Debug, PartialEq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

impl OutputTarget {
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            OutputTarget::Stdout
        } else {
            OutputTarget::File(PathBuf::from(arg))
        }
    }

    /// Whether writing here would replace an existing file.
    pub fn would_clobber(&self) -> bool {
        match self {
            OutputTarget::Stdout => false,
            OutputTarget::File(path) => path.exists(),
        }
    }
}

/// Writes `contents` to `target`. Without `force` an existing file is never
/// replaced, even one that appeared after the caller checked.
pub fn write_output(target: &OutputTarget, contents: &str, force: bool) -> anyhow::Result<()> {
    match target {
        OutputTarget::Stdout => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(contents.as_bytes())
                .context("write script to stdout")?;
            stdout.flush().context("flush stdout")?;
        }
        OutputTarget::File(path) => {
            let mut options = std::fs::OpenOptions::new();
            options.write(true);
            if force {
                options.create(true).truncate(true);
            } else {
                options.create_new(true);
            }
            let mut file = options
                .open(path)
                .with_context(|| format!("open {} for writing", path.display()))?;
            file.write_all(contents.as_bytes())
                .with_context(|| format!("write {}", path.display()))?;
        }
    }
    Ok(())
}
