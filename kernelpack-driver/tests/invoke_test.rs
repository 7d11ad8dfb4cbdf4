// SPDX-License-Identifier: Apache-2.0

use std::path::Path;
use std::process::{Command, Output};

use kernelpack_test_helpers::ConfigFixture;
use pretty_assertions::assert_eq;
use test_case::test_case;

const SIMPLE_CONFIG: &str = r#"{
    "buses": {"m_axi_gmem": ["m_axi", null]},
    "params": {"scalars": {"n": 32}, "memory": {"in": "m_axi_gmem"}}
}"#;

/// Runs the driver with `cwd` as its working directory.
fn run_driver(cwd: &Path, args: &[&str]) -> Output {
    let command_path = env!("CARGO_BIN_EXE_kernelpack-driver");
    Command::new(command_path)
        .current_dir(cwd)
        .args(args)
        .output()
        .expect("Failed to run kernelpack-driver")
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "stdout: {}\nstderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

fn assert_failure_mentions(output: &Output, want: &str) {
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains(want), "stderr: {}", stderr);
}

fn expected_script(config_json: &str) -> String {
    let config = kernelpack::KernelConfig::from_json_str(config_json).unwrap();
    kernelpack::generate_from_config(&config)
}

#[test]
fn test_package_writes_default_output() {
    let fixture = ConfigFixture::new(SIMPLE_CONFIG);
    let output = run_driver(fixture.dir(), &["package", "kernel.json"]);
    assert_success(&output);
    let script = std::fs::read_to_string(fixture.dir().join("package_kernel.tcl")).unwrap();
    assert_eq!(script, expected_script(SIMPLE_CONFIG));
}

#[test_case("-o"; "short flag")]
#[test_case("--output"; "long flag")]
fn test_package_explicit_output(flag: &str) {
    let fixture = ConfigFixture::new(SIMPLE_CONFIG);
    let output = run_driver(fixture.dir(), &["package", "kernel.json", flag, "my_kernel.tcl"]);
    assert_success(&output);
    assert!(fixture.dir().join("my_kernel.tcl").exists());
    assert!(!fixture.dir().join("package_kernel.tcl").exists());
}

#[test]
fn test_package_to_stdout() {
    let fixture = ConfigFixture::new(SIMPLE_CONFIG);
    let output = run_driver(fixture.dir(), &["package", "kernel.json", "-o", "-"]);
    assert_success(&output);
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        expected_script(SIMPLE_CONFIG)
    );
}

#[test]
fn test_package_refuses_to_overwrite() {
    let fixture = ConfigFixture::new(SIMPLE_CONFIG);
    let out_path = fixture.dir().join("package_kernel.tcl");
    std::fs::write(&out_path, "keep me").unwrap();
    let output = run_driver(fixture.dir(), &["package", "kernel.json"]);
    assert_failure_mentions(&output, "already exists");
    assert_eq!(std::fs::read_to_string(&out_path).unwrap(), "keep me");
}

#[test_case("-f"; "short flag")]
#[test_case("--force"; "long flag")]
fn test_package_force_overwrites(flag: &str) {
    let fixture = ConfigFixture::new(SIMPLE_CONFIG);
    let out_path = fixture.dir().join("package_kernel.tcl");
    std::fs::write(&out_path, "stale").unwrap();
    let output = run_driver(fixture.dir(), &["package", "kernel.json", flag]);
    assert_success(&output);
    assert_eq!(
        std::fs::read_to_string(&out_path).unwrap(),
        expected_script(SIMPLE_CONFIG)
    );
}

#[test]
fn test_package_missing_config() {
    let fixture = ConfigFixture::new(SIMPLE_CONFIG);
    let output = run_driver(fixture.dir(), &["package", "no_such_kernel.json"]);
    assert_failure_mentions(&output, "kernel config file does not exist");
    assert!(!fixture.dir().join("package_kernel.tcl").exists());
}

#[test]
fn test_package_malformed_config() {
    let fixture = ConfigFixture::new(r#"{"params": {}}"#);
    let output = run_driver(fixture.dir(), &["package", "kernel.json"]);
    assert_failure_mentions(&output, "missing field `buses`");
}

#[test]
fn test_strict_rejects_undeclared_bus() {
    let config = r#"{"buses": {}, "params": {"memory": {"in": "gmem"}}}"#;
    let fixture = ConfigFixture::new(config);

    let output = run_driver(
        fixture.dir(),
        &["package", "kernel.json", "--strict", "true"],
    );
    assert_failure_mentions(&output, "references undeclared bus `gmem`");
    assert!(!fixture.dir().join("package_kernel.tcl").exists());

    // Without validation the script is generated as-is.
    let output = run_driver(fixture.dir(), &["package", "kernel.json"]);
    assert_success(&output);
}

#[test]
fn test_settings_file_in_working_directory() {
    let fixture = ConfigFixture::new(SIMPLE_CONFIG);
    std::fs::write(
        fixture.dir().join("kernelpack.toml"),
        "[package]\noutput = \"from_settings.tcl\"\nclock_freq_hz = 300000000\n",
    )
    .unwrap();
    let output = run_driver(fixture.dir(), &["package", "kernel.json"]);
    assert_success(&output);
    let script = std::fs::read_to_string(fixture.dir().join("from_settings.tcl")).unwrap();
    assert!(script.contains("set_property value 300000000 $clkbifparam"));
}

#[test]
fn test_clock_freq_flag_overrides_settings() {
    let fixture = ConfigFixture::new(SIMPLE_CONFIG);
    let settings_path = fixture.dir().join("custom.toml");
    std::fs::write(&settings_path, "[package]\nclock_freq_hz = 300000000\n").unwrap();
    let output = run_driver(
        fixture.dir(),
        &[
            "--settings",
            settings_path.to_str().unwrap(),
            "package",
            "kernel.json",
            "-o",
            "-",
            "--clock_freq_hz",
            "150000000",
        ],
    );
    assert_success(&output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("set_property value 150000000 $clkbifparam"));
    assert!(!stdout.contains("300000000"));
}

#[test]
fn test_missing_settings_file() {
    let fixture = ConfigFixture::new(SIMPLE_CONFIG);
    let output = run_driver(
        fixture.dir(),
        &["--settings", "nope.toml", "package", "kernel.json"],
    );
    assert_failure_mentions(&output, "settings file does not exist");
}

#[test]
fn test_malformed_cwd_settings_only_affects_commands_that_read_them() {
    let fixture = ConfigFixture::new(SIMPLE_CONFIG);
    std::fs::write(fixture.dir().join("kernelpack.toml"), "[package\nstrict = ").unwrap();

    let output = run_driver(fixture.dir(), &["version"]);
    assert_success(&output);
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        env!("CARGO_PKG_VERSION")
    );

    let output = run_driver(fixture.dir(), &["package", "kernel.json"]);
    assert_failure_mentions(&output, "invalid settings file");
    assert!(!fixture.dir().join("package_kernel.tcl").exists());

    let output = run_driver(fixture.dir(), &["address-map", "kernel.json"]);
    assert_failure_mentions(&output, "invalid settings file");
}

#[test]
fn test_address_map_json() {
    let fixture = ConfigFixture::new(SIMPLE_CONFIG);
    let output = run_driver(fixture.dir(), &["address-map", "kernel.json"]);
    assert_success(&output);
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["registers"][0]["name"], "n");
    assert_eq!(report["registers"][0]["offset"], 0x10);
    assert_eq!(report["registers"][1]["name"], "in");
    assert_eq!(report["registers"][1]["offset"], 0x18);
    assert_eq!(report["registers"][1]["bus"], "m_axi_gmem");
    assert_eq!(report["control"].as_array().unwrap().len(), 4);
}

#[test]
fn test_version_subcommand() {
    let fixture = ConfigFixture::new(SIMPLE_CONFIG);
    let output = run_driver(fixture.dir(), &["version"]);
    assert_success(&output);
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        env!("CARGO_PKG_VERSION")
    );
}
