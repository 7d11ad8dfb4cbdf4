// SPDX-License-Identifier: Apache-2.0

use std::path::{Path, PathBuf};

/// Compare generated text against a golden file on disk, with an opt-in
/// update mechanism controlled by the KERNELPACK_UPDATE_GOLDEN environment
/// variable. Uses full-string equality (no trimming) since the vendor tool is
/// sensitive to every byte of the script.
pub fn compare_golden_text(got: &str, relpath: &str) {
    let _ = env_logger::builder().is_test(true).try_init();
    let golden_path = Path::new(relpath);
    if std::env::var("KERNELPACK_UPDATE_GOLDEN").is_ok()
        || !golden_path.exists()
        || golden_path.metadata().map(|m| m.len()).unwrap_or(0) == 0
    {
        log::info!(
            "compare_golden_text; writing golden file to {}",
            golden_path.display()
        );
        std::fs::write(golden_path, got).expect("write golden");
    } else {
        log::info!(
            "compare_golden_text; reading golden file from {}",
            golden_path.display()
        );
        let want = std::fs::read_to_string(golden_path).expect("read golden");
        assert_eq!(
            got, want,
            "Golden mismatch; run with KERNELPACK_UPDATE_GOLDEN=1 to update."
        );
    }
}

/// A scratch directory holding a kernel configuration file, for tests that
/// drive the CLI end to end.
pub struct ConfigFixture {
    // Held so the directory outlives the test body.
    temp_dir: tempfile::TempDir,
    config_path: PathBuf,
}

impl ConfigFixture {
    pub fn new(config_json: &str) -> Self {
        let temp_dir = tempfile::tempdir().expect("create temp dir");
        let config_path = temp_dir.path().join("kernel.json");
        std::fs::write(&config_path, config_json).expect("write kernel config");
        ConfigFixture {
            temp_dir,
            config_path,
        }
    }

    pub fn dir(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_writes_config() {
        let fixture = ConfigFixture::new("{}");
        assert_eq!(
            std::fs::read_to_string(fixture.config_path()).unwrap(),
            "{}"
        );
        assert!(fixture.config_path().starts_with(fixture.dir()));
    }

    #[test]
    fn test_compare_golden_text_matches() {
        let fixture = ConfigFixture::new("{}");
        let golden = fixture.dir().join("want.tcl");
        std::fs::write(&golden, "puts hi\n").unwrap();
        compare_golden_text("puts hi\n", golden.to_str().unwrap());
    }
}
