//! End-to-end process harness: an isolated data/config directory per test,
//! and a thin wrapper over `assert_cmd` that captures stdout/stderr/status.

use assert_cmd::Command;

pub struct CellarWorkspace {
    pub dir: tempfile::TempDir,
}

impl CellarWorkspace {
    pub fn new() -> Self {
        CellarWorkspace {
            dir: tempfile::tempdir().expect("create workspace tempdir"),
        }
    }

    fn data_dir(&self) -> std::path::PathBuf {
        self.dir.path().join("data")
    }

    fn config_dir(&self) -> std::path::PathBuf {
        self.dir.path().join("config")
    }
}

pub struct Output {
    pub status: std::process::ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl Output {
    pub fn success(&self) -> bool {
        self.status.success()
    }
}

/// Runs the `cellar` binary with `args` against `workspace`'s isolated
/// data/config directories.
pub fn run_cellar<I, S>(workspace: &CellarWorkspace, args: I) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
{
    let mut cmd = Command::cargo_bin("cellar").expect("locate cellar binary");
    cmd.args(args)
        .env("CELLAR_DATA_DIR", workspace.data_dir())
        .env("CELLAR_CONFIG_DIR", workspace.config_dir());

    let output = cmd.output().expect("run cellar");
    Output {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    }
}
