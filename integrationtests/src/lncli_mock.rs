use std::{
    fs,
    os::unix::fs::PermissionsExt,
    path::{Path, PathBuf},
    sync::OnceLock,
};

use tempfile::TempDir;

/// Invoice printed by the `add_invoice` mock
pub const MOCK_INVOICE: &str = "lnbc500u1p0...";

/// Json printed by the `payment_error` mock before it exits with 1
pub const MOCK_PAYMENT_ERROR: &str = r#"{"payment_error":"unable to find a path to destination"}"#;

const SLOW_FINISHED: &str = "slow-finished";

/// Shell scripts standing in for lncli.
///
/// They are written once per test binary. Call [`scripts`] before spawning
/// any process, otherwise a concurrent fork can still hold a write handle on a
/// script and exec fails with ETXTBSY.
pub struct MockLncliScripts {
    dir: TempDir,
}

static SCRIPTS: OnceLock<MockLncliScripts> = OnceLock::new();

pub fn scripts() -> &'static MockLncliScripts {
    SCRIPTS.get_or_init(|| MockLncliScripts::create().expect("could not write mock lncli scripts"))
}

impl MockLncliScripts {
    fn create() -> anyhow::Result<Self> {
        let dir = tempfile::tempdir()?;
        write_script(dir.path(), "echo-args", r#"printf '%s\n' "$@""#)?;
        write_script(
            dir.path(),
            "add-invoice",
            &format!("printf '%s' '{MOCK_INVOICE}'"),
        )?;
        write_script(
            dir.path(),
            "payment-error",
            &format!("printf '%s' '{MOCK_PAYMENT_ERROR}'\nexit 1"),
        )?;
        write_script(dir.path(), "hang", "exec sleep 30")?;
        write_script(
            dir.path(),
            "slow-finish",
            &format!("sleep 2\ntouch \"$(dirname \"$0\")/{SLOW_FINISHED}\""),
        )?;
        Ok(Self { dir })
    }

    /// prints every argument on its own line
    pub fn echo_args(&self) -> PathBuf {
        self.dir.path().join("echo-args")
    }

    pub fn add_invoice(&self) -> PathBuf {
        self.dir.path().join("add-invoice")
    }

    pub fn payment_error(&self) -> PathBuf {
        self.dir.path().join("payment-error")
    }

    pub fn hang(&self) -> PathBuf {
        self.dir.path().join("hang")
    }

    /// sleeps 2s, then touches [`MockLncliScripts::slow_finished_marker`]
    pub fn slow_finish(&self) -> PathBuf {
        self.dir.path().join("slow-finish")
    }

    pub fn slow_finished_marker(&self) -> PathBuf {
        self.dir.path().join(SLOW_FINISHED)
    }

    pub fn missing(&self) -> PathBuf {
        self.dir.path().join("does-not-exist")
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

fn write_script(dir: &Path, name: &str, body: &str) -> anyhow::Result<()> {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n"))?;
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
    Ok(())
}
