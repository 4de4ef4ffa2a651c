//! Command helper methods for Test.

use super::{Test, KEY_SOURCE_VARS};
use assert_cmd::Command;
use std::process::Output;

impl Test {
    /// Create a strongbox command with an isolated environment.
    ///
    /// Returns a Command configured with:
    /// - key-source variables cleared, then STRONGBOX_KEY set if the test has a key
    /// - NO_COLOR set so output is plain
    /// - Current directory set to the test directory
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("strongbox").expect("failed to find strongbox binary");
        for var in KEY_SOURCE_VARS {
            cmd.env_remove(var);
        }
        cmd.env_remove("STRONGBOX_LOG");
        cmd.env("NO_COLOR", "1");
        if let Some(key) = &self.key {
            cmd.env("STRONGBOX_KEY", key);
        }
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// Shortcut for `strongbox set` command.
    pub fn set(&self, name: &str, value: &str) -> Output {
        self.cmd()
            .args(["set", name, value])
            .output()
            .expect("failed to run strongbox set")
    }

    /// Shortcut for `strongbox get` command.
    pub fn get(&self, name: &str) -> Output {
        self.cmd()
            .args(["get", name])
            .output()
            .expect("failed to run strongbox get")
    }

    /// Shortcut for `strongbox get --json` command.
    pub fn get_json(&self, name: &str) -> Output {
        self.cmd()
            .args(["get", name, "--json"])
            .output()
            .expect("failed to run strongbox get --json")
    }

    /// Shortcut for `strongbox encrypt` command.
    pub fn encrypt(&self, value: &str) -> Output {
        self.cmd()
            .args(["encrypt", value])
            .output()
            .expect("failed to run strongbox encrypt")
    }

    /// Shortcut for `strongbox decrypt` command.
    pub fn decrypt(&self, token: &str) -> Output {
        self.cmd()
            .args(["decrypt", token])
            .output()
            .expect("failed to run strongbox decrypt")
    }

    /// Shortcut for `strongbox list` command.
    pub fn list(&self) -> Output {
        self.cmd()
            .arg("list")
            .output()
            .expect("failed to run strongbox list")
    }

    /// Shortcut for `strongbox list --json` command.
    pub fn list_json(&self) -> Output {
        self.cmd()
            .args(["list", "--json"])
            .output()
            .expect("failed to run strongbox list --json")
    }
}
