use std::{
    fs,
    path::{Path, PathBuf},
    process::Command,
};

use assert_cmd::prelude::*;
use serde_yaml_ng::Value;
use tempfile::{Builder, TempDir};

pub fn cephgen() -> Command {
    Command::cargo_bin("cephgen").unwrap()
}

/// A scratch directory holding an inventory file, with room for output
pub struct Harness {
    pub tempdir:   TempDir,
    pub inventory: PathBuf,
}

impl Harness {
    pub fn new(prefix: &str, inventory: &str) -> Self {
        let tempdir = Builder::new()
            .prefix(prefix)
            .tempdir()
            .unwrap();
        let path = tempdir.path().join("inventory.yml");
        fs::write(&path, inventory).unwrap();
        Harness { tempdir, inventory: path }
    }

    pub fn root(&self) -> &Path {
        self.tempdir.path()
    }

    /// A `cephgen` command reading this harness's inventory and writing to its
    /// directory
    pub fn cmd(&self) -> Command {
        let mut cmd = cephgen();
        cmd.arg("--inventory")
            .arg(&self.inventory)
            .arg("--output-directory")
            .arg(self.root());
        cmd
    }

    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.root().join(rel)).unwrap()
    }

    pub fn read_yaml(&self, rel: &str) -> Value {
        serde_yaml_ng::from_str(&self.read(rel)).unwrap()
    }
}
