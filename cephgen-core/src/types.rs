// vim: tw=80
//! Common type definitions used throughout cephgen

use std::{io, path::PathBuf};

use thiserror::Error;

/// cephgen's error type.
///
/// Every error is terminal for the current invocation.  Nothing is retried and
/// no partial output is cleaned up.
#[derive(Debug, Error)]
pub enum Error {
    /// The inventory file could not be read at all
    #[error("Cannot read inventory {}: {source}", .path.display())]
    ReadInventory {
        path:   PathBuf,
        source: io::Error,
    },

    /// The inventory is not well-formed YAML, or a section has the wrong
    /// shape
    #[error("{0}")]
    Parse(#[source] serde_yaml_ng::Error),

    /// A key the generator needs is absent from the inventory.  The payload
    /// is the dotted path of the missing key.
    #[error("Inventory has no value for {0}")]
    MissingKey(String),

    /// The named device list differs between the templates that serve the
    /// storage role.
    #[error("The device list {0} does not contain the same set of devices \
             across all of the OSD nodes.")]
    InvalidDeviceList(String),

    /// An output document could not be rendered as YAML
    #[error("Cannot render {name}: {source}")]
    Serialize {
        name:   &'static str,
        source: serde_yaml_ng::Error,
    },

    /// An output file could not be written
    #[error("Cannot write {}: {source}", .path.display())]
    Write {
        path:   PathBuf,
        source: io::Error,
    },
}

impl Error {
    /// Helper to construct a `MissingKey` from its path components
    pub fn missing<I, S>(path: I) -> Self
        where I: IntoIterator<Item = S>,
              S: AsRef<str>
    {
        let parts = path.into_iter()
            .map(|s| s.as_ref().to_owned())
            .collect::<Vec<_>>();
        Error::MissingKey(parts.join("."))
    }
}

impl From<serde_yaml_ng::Error> for Error {
    fn from(e: serde_yaml_ng::Error) -> Self {
        Error::Parse(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

// LCOV_EXCL_STOP
