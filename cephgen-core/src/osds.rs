// vim: tw=80
//! Per-OSD-node ceph-ansible variables (`group_vars/osds`)

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_derive::Serialize;

use crate::{
    inventory::{Inventory, JOURNAL_DEVICE_KEY, OSD_DEVICE_KEY},
    journal,
    types::*,
};

/// Where each OSD keeps its journal
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum JournalLayout {
    /// Each OSD's journal shares the OSD's own device
    Collocated,
    /// OSDs journal on dedicated devices.  One entry per OSD, naming its
    /// journal device.
    Dedicated(Vec<String>),
}

impl Serialize for JournalLayout {
    fn serialize<S: Serializer>(&self, serializer: S)
        -> std::result::Result<S::Ok, S::Error>
    {
        match self {
            JournalLayout::Collocated => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("journal_collocation", &true)?;
                map.end()
            }
            JournalLayout::Dedicated(journals) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("raw_journal_devices", journals)?;
                map.serialize_entry("raw_multi_journal", &true)?;
                map.end()
            }
        }
    }
}

/// Contents of `group_vars/osds`
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct OsdVars {
    /// OSD data devices, identical on every OSD node
    pub devices: Vec<String>,
    #[serde(flatten)]
    pub journal: JournalLayout,
}

impl OsdVars {
    /// Lay out the OSDs of a node, journaling on `journals` if given
    pub fn new(devices: Vec<String>, journals: Option<Vec<String>>)
        -> Result<Self>
    {
        let journal = match journals {
            None => JournalLayout::Collocated,
            Some(j) if j.is_empty() && !devices.is_empty() => {
                return Err(
                    Error::InvalidDeviceList(JOURNAL_DEVICE_KEY.to_owned()));
            }
            Some(j) =>
                JournalLayout::Dedicated(journal::distribute(&j, devices.len()))
        };
        Ok(OsdVars { devices, journal })
    }
}

/// Build the OSD variables from the first template that serves `role`.
#[tracing::instrument(skip(inv))]
pub fn osd_vars(inv: &Inventory, role: &str) -> Result<OsdVars> {
    let templates = inv.role_templates(role)?;
    let template = templates.first()
        .ok_or_else(|| Error::missing(["node-templates", role]))?;
    if templates.len() > 1 {
        tracing::debug!(template = %template.name,
                        "using the first of {} OSD templates", templates.len());
    }
    let devices = template.require_devices(OSD_DEVICE_KEY)?;
    let journals = template.devices(JOURNAL_DEVICE_KEY)?;
    OsdVars::new(devices, journals)
}

// LCOV_EXCL_STOP
