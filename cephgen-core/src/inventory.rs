// vim: tw=80
//! Read-only access to a parsed cluster inventory
//!
//! The inventory is kept as the YAML tree it was parsed from.  Sections are
//! only decoded into typed structs when they are looked up, so a missing or
//! malformed key is reported against the lookup that needed it.

use std::{fs, path::Path, str::FromStr};

use serde_derive::Deserialize;
use serde_yaml_ng::{Mapping, Value};

use crate::types::*;

/// Tag in `reference-architecture` for a storage-only cluster
pub const CEPH_STANDALONE: &str = "ceph-standalone";
/// Storage network used by a standalone Ceph cluster
pub const STANDALONE_STORAGE_NETWORK: &str = "ceph-public-storage";
/// Storage network used when Ceph backs an OpenStack cloud
pub const OPENSTACK_STORAGE_NETWORK: &str = "openstack-stg";
/// Optional dedicated network for OSD replication traffic
pub const REPLICATION_NETWORK: &str = "ceph-replication";

/// `domain-settings` key listing the OSD data devices
pub const OSD_DEVICE_KEY: &str = "osd-devices";
/// `domain-settings` key listing the shared journal devices
pub const JOURNAL_DEVICE_KEY: &str = "journal-devices";

/// Role served by the Ceph monitors.  Also the legacy template name.
pub const DEFAULT_MON_ROLE: &str = "controllers";
/// Role served by the OSD nodes.  Also the legacy template name.
pub const DEFAULT_OSD_ROLE: &str = "ceph-osd";

const NETWORKS: &str = "networks";
const NODE_TEMPLATES: &str = "node-templates";
const NODES: &str = "nodes";
const REFERENCE_ARCHITECTURE: &str = "reference-architecture";
const DEPLOYMENT_ENVIRONMENT: &str = "deployment-environment";
const DOMAIN_SETTINGS: &str = "domain-settings";

/// One entry of the `networks` section
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct Network {
    /// Network address in CIDR notation
    pub addr:     Option<String>,
    pub bridge:   Option<String>,
    pub eth_port: Option<String>,
    pub bond:     Option<String>,
}

impl Network {
    /// The interface the Ceph monitors should listen on.
    ///
    /// A bridge is preferred over a physical port, which is preferred over a
    /// bond.
    pub fn interface(&self) -> Option<&str> {
        self.bridge.as_deref()
            .or(self.eth_port.as_deref())
            .or(self.bond.as_deref())
    }
}

/// One entry of the `node-templates` section
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct NodeTemplate {
    /// The template's own name.  Filled in on lookup.
    #[serde(skip)]
    pub name:            String,
    /// Roles served by nodes built from this template.  When absent, the
    /// template serves only the role with the same name as the template.
    pub roles:           Option<Vec<String>>,
    pub domain_settings: Option<Mapping>,
}

impl NodeTemplate {
    /// Does this template serve `role`?
    pub fn serves(&self, role: &str) -> bool {
        match &self.roles {
            Some(roles) => roles.iter().any(|r| r == role),
            None => self.name == role
        }
    }

    /// Look up a device list in the template's `domain-settings`
    pub fn devices(&self, key: &str) -> Result<Option<Vec<String>>> {
        self.domain_settings.as_ref()
            .and_then(|ds| ds.get(key))
            .map(|v| serde_yaml_ng::from_value(v.clone()))
            .transpose()
            .map_err(Error::from)
    }

    /// Like [`devices`](Self::devices), but the list must be present.
    pub fn require_devices(&self, key: &str) -> Result<Vec<String>> {
        self.devices(key)?.ok_or_else(|| {
            Error::missing([NODE_TEMPLATES, self.name.as_str(), DOMAIN_SETTINGS,
                            key])
        })
    }
}

/// Check that every template carries the same `device_key` list.
///
/// The lists must agree in length, order and content.  A template lacking the
/// list only agrees with other templates that lack it too.
pub fn validate_device_lists(templates: &[NodeTemplate], device_key: &str)
    -> Result<()>
{
    let mut lists = templates.iter().map(|t| t.devices(device_key));
    let first = match lists.next() {
        Some(l) => l?,
        None => return Ok(())
    };
    for list in lists {
        if list? != first {
            return Err(Error::InvalidDeviceList(device_key.to_owned()));
        }
    }
    Ok(())
}

/// A parsed cluster inventory
#[derive(Clone, Debug, PartialEq)]
pub struct Inventory {
    root: Value,
}

impl Inventory {
    /// Read and parse the inventory file at `path`
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| {
            Error::ReadInventory { path: path.to_owned(), source }
        })?;
        text.parse()
    }

    /// Wrap an already-parsed YAML tree
    pub fn from_value(root: Value) -> Self {
        Inventory { root }
    }

    fn section(&self, key: &str) -> Option<&Mapping> {
        self.root.get(key).and_then(Value::as_mapping)
    }

    /// The `reference-architecture` tags.  Empty if the inventory has none.
    pub fn reference_architecture(&self) -> Vec<&str> {
        self.root.get(REFERENCE_ARCHITECTURE)
            .and_then(Value::as_sequence)
            .map(|tags| tags.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Is this a storage-only cluster, with no OpenStack cloud on top?
    pub fn is_standalone(&self) -> bool {
        self.reference_architecture().contains(&CEPH_STANDALONE)
    }

    /// The free-form `deployment-environment` map, if any
    pub fn deployment_environment(&self) -> Option<&Mapping> {
        self.section(DEPLOYMENT_ENVIRONMENT)
    }

    /// Name of the network Ceph's clients and monitors talk over
    pub fn storage_network_name(&self) -> &'static str {
        if self.is_standalone() {
            STANDALONE_STORAGE_NETWORK
        } else {
            OPENSTACK_STORAGE_NETWORK
        }
    }

    /// Name of the node record field holding a node's storage address
    pub fn address_field(&self) -> String {
        format!("{}-addr", self.storage_network_name())
    }

    /// Look up one entry of the `networks` section, if present
    pub fn get_network(&self, name: &str) -> Result<Option<Network>> {
        self.section(NETWORKS)
            .and_then(|nets| nets.get(name))
            .map(|v| serde_yaml_ng::from_value(v.clone()))
            .transpose()
            .map_err(Error::from)
    }

    /// Look up one entry of the `networks` section, which must be present
    pub fn network(&self, name: &str) -> Result<Network> {
        self.get_network(name)?
            .ok_or_else(|| Error::missing([NETWORKS, name]))
    }

    /// The storage network's entry
    pub fn storage_network(&self) -> Result<Network> {
        self.network(self.storage_network_name())
    }

    /// The dedicated replication network's entry, if the cluster has one
    pub fn replication_network(&self) -> Result<Option<Network>> {
        self.get_network(REPLICATION_NETWORK)
    }

    /// Look up one entry of the `node-templates` section
    pub fn template(&self, name: &str) -> Result<NodeTemplate> {
        let v = self.section(NODE_TEMPLATES)
            .and_then(|tmpls| tmpls.get(name))
            .ok_or_else(|| Error::missing([NODE_TEMPLATES, name]))?;
        let mut template: NodeTemplate =
            serde_yaml_ng::from_value(v.clone())?;
        template.name = name.to_owned();
        Ok(template)
    }

    /// The node records built from `template`.  Empty if there are none.
    pub fn nodes(&self, template: &str) -> &[Value] {
        self.section(NODES)
            .and_then(|nodes| nodes.get(template))
            .and_then(Value::as_sequence)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Names of all templates that serve `role`, in declaration order.
    ///
    /// Every entry of `node-templates` is considered first.  Then, for
    /// inventories that predate `node-templates`, any key of `nodes` with no
    /// matching template is treated as a template that serves only the role
    /// of the same name.
    #[tracing::instrument(skip(self))]
    pub fn templates_for_role(&self, role: &str) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let declared = self.section(NODE_TEMPLATES);
        if let Some(tmpls) = declared {
            for name in tmpls.keys().filter_map(Value::as_str) {
                if self.template(name)?.serves(role) {
                    names.push(name.to_owned());
                }
            }
        }
        let legacy = self.section(NODES)
            .map(|nodes| nodes.keys().filter_map(Value::as_str))
            .into_iter()
            .flatten()
            .filter(|name| !declared.is_some_and(|t| t.contains_key(*name)))
            .filter(|name| *name == role);
        names.extend(legacy.map(str::to_owned));
        tracing::debug!(?names, "resolved role");
        Ok(names)
    }

    /// Like [`templates_for_role`](Self::templates_for_role), but returns the
    /// decoded templates.  Every one must be declared in `node-templates`.
    pub fn role_templates(&self, role: &str) -> Result<Vec<NodeTemplate>> {
        self.templates_for_role(role)?
            .iter()
            .map(|name| self.template(name))
            .collect()
    }

    /// Storage addresses of every node serving `role`.
    ///
    /// Addresses are ordered by template, then by each template's node list.
    #[tracing::instrument(skip(self))]
    pub fn addresses_for_role(&self, role: &str) -> Result<Vec<String>> {
        let field = self.address_field();
        let mut addrs = Vec::new();
        for template in self.templates_for_role(role)? {
            for (i, node) in self.nodes(&template).iter().enumerate() {
                let addr = node.get(field.as_str())
                    .and_then(Value::as_str)
                    .ok_or_else(|| {
                        let idx = i.to_string();
                        Error::missing([NODES, template.as_str(),
                                        idx.as_str(), field.as_str()])
                    })?;
                addrs.push(addr.to_owned());
            }
        }
        Ok(addrs)
    }

    /// Total number of OSD data devices in the cluster
    pub fn osd_count(&self, role: &str) -> Result<u64> {
        let mut count = 0;
        for template in self.role_templates(role)? {
            let devices = template.require_devices(OSD_DEVICE_KEY)?.len();
            let nodes = self.nodes(&template.name).len();
            count += (devices * nodes) as u64;
        }
        Ok(count)
    }

    /// Check that every template serving `role` has the same `device_key`
    /// list.  See [`validate_device_lists`].
    pub fn validate_device_lists(&self, role: &str, device_key: &str)
        -> Result<()>
    {
        validate_device_lists(&self.role_templates(role)?, device_key)
    }
}

impl FromStr for Inventory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let root: Value = serde_yaml_ng::from_str(s)?;
        Ok(Inventory::from_value(root))
    }
}

// LCOV_EXCL_STOP
