// vim: tw=80
//! Cluster-wide ceph-ansible variables (`group_vars/all`)

use std::collections::BTreeMap;

use serde_derive::Serialize;
use serde_yaml_ng::Value;

use crate::{
    inventory::{Inventory, DEFAULT_OSD_ROLE, REPLICATION_NETWORK},
    pg,
    types::*,
};

/// A flat map of ceph-ansible variables, sorted by name
pub type Vars = BTreeMap<String, Value>;

/// A constant variable value
#[derive(Clone, Copy, Debug)]
enum Setting {
    Bool(bool),
    Int(u64),
    Str(&'static str),
    StrList(&'static [&'static str]),
}

impl From<Setting> for Value {
    fn from(s: Setting) -> Self {
        match s {
            Setting::Bool(b) => Value::Bool(b),
            Setting::Int(i) => Value::Number(i.into()),
            Setting::Str(s) => Value::String(s.to_owned()),
            Setting::StrList(l) =>
                Value::Sequence(l.iter().map(|&s| s.into()).collect()),
        }
    }
}

/// Variables that are the same for every cluster
const BASELINE: &[(&str, Setting)] = &[
    ("ceph_stable_uca", Setting::Bool(true)),
    ("ceph_stable_openstack_release_uca", Setting::Str("newton")),
    ("ceph_stable_repo_uca",
     Setting::Str("http://ubuntu-cloud.archive.canonical.com/ubuntu")),
    ("ceph_stable_release_uca",
     Setting::Str("{{ ansible_lsb.codename }}-updates/\
                   {{ ceph_stable_openstack_release_uca }}")),
    ("debian_ceph_packages", Setting::StrList(&["ceph", "ceph-common"])),
    ("generate_fsid", Setting::Bool(true)),
    ("journal_size", Setting::Int(10240)),
    ("nfs_file_gw", Setting::Bool(false)),
];

/// Cephx capabilities for the OpenStack service clients
const OPENSTACK_KEYS: &[(&str, &str)] = &[
    ("client.glance",
     "mon 'allow r' osd 'allow class-read object_prefix rbd_children, \
      allow rwx pool={{ openstack_glance_pool.name }}'"),
    ("client.cinder",
     "mon 'allow r' osd 'allow class-read object_prefix rbd_children, \
      allow rwx pool={{ openstack_cinder_pool.name }}, \
      allow rwx pool={{ openstack_nova_pool.name }}, \
      allow rwx pool={{ openstack_glance_pool.name }}'"),
];

/// Pools ceph-ansible should create for OpenStack
const OPENSTACK_POOLS: &[&str] = &[
    "{{ openstack_glance_pool }}",
    "{{ openstack_cinder_pool }}",
    "{{ openstack_nova_pool }}",
];

/// Value of `cluster_network` when there is no dedicated replication network
pub const PUBLIC_NETWORK_REF: &str = "{{ public_network }}";

/// Every variable that only exists when integrating with OpenStack
pub const OPENSTACK_VARS: &[&str] = &[
    "openstack_cinder_pool",
    "openstack_config",
    "openstack_glance_pool",
    "openstack_keys",
    "openstack_nova_pool",
    "openstack_pools",
];

/// Settings that control variable generation
#[derive(Clone, Debug, PartialEq)]
pub struct VarsOptions {
    /// Expected growth of the OSD count, in percent.  100 means no growth.
    pub growth_factor:   u32,
    /// Percent of the cluster's data that lives in the `vms` pool
    pub vms_percent:     u32,
    /// Percent of the cluster's data that lives in the `images` pool
    pub images_percent:  u32,
    /// Percent of the cluster's data that lives in the `volumes` pool
    pub volumes_percent: u32,
    /// Generate the OpenStack integration variables
    pub openstack:       bool,
    /// Role whose nodes run OSDs
    pub osd_role:        String,
}

impl Default for VarsOptions {
    fn default() -> Self {
        VarsOptions {
            growth_factor: 100,
            vms_percent: 25,
            images_percent: 15,
            volumes_percent: 60,
            openstack: true,
            osd_role: DEFAULT_OSD_ROLE.to_owned(),
        }
    }
}

/// An OpenStack pool definition
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Pool {
    pub name:   &'static str,
    pub pg_num: u64,
}

impl Pool {
    fn new(name: &'static str, osds: u64, percent: u32, growth_factor: u32)
        -> Self
    {
        let percent_data = f64::from(percent) / 100.0;
        let pg_num = pg::pg_count(osds, percent_data, growth_factor);
        Pool { name, pg_num }
    }
}

/// The three OpenStack pools, keyed by variable name
pub fn openstack_pools(osds: u64, opts: &VarsOptions)
    -> Vec<(&'static str, Pool)>
{
    let g = opts.growth_factor;
    vec![
        ("openstack_glance_pool",
         Pool::new("images", osds, opts.images_percent, g)),
        ("openstack_nova_pool", Pool::new("vms", osds, opts.vms_percent, g)),
        ("openstack_cinder_pool",
         Pool::new("volumes", osds, opts.volumes_percent, g)),
    ]
}

fn baseline() -> Vars {
    BASELINE.iter()
        .map(|&(k, v)| (k.to_owned(), Value::from(v)))
        .collect()
}

fn openstack_keys() -> Value {
    OPENSTACK_KEYS.iter()
        .map(|&(name, value)| {
            let mut key = serde_yaml_ng::Mapping::new();
            key.insert("name".into(), name.into());
            key.insert("value".into(), value.into());
            Value::Mapping(key)
        })
        .collect::<Vec<_>>()
        .into()
}

fn to_value<T: serde::Serialize>(t: &T) -> Result<Value> {
    serde_yaml_ng::to_value(t)
        .map_err(|source| Error::Serialize { name: "group_vars/all", source })
}

/// Build the cluster-wide variables for `inv`
#[tracing::instrument(skip(inv))]
pub fn all_vars(inv: &Inventory, opts: &VarsOptions) -> Result<Vars> {
    let mut vars = baseline();

    let storage_net = inv.storage_network()?;
    let net_name = inv.storage_network_name();
    let iface = storage_net.interface().ok_or_else(|| {
        Error::missing(["networks", net_name, "bridge|eth-port|bond"])
    })?;
    vars.insert("monitor_interface".to_owned(), iface.into());
    vars.insert("delete_default_pool".to_owned(), opts.openstack.into());

    if opts.openstack {
        vars.insert("openstack_config".to_owned(), true.into());
        vars.insert("openstack_keys".to_owned(), openstack_keys());
        let pools = OPENSTACK_POOLS.iter()
            .map(|&p| Value::from(p))
            .collect::<Vec<_>>();
        vars.insert("openstack_pools".to_owned(), pools.into());

        let osds = inv.osd_count(&opts.osd_role)?;
        tracing::debug!(osds, "sizing OpenStack pools");
        for (var, pool) in openstack_pools(osds, opts) {
            tracing::info!(pool = pool.name, pg_num = pool.pg_num,
                           "sized pool");
            vars.insert(var.to_owned(), to_value(&pool)?);
        }
    }

    let public = storage_net.addr
        .ok_or_else(|| Error::missing(["networks", net_name, "addr"]))?;
    let cluster = match inv.replication_network()? {
        Some(net) => net.addr.ok_or_else(|| {
            Error::missing(["networks", REPLICATION_NETWORK, "addr"])
        })?,
        None => PUBLIC_NETWORK_REF.to_owned()
    };
    vars.insert("public_network".to_owned(), public.into());
    vars.insert("cluster_network".to_owned(), cluster.into());
    Ok(vars)
}

// LCOV_EXCL_STOP
