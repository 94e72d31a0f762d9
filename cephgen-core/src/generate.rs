// vim: tw=80
//! Generate and write all of ceph-ansible's input files in one pass

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    hosts,
    inventory::{
        Inventory,
        DEFAULT_MON_ROLE,
        DEFAULT_OSD_ROLE,
        JOURNAL_DEVICE_KEY,
        OSD_DEVICE_KEY,
    },
    osds::{self, OsdVars},
    types::*,
    vars::{self, Vars, VarsOptions},
};

/// Output path of the cluster-wide variables, relative to the output root
pub const ALL_VARS_PATH: &str = "group_vars/all";
/// Output path of the OSD variables, relative to the output root
pub const OSD_VARS_PATH: &str = "group_vars/osds";
/// Output path of the host list, relative to the output root
pub const HOSTS_PATH: &str = "ceph-hosts";

/// Everything that controls a generator run, apart from the inventory itself
#[derive(Clone, Debug, PartialEq)]
pub struct GenerateOptions {
    /// Expected growth of the OSD count, in percent.  100 means no growth.
    pub growth_factor:   u32,
    pub vms_percent:     u32,
    pub images_percent:  u32,
    pub volumes_percent: u32,
    /// Generate the OpenStack integration variables
    pub openstack:       bool,
    /// Role whose nodes run the Ceph monitors
    pub mon_role:        String,
    /// Role whose nodes run OSDs
    pub osd_role:        String,
    /// Require every OSD template to have identical device lists
    pub check_devices:   bool,
}

impl GenerateOptions {
    /// Default options for `inv`.
    ///
    /// OpenStack integration is on unless the inventory is for a standalone
    /// Ceph cluster.
    pub fn for_inventory(inv: &Inventory) -> Self {
        GenerateOptions {
            openstack: !inv.is_standalone(),
            ..Default::default()
        }
    }

    fn vars_options(&self) -> VarsOptions {
        VarsOptions {
            growth_factor: self.growth_factor,
            vms_percent: self.vms_percent,
            images_percent: self.images_percent,
            volumes_percent: self.volumes_percent,
            openstack: self.openstack,
            osd_role: self.osd_role.clone(),
        }
    }
}

impl Default for GenerateOptions {
    fn default() -> Self {
        let v = VarsOptions::default();
        GenerateOptions {
            growth_factor: v.growth_factor,
            vms_percent: v.vms_percent,
            images_percent: v.images_percent,
            volumes_percent: v.volumes_percent,
            openstack: v.openstack,
            mon_role: DEFAULT_MON_ROLE.to_owned(),
            osd_role: DEFAULT_OSD_ROLE.to_owned(),
            check_devices: false,
        }
    }
}

/// The three generated documents, ready to write
#[derive(Clone, Debug, PartialEq)]
pub struct Generated {
    /// Contents of `group_vars/all`
    pub all_vars: Vars,
    /// Contents of `group_vars/osds`
    pub osd_vars: OsdVars,
    /// Contents of `ceph-hosts`
    pub hosts:    String,
}

impl Generated {
    /// Compute every output document for `inv`
    #[tracing::instrument(skip(inv))]
    pub fn new(inv: &Inventory, opts: &GenerateOptions) -> Result<Self> {
        let pct = u64::from(opts.vms_percent) + u64::from(opts.images_percent)
            + u64::from(opts.volumes_percent);
        if opts.openstack && pct != 100 {
            tracing::warn!("Pool percentages add up to {pct}, not 100");
        }
        if opts.check_devices {
            inv.validate_device_lists(&opts.osd_role, OSD_DEVICE_KEY)?;
            inv.validate_device_lists(&opts.osd_role, JOURNAL_DEVICE_KEY)?;
        }
        if let Some(env) = inv.deployment_environment() {
            tracing::debug!(entries = env.len(),
                            "ignoring deployment-environment");
        }

        let all_vars = vars::all_vars(inv, &opts.vars_options())?;
        let osd_vars = osds::osd_vars(inv, &opts.osd_role)?;
        let hosts = hosts::hosts_file(inv, &opts.mon_role, &opts.osd_role)?;
        Ok(Generated { all_vars, osd_vars, hosts })
    }

    /// Write every document beneath `root`, creating `group_vars` if needed.
    ///
    /// Returns the paths written, in order.
    pub fn write<P: AsRef<Path>>(&self, root: P) -> Result<Vec<PathBuf>> {
        let root = root.as_ref();
        let all = serde_yaml_ng::to_string(&self.all_vars).map_err(|source| {
            Error::Serialize { name: ALL_VARS_PATH, source }
        })?;
        let osds = serde_yaml_ng::to_string(&self.osd_vars).map_err(|source| {
            Error::Serialize { name: OSD_VARS_PATH, source }
        })?;

        let group_vars = root.join("group_vars");
        fs::create_dir_all(&group_vars)
            .map_err(|source| Error::Write { path: group_vars, source })?;

        let mut written = Vec::with_capacity(3);
        for (rel, contents) in [(ALL_VARS_PATH, all.as_str()),
                                (OSD_VARS_PATH, osds.as_str()),
                                (HOSTS_PATH, self.hosts.as_str())]
        {
            let path = root.join(rel);
            fs::write(&path, contents).map_err(|source| {
                Error::Write { path: path.clone(), source }
            })?;
            tracing::info!(path = %path.display(), "wrote");
            written.push(path);
        }
        Ok(written)
    }
}

/// Read the inventory at `inventory`, then generate and write all of
/// ceph-ansible's input files beneath `root`.
pub fn generate_files<P, Q>(inventory: P, root: Q, opts: &GenerateOptions)
    -> Result<Vec<PathBuf>>
    where P: AsRef<Path>,
          Q: AsRef<Path>
{
    let inv = Inventory::from_path(inventory)?;
    Generated::new(&inv, opts)?.write(root)
}

// LCOV_EXCL_STOP
