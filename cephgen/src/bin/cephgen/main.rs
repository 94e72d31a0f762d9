use std::{path::PathBuf, process::exit};

use cephgen_core::{
    inventory::{DEFAULT_MON_ROLE, DEFAULT_OSD_ROLE},
    GenerateOptions,
    Generated,
    Inventory,
    Result,
};
use clap::{crate_version, Parser};
use tracing_subscriber::EnvFilter;

const GROWTH_FACTOR_HELP: &str = "\
How much the Ceph cluster is expected to grow in the foreseeable future.
Example values:
100 - the number of disks in the cluster is not expected to increase
200 - the number of disks in the cluster is expected to double
300 - the number of disks is expected to grow between 2X and 3X";

#[derive(Parser, Clone, Debug)]
#[clap(version = crate_version!(), arg_required_else_help = true)]
/// Generate ceph-ansible input files from a cluster inventory file.
struct Cli {
    /// The path to the inventory file
    #[clap(long, alias = "inventory_file")]
    inventory:            PathBuf,
    /// The root of the output directory.  This is typically the root of
    /// ceph-ansible.
    #[clap(long, alias = "output_directory")]
    output_directory:     PathBuf,
    #[clap(long, alias = "growth_factor", default_value_t = 100,
           long_help = GROWTH_FACTOR_HELP)]
    /// Expected growth of the cluster's disk count, in percent
    growth_factor:        u32,
    /// Percentage of the cluster data held by the virtual machines pool
    #[clap(long, alias = "vms_pool_percent", default_value_t = 25)]
    vms_pool_percent:     u32,
    /// Percentage of the cluster data held by the images pool
    #[clap(long, alias = "images_pool_percent", default_value_t = 15)]
    images_pool_percent:  u32,
    /// Percentage of the cluster data held by the volumes pool
    #[clap(long, alias = "volumes_pool_percent", default_value_t = 60)]
    volumes_pool_percent: u32,
    /// Generate the OpenStack integration variables.  The default is to
    /// generate them unless the inventory's reference architecture is
    /// ceph-standalone.
    #[clap(long)]
    openstack:            Option<bool>,
    /// Role served by the Ceph monitor nodes
    #[clap(long, default_value = DEFAULT_MON_ROLE)]
    mon_role:             String,
    /// Role served by the Ceph OSD nodes
    #[clap(long, default_value = DEFAULT_OSD_ROLE)]
    osd_role:             String,
    /// Fail unless every OSD node template has the same device lists
    #[clap(long)]
    check_devices:        bool,
}

impl Cli {
    fn options(&self, inv: &Inventory) -> GenerateOptions {
        let defaults = GenerateOptions::for_inventory(inv);
        GenerateOptions {
            growth_factor: self.growth_factor,
            vms_percent: self.vms_pool_percent,
            images_percent: self.images_pool_percent,
            volumes_percent: self.volumes_pool_percent,
            openstack: self.openstack.unwrap_or(defaults.openstack),
            mon_role: self.mon_role.clone(),
            osd_role: self.osd_role.clone(),
            check_devices: self.check_devices,
        }
    }

    fn main(self) -> Result<()> {
        let inv = Inventory::from_path(&self.inventory)?;
        let opts = self.options(&inv);
        let generated = Generated::new(&inv, &opts)?;
        for path in generated.write(&self.output_directory)? {
            println!("{}", path.display());
        }
        Ok(())
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let cli: Cli = Cli::parse();
    if let Err(e) = cli.main() {
        eprintln!("Error: {e}");
        exit(1);
    }
}
