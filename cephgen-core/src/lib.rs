// vim: tw=80
//! Generate ceph-ansible input from a cluster inventory
//!
//! The inventory describes networks, node templates and the nodes built from
//! them.  From it this crate derives the cluster-wide variables
//! (`group_vars/all`), the per-OSD-node device variables (`group_vars/osds`)
//! and the monitor/OSD host list (`ceph-hosts`).

pub mod generate;
pub mod hosts;
pub mod inventory;
pub mod journal;
pub mod osds;
pub mod pg;
pub mod types;
pub mod vars;

pub use crate::{
    generate::{GenerateOptions, Generated},
    inventory::Inventory,
    types::*,
};
