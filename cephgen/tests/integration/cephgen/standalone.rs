use assert_cmd::prelude::*;
use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};

use super::super::util::Harness;

const INVENTORY: &str = r"
reference-architecture: [ceph-standalone]
networks:
  ceph-public-storage:
    addr: 172.26.244.0/22
    eth-port: eth11
  ceph-replication:
    addr: 172.27.244.0/22
    eth-port: eth12
node-templates:
  controllers: {}
  ceph-osd:
    domain-settings:
      osd-devices: [/dev/sdb, /dev/sdc]
nodes:
  controllers:
    - ceph-public-storage-addr: 172.26.244.2
  ceph-osd:
    - ceph-public-storage-addr: 172.26.244.5
    - ceph-public-storage-addr: 172.26.244.6
";

#[fixture]
fn harness() -> Harness {
    Harness::new(concat!(module_path!(), "."), INVENTORY)
}

#[rstest]
fn generate(harness: Harness) {
    harness.cmd().assert().success();

    assert_eq!("[mons]\n172.26.244.2\n\n[osds]\n172.26.244.5\n172.26.244.6",
               harness.read("ceph-hosts"));

    let all = harness.read_yaml("group_vars/all");
    assert_eq!(Some("eth11"), all["monitor_interface"].as_str());
    assert_eq!(Some("172.26.244.0/22"), all["public_network"].as_str());
    assert_eq!(Some("172.27.244.0/22"), all["cluster_network"].as_str());
    assert_eq!(Some(false), all["delete_default_pool"].as_bool());
    assert!(all.get("openstack_pools").is_none());

    let osds = harness.read_yaml("group_vars/osds");
    assert_eq!(Some(true), osds["journal_collocation"].as_bool());
    assert!(osds.get("raw_journal_devices").is_none());
}

/// A standalone cluster may still opt into the OpenStack variables
#[rstest]
fn openstack_forced(harness: Harness) {
    harness.cmd()
        .args(["--openstack", "true"])
        .assert()
        .success();
    let all = harness.read_yaml("group_vars/all");
    assert_eq!(3, all["openstack_pools"].as_sequence().unwrap().len());
    assert_eq!(Some(16), all["openstack_glance_pool"]["pg_num"].as_u64());
    assert_eq!(Some(64), all["openstack_cinder_pool"]["pg_num"].as_u64());
}
