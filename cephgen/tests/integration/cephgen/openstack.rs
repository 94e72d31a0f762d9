use assert_cmd::prelude::*;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};
use serde_yaml_ng::Value;

use super::super::util::Harness;

const INVENTORY: &str = r"
reference-architecture: [private-compute-cloud]
networks:
  openstack-stg:
    addr: 172.29.244.0/22
    bridge: br-storage
node-templates:
  controllers: {}
  ceph-osd:
    domain-settings:
      osd-devices: [/dev/sdc, /dev/sdd, /dev/sde, /dev/sdf, /dev/sdg, /dev/sdh,
                    /dev/sdi, /dev/sdj, /dev/sdk, /dev/sdl, /dev/sdm, /dev/sdn]
      journal-devices: [/dev/sda, /dev/sdb]
nodes:
  controllers:
    - hostname: controller1
      openstack-stg-addr: 172.29.244.2
    - hostname: controller2
      openstack-stg-addr: 172.29.244.3
  ceph-osd:
    - hostname: ceph-osd1
      openstack-stg-addr: 172.29.244.5
    - hostname: ceph-osd2
      openstack-stg-addr: 172.29.244.6
    - hostname: ceph-osd3
      openstack-stg-addr: 172.29.244.7
";

#[fixture]
fn harness() -> Harness {
    Harness::new(concat!(module_path!(), "."), INVENTORY)
}

#[rstest]
fn hosts(harness: Harness) {
    harness.cmd().assert().success();
    assert_eq!("[mons]\n172.29.244.2\n172.29.244.3\n\n\
                [osds]\n172.29.244.5\n172.29.244.6\n172.29.244.7",
               harness.read("ceph-hosts"));
}

/// Every written path is printed on stdout
#[rstest]
fn prints_paths(harness: Harness) {
    harness.cmd()
        .assert()
        .success()
        .stdout(predicate::str::contains("group_vars/all"))
        .stdout(predicate::str::contains("group_vars/osds"))
        .stdout(predicate::str::contains("ceph-hosts"));
}

#[rstest]
fn all_vars(harness: Harness) {
    harness.cmd().assert().success();
    let all = harness.read_yaml("group_vars/all");
    assert_eq!(Some("br-storage"), all["monitor_interface"].as_str());
    assert_eq!(Some("172.29.244.0/22"), all["public_network"].as_str());
    assert_eq!(Some("{{ public_network }}"), all["cluster_network"].as_str());
    assert_eq!(Some(true), all["openstack_config"].as_bool());
    assert_eq!(Some(true), all["delete_default_pool"].as_bool());
    assert_eq!(Some(10240), all["journal_size"].as_u64());
    assert_eq!(2, all["openstack_keys"].as_sequence().unwrap().len());
    assert_eq!(3, all["openstack_pools"].as_sequence().unwrap().len());
}

/// 36 OSDs with no growth
#[rstest]
fn pool_sizes(harness: Harness) {
    harness.cmd().assert().success();
    let all = harness.read_yaml("group_vars/all");
    let pg_num = |pool: &str| all[pool]["pg_num"].as_u64().unwrap();
    assert_eq!(256, pg_num("openstack_glance_pool"));
    assert_eq!(256, pg_num("openstack_nova_pool"));
    assert_eq!(1024, pg_num("openstack_cinder_pool"));
    assert_eq!(Some("images"), all["openstack_glance_pool"]["name"].as_str());
    assert_eq!(Some("vms"), all["openstack_nova_pool"]["name"].as_str());
    assert_eq!(Some("volumes"), all["openstack_cinder_pool"]["name"].as_str());
}

#[rstest]
fn growth_factor(harness: Harness) {
    harness.cmd()
        .args(["--growth-factor", "300"])
        .assert()
        .success();
    let all = harness.read_yaml("group_vars/all");
    assert_eq!(Some(1024), all["openstack_nova_pool"]["pg_num"].as_u64());
}

#[rstest]
fn osd_vars(harness: Harness) {
    harness.cmd().assert().success();
    let osds = harness.read_yaml("group_vars/osds");
    assert_eq!(12, osds["devices"].as_sequence().unwrap().len());
    assert_eq!(Some(true), osds["raw_multi_journal"].as_bool());
    assert!(osds.get("journal_collocation").is_none());
    let journals: Vec<&str> = osds["raw_journal_devices"]
        .as_sequence()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    let mut expected = vec!["/dev/sda"; 6];
    expected.extend(["/dev/sdb"; 6]);
    assert_eq!(expected, journals);
}

#[rstest]
fn openstack_disabled(harness: Harness) {
    harness.cmd()
        .args(["--openstack", "false"])
        .assert()
        .success();
    let all = harness.read_yaml("group_vars/all");
    let map = all.as_mapping().unwrap();
    for key in ["openstack_config", "openstack_keys", "openstack_pools",
                "openstack_glance_pool", "openstack_nova_pool",
                "openstack_cinder_pool"]
    {
        assert!(!map.contains_key(key), "{key} should be absent");
    }
    assert_eq!(Value::Bool(false), all["delete_default_pool"]);
}

/// The older underscore-separated option names still work
#[rstest]
fn underscore_aliases(harness: Harness) {
    let mut cmd = super::super::cephgen();
    cmd.arg("--inventory_file")
        .arg(&harness.inventory)
        .arg("--output_directory")
        .arg(harness.root())
        .args(["--growth_factor", "200"])
        .assert()
        .success();
    let all = harness.read_yaml("group_vars/all");
    assert_eq!(Some(512), all["openstack_glance_pool"]["pg_num"].as_u64());
}
