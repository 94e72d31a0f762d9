// vim: tw=80
//! The ceph-ansible host list (`ceph-hosts`)

use crate::{inventory::Inventory, types::*};

/// Render the host list: a `[mons]` section and an `[osds]` section, one
/// address per line, separated by a blank line.  There is no trailing newline.
pub fn render<S: AsRef<str>>(mons: &[S], osds: &[S]) -> String {
    let mut lines = vec!["[mons]"];
    lines.extend(mons.iter().map(AsRef::as_ref));
    lines.push("");
    lines.push("[osds]");
    lines.extend(osds.iter().map(AsRef::as_ref));
    lines.join("\n")
}

/// Build the host list for the nodes serving `mon_role` and `osd_role`
pub fn hosts_file(inv: &Inventory, mon_role: &str, osd_role: &str)
    -> Result<String>
{
    let mons = inv.addresses_for_role(mon_role)?;
    let osds = inv.addresses_for_role(osd_role)?;
    tracing::debug!(mons = mons.len(), osds = osds.len(), "collected hosts");
    Ok(render(&mons, &osds))
}

// LCOV_EXCL_STOP
