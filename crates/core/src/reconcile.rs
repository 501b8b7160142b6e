use providers::PoolMembership;
use std::collections::{BTreeSet, HashSet};
use storage::models::GroupDescriptor;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Desired groups the photo is not in yet, sorted by group id.
    pub candidates: Vec<String>,
    /// Desired groups the photo is already in.
    pub already_member: usize,
}

pub fn reconcile(desired: &[GroupDescriptor], memberships: &[PoolMembership]) -> Reconciliation {
    let joined: HashSet<&str> = memberships.iter().map(|m| m.id.as_str()).collect();
    let wanted: BTreeSet<&str> = desired.iter().map(|d| d.group_id.as_str()).collect();

    let mut result = Reconciliation::default();
    for group_id in wanted {
        if joined.contains(group_id) {
            result.already_member += 1;
        } else {
            result.candidates.push(group_id.to_string());
        }
    }
    result
}
