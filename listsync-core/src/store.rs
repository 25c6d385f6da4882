//! Pure snapshot transformations
//!
//! Every operation takes the current [`Snapshot`] by reference and returns
//! a new one. Callers never mutate collections in place; an async caller
//! holding a stale snapshot can therefore never corrupt the next state.
//!
//! Invariants maintained by every operation:
//! - a list id appears in exactly one of {pending, incomplete, completed}
//! - permission entries are dropped together with their lists, and new
//!   entries are inserted before the list becomes readable from a
//!   collection
//! - `incomplete` and `completed` stay in canonical order: name,
//!   case-insensitive, with the list type as stable secondary key

use crate::model::{List, ListId, Permission, Snapshot};

/// Sort a collection into canonical order
///
/// Case-insensitive by name, list type as secondary key so same-named
/// lists of different types order deterministically.
pub fn canonical_order(lists: &mut Vec<List>) {
    lists.sort_by(|a, b| {
        let an = a.name.to_lowercase();
        let bn = b.name.to_lowercase();
        an.cmp(&bn).then_with(|| a.list_type.cmp(&b.list_type))
    });
}

fn contains(ids: &[ListId], id: &str) -> bool {
    ids.iter().any(|i| i == id)
}

/// Accept pending invitations
///
/// Each accepted list leaves `pending` and lands in `completed` or
/// `incomplete` according to its own `completed` flag.
pub fn apply_accept(snap: &Snapshot, ids: &[ListId]) -> Snapshot {
    let mut next = snap.clone();
    let (accepted, remaining): (Vec<List>, Vec<List>) =
        next.pending.into_iter().partition(|l| contains(ids, &l.id));
    next.pending = remaining;
    for list in accepted {
        if list.completed {
            next.completed.push(list);
        } else {
            next.incomplete.push(list);
        }
    }
    canonical_order(&mut next.incomplete);
    canonical_order(&mut next.completed);
    next
}

/// Reject pending invitations
///
/// Rejected lists vanish from the user's view entirely, permission
/// entries included.
pub fn apply_reject(snap: &Snapshot, ids: &[ListId]) -> Snapshot {
    let mut next = snap.clone();
    next.pending.retain(|l| !contains(ids, &l.id));
    for id in ids {
        next.permissions.remove(id);
    }
    next
}

/// Remove lists from `incomplete` and `completed`
///
/// Covers both the owner's destructive delete and a collaborator's
/// unshare; locally the effect is identical.
pub fn apply_remove(snap: &Snapshot, ids: &[ListId]) -> Snapshot {
    let mut next = snap.clone();
    next.incomplete.retain(|l| !contains(ids, &l.id));
    next.completed.retain(|l| !contains(ids, &l.id));
    for id in ids {
        next.permissions.remove(id);
    }
    next
}

/// Move lists from `incomplete` to `completed`, flagging them completed
pub fn apply_complete(snap: &Snapshot, ids: &[ListId]) -> Snapshot {
    let mut next = snap.clone();
    let (done, remaining): (Vec<List>, Vec<List>) = next
        .incomplete
        .into_iter()
        .partition(|l| contains(ids, &l.id));
    next.incomplete = remaining;
    for mut list in done {
        list.completed = true;
        next.completed.push(list);
    }
    canonical_order(&mut next.completed);
    next
}

/// Flag completed lists as refreshed
///
/// Applied optimistically before the refresh requests fire, so the
/// refreshed marker shows while the requests are still outstanding.
pub fn mark_refreshed(snap: &Snapshot, ids: &[ListId]) -> Snapshot {
    let mut next = snap.clone();
    for list in next.completed.iter_mut() {
        if contains(ids, &list.id) {
            list.refreshed = true;
        }
    }
    next
}

/// Insert refresh results: new incomplete lists cloned from completed ones
///
/// The permission entry is written before the list joins the collection;
/// the completed originals stay untouched as history.
pub fn apply_refresh(snap: &Snapshot, new_lists: &[List]) -> Snapshot {
    let mut next = snap.clone();
    for list in new_lists {
        next.permissions.insert(list.id.clone(), Permission::Write);
        next.incomplete.push(list.clone());
    }
    canonical_order(&mut next.incomplete);
    next
}

/// Replace merged source lists with the merge result
///
/// Source ids are removed from whichever collection held them, their
/// permission entries dropped, and the merged list inserted into
/// `incomplete` with a `write` grant set first. When `completed_only_view`
/// is set the incomplete collection is deliberately left untouched (the
/// view showing it is not mounted).
pub fn apply_merge(
    snap: &Snapshot,
    source_ids: &[ListId],
    merged: &List,
    completed_only_view: bool,
) -> Snapshot {
    let mut next = apply_remove(snap, source_ids);
    next.permissions
        .insert(merged.id.clone(), Permission::Write);
    if !completed_only_view {
        next.incomplete.push(merged.clone());
        canonical_order(&mut next.incomplete);
    }
    next
}

/// Insert a newly created list
///
/// Creation always lands in `incomplete` with a `write` grant.
pub fn apply_create(snap: &Snapshot, list: &List) -> Snapshot {
    let mut next = snap.clone();
    next.permissions.insert(list.id.clone(), Permission::Write);
    next.incomplete.push(list.clone());
    canonical_order(&mut next.incomplete);
    next
}

/// Apply an edited list returned by the server
///
/// The list is re-homed by its `completed` flag, so an edit that flips
/// completion also moves the list between collections.
pub fn apply_edit(snap: &Snapshot, updated: &List) -> Snapshot {
    let mut next = snap.clone();
    next.incomplete.retain(|l| l.id != updated.id);
    next.completed.retain(|l| l.id != updated.id);
    if updated.completed {
        next.completed.push(updated.clone());
        canonical_order(&mut next.completed);
    } else {
        next.incomplete.push(updated.clone());
        canonical_order(&mut next.incomplete);
    }
    next
}

/// Verify the cross-collection invariants, returning the first violation
///
/// Test helper; production paths maintain the invariants by construction.
pub fn check_invariants(snap: &Snapshot) -> Result<(), String> {
    let mut seen = std::collections::HashSet::new();
    for list in snap
        .pending
        .iter()
        .chain(snap.incomplete.iter())
        .chain(snap.completed.iter())
    {
        if !seen.insert(list.id.clone()) {
            return Err(format!("list {} appears in more than one collection", list.id));
        }
        if !snap.permissions.contains_key(&list.id) {
            return Err(format!("list {} has no permission entry", list.id));
        }
    }
    Ok(())
}
