//! Assignee set helpers.
//!
//! A task's assignees are a set: order follows first appearance, and a user
//! appears at most once.

use crate::types::DbId;

/// Drop repeated ids, keeping the first occurrence of each.
pub fn dedup_assignees(ids: &[DbId]) -> Vec<DbId> {
    let mut out = Vec::with_capacity(ids.len());
    for &id in ids {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}

/// The assignee set after toggling `user_id`: removed if present, appended
/// otherwise.
pub fn toggle_assignee(current: &[DbId], user_id: DbId) -> Vec<DbId> {
    let current = dedup_assignees(current);
    if current.contains(&user_id) {
        current.into_iter().filter(|&id| id != user_id).collect()
    } else {
        let mut next = current;
        next.push(user_id);
        next
    }
}
