use super::*;

use crate::sorter;

impl Dashboard {
    /// Column header click. Reorders the canonical user list in place.
    pub fn sort_users(&mut self, key: &str) -> SortState {
        let applied = sorter::sort_users(&mut self.snapshot.users, key, &mut self.sort_state);
        tracing::info!(key = %applied.key, direction = ?applied.direction, "user table sorted");
        self.record(DashboardChange::UsersSorted(applied.clone()));
        applied
    }

    /// Close button on a notification. Unknown or already removed ids are ignored.
    pub fn dismiss_notification(&mut self, id: u64) -> bool {
        let dismissed = self.notifications.dismiss(id);
        if dismissed {
            self.record(DashboardChange::NotificationRemoved { id });
        }
        dismissed
    }
}
