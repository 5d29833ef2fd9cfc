//! Local mirror of one open board.
//!
//! The mirror is seeded from a [`BoardSnapshot`] and then driven by
//! [`BoardEvent`]s. Its list and task sequences are the client's display
//! order: seeded in `(position, id)` order, edited in place by updates, and
//! speculatively rearranged by drags.
//!
//! Every merge is keyed by identity, so applying the same event twice leaves
//! the mirror as applying it once did.

use taskboard_core::activity::ACTIVITY_FEED_LIMIT;
use taskboard_core::board::{Activity, Board, BoardSnapshot, List, PresenceUser, Task};
use taskboard_core::position::{sort_by_position, Position};
use taskboard_core::protocol::BoardEvent;
use taskboard_core::types::DbId;

#[derive(Debug, Clone)]
pub struct BoardMirror {
    board: Board,
    lists: Vec<List>,
    tasks: Vec<Task>,
    present_users: Vec<PresenceUser>,
    /// Newest first, at most [`ACTIVITY_FEED_LIMIT`] entries.
    activities: Vec<Activity>,
}

impl BoardMirror {
    pub fn from_snapshot(snapshot: BoardSnapshot) -> Self {
        let BoardSnapshot {
            board,
            mut lists,
            mut tasks,
            mut activities,
        } = snapshot;

        sort_by_position(&mut lists);
        sort_by_position(&mut tasks);
        activities.truncate(ACTIVITY_FEED_LIMIT);

        Self {
            board,
            lists,
            tasks,
            present_users: Vec::new(),
            activities,
        }
    }

    // -- accessors ----------------------------------------------------------

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_id(&self) -> DbId {
        self.board.id
    }

    pub fn lists(&self) -> &[List] {
        &self.lists
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn present_users(&self) -> &[PresenceUser] {
        &self.present_users
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn list(&self, id: DbId) -> Option<&List> {
        self.lists.iter().find(|l| l.id == id)
    }

    pub fn task(&self, id: DbId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Tasks of one list in display order.
    pub fn tasks_in(&self, list_id: DbId) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.list_id == list_id).collect()
    }

    /// A task's list and its index among that list's tasks.
    pub fn task_slot(&self, task_id: DbId) -> Option<(DbId, usize)> {
        let task = self.task(task_id)?;
        let index = self
            .tasks
            .iter()
            .filter(|t| t.list_id == task.list_id)
            .position(|t| t.id == task_id)?;
        Some((task.list_id, index))
    }

    pub fn list_index(&self, list_id: DbId) -> Option<usize> {
        self.lists.iter().position(|l| l.id == list_id)
    }

    // -- event merge --------------------------------------------------------

    /// Merge one broadcast event.
    ///
    /// Events for another board are ignored and return `false`.
    pub fn apply(&mut self, board_id: DbId, event: BoardEvent) -> bool {
        if board_id != self.board.id {
            tracing::debug!(board_id, mirror = self.board.id, "Ignoring event for another board");
            return false;
        }

        match event {
            BoardEvent::ListCreated(list) => self.insert_list(list),
            BoardEvent::ListUpdated(list) => self.replace_list(list),
            BoardEvent::ListDeleted(id) => self.remove_list(id),
            BoardEvent::TaskCreated(task) => self.insert_task(task),
            BoardEvent::TaskUpdated(task) => self.upsert_task(task),
            BoardEvent::TaskDeleted(id) => self.remove_task(id),
            BoardEvent::PresenceUpdate(users) => self.present_users = users,
            BoardEvent::ActivityLogged(activity) => self.push_activity(activity),
        }
        true
    }

    /// Append a list unless one with the same id is already present.
    pub fn insert_list(&mut self, list: List) {
        if self.list(list.id).is_none() {
            self.lists.push(list);
        }
    }

    /// Replace a list in place. Unknown lists are ignored.
    pub fn replace_list(&mut self, list: List) {
        if let Some(slot) = self.lists.iter_mut().find(|l| l.id == list.id) {
            *slot = list;
        }
    }

    /// Remove a list together with the tasks it contained.
    pub fn remove_list(&mut self, list_id: DbId) {
        self.lists.retain(|l| l.id != list_id);
        self.tasks.retain(|t| t.list_id != list_id);
    }

    /// Append a task unless one with the same id is already present.
    pub fn insert_task(&mut self, task: Task) {
        if self.task(task.id).is_none() {
            self.tasks.push(task);
        }
    }

    /// Replace a task in place, or append it if this is the first time the
    /// mirror sees it.
    pub fn upsert_task(&mut self, task: Task) {
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(slot) => *slot = task,
            None => self.tasks.push(task),
        }
    }

    pub fn remove_task(&mut self, task_id: DbId) {
        self.tasks.retain(|t| t.id != task_id);
    }

    /// Prepend to the feed, keeping the newest [`ACTIVITY_FEED_LIMIT`].
    pub fn push_activity(&mut self, activity: Activity) {
        if self.activities.iter().any(|a| a.id == activity.id) {
            return;
        }
        self.activities.insert(0, activity);
        self.activities.truncate(ACTIVITY_FEED_LIMIT);
    }

    // -- speculative edits --------------------------------------------------

    /// Move a task into `list_id` so that it becomes the `index`-th task of
    /// that list. An index past the end places it last.
    ///
    /// Returns `false` if the task is not in the mirror.
    pub fn place_task(&mut self, task_id: DbId, list_id: DbId, index: usize) -> bool {
        let Some(from) = self.tasks.iter().position(|t| t.id == task_id) else {
            return false;
        };
        let mut task = self.tasks.remove(from);
        task.list_id = list_id;

        let siblings: Vec<usize> = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.list_id == list_id)
            .map(|(i, _)| i)
            .collect();
        let at = match siblings.get(index) {
            Some(&i) => i,
            None => siblings.last().map_or(self.tasks.len(), |&i| i + 1),
        };
        self.tasks.insert(at, task);
        true
    }

    /// Record the position a task was persisted with.
    pub fn set_task_position(&mut self, task_id: DbId, position: Position) {
        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == task_id) {
            task.position = position;
        }
    }

    /// Move a list to `index` in the column order. An index past the end
    /// places it last.
    pub fn place_list(&mut self, list_id: DbId, index: usize) -> bool {
        let Some(from) = self.list_index(list_id) else {
            return false;
        };
        let list = self.lists.remove(from);
        let at = index.min(self.lists.len());
        self.lists.insert(at, list);
        true
    }
}
