use crate::db::models::{ItemId, ListId, Snapshot, TodoItem, TodoList, User};
use crate::db::snapshot;
use crate::error::HubError;
use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, error, info};

/// Authoritative in-memory collections, persisted as a full snapshot after
/// every mutation.
///
/// Reads hold the shared lock for the duration of one read. Mutations hold the
/// exclusive lock across the change and the synchronous file write. Each
/// mutation is applied to a draft copy which only replaces the live state once
/// the file write has succeeded.
pub struct TodoStore {
    data: RwLock<Snapshot>,
    path: PathBuf,
}

impl TodoStore {
    /// Load the snapshot at `path`, or start empty if the file does not exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, HubError> {
        let path = path.into();
        let data = snapshot::load(&path)?;
        info!(
            path = %path.display(),
            lists = data.todo_lists.len(),
            users = data.users.len(),
            "store opened"
        );
        Ok(Self {
            data: RwLock::new(data),
            path,
        })
    }

    /// Assign the next list ID, append and persist. Returns the assigned ID.
    pub fn create_list(&self, mut list: TodoList) -> Result<ListId, HubError> {
        self.commit(|data| {
            list.id = data.todo_lists.iter().map(|l| l.id).max().unwrap_or(0) + 1;
            let id = list.id;
            data.todo_lists.push(list);
            Ok(id)
        })
    }

    /// Includes soft-deleted lists; filtering is the caller's job.
    pub fn get_list(&self, id: ListId) -> Result<TodoList, HubError> {
        self.read()?
            .todo_lists
            .iter()
            .find(|l| l.id == id)
            .cloned()
            .ok_or(HubError::NotFound("todo list"))
    }

    pub fn get_all_lists(&self) -> Result<Vec<TodoList>, HubError> {
        Ok(self.read()?.todo_lists.clone())
    }

    /// Replace the stored list with the same ID wholesale.
    pub fn update_list(&self, list: TodoList) -> Result<(), HubError> {
        self.commit(|data| {
            let slot = find_list_mut(data, list.id)?;
            *slot = list;
            Ok(())
        })
    }

    /// Atomic read-modify-write of one list.
    ///
    /// `f` runs under the exclusive lock against a draft of the list. The draft
    /// is persisted and published only when `f` returns `Ok`.
    pub fn modify_list<T>(
        &self,
        id: ListId,
        f: impl FnOnce(&mut TodoList) -> Result<T, HubError>,
    ) -> Result<T, HubError> {
        self.commit(|data| f(find_list_mut(data, id)?))
    }

    /// Append `item` to the list named by `item.todo_list_id` with the next
    /// per-list item ID. Returns the stored item.
    pub fn create_item(&self, item: TodoItem) -> Result<TodoItem, HubError> {
        self.commit(|data| Ok(find_list_mut(data, item.todo_list_id)?.append_item(item)))
    }

    pub fn get_item(&self, list_id: ListId, item_id: ItemId) -> Result<TodoItem, HubError> {
        self.read()?
            .todo_lists
            .iter()
            .find(|l| l.id == list_id)
            .and_then(|l| l.todo_items.iter().find(|i| i.id == item_id))
            .cloned()
            .ok_or(HubError::NotFound("todo item"))
    }

    pub fn update_item(&self, list_id: ListId, item: TodoItem) -> Result<(), HubError> {
        self.commit(|data| {
            let slot = data
                .todo_lists
                .iter_mut()
                .find(|l| l.id == list_id)
                .and_then(|l| l.item_mut(item.id))
                .ok_or(HubError::NotFound("todo item"))?;
            *slot = item;
            Ok(())
        })
    }

    pub fn get_users(&self) -> Result<Vec<User>, HubError> {
        Ok(self.read()?.users.clone())
    }

    /// Append `user` with the next user ID and persist.
    pub fn add_user(&self, mut user: User) -> Result<User, HubError> {
        self.commit(|data| {
            user.id = data.users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
            data.users.push(user.clone());
            Ok(user)
        })
    }

    /// Like `add_user`, but fails with InvalidInput when the username is
    /// already stored. The check and the append share one write lock.
    pub fn add_unique_user(&self, user: User) -> Result<User, HubError> {
        self.commit(|data| {
            if data.users.iter().any(|u| u.username == user.username) {
                return Err(HubError::invalid_input("username is already taken"));
            }
            let mut user = user;
            user.id = data.users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
            data.users.push(user.clone());
            Ok(user)
        })
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Snapshot>, HubError> {
        self.data.read().map_err(|_| HubError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Snapshot>, HubError> {
        self.data.write().map_err(|_| HubError::LockPoisoned)
    }

    fn commit<T>(
        &self,
        f: impl FnOnce(&mut Snapshot) -> Result<T, HubError>,
    ) -> Result<T, HubError> {
        let mut guard = self.write()?;
        let mut draft = guard.clone();
        let out = f(&mut draft)?;
        if let Err(e) = snapshot::save(&self.path, &draft) {
            error!(path = %self.path.display(), error = %e, "failed to persist snapshot");
            return Err(e.into());
        }
        *guard = draft;
        debug!(path = %self.path.display(), "snapshot persisted");
        Ok(out)
    }
}

fn find_list_mut(data: &mut Snapshot, id: ListId) -> Result<&mut TodoList, HubError> {
    data.todo_lists
        .iter_mut()
        .find(|l| l.id == id)
        .ok_or(HubError::NotFound("todo list"))
}
