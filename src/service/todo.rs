use crate::db::models::{ItemId, ListId, TodoItem, TodoList, UserId};
use crate::db::store::TodoStore;
use crate::error::HubError;
use crate::types::Caller;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

/// Authorisation-aware CRUD over lists and items.
///
/// List operations check the list's owner, item operations check the item's
/// own owner, except `create_item`, which checks the parent list. Every
/// read-modify-write runs inside one `TodoStore::modify_list` call.
#[derive(Clone)]
pub struct TodoService {
    store: Arc<TodoStore>,
}

impl TodoService {
    pub fn new(store: Arc<TodoStore>) -> Self {
        Self { store }
    }

    pub fn create_list(&self, name: &str, owner: UserId) -> Result<TodoList, HubError> {
        let name = required(name, "name")?;
        let id = self
            .store
            .create_list(TodoList::new(name, owner, Utc::now()))?;
        info!(list_id = id, owner, "todo list created");
        self.store.get_list(id)
    }

    pub fn get_list(&self, id: ListId, caller: Caller) -> Result<TodoList, HubError> {
        let list = self.store.get_list(id)?;
        ensure_live_list(&list)?;
        authorize(caller, list.user_id)?;
        Ok(visible_to(list, caller))
    }

    /// Admins see every live list; everyone else only their own.
    pub fn get_all_lists(&self, caller: Caller) -> Result<Vec<TodoList>, HubError> {
        Ok(self
            .store
            .get_all_lists()?
            .into_iter()
            .filter(|l| !l.is_deleted() && caller.can_access(l.user_id))
            .map(|l| visible_to(l, caller))
            .collect())
    }

    pub fn update_list(&self, id: ListId, name: &str, caller: Caller) -> Result<TodoList, HubError> {
        let name = required(name, "name")?;
        let list = self.store.modify_list(id, |list| {
            ensure_live_list(list)?;
            authorize(caller, list.user_id)?;
            list.name = name;
            list.updated_at = Utc::now();
            Ok(list.clone())
        })?;
        info!(list_id = id, user_id = caller.user_id, "todo list renamed");
        Ok(visible_to(list, caller))
    }

    /// Soft delete. Items of the list are left as they are.
    pub fn delete_list(&self, id: ListId, caller: Caller) -> Result<(), HubError> {
        self.store.modify_list(id, |list| {
            ensure_live_list(list)?;
            authorize(caller, list.user_id)?;
            list.deleted_at = Some(Utc::now());
            Ok(())
        })?;
        info!(list_id = id, user_id = caller.user_id, "todo list deleted");
        Ok(())
    }

    pub fn create_item(
        &self,
        list_id: ListId,
        content: &str,
        caller: Caller,
    ) -> Result<TodoItem, HubError> {
        let content = required(content, "content")?;
        let item = self.store.modify_list(list_id, |list| {
            ensure_live_list(list)?;
            authorize(caller, list.user_id)?;
            let now = Utc::now();
            let item = list.append_item(TodoItem::new(list_id, caller.user_id, content, now));
            list.recompute_completion(now);
            Ok(item)
        })?;
        info!(list_id, item_id = item.id, user_id = caller.user_id, "todo item created");
        Ok(item)
    }

    pub fn update_item(
        &self,
        list_id: ListId,
        item_id: ItemId,
        content: &str,
        is_completed: bool,
        caller: Caller,
    ) -> Result<TodoItem, HubError> {
        let content = required(content, "content")?;
        let item = self.store.modify_list(list_id, |list| {
            let now = Utc::now();
            let item = live_item_mut(list, item_id, caller)?;
            item.content = content;
            item.is_completed = is_completed;
            item.updated_at = now;
            let updated = item.clone();
            list.recompute_completion(now);
            Ok(updated)
        })?;
        info!(list_id, item_id, user_id = caller.user_id, is_completed, "todo item updated");
        Ok(item)
    }

    pub fn delete_item(
        &self,
        list_id: ListId,
        item_id: ItemId,
        caller: Caller,
    ) -> Result<(), HubError> {
        self.store.modify_list(list_id, |list| {
            let now = Utc::now();
            live_item_mut(list, item_id, caller)?.deleted_at = Some(now);
            list.recompute_completion(now);
            Ok(())
        })?;
        info!(list_id, item_id, user_id = caller.user_id, "todo item deleted");
        Ok(())
    }
}

/// Rejects blank values; accepted values are stored as given.
fn required(value: &str, field: &str) -> Result<String, HubError> {
    if value.trim().is_empty() {
        return Err(HubError::invalid_input(format!("`{field}` must not be empty")));
    }
    Ok(value.to_string())
}

fn authorize(caller: Caller, owner: UserId) -> Result<(), HubError> {
    if caller.can_access(owner) {
        Ok(())
    } else {
        Err(HubError::Forbidden)
    }
}

fn ensure_live_list(list: &TodoList) -> Result<(), HubError> {
    if list.is_deleted() {
        return Err(HubError::NotFound("todo list"));
    }
    Ok(())
}

/// Resolves a live item of a live list that the caller owns (or any, for admins).
fn live_item_mut(
    list: &mut TodoList,
    item_id: ItemId,
    caller: Caller,
) -> Result<&mut TodoItem, HubError> {
    ensure_live_list(list)?;
    let list_id = list.id;
    let item = list
        .item_mut(item_id)
        .filter(|i| !i.is_deleted())
        .ok_or(HubError::NotFound("todo item"))?;
    if item.todo_list_id != list_id {
        return Err(HubError::invalid_input(
            "todo item does not belong to the specified list",
        ));
    }
    authorize(caller, item.user_id)?;
    Ok(item)
}

fn visible_to(mut list: TodoList, caller: Caller) -> TodoList {
    list.todo_items
        .retain(|i| !i.is_deleted() && (caller.is_admin() || i.user_id == caller.user_id));
    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::Role;

    const OWNER: Caller = Caller {
        user_id: 1,
        role: Role::Member,
    };
    const STRANGER: Caller = Caller {
        user_id: 5,
        role: Role::Member,
    };
    const ADMIN: Caller = Caller {
        user_id: 99,
        role: Role::Admin,
    };

    fn service() -> (tempfile::TempDir, Arc<TodoStore>, TodoService) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(TodoStore::open(dir.path().join("store.json")).unwrap());
        (dir, Arc::clone(&store), TodoService::new(store))
    }

    fn percentage(svc: &TodoService, id: ListId) -> u8 {
        svc.get_list(id, ADMIN).unwrap().completion_percentage
    }

    #[test]
    fn groceries_scenario_tracks_completion() {
        let (_dir, _store, svc) = service();

        let list = svc.create_list("Groceries", 1).unwrap();
        assert_eq!(list.id, 1);
        assert_eq!(list.completion_percentage, 0);
        assert!(list.todo_items.is_empty());

        let milk = svc.create_item(list.id, "Milk", OWNER).unwrap();
        assert_eq!(milk.id, 1);
        assert_eq!(milk.user_id, 1);
        assert_eq!(percentage(&svc, list.id), 0);

        svc.update_item(list.id, milk.id, "Milk", true, OWNER).unwrap();
        assert_eq!(percentage(&svc, list.id), 100);

        let eggs = svc.create_item(list.id, "Eggs", OWNER).unwrap();
        assert_eq!(eggs.id, 2);
        assert_eq!(percentage(&svc, list.id), 50);

        svc.delete_item(list.id, eggs.id, OWNER).unwrap();
        assert_eq!(percentage(&svc, list.id), 100);

        let visible = svc.get_list(list.id, OWNER).unwrap();
        assert_eq!(visible.todo_items.len(), 1);
        assert_eq!(visible.todo_items[0].content, "Milk");
    }

    #[test]
    fn completion_uses_floor_division() {
        let (_dir, _store, svc) = service();
        let list = svc.create_list("Three", 1).unwrap();
        for content in ["a", "b", "c"] {
            svc.create_item(list.id, content, OWNER).unwrap();
        }
        svc.update_item(list.id, 1, "a", true, OWNER).unwrap();
        assert_eq!(percentage(&svc, list.id), 33);
        svc.update_item(list.id, 2, "b", true, OWNER).unwrap();
        assert_eq!(percentage(&svc, list.id), 66);
    }

    #[test]
    fn strangers_are_forbidden_and_admins_bypass() {
        let (_dir, _store, svc) = service();
        let list = svc.create_list("Private", 7).unwrap();

        assert!(matches!(svc.get_list(list.id, STRANGER), Err(HubError::Forbidden)));
        assert!(matches!(
            svc.update_list(list.id, "Mine", STRANGER),
            Err(HubError::Forbidden)
        ));
        assert!(matches!(svc.delete_list(list.id, STRANGER), Err(HubError::Forbidden)));
        assert!(matches!(
            svc.create_item(list.id, "x", STRANGER),
            Err(HubError::Forbidden)
        ));

        assert_eq!(svc.get_list(list.id, ADMIN).unwrap().name, "Private");
        assert_eq!(
            svc.update_list(list.id, "Renamed", ADMIN).unwrap().name,
            "Renamed"
        );
    }

    #[test]
    fn forbidden_update_does_not_touch_the_list() {
        let (_dir, store, svc) = service();
        let list = svc.create_list("Private", 7).unwrap();
        let _ = svc.update_list(list.id, "Hijacked", STRANGER);
        let stored = store.get_list(list.id).unwrap();
        assert_eq!(stored.name, "Private");
        assert_eq!(stored.updated_at, list.updated_at);
    }

    #[test]
    fn item_checks_use_the_item_owner() {
        let (_dir, _store, svc) = service();
        let list = svc.create_list("Shared", 1).unwrap();
        // Admin adds an item to someone else's list; the item belongs to the admin.
        let admin_item = svc.create_item(list.id, "audit", ADMIN).unwrap();
        assert_eq!(admin_item.user_id, ADMIN.user_id);

        assert!(matches!(
            svc.update_item(list.id, admin_item.id, "mine now", true, OWNER),
            Err(HubError::Forbidden)
        ));
        assert!(matches!(
            svc.delete_item(list.id, admin_item.id, OWNER),
            Err(HubError::Forbidden)
        ));

        // The list owner does not see items owned by others.
        assert!(svc.get_list(list.id, OWNER).unwrap().todo_items.is_empty());
        assert_eq!(svc.get_list(list.id, ADMIN).unwrap().todo_items.len(), 1);
    }

    #[test]
    fn get_all_lists_filters_by_owner_and_deletion() {
        let (_dir, _store, svc) = service();
        let mine = svc.create_list("mine", 1).unwrap();
        let gone = svc.create_list("gone", 1).unwrap();
        svc.create_list("theirs", 2).unwrap();
        svc.delete_list(gone.id, OWNER).unwrap();

        let visible = svc.get_all_lists(OWNER).unwrap();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, mine.id);

        let names: Vec<_> = svc
            .get_all_lists(ADMIN)
            .unwrap()
            .into_iter()
            .map(|l| l.name)
            .collect();
        assert_eq!(names, vec!["mine", "theirs"]);
    }

    #[test]
    fn soft_deleted_list_is_not_found_but_retained() {
        let (_dir, store, svc) = service();
        let list = svc.create_list("temp", 1).unwrap();
        let item = svc.create_item(list.id, "orphan", OWNER).unwrap();
        svc.delete_list(list.id, OWNER).unwrap();

        assert!(matches!(svc.get_list(list.id, OWNER), Err(HubError::NotFound(_))));
        assert!(matches!(svc.get_list(list.id, ADMIN), Err(HubError::NotFound(_))));
        assert!(matches!(svc.delete_list(list.id, OWNER), Err(HubError::NotFound(_))));
        assert!(matches!(
            svc.update_item(list.id, item.id, "x", true, OWNER),
            Err(HubError::NotFound(_))
        ));
        assert!(matches!(
            svc.create_item(list.id, "late", OWNER),
            Err(HubError::NotFound(_))
        ));

        let stored = store.get_list(list.id).unwrap();
        assert!(stored.is_deleted());
        assert!(!stored.todo_items[0].is_deleted());
    }

    #[test]
    fn deleted_items_are_hidden_and_not_found() {
        let (_dir, _store, svc) = service();
        let list = svc.create_list("l", 1).unwrap();
        let item = svc.create_item(list.id, "x", OWNER).unwrap();
        svc.delete_item(list.id, item.id, OWNER).unwrap();

        assert!(svc.get_list(list.id, OWNER).unwrap().todo_items.is_empty());
        assert!(matches!(
            svc.delete_item(list.id, item.id, OWNER),
            Err(HubError::NotFound(_))
        ));
        assert!(matches!(
            svc.update_item(list.id, item.id, "y", false, OWNER),
            Err(HubError::NotFound(_))
        ));
    }

    #[test]
    fn blank_names_and_contents_are_rejected() {
        let (_dir, _store, svc) = service();
        assert!(matches!(svc.create_list("  ", 1), Err(HubError::InvalidInput(_))));
        let list = svc.create_list("ok", 1).unwrap();
        assert!(matches!(
            svc.create_item(list.id, "", OWNER),
            Err(HubError::InvalidInput(_))
        ));
    }

    #[test]
    fn names_and_contents_are_stored_verbatim() {
        let (_dir, store, svc) = service();
        let list = svc.create_list("  Groceries ", 1).unwrap();
        assert_eq!(list.name, "  Groceries ");
        let item = svc.create_item(list.id, " Milk\t", OWNER).unwrap();
        assert_eq!(store.get_item(list.id, item.id).unwrap().content, " Milk\t");
        let renamed = svc.update_list(list.id, "Weekly ", OWNER).unwrap();
        assert_eq!(renamed.name, "Weekly ");
    }

    #[test]
    fn mismatched_back_reference_is_invalid_input() {
        let (_dir, store, svc) = service();
        let list = svc.create_list("l", 1).unwrap();
        let item = svc.create_item(list.id, "x", OWNER).unwrap();
        let mut corrupt = store.get_item(list.id, item.id).unwrap();
        corrupt.todo_list_id = 42;
        store.update_item(list.id, corrupt).unwrap();

        assert!(matches!(
            svc.update_item(list.id, item.id, "y", true, OWNER),
            Err(HubError::InvalidInput(_))
        ));
    }

    #[test]
    fn concurrent_item_creation_keeps_percentage_consistent() {
        let (_dir, store, svc) = service();
        let list_id = svc.create_list("busy", 1).unwrap().id;
        let handles: Vec<_> = (0..6)
            .map(|n| {
                let svc = svc.clone();
                std::thread::spawn(move || {
                    let item = svc.create_item(list_id, &format!("t{n}"), OWNER).unwrap();
                    if n % 2 == 0 {
                        svc.update_item(list_id, item.id, &item.content, true, OWNER)
                            .unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let stored = store.get_list(list_id).unwrap();
        let mut ids: Vec<_> = stored.todo_items.iter().map(|i| i.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, (1..=6).collect::<Vec<_>>());
        assert_eq!(stored.completion_percentage, 50);
    }
}
