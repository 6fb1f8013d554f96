use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

pub type UserId = i64;
pub type ListId = i64;
pub type ItemId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum Role {
    Admin,
    Member,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Member => "user",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// Only the exact string `admin` grants the admin role.
impl From<String> for Role {
    fn from(s: String) -> Self {
        if s == "admin" { Role::Admin } else { Role::Member }
    }
}

impl From<Role> for &'static str {
    fn from(r: Role) -> Self {
        r.as_str()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    #[serde(default)]
    pub id: UserId,
    pub username: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TodoItem {
    pub id: ItemId,
    pub todo_list_id: ListId,
    #[serde(default)]
    pub user_id: UserId,
    pub content: String,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(
        default,
        deserialize_with = "deserialize_deleted_at",
        skip_serializing_if = "Option::is_none"
    )]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl TodoItem {
    pub fn new(list_id: ListId, owner: UserId, content: String, now: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            todo_list_id: list_id,
            user_id: owner,
            content,
            is_completed: false,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TodoList {
    pub id: ListId,
    pub name: String,
    #[serde(default)]
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(
        default,
        deserialize_with = "deserialize_deleted_at",
        skip_serializing_if = "Option::is_none"
    )]
    pub deleted_at: Option<DateTime<Utc>>,
    pub completion_percentage: u8,
    #[serde(default, deserialize_with = "deserialize_null_as_empty")]
    pub todo_items: Vec<TodoItem>,
}

impl TodoList {
    pub fn new(name: String, owner: UserId, now: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            name,
            user_id: owner,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            completion_percentage: 0,
            todo_items: Vec::new(),
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Appends `item` with the next per-list ID and returns the stored copy.
    pub fn append_item(&mut self, mut item: TodoItem) -> TodoItem {
        item.id = self.todo_items.iter().map(|i| i.id).max().unwrap_or(0) + 1;
        item.todo_list_id = self.id;
        self.todo_items.push(item.clone());
        item
    }

    pub fn item_mut(&mut self, item_id: ItemId) -> Option<&mut TodoItem> {
        self.todo_items.iter_mut().find(|i| i.id == item_id)
    }

    /// Recomputes the completion percentage over non-deleted items and stamps
    /// `updated_at`, even when the value did not change.
    pub fn recompute_completion(&mut self, now: DateTime<Utc>) {
        self.completion_percentage = completion_percentage(&self.todo_items);
        self.updated_at = now;
    }
}

pub fn completion_percentage(items: &[TodoItem]) -> u8 {
    let (total, completed) = items
        .iter()
        .filter(|i| !i.is_deleted())
        .fold((0usize, 0usize), |(total, done), i| {
            (total + 1, done + usize::from(i.is_completed))
        });
    if total == 0 {
        return 0;
    }
    // completed <= total, so the quotient is at most 100
    ((completed * 100) / total) as u8
}

/// Full on-disk state: every list (with embedded items) and every user.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    #[serde(default, deserialize_with = "deserialize_null_as_empty")]
    pub todo_lists: Vec<TodoList>,
    #[serde(default, deserialize_with = "deserialize_null_as_empty")]
    pub users: Vec<User>,
}

/// Older snapshots write the zero timestamp instead of omitting the field.
fn deserialize_deleted_at<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<DateTime<Utc>> = Option::deserialize(deserializer)?;
    Ok(value.filter(|ts| ts.year() > 1))
}

fn deserialize_null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
