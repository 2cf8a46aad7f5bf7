//! In-memory todo list.
//!
//! One [`TodoStore`] is shared by every page. Every operation takes the lock
//! once, so a request sees either all or none of another request's change.

use std::fmt;
use std::str::FromStr;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A todo item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    /// Stable identifier, sent back by the toggle and destroy forms.
    pub id: Uuid,
    /// What needs to be done.
    pub name: String,
    /// Whether it is done.
    pub completed: bool,
    /// Whether it is being edited.
    pub editing: bool,
}

impl Todo {
    /// A new, open item.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            completed: false,
            editing: false,
        }
    }

    fn completed(mut self) -> Self {
        self.completed = true;
        self
    }
}

/// Which items the list shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    /// Every item.
    #[default]
    All,
    /// Open items.
    Active,
    /// Done items.
    Completed,
}

impl Filter {
    /// Every filter, in display order.
    pub const ALL: [Self; 3] = [Self::All, Self::Active, Self::Completed];

    /// The form value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    /// The button label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Active => "Active",
            Self::Completed => "Completed",
        }
    }

    /// Whether `todo` is shown under this filter.
    #[must_use]
    pub fn matches(self, todo: &Todo) -> bool {
        match self {
            Self::All => true,
            Self::Active => !todo.completed,
            Self::Completed => todo.completed,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A string that names no filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFilter(pub String);

impl fmt::Display for UnknownFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown filter '{}'", self.0)
    }
}

impl std::error::Error for UnknownFilter {}

impl FromStr for Filter {
    type Err = UnknownFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| UnknownFilter(s.to_string()))
    }
}

/// What a page renders: the visible items plus the counts around them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Items matching the current filter, newest first.
    pub visible: Vec<Todo>,
    /// The current filter.
    pub filter: Filter,
    /// Number of items, whatever the filter.
    pub total: usize,
    /// Number of open items.
    pub active: usize,
}

#[derive(Debug, Default)]
struct State {
    todos: Vec<Todo>,
    filter: Filter,
}

/// The shared todo list.
///
/// ```rust
/// use folio_todo::store::{Filter, TodoStore};
///
/// let store = TodoStore::new();
/// let id = store.insert("Buy milk");
/// store.insert("Walk the dog");
/// store.toggle(&id.to_string());
///
/// store.set_filter(Filter::Active);
/// let snapshot = store.snapshot();
/// assert_eq!(snapshot.total, 2);
/// assert_eq!(snapshot.active, 1);
/// assert_eq!(snapshot.visible[0].name, "Walk the dog");
/// ```
#[derive(Debug, Default)]
pub struct TodoStore {
    state: RwLock<State>,
}

impl TodoStore {
    /// An empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The list the demo starts with.
    #[must_use]
    pub fn seeded() -> Self {
        let store = Self::new();
        store.state.write().todos = vec![
            Todo::new("Taste JavaScript").completed(),
            Todo::new("Buy a unicorn"),
        ];
        store
    }

    /// Every item, newest first.
    #[must_use]
    pub fn todos(&self) -> Vec<Todo> {
        self.state.read().todos.clone()
    }

    /// The current filter with the items it shows.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let state = self.state.read();
        Snapshot {
            visible: state
                .todos
                .iter()
                .filter(|t| state.filter.matches(t))
                .cloned()
                .collect(),
            filter: state.filter,
            total: state.todos.len(),
            active: state.todos.iter().filter(|t| !t.completed).count(),
        }
    }

    /// Adds an open item at the top of the list.
    pub fn insert(&self, name: impl Into<String>) -> Uuid {
        let todo = Todo::new(name);
        let id = todo.id;
        self.state.write().todos.insert(0, todo);
        id
    }

    /// Completes every item, or reopens them all if all were complete.
    pub fn toggle_all(&self) {
        let mut state = self.state.write();
        let all_completed = state.todos.iter().all(|t| t.completed);
        for todo in &mut state.todos {
            todo.completed = !all_completed;
        }
    }

    /// Flips one item. Returns `false` if `id` names no item.
    pub fn toggle(&self, id: &str) -> bool {
        let Ok(id) = Uuid::parse_str(id) else {
            return false;
        };
        let mut state = self.state.write();
        match state.todos.iter_mut().find(|t| t.id == id) {
            Some(todo) => {
                todo.completed = !todo.completed;
                true
            }
            None => false,
        }
    }

    /// Removes one item. Returns `false` if `id` names no item.
    pub fn destroy(&self, id: &str) -> bool {
        let Ok(id) = Uuid::parse_str(id) else {
            return false;
        };
        let mut state = self.state.write();
        let before = state.todos.len();
        state.todos.retain(|t| t.id != id);
        state.todos.len() != before
    }

    /// Removes every completed item and returns how many went.
    pub fn clear_completed(&self) -> usize {
        let mut state = self.state.write();
        let before = state.todos.len();
        state.todos.retain(|t| !t.completed);
        before - state.todos.len()
    }

    /// The current filter.
    #[must_use]
    pub fn filter(&self) -> Filter {
        self.state.read().filter
    }

    /// Replaces the current filter.
    pub fn set_filter(&self, filter: Filter) {
        self.state.write().filter = filter;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(store: &TodoStore) -> Vec<String> {
        store.todos().into_iter().map(|t| t.name).collect()
    }

    #[test]
    fn test_seeded() {
        let store = TodoStore::seeded();
        let todos = store.todos();
        assert_eq!(todos.len(), 2);
        assert_eq!(todos[0].name, "Taste JavaScript");
        assert!(todos[0].completed);
        assert!(!todos[1].completed);
        assert_eq!(store.filter(), Filter::All);
    }

    #[test]
    fn test_insert_goes_first() {
        let store = TodoStore::seeded();
        store.insert("Buy milk");
        assert_eq!(names(&store), ["Buy milk", "Taste JavaScript", "Buy a unicorn"]);
    }

    #[test]
    fn test_toggle_all() {
        let store = TodoStore::seeded();

        store.toggle_all();
        assert!(store.todos().iter().all(|t| t.completed));

        store.toggle_all();
        assert!(store.todos().iter().all(|t| !t.completed));
    }

    #[test]
    fn test_toggle_and_destroy_by_id() {
        let store = TodoStore::new();
        let id = store.insert("Buy milk").to_string();

        assert!(store.toggle(&id));
        assert!(store.todos()[0].completed);

        assert!(store.destroy(&id));
        assert!(store.todos().is_empty());
        assert!(!store.destroy(&id));
    }

    #[test]
    fn test_unknown_ids_are_ignored() {
        let store = TodoStore::seeded();
        assert!(!store.toggle("not-a-uuid"));
        assert!(!store.toggle(&Uuid::now_v7().to_string()));
        assert!(!store.destroy("not-a-uuid"));
        assert_eq!(store.todos().len(), 2);
    }

    #[test]
    fn test_clear_completed() {
        let store = TodoStore::seeded();
        assert_eq!(store.clear_completed(), 1);
        assert_eq!(names(&store), ["Buy a unicorn"]);
        assert_eq!(store.clear_completed(), 0);
    }

    #[test]
    fn test_filtered_snapshot() {
        let store = TodoStore::seeded();

        store.set_filter(Filter::Completed);
        let snapshot = store.snapshot();
        assert_eq!(snapshot.filter, Filter::Completed);
        assert_eq!(snapshot.visible.len(), 1);
        assert_eq!(snapshot.visible[0].name, "Taste JavaScript");
        assert_eq!(snapshot.total, 2);
        assert_eq!(snapshot.active, 1);
    }

    #[test]
    fn test_filter_parsing() {
        assert_eq!("active".parse::<Filter>(), Ok(Filter::Active));
        assert!("everything".parse::<Filter>().is_err());
        for filter in Filter::ALL {
            assert_eq!(filter.as_str().parse::<Filter>(), Ok(filter));
        }
    }
}
