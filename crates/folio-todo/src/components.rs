//! TodoMVC markup.
//!
//! Every control posts with htmx and swaps the returned `.todoapp` section
//! over the current one.

use std::fmt;
use std::str::FromStr;

use folio::core::{el, Element, Markup};

use crate::store::{Filter, Snapshot, Todo};

/// Something the list can be told to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Add a todo.
    Insert,
    /// Complete or reopen every todo.
    ToggleAll,
    /// Flip one todo.
    Toggle,
    /// Remove one todo.
    Destroy,
    /// Remove completed todos.
    ClearCompleted,
    /// Change the filter.
    Filter,
}

impl Action {
    /// Every action.
    pub const ALL: [Self; 6] = [
        Self::Insert,
        Self::ToggleAll,
        Self::Toggle,
        Self::Destroy,
        Self::ClearCompleted,
        Self::Filter,
    ];

    /// The page under `/todo/` handling this action.
    #[must_use]
    pub const fn page(self) -> &'static str {
        match self {
            Self::Insert => "insert",
            Self::ToggleAll => "toggle-all",
            Self::Toggle => "toggle",
            Self::Destroy => "destroy",
            Self::ClearCompleted => "clear-completed",
            Self::Filter => "filter",
        }
    }

    /// The `?action=` value the index page dispatches on.
    #[must_use]
    pub const fn query(self) -> &'static str {
        match self {
            Self::Insert => "insert-todo",
            other => other.page(),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.query())
    }
}

impl FromStr for Action {
    type Err = String;

    /// Parses an `?action=` value.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.query() == s)
            .ok_or_else(|| format!("unknown action '{s}'"))
    }
}

/// Where the controls post to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endpoints {
    /// One page per action: `/todo/insert`, `/todo/toggle`, ...
    #[default]
    Pages,
    /// The index page with an action parameter: `/?action=insert-todo`, ...
    Index,
}

impl Endpoints {
    /// The URL `action` posts to.
    #[must_use]
    pub fn url(self, action: Action) -> String {
        match self {
            Self::Pages => format!("/todo/{}", action.page()),
            Self::Index => format!("/?action={}", action.query()),
        }
    }
}

fn hx_post(element: Element, endpoints: Endpoints, action: Action) -> Element {
    element
        .attr("hx-post", endpoints.url(action))
        .attr("hx-target", ".todoapp")
        .attr("hx-swap", "outerHTML")
}

/// The `.todoapp` section.
///
/// ```rust
/// use folio_todo::components::{todo_mvc, Endpoints};
/// use folio_todo::store::TodoStore;
///
/// let html = todo_mvc(&TodoStore::seeded().snapshot(), Endpoints::Pages).render();
/// assert!(html.starts_with(r#"<section class="todoapp">"#));
/// assert!(html.contains(r#"hx-post="/todo/insert""#));
/// assert!(html.contains("<label>Buy a unicorn</label>"));
/// ```
#[must_use]
pub fn todo_mvc(snapshot: &Snapshot, endpoints: Endpoints) -> Markup {
    let hidden = snapshot.total == 0;

    let header = el("header").attr("class", "header").child(el("h1").text("todos")).child(
        hx_post(el("form"), endpoints, Action::Insert)
            .attr("action", endpoints.url(Action::Insert))
            .attr("method", "post")
            .child(
                el("input")
                    .attr("name", "todo")
                    .attr("class", "new-todo")
                    .attr("placeholder", "What needs to be done?")
                    .flag("autofocus"),
            ),
    );

    let main = el("section")
        .attr("class", "main")
        .attr_if(hidden, "style", "display: none")
        .child(hx_post(
            el("input")
                .attr("id", "toggle-all")
                .attr("class", "toggle-all")
                .attr("type", "checkbox")
                .flag_if(!hidden && snapshot.active == 0, "checked"),
            endpoints,
            Action::ToggleAll,
        ))
        .child(el("label").attr("for", "toggle-all").text("Mark all as complete"))
        .child(
            el("ul")
                .attr("class", "todo-list")
                .children_from(snapshot.visible.iter().map(|t| todo_view(t, endpoints))),
        );

    let footer = el("footer")
        .attr("class", "footer")
        .attr_if(hidden, "style", "display: none")
        .child(
            el("span")
                .attr("class", "todo-count")
                .child(el("strong").text(snapshot.active.to_string()))
                .text(if snapshot.active == 1 { " item left" } else { " items left" }),
        )
        .child(filters(snapshot.filter, endpoints))
        .child(
            hx_post(el("button"), endpoints, Action::ClearCompleted)
                .attr("class", "clear-completed")
                .text("Clear completed"),
        );

    el("section")
        .attr("class", "todoapp")
        .child(header)
        .child(main)
        .child(footer)
        .into()
}

fn todo_view(todo: &Todo, endpoints: Endpoints) -> Element {
    let class = match (todo.completed, todo.editing) {
        (true, true) => Some("completed editing"),
        (true, false) => Some("completed"),
        (false, true) => Some("editing"),
        (false, false) => None,
    };

    let form = el("form")
        .child(
            el("input")
                .attr("type", "hidden")
                .attr("name", "todo")
                .attr("value", todo.id.to_string())
                .flag("readonly"),
        )
        .child(hx_post(
            el("input")
                .attr("class", "toggle")
                .attr("type", "checkbox")
                .flag_if(todo.completed, "checked"),
            endpoints,
            Action::Toggle,
        ))
        .child(el("label").text(todo.name.clone()))
        .child(hx_post(el("button").attr("class", "destroy"), endpoints, Action::Destroy));

    el("li")
        .attr_if(class.is_some(), "class", class.unwrap_or_default())
        .child(el("div").attr("class", "view").child(form))
        .child(el("input").attr("class", "edit").attr("value", todo.name.clone()))
}

fn filters(current: Filter, endpoints: Endpoints) -> Element {
    el("ul")
        .attr("class", "filters")
        .children_from(Filter::ALL.into_iter().map(|filter| {
            el("li").child(
                hx_post(el("form"), endpoints, Action::Filter)
                    .attr("method", "post")
                    .child(
                        el("input")
                            .attr("type", "hidden")
                            .attr("name", "filter")
                            .attr("value", filter.as_str()),
                    )
                    .child(
                        el("button")
                            .attr_if(filter == current, "class", "selected")
                            .attr("type", "submit")
                            .text(filter.label()),
                    ),
            )
        }))
}

/// The footer under the app.
#[must_use]
pub fn credits() -> Markup {
    el("footer")
        .attr("class", "info")
        .child(el("p").text("Double-click to edit a todo"))
        .child(
            el("p")
                .text("Created by ")
                .child(el("a").attr("href", "http://github.com/pigoz").text("@pigoz")),
        )
        .child(
            el("p")
                .text("Part of ")
                .child(el("a").attr("href", "http://todomvc.com").text("TodoMVC")),
        )
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::TodoStore;

    #[test]
    fn test_endpoints() {
        assert_eq!(Endpoints::Pages.url(Action::Insert), "/todo/insert");
        assert_eq!(Endpoints::Index.url(Action::Insert), "/?action=insert-todo");
        assert_eq!(
            Endpoints::Index.url(Action::ClearCompleted),
            "/?action=clear-completed"
        );
    }

    #[test]
    fn test_action_parsing() {
        for action in Action::ALL {
            assert_eq!(action.query().parse::<Action>(), Ok(action));
        }
        assert!("insert".parse::<Action>().is_err());
    }

    #[test]
    fn test_empty_list_hides_main_and_footer() {
        let html = todo_mvc(&TodoStore::new().snapshot(), Endpoints::Pages).render();
        assert!(html.contains(r#"<section class="main" style="display: none">"#));
        assert!(html.contains(r#"<footer class="footer" style="display: none">"#));
    }

    #[test]
    fn test_items_and_counts() {
        let store = TodoStore::seeded();
        let html = todo_mvc(&store.snapshot(), Endpoints::Index).render();

        assert!(html.contains(r#"<li class="completed">"#));
        assert!(html.contains("<strong>1</strong> item left"));
        assert!(html.contains(r#"hx-post="/?action=toggle""#));
        assert!(html.contains(r#"hx-swap="outerHTML""#));
        assert!(html.contains(r#"<button class="selected" type="submit">All</button>"#));
    }

    #[test]
    fn test_item_names_are_escaped() {
        let store = TodoStore::new();
        store.insert("<b>bold</b>");
        let html = todo_mvc(&store.snapshot(), Endpoints::Pages).render();
        assert!(html.contains("<label>&lt;b&gt;bold&lt;/b&gt;</label>"));
    }

    #[test]
    fn test_credits() {
        let html = credits().render();
        assert!(html.starts_with(r#"<footer class="info">"#));
        assert!(html.contains(r#"<a href="http://todomvc.com">TodoMVC</a>"#));
    }
}
