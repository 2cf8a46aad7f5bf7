//! The TodoMVC pages.
//!
//! Each `todo/*` page handles one action and answers with the refreshed
//! `.todoapp` section. The index page renders the whole app on `GET` and
//! also accepts every action through `POST /?action=...`.

use std::sync::Arc;

use folio::core::{sync_handler, Markup, PageDefinition, PageOutcome, RequestContext};
use folio::extract::response::validation_failure;
use folio::extract::{
    form_handler, note_rejection, FieldSpec, FormSchema, ObjectSchema, TypedSchema,
};
use serde::Deserialize;
use tracing::debug;

use crate::components::{credits, todo_mvc, Action, Endpoints};
use crate::store::{Filter, TodoStore};

/// A form carrying one todo: its name on insert, its id otherwise.
#[derive(Debug, Clone, Deserialize)]
pub struct TodoForm {
    /// The submitted value.
    pub todo: String,
}

/// The filter form.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct FilterForm {
    /// The chosen filter.
    pub filter: Filter,
}

/// `todo`, required. An empty name is still a name.
#[must_use]
pub fn todo_schema() -> TypedSchema<TodoForm> {
    ObjectSchema::new().field(FieldSpec::text("todo")).typed()
}

/// `filter`, one of `all`, `active` or `completed`.
#[must_use]
pub fn filter_schema() -> TypedSchema<FilterForm> {
    ObjectSchema::new()
        .field(FieldSpec::choice("filter", Filter::ALL.map(Filter::as_str)))
        .typed()
}

fn app(store: &TodoStore, endpoints: Endpoints) -> PageOutcome {
    PageOutcome::render(todo_mvc(&store.snapshot(), endpoints))
}

/// `/`: the whole app, plus every action keyed by `?action=`.
pub fn index(store: &Arc<TodoStore>) -> PageDefinition {
    let get_store = Arc::clone(store);
    let post_store = Arc::clone(store);

    PageDefinition::new()
        .get(sync_handler(move |_ctx| {
            Ok(PageOutcome::render(Markup::fragment([
                todo_mvc(&get_store.snapshot(), Endpoints::Index),
                credits(),
            ])))
        }))
        .post(sync_handler(move |ctx| Ok(dispatch(&post_store, &ctx))))
}

fn dispatch(store: &TodoStore, ctx: &RequestContext) -> PageOutcome {
    let action = match ctx.query().get("action").map(str::parse::<Action>) {
        Some(Ok(action)) => action,
        Some(Err(err)) => {
            debug!(error = %err, "ignoring index action");
            return app(store, Endpoints::Index);
        }
        None => return app(store, Endpoints::Index),
    };

    let applied = match action {
        Action::Insert => todo_schema()
            .parse(ctx.form())
            .into_result()
            .map(|form| {
                store.insert(form.todo);
            }),
        Action::Toggle => todo_schema()
            .parse(ctx.form())
            .into_result()
            .map(|form| {
                store.toggle(&form.todo);
            }),
        Action::Destroy => todo_schema()
            .parse(ctx.form())
            .into_result()
            .map(|form| {
                store.destroy(&form.todo);
            }),
        Action::Filter => filter_schema()
            .parse(ctx.form())
            .into_result()
            .map(|form| store.set_filter(form.filter)),
        Action::ToggleAll => {
            store.toggle_all();
            Ok(())
        }
        Action::ClearCompleted => {
            store.clear_completed();
            Ok(())
        }
    };

    match applied {
        Ok(()) => app(store, Endpoints::Index),
        Err(issues) => {
            note_rejection(ctx, &issues);
            PageOutcome::Terminal(validation_failure(&issues))
        }
    }
}

/// `/todo/insert`: adds the submitted todo.
pub fn insert(store: &Arc<TodoStore>) -> PageDefinition {
    let store = Arc::clone(store);
    PageDefinition::new().post(form_handler(
        todo_schema(),
        move |form: TodoForm, _ctx: RequestContext| {
            store.insert(form.todo);
            let outcome = app(&store, Endpoints::Pages);
            async move { Ok(outcome) }
        },
    ))
}

/// `/todo/toggle`: flips the todo whose id was submitted.
pub fn toggle(store: &Arc<TodoStore>) -> PageDefinition {
    let store = Arc::clone(store);
    PageDefinition::new().post(form_handler(
        todo_schema(),
        move |form: TodoForm, _ctx: RequestContext| {
            if !store.toggle(&form.todo) {
                debug!(id = %form.todo, "toggle of unknown todo");
            }
            let outcome = app(&store, Endpoints::Pages);
            async move { Ok(outcome) }
        },
    ))
}

/// `/todo/destroy`: removes the todo whose id was submitted.
pub fn destroy(store: &Arc<TodoStore>) -> PageDefinition {
    let store = Arc::clone(store);
    PageDefinition::new().post(form_handler(
        todo_schema(),
        move |form: TodoForm, _ctx: RequestContext| {
            if !store.destroy(&form.todo) {
                debug!(id = %form.todo, "destroy of unknown todo");
            }
            let outcome = app(&store, Endpoints::Pages);
            async move { Ok(outcome) }
        },
    ))
}

/// `/todo/filter`: changes which todos are listed.
pub fn filter(store: &Arc<TodoStore>) -> PageDefinition {
    let store = Arc::clone(store);
    PageDefinition::new().post(form_handler(
        filter_schema(),
        move |form: FilterForm, _ctx: RequestContext| {
            store.set_filter(form.filter);
            let outcome = app(&store, Endpoints::Pages);
            async move { Ok(outcome) }
        },
    ))
}

/// `/todo/toggle-all`
pub fn toggle_all(store: &Arc<TodoStore>) -> PageDefinition {
    let store = Arc::clone(store);
    PageDefinition::new().post(sync_handler(move |_ctx| {
        store.toggle_all();
        Ok(app(&store, Endpoints::Pages))
    }))
}

/// `/todo/clear-completed`
pub fn clear_completed(store: &Arc<TodoStore>) -> PageDefinition {
    let store = Arc::clone(store);
    PageDefinition::new().post(sync_handler(move |_ctx| {
        let removed = store.clear_completed();
        debug!(removed, "cleared completed todos");
        Ok(app(&store, Endpoints::Pages))
    }))
}
