//! End-to-end TodoMVC requests through the full pipeline.

use std::sync::Arc;

use folio::config::FolioConfig;
use folio::telemetry::NoopTracer;
use folio_test::TestClient;
use folio_todo::store::{Filter, TodoStore};

fn app() -> (TestClient, Arc<TodoStore>) {
    let store = Arc::new(TodoStore::seeded());
    let pipeline = folio_todo::pipeline(&FolioConfig::default(), &store, NoopTracer).unwrap();
    (TestClient::new(pipeline), store)
}

#[tokio::test]
async fn index_renders_the_whole_document() {
    let (client, _) = app();

    client
        .get("/")
        .send()
        .await
        .assert_status_code(200)
        .assert_header("content-type", "text/html; charset=utf-8")
        .assert_document()
        .assert_body_contains("<title>Folio • TodoMVC</title>")
        .assert_body_contains(r#"<link rel="stylesheet" href="/static/index.css">"#)
        .assert_body_contains("<label>Taste JavaScript</label>")
        .assert_body_contains(r#"<footer class="info">"#)
        .assert_body_contains(r#"hx-post="/?action=insert-todo""#);
}

#[tokio::test]
async fn insert_returns_the_refreshed_app() {
    let (client, store) = app();

    let response = client
        .post("/todo/insert")
        .fragment()
        .form(&[("todo", "Buy milk")])
        .send()
        .await;

    response
        .assert_status_code(200)
        .assert_fragment()
        .assert_body_contains("<strong>2</strong> items left");
    let body = response.text().unwrap();
    assert!(body.starts_with(r#"<section class="todoapp">"#));
    assert!(body.find("Buy milk").unwrap() < body.find("Taste JavaScript").unwrap());
    assert_eq!(store.todos()[0].name, "Buy milk");
}

#[tokio::test]
async fn insert_requires_the_todo_field() {
    let (client, store) = app();

    client
        .post("/todo/insert")
        .fragment()
        .form::<&str, &str>(&[])
        .send()
        .await
        .assert_status_code(422)
        .assert_body_contains("Required");
    assert_eq!(store.todos().len(), 2);

    // A blank name is accepted as is.
    client
        .post("/todo/insert")
        .fragment()
        .form(&[("todo", "")])
        .send()
        .await
        .assert_status_code(200);
    assert_eq!(store.todos().len(), 3);
    assert_eq!(store.todos()[0].name, "");
}

#[tokio::test]
async fn toggle_and_destroy_by_id() {
    let (client, store) = app();
    let unicorn = store.todos()[1].id.to_string();

    client
        .post("/todo/toggle")
        .fragment()
        .form(&[("todo", unicorn.as_str())])
        .send()
        .await
        .assert_status_code(200)
        .assert_body_contains("<strong>0</strong> items left");
    assert!(store.todos()[1].completed);

    client
        .post("/todo/destroy")
        .fragment()
        .form(&[("todo", unicorn.as_str())])
        .send()
        .await
        .assert_status_code(200);
    assert_eq!(store.todos().len(), 1);

    // Unknown ids leave the list alone.
    client
        .post("/todo/destroy")
        .fragment()
        .form(&[("todo", unicorn.as_str())])
        .send()
        .await
        .assert_status_code(200);
    assert_eq!(store.todos().len(), 1);
}

#[tokio::test]
async fn toggle_all_then_clear_completed() {
    let (client, store) = app();

    client.post("/todo/toggle-all").fragment().send().await.assert_status_code(200);
    assert!(store.todos().iter().all(|t| t.completed));

    client
        .post("/todo/clear-completed")
        .fragment()
        .send()
        .await
        .assert_status_code(200)
        .assert_body_contains(r#"<section class="main" style="display: none">"#);
    assert!(store.todos().is_empty());
}

#[tokio::test]
async fn filter_limits_the_list() {
    let (client, store) = app();

    let response = client
        .post("/todo/filter")
        .fragment()
        .form(&[("filter", "active")])
        .send()
        .await;
    response
        .assert_status_code(200)
        .assert_body_contains(r#"<button class="selected" type="submit">Active</button>"#)
        .assert_body_contains("<label>Buy a unicorn</label>");
    assert!(!response.text().unwrap().contains("<label>Taste JavaScript</label>"));
    assert_eq!(store.filter(), Filter::Active);

    client
        .post("/todo/filter")
        .fragment()
        .form(&[("filter", "done")])
        .send()
        .await
        .assert_status_code(422)
        .assert_body_contains("Invalid enum value");
    assert_eq!(store.filter(), Filter::Active);
}

#[tokio::test]
async fn index_dispatches_actions() {
    let (client, store) = app();

    client
        .post("/?action=insert-todo")
        .fragment()
        .form(&[("todo", "Walk the dog")])
        .send()
        .await
        .assert_status_code(200)
        .assert_fragment()
        .assert_body_contains(r#"hx-post="/?action=toggle""#);
    assert_eq!(store.todos()[0].name, "Walk the dog");

    client
        .post("/?action=clear-completed")
        .fragment()
        .send()
        .await
        .assert_status_code(200);
    assert_eq!(store.todos().len(), 2);

    client
        .post("/?action=filter")
        .fragment()
        .form(&[("filter", "sideways")])
        .send()
        .await
        .assert_status_code(422);
}

#[tokio::test]
async fn unsupported_method_names_the_route() {
    let (client, _) = app();

    client
        .put("/todo/insert")
        .send()
        .await
        .assert_status_code(404)
        .assert_status_text("/todo/insert doesn't handle 'PUT' method");

    client.get("/todo/nowhere").send().await.assert_status_code(404);
}
