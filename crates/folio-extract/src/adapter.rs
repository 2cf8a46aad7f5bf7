//! The validation adapter.
//!
//! [`form_handler`] pairs a [`FormSchema`] with a success continuation and
//! produces a [`Handler`]. On each request the submitted form is parsed
//! against the schema:
//!
//! - valid data goes to the success continuation together with the context
//! - invalid data goes to the error continuation set with
//!   [`FormHandler::on_error`], or, when none was set, becomes a 422 JSON
//!   response listing every issue
//!
//! A bad submission is never a handler fault.

use std::future::Future;
use std::sync::Arc;

use folio_core::{Handler, PageOutcome, PageResult, RequestContext};
use futures_util::future::{self, BoxFuture};

use crate::response::validation_failure;
use crate::schema::{FormSchema, Issue, Validation};

/// Continuation invoked with the validated value.
pub trait OnValid<T>: Send + Sync + 'static {
    /// Handles a valid submission.
    fn valid(&self, data: T, ctx: RequestContext) -> BoxFuture<'static, PageResult<PageOutcome>>;
}

impl<T, F, Fut> OnValid<T> for F
where
    F: Fn(T, RequestContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = PageResult<PageOutcome>> + Send + 'static,
{
    fn valid(&self, data: T, ctx: RequestContext) -> BoxFuture<'static, PageResult<PageOutcome>> {
        Box::pin(self(data, ctx))
    }
}

/// Continuation invoked with the issues of an invalid submission.
pub trait OnInvalid: Send + Sync + 'static {
    /// Handles an invalid submission.
    fn invalid(
        &self,
        issues: Vec<Issue>,
        ctx: RequestContext,
    ) -> BoxFuture<'static, PageResult<PageOutcome>>;
}

impl<F, Fut> OnInvalid for F
where
    F: Fn(Vec<Issue>, RequestContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = PageResult<PageOutcome>> + Send + 'static,
{
    fn invalid(
        &self,
        issues: Vec<Issue>,
        ctx: RequestContext,
    ) -> BoxFuture<'static, PageResult<PageOutcome>> {
        Box::pin(self(issues, ctx))
    }
}

/// Answers with [`validation_failure`]: 422 and a JSON list of issues.
#[derive(Debug, Clone, Copy, Default)]
pub struct RejectUnprocessable;

impl OnInvalid for RejectUnprocessable {
    fn invalid(
        &self,
        issues: Vec<Issue>,
        _ctx: RequestContext,
    ) -> BoxFuture<'static, PageResult<PageOutcome>> {
        Box::pin(future::ready(Ok(PageOutcome::Terminal(validation_failure(
            &issues,
        )))))
    }
}

/// Logs and counts a rejected submission against the route `ctx` matched.
///
/// Handlers that validate outside [`form_handler`] call this before
/// answering so every rejection lands in the same counter.
pub fn note_rejection(ctx: &RequestContext, issues: &[Issue]) {
    let route = ctx.pattern().unwrap_or(ctx.path());
    tracing::debug!(route = %route, issues = issues.len(), "form validation failed");
    folio_telemetry::record_validation_failure(route);
}

/// A [`Handler`] that validates the submitted form before dispatching.
pub struct FormHandler<S, V, E = RejectUnprocessable> {
    schema: Arc<S>,
    on_valid: Arc<V>,
    on_invalid: Arc<E>,
}

impl<S, V, E> Clone for FormHandler<S, V, E> {
    fn clone(&self) -> Self {
        Self {
            schema: Arc::clone(&self.schema),
            on_valid: Arc::clone(&self.on_valid),
            on_invalid: Arc::clone(&self.on_invalid),
        }
    }
}

impl<S, V, E> std::fmt::Debug for FormHandler<S, V, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormHandler")
            .field("schema", &std::any::type_name::<S>())
            .finish_non_exhaustive()
    }
}

/// Builds a validating handler from `schema` and a success continuation.
///
/// ```rust
/// use folio_core::{el, Handler, PageOutcome, PageMethod, RequestContext};
/// use folio_extract::{form_handler, FieldSpec, FormValues, ObjectSchema};
///
/// let insert = form_handler(
///     ObjectSchema::new().field(FieldSpec::text("todo")),
///     |values: FormValues, _ctx: RequestContext| async move {
///         let todo = values.text("todo").unwrap_or_default().to_string();
///         Ok(PageOutcome::render(el("li").text(todo)))
///     },
/// );
///
/// let ctx = RequestContext::builder(PageMethod::Post, "/todo/insert").build();
/// let outcome = tokio_test::block_on(insert.handle(ctx)).unwrap();
/// let PageOutcome::Terminal(response) = outcome else { panic!() };
/// assert_eq!(response.status(), 422);
/// ```
pub fn form_handler<S, V>(schema: S, on_valid: V) -> FormHandler<S, V>
where
    S: FormSchema,
    V: OnValid<S::Output>,
{
    FormHandler {
        schema: Arc::new(schema),
        on_valid: Arc::new(on_valid),
        on_invalid: Arc::new(RejectUnprocessable),
    }
}

impl<S, V, E> FormHandler<S, V, E>
where
    S: FormSchema,
    V: OnValid<S::Output>,
    E: OnInvalid,
{
    /// Replaces the error continuation.
    #[must_use]
    pub fn on_error<E2: OnInvalid>(self, on_invalid: E2) -> FormHandler<S, V, E2> {
        FormHandler {
            schema: self.schema,
            on_valid: self.on_valid,
            on_invalid: Arc::new(on_invalid),
        }
    }

    /// The schema this handler validates against.
    #[must_use]
    pub fn schema(&self) -> &S {
        &self.schema
    }
}

impl<S, V, E> Handler for FormHandler<S, V, E>
where
    S: FormSchema,
    V: OnValid<S::Output>,
    E: OnInvalid,
{
    fn handle(&self, ctx: RequestContext) -> BoxFuture<'static, PageResult<PageOutcome>> {
        let outcome = self.schema.parse(ctx.form());
        let on_valid = Arc::clone(&self.on_valid);
        let on_invalid = Arc::clone(&self.on_invalid);
        Box::pin(async move {
            match outcome {
                Validation::Valid(data) => on_valid.valid(data, ctx).await,
                Validation::Invalid(issues) => {
                    note_rejection(&ctx, &issues);
                    on_invalid.invalid(issues, ctx).await
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldSpec, FormValues, ObjectSchema};
    use folio_core::{el, FieldMap, Markup, PageError, PageMethod};
    use http::StatusCode;
    use serde::Deserialize;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn post(form: &[(&str, &str)]) -> RequestContext {
        RequestContext::builder(PageMethod::Post, "/items")
            .form(form.iter().copied().collect::<FieldMap>())
            .build()
    }

    fn todo_schema() -> ObjectSchema {
        ObjectSchema::new().field(FieldSpec::text("todo"))
    }

    fn render_text(outcome: PageOutcome) -> String {
        match outcome {
            PageOutcome::Render(markup) => markup.render(),
            PageOutcome::Terminal(_) => panic!("expected render tree"),
        }
    }

    #[tokio::test]
    async fn test_valid_submission_calls_success_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let handler = form_handler(todo_schema(), move |values: FormValues, _ctx: RequestContext| {
            seen.fetch_add(1, Ordering::SeqCst);
            let todo = values.text("todo").unwrap_or_default().to_string();
            async move { Ok(PageOutcome::render(el("li").text(todo))) }
        });

        let outcome = handler.handle(post(&[("todo", "Buy milk")])).await.unwrap();
        assert_eq!(render_text(outcome), "<li>Buy milk</li>");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_default_error_is_422_json() {
        let handler = form_handler(todo_schema(), |_: FormValues, _ctx: RequestContext| async {
            Ok(PageOutcome::render(Markup::empty()))
        });

        let outcome = handler.handle(post(&[])).await.unwrap();
        let PageOutcome::Terminal(response) = outcome else {
            panic!("expected terminal response");
        };
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.headers()["content-type"], "application/json");
        let issues: Vec<Issue> = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(issues, vec![Issue::new("todo", "Required")]);
    }

    #[tokio::test]
    async fn test_custom_error_continuation_receives_all_issues() {
        let schema = ObjectSchema::new()
            .field(FieldSpec::text("name"))
            .field(FieldSpec::integer("qty"));
        let handler = form_handler(schema, |_: FormValues, _ctx: RequestContext| async {
            Ok(PageOutcome::render(Markup::empty()))
        })
        .on_error(|issues: Vec<Issue>, ctx: RequestContext| async move {
            let list = el("ul")
                .attr("data-path", ctx.path().to_string())
                .children_from(issues.into_iter().map(|i| el("li").text(i.field)));
            Ok(PageOutcome::render(list))
        });

        let outcome = handler.handle(post(&[("qty", "lots")])).await.unwrap();
        assert_eq!(
            render_text(outcome),
            r#"<ul data-path="/items"><li>name</li><li>qty</li></ul>"#
        );
    }

    #[tokio::test]
    async fn test_typed_schema_reaches_success() {
        #[derive(Deserialize)]
        struct NewItem {
            name: String,
        }
        let schema = ObjectSchema::new()
            .field(FieldSpec::text("name"))
            .typed::<NewItem>();
        let handler = form_handler(schema, |item: NewItem, _ctx: RequestContext| async move {
            Ok(PageOutcome::render(Markup::text(item.name)))
        });

        let outcome = handler.handle(post(&[("name", "Buy milk")])).await.unwrap();
        assert_eq!(render_text(outcome), "Buy milk");
    }

    #[tokio::test]
    async fn test_success_faults_propagate() {
        let handler = form_handler(todo_schema(), |_: FormValues, _ctx: RequestContext| async {
            Err(PageError::fault("store unavailable"))
        });
        let err = handler.handle(post(&[("todo", "x")])).await.unwrap_err();
        assert_eq!(err.to_string(), "handler fault: store unavailable");
    }
}
