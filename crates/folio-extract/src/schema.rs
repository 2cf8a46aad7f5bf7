//! Form schemas.
//!
//! A [`FormSchema`] turns an untyped [`FieldMap`] into either a typed value or
//! the full list of field-level [`Issue`]s. Schemas never stop at the first
//! bad field.
//!
//! [`ObjectSchema`] describes fields one by one and yields [`FormValues`].
//! [`TypedSchema`] layers serde on top to produce your own struct.

use std::fmt;
use std::marker::PhantomData;

use folio_core::FieldMap;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// One way submitted data failed a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// The field name. Empty for issues about the submission as a whole.
    pub field: String,
    /// Human-readable description.
    pub message: String,
}

impl Issue {
    /// Creates an issue.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.field.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.field, self.message)
        }
    }
}

/// Outcome of running a schema.
#[derive(Debug, Clone, PartialEq)]
pub enum Validation<T> {
    /// Every field satisfied the schema.
    Valid(T),
    /// Every failing field, in schema order. Never empty.
    Invalid(Vec<Issue>),
}

impl<T> Validation<T> {
    /// Whether the data passed.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// Converts into a `Result`.
    pub fn into_result(self) -> Result<T, Vec<Issue>> {
        match self {
            Self::Valid(value) => Ok(value),
            Self::Invalid(issues) => Err(issues),
        }
    }

    /// Transforms the valid value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Validation<U> {
        match self {
            Self::Valid(value) => Validation::Valid(f(value)),
            Self::Invalid(issues) => Validation::Invalid(issues),
        }
    }
}

/// Something that can parse a field map into a typed value.
pub trait FormSchema: Send + Sync + 'static {
    /// The typed value produced on success.
    type Output: Send + 'static;

    /// Parses `fields`, reporting every failing field on failure.
    fn parse(&self, fields: &FieldMap) -> Validation<Self::Output>;
}

/// A coerced field value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Text, including choice fields.
    Text(String),
    /// A whole number.
    Integer(i64),
    /// A floating-point number.
    Float(f64),
    /// A boolean.
    Boolean(bool),
}

/// The declared type of a field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Any string. Empty input is accepted unless a minimum length is set.
    Text {
        /// Minimum length in characters.
        min_len: Option<usize>,
        /// Maximum length in characters.
        max_len: Option<usize>,
    },
    /// A signed 64-bit integer.
    Integer,
    /// A 64-bit float.
    Float,
    /// `true`/`false`, `on`/`off`, `yes`/`no` or `1`/`0`.
    Boolean,
    /// One of a fixed set of strings.
    Choice(Vec<String>),
}

/// A field declaration inside an [`ObjectSchema`].
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    name: String,
    kind: FieldKind,
    required: bool,
}

impl FieldSpec {
    fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: true,
        }
    }

    /// A required text field.
    #[must_use]
    pub fn text(name: impl Into<String>) -> Self {
        Self::new(
            name,
            FieldKind::Text {
                min_len: None,
                max_len: None,
            },
        )
    }

    /// A required integer field.
    #[must_use]
    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Integer)
    }

    /// A required float field.
    #[must_use]
    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Float)
    }

    /// A required boolean field.
    #[must_use]
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Boolean)
    }

    /// A required field restricted to `options`.
    #[must_use]
    pub fn choice<I, S>(name: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            name,
            FieldKind::Choice(options.into_iter().map(Into::into).collect()),
        )
    }

    /// Makes the field optional.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Sets a minimum length. Only meaningful for text fields.
    #[must_use]
    pub fn min_len(mut self, min: usize) -> Self {
        if let FieldKind::Text { min_len, .. } = &mut self.kind {
            *min_len = Some(min);
        }
        self
    }

    /// Sets a maximum length. Only meaningful for text fields.
    #[must_use]
    pub fn max_len(mut self, max: usize) -> Self {
        if let FieldKind::Text { max_len, .. } = &mut self.kind {
            *max_len = Some(max);
        }
        self
    }

    /// The field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the field must be present.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// Checks one raw value. `None` means the field was not submitted.
    fn check(&self, raw: Option<&str>) -> Result<Option<FieldValue>, String> {
        let raw = match raw {
            None => return self.absent(),
            Some("") if !matches!(self.kind, FieldKind::Text { .. }) => return self.absent(),
            Some(raw) => raw,
        };

        match &self.kind {
            FieldKind::Text { min_len, max_len } => {
                let len = raw.chars().count();
                if let Some(min) = min_len.filter(|min| len < *min) {
                    return Err(format!("String must contain at least {min} character(s)"));
                }
                if let Some(max) = max_len.filter(|max| len > *max) {
                    return Err(format!("String must contain at most {max} character(s)"));
                }
                Ok(Some(FieldValue::Text(raw.to_string())))
            }
            FieldKind::Integer => raw
                .trim()
                .parse::<i64>()
                .map(|n| Some(FieldValue::Integer(n)))
                .map_err(|_| format!("Expected integer, received \"{raw}\"")),
            FieldKind::Float => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(|n| Some(FieldValue::Float(n)))
                .ok_or_else(|| format!("Expected number, received \"{raw}\"")),
            FieldKind::Boolean => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "on" | "yes" | "1" => Ok(Some(FieldValue::Boolean(true))),
                "false" | "off" | "no" | "0" => Ok(Some(FieldValue::Boolean(false))),
                _ => Err(format!("Expected boolean, received \"{raw}\"")),
            },
            FieldKind::Choice(options) => {
                if options.iter().any(|o| o == raw) {
                    Ok(Some(FieldValue::Text(raw.to_string())))
                } else {
                    let expected = options
                        .iter()
                        .map(|o| format!("'{o}'"))
                        .collect::<Vec<_>>()
                        .join(" | ");
                    Err(format!(
                        "Invalid enum value. Expected {expected}, received '{raw}'"
                    ))
                }
            }
        }
    }

    fn absent(&self) -> Result<Option<FieldValue>, String> {
        if self.required {
            Err("Required".to_string())
        } else {
            Ok(None)
        }
    }
}

/// Coerced values produced by an [`ObjectSchema`], in schema order.
///
/// Optional fields that were not submitted are absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FormValues {
    values: IndexMap<String, FieldValue>,
}

impl FormValues {
    /// The raw coerced value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// A text or choice field.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// An integer field.
    #[must_use]
    pub fn integer(&self, name: &str) -> Option<i64> {
        match self.get(name)? {
            FieldValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// A float field.
    #[must_use]
    pub fn float(&self, name: &str) -> Option<f64> {
        match self.get(name)? {
            FieldValue::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// A boolean field.
    #[must_use]
    pub fn boolean(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            FieldValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Number of present fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when no field is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The values as a JSON object.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.values
                .iter()
                .map(|(k, v)| {
                    let value = match v {
                        FieldValue::Text(s) => serde_json::Value::from(s.as_str()),
                        FieldValue::Integer(n) => serde_json::Value::from(*n),
                        FieldValue::Float(n) => serde_json::Value::from(*n),
                        FieldValue::Boolean(b) => serde_json::Value::from(*b),
                    };
                    (k.clone(), value)
                })
                .collect(),
        )
    }
}

/// A schema built from field declarations.
///
/// Fields not declared are ignored. Repeated keys use the first value.
///
/// ```rust
/// use folio_core::FieldMap;
/// use folio_extract::{FieldSpec, FormSchema, ObjectSchema, Validation};
///
/// let schema = ObjectSchema::new()
///     .field(FieldSpec::text("name"))
///     .field(FieldSpec::integer("qty"));
///
/// let fields: FieldMap = [("qty", "many")].into_iter().collect();
/// let Validation::Invalid(issues) = schema.parse(&fields) else { panic!() };
///
/// assert_eq!(issues.len(), 2);
/// assert_eq!(issues[0].field, "name");
/// assert_eq!(issues[1].field, "qty");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectSchema {
    fields: Vec<FieldSpec>,
}

impl ObjectSchema {
    /// An empty schema, which accepts anything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a field.
    #[must_use]
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    /// Declared fields, in order.
    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Layers serde deserialization into `T` on top of this schema.
    #[must_use]
    pub fn typed<T: DeserializeOwned>(self) -> TypedSchema<T> {
        TypedSchema {
            object: self,
            _output: PhantomData,
        }
    }
}

impl FormSchema for ObjectSchema {
    type Output = FormValues;

    fn parse(&self, fields: &FieldMap) -> Validation<FormValues> {
        let mut values = IndexMap::with_capacity(self.fields.len());
        let mut issues = Vec::new();

        for spec in &self.fields {
            match spec.check(fields.get(&spec.name)) {
                Ok(Some(value)) => {
                    values.insert(spec.name.clone(), value);
                }
                Ok(None) => {}
                Err(message) => issues.push(Issue::new(spec.name.clone(), message)),
            }
        }

        if issues.is_empty() {
            Validation::Valid(FormValues { values })
        } else {
            Validation::Invalid(issues)
        }
    }
}

/// An [`ObjectSchema`] whose values are deserialized into `T`.
///
/// ```rust
/// use folio_core::FieldMap;
/// use folio_extract::{FieldSpec, FormSchema, ObjectSchema};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct NewItem {
///     name: String,
///     qty: Option<i64>,
/// }
///
/// let schema = ObjectSchema::new()
///     .field(FieldSpec::text("name"))
///     .field(FieldSpec::integer("qty").optional())
///     .typed::<NewItem>();
///
/// let fields: FieldMap = [("name", "Buy milk"), ("qty", "2")].into_iter().collect();
/// let item = schema.parse(&fields).into_result().unwrap();
/// assert_eq!(item.name, "Buy milk");
/// assert_eq!(item.qty, Some(2));
/// ```
pub struct TypedSchema<T> {
    object: ObjectSchema,
    _output: PhantomData<fn() -> T>,
}

impl<T> fmt::Debug for TypedSchema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedSchema")
            .field("object", &self.object)
            .field("output", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T> Clone for TypedSchema<T> {
    fn clone(&self) -> Self {
        Self {
            object: self.object.clone(),
            _output: PhantomData,
        }
    }
}

impl<T> FormSchema for TypedSchema<T>
where
    T: DeserializeOwned + Send + 'static,
{
    type Output = T;

    fn parse(&self, fields: &FieldMap) -> Validation<T> {
        match self.object.parse(fields) {
            Validation::Valid(values) => match serde_json::from_value(values.to_json()) {
                Ok(typed) => Validation::Valid(typed),
                Err(err) => Validation::Invalid(vec![Issue::new("", err.to_string())]),
            },
            Validation::Invalid(issues) => Validation::Invalid(issues),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> FieldMap {
        pairs.iter().copied().collect()
    }

    fn issues<T: fmt::Debug>(outcome: Validation<T>) -> Vec<Issue> {
        match outcome {
            Validation::Invalid(issues) => issues,
            Validation::Valid(value) => panic!("expected issues, got {value:?}"),
        }
    }

    #[test]
    fn test_missing_required_field() {
        let schema = ObjectSchema::new().field(FieldSpec::text("todo"));
        let found = issues(schema.parse(&FieldMap::new()));
        assert_eq!(found, vec![Issue::new("todo", "Required")]);
    }

    #[test]
    fn test_reports_every_failing_field() {
        let schema = ObjectSchema::new()
            .field(FieldSpec::text("name").min_len(1))
            .field(FieldSpec::integer("qty"))
            .field(FieldSpec::boolean("done"))
            .field(FieldSpec::choice("filter", ["all", "active", "completed"]))
            .field(FieldSpec::float("price"));
        let found = issues(schema.parse(&fields(&[
            ("name", ""),
            ("qty", "3.5"),
            ("done", "maybe"),
            ("filter", "none"),
            ("price", "1.25"),
        ])));
        let names: Vec<_> = found.iter().map(|i| i.field.as_str()).collect();
        assert_eq!(names, ["name", "qty", "done", "filter"]);
        assert_eq!(found[1].message, "Expected integer, received \"3.5\"");
        assert_eq!(
            found[3].message,
            "Invalid enum value. Expected 'all' | 'active' | 'completed', received 'none'"
        );
    }

    #[test]
    fn test_coerces_declared_types() {
        let schema = ObjectSchema::new()
            .field(FieldSpec::text("name"))
            .field(FieldSpec::integer("qty"))
            .field(FieldSpec::float("price"))
            .field(FieldSpec::boolean("urgent"));
        let values = schema
            .parse(&fields(&[
                ("name", "Buy milk"),
                ("qty", " 2 "),
                ("price", "0.99"),
                ("urgent", "on"),
            ]))
            .into_result()
            .unwrap();
        assert_eq!(values.text("name"), Some("Buy milk"));
        assert_eq!(values.integer("qty"), Some(2));
        assert_eq!(values.float("price"), Some(0.99));
        assert_eq!(values.boolean("urgent"), Some(true));
        assert_eq!(values.text("qty"), None);
    }

    #[test]
    fn test_empty_string_rules() {
        let schema = ObjectSchema::new()
            .field(FieldSpec::text("todo"))
            .field(FieldSpec::integer("page").optional())
            .field(FieldSpec::integer("limit"));
        let found = issues(schema.parse(&fields(&[("todo", ""), ("page", ""), ("limit", "")])));
        assert_eq!(found, vec![Issue::new("limit", "Required")]);
    }

    #[test]
    fn test_optional_absent_field_is_skipped() {
        let schema = ObjectSchema::new().field(FieldSpec::boolean("done").optional());
        let values = schema.parse(&FieldMap::new()).into_result().unwrap();
        assert!(values.is_empty());
        assert_eq!(values.boolean("done"), None);
    }

    #[test]
    fn test_first_of_repeated_keys_wins() {
        let schema = ObjectSchema::new().field(FieldSpec::integer("n"));
        let values = schema
            .parse(&fields(&[("n", "1"), ("n", "x")]))
            .into_result()
            .unwrap();
        assert_eq!(values.integer("n"), Some(1));
    }

    #[test]
    fn test_float_rejects_non_finite() {
        let schema = ObjectSchema::new().field(FieldSpec::float("x"));
        assert!(!schema.parse(&fields(&[("x", "NaN")])).is_valid());
        assert!(!schema.parse(&fields(&[("x", "inf")])).is_valid());
    }

    #[test]
    fn test_max_len_counts_characters() {
        let schema = ObjectSchema::new().field(FieldSpec::text("t").max_len(2));
        assert!(schema.parse(&fields(&[("t", "éé")])).is_valid());
        let found = issues(schema.parse(&fields(&[("t", "abc")])));
        assert_eq!(found[0].message, "String must contain at most 2 character(s)");
    }

    #[test]
    fn test_typed_schema_deserializes() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Filter {
            filter: String,
            page: Option<i64>,
        }
        let schema = ObjectSchema::new()
            .field(FieldSpec::choice("filter", ["all", "active"]))
            .field(FieldSpec::integer("page").optional())
            .typed::<Filter>();
        let parsed = schema.parse(&fields(&[("filter", "active")]));
        assert_eq!(
            parsed,
            Validation::Valid(Filter {
                filter: "active".to_string(),
                page: None
            })
        );
    }

    #[test]
    fn test_typed_schema_mismatch_is_root_issue() {
        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct NeedsCount {
            count: u8,
        }
        let schema = ObjectSchema::new()
            .field(FieldSpec::integer("count"))
            .typed::<NeedsCount>();
        let found = issues(schema.parse(&fields(&[("count", "900")])));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].field, "");
    }

    #[test]
    fn test_values_serialize_in_schema_order() {
        let schema = ObjectSchema::new()
            .field(FieldSpec::text("b"))
            .field(FieldSpec::boolean("a"));
        let values = schema
            .parse(&fields(&[("a", "false"), ("b", "x")]))
            .into_result()
            .unwrap();
        assert_eq!(serde_json::to_string(&values).unwrap(), r#"{"b":"x","a":false}"#);
    }

    #[test]
    fn test_issue_display() {
        assert_eq!(Issue::new("todo", "Required").to_string(), "todo: Required");
        assert_eq!(Issue::new("", "bad shape").to_string(), "bad shape");
    }
}
