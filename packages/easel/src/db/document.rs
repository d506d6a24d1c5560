//! Document model shared by every store backend.

use std::{cmp::Ordering, str::FromStr};

use bon::Builder;
use clients::easel::{Document, field};
use color_eyre::{
    Result,
    eyre::{Context, bail},
};
use derive_more::{Debug, Display};
use enum_assoc::Assoc;
use serde_json::Value;
use uuid::Uuid;

/// A named bucket of documents.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Display, Assoc)]
#[func(pub const fn table(&self) -> &'static str)]
#[display("{}", self.table())]
pub enum Collection {
    #[assoc(table = "artwork")]
    Artworks,

    #[assoc(table = "gallery_entry")]
    Gallery,

    #[assoc(table = "favorite")]
    Favorites,

    /// No handler reads or writes users.
    #[assoc(table = "app_user")]
    Users,
}

/// Store-generated document identifier.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display)]
#[debug("{_0}")]
pub struct DocumentId(Uuid);

impl DocumentId {
    /// Generate a fresh identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for DocumentId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl FromStr for DocumentId {
    type Err = color_eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .with_context(|| format!("parse document id: {s:?}"))
    }
}

/// A document as held by the store: its identifier plus the stored fields.
#[derive(Clone, PartialEq, Debug)]
pub struct StoredDocument {
    pub id: DocumentId,
    pub fields: Document,
}

impl StoredDocument {
    /// Render the document for API consumers, with the id under `_id`.
    pub fn into_document(self) -> Document {
        let mut document = self.fields;
        document.insert(field::ID.to_string(), Value::String(self.id.to_string()));
        document
    }

    /// Look up a top-level field.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

/// Which documents an operation applies to.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub enum Filter {
    #[default]
    All,

    /// The document with this identifier.
    Id(DocumentId),

    /// Documents whose top-level field is the given string.
    Field { name: &'static str, value: String },
}

impl Filter {
    pub fn field(name: &'static str, value: impl Into<String>) -> Self {
        Self::Field {
            name,
            value: value.into(),
        }
    }

    /// Filter on the field if a non-empty value is provided, otherwise match
    /// everything.
    pub fn field_if_some(name: &'static str, value: Option<String>) -> Self {
        match value {
            Some(value) if !value.is_empty() => Self::field(name, value),
            _ => Self::All,
        }
    }

    /// Whether the document satisfies this filter.
    ///
    /// Field filters compare strings exactly; a field holding a number or any
    /// other non-string value never matches.
    pub fn matches(&self, document: &StoredDocument) -> bool {
        match self {
            Filter::All => true,
            Filter::Id(id) => document.id == *id,
            Filter::Field { name, value } => document
                .get(name)
                .and_then(Value::as_str)
                .is_some_and(|field| field == value),
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Order {
    Ascending,
    Descending,
}

/// Sort documents by a top-level field. Documents missing the field always
/// come last, whichever the order.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Sort {
    pub field: &'static str,
    pub order: Order,
}

impl Sort {
    pub const fn descending(field: &'static str) -> Self {
        Self {
            field,
            order: Order::Descending,
        }
    }

    pub const fn ascending(field: &'static str) -> Self {
        Self {
            field,
            order: Order::Ascending,
        }
    }

    /// Compare two documents under this sort.
    pub fn compare(&self, a: &StoredDocument, b: &StoredDocument) -> Ordering {
        match (a.get(self.field), b.get(self.field)) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => match self.order {
                Order::Ascending => compare_values(a, b),
                Order::Descending => compare_values(a, b).reverse(),
            },
        }
    }
}

/// Parameters of a multi-document read.
///
/// Results without a sort come back in insertion order; ties under a sort
/// keep insertion order as well.
#[derive(Clone, PartialEq, Eq, Debug, Default, Builder)]
pub struct Find {
    #[builder(default)]
    pub filter: Filter,
    pub sort: Option<Sort>,
    pub limit: Option<usize>,
}

impl Find {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn matching(filter: Filter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }
}

/// A single-field modification applied to a stored document.
#[derive(Clone, PartialEq, Debug)]
pub enum Update {
    /// Append the value to the array field unless it is already present.
    /// A missing field is treated as an empty array.
    AddToSet { field: &'static str, value: Value },

    /// Remove every occurrence of the value from the array field.
    /// A missing field is left missing.
    Pull { field: &'static str, value: Value },

    /// Add to the numeric field. A missing field is treated as zero.
    Inc { field: &'static str, by: i64 },
}

impl Update {
    /// Apply the modification in place.
    ///
    /// Fails without modifying the document if the field holds a value of the
    /// wrong type.
    pub fn apply(&self, document: &mut Document) -> Result<()> {
        match self {
            Update::AddToSet { field, value } => {
                let entry = document
                    .entry(field.to_string())
                    .or_insert_with(|| Value::Array(Vec::new()));
                let Value::Array(items) = entry else {
                    bail!("cannot add to non-array field {field:?}");
                };
                if !items.contains(value) {
                    items.push(value.clone());
                }
            }
            Update::Pull { field, value } => match document.get_mut(*field) {
                None => {}
                Some(Value::Array(items)) => items.retain(|item| item != value),
                Some(_) => bail!("cannot pull from non-array field {field:?}"),
            },
            Update::Inc { field, by } => {
                let next = match document.get(*field) {
                    None => Value::from(*by),
                    Some(Value::Number(n)) => match n.as_i64() {
                        Some(current) => match current.checked_add(*by) {
                            Some(sum) => Value::from(sum),
                            None => bail!("increment of field {field:?} overflows"),
                        },
                        None => match n.as_f64() {
                            Some(current) => Value::from(current + *by as f64),
                            None => bail!("cannot increment field {field:?}: {n}"),
                        },
                    },
                    Some(other) => bail!("cannot increment non-numeric field {field:?}: {other}"),
                };
                document.insert(field.to_string(), next);
            }
        }
        Ok(())
    }

    /// Apply each modification in order; all-or-nothing.
    pub fn apply_all(updates: &[Update], document: &mut Document) -> Result<()> {
        let mut working = document.clone();
        for update in updates {
            update.apply(&mut working)?;
        }
        *document = working;
        Ok(())
    }
}

/// Total order over JSON values. Values of different types are ranked like
/// Postgres `jsonb`: null < string < number < boolean < array < object.
/// Strings compare bytewise, not by database collation. Arrays and objects
/// compare equal among themselves.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    fn rank(value: &Value) -> u8 {
        match value {
            Value::Null => 0,
            Value::String(_) => 1,
            Value::Number(_) => 2,
            Value::Bool(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }

    match (a, b) {
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => {
            match (a.as_f64(), b.as_f64()) {
                (Some(a), Some(b)) => a.total_cmp(&b),
                _ => Ordering::Equal,
            }
        }
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        _ => rank(a).cmp(&rank(b)),
    }
}
