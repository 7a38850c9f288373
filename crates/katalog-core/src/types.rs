//! # Record Types
//!
//! The product record as delivered by the catalog endpoint.
//!
//! ## Record Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         ProductRecord                                   │
//! │                                                                         │
//! │  wire name   alias       matched as           may be                    │
//! │  ─────────   ─────       ──────────           ──────                    │
//! │  nama        name        normalized text      absent, null, any JSON    │
//! │  kategori    category    normalized text      absent, null, any JSON    │
//! │  harga       price       digits + normalized  number or numeric string  │
//! │  stok        stock       digits + normalized  number or numeric string  │
//! │  id          -           never matched        opaque                    │
//! │  (others)    -           never matched        preserved untouched       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The shape is owned by the catalog service, not by this crate. Every
//! field is optional and nothing here rejects an odd value: a value that is
//! not an object degrades to an empty record. The wire name wins when both
//! it and its alias are present; the alias is then kept with the other
//! unknown fields.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

// =============================================================================
// Field Value
// =============================================================================

/// A single matchable field as stored by the catalog.
///
/// Prices and stock levels arrive as JSON numbers in some catalogs and as
/// strings (`"28000"`, `"5.000"`) in others. Both are kept exactly as
/// received so that [`FieldValue::to_string`] reproduces the stored text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// A JSON number. Whole floats render without a fraction (`5000.0` as
    /// `"5000"`), everything else with its shortest textual form.
    Number(Number),
    /// A JSON string.
    Text(String),
    /// A JSON boolean.
    Flag(bool),
    /// Anything else (arrays, objects).
    Other(Value),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(n) => write_number(n, f),
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Flag(b) => write!(f, "{}", b),
            FieldValue::Other(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n.into())
    }
}

impl From<u64> for FieldValue {
    fn from(n: u64) -> Self {
        FieldValue::Number(n.into())
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Flag(b)
    }
}

fn write_number(n: &Number, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match n.as_f64() {
        Some(x) if n.is_f64() && x.fract() == 0.0 && x.abs() < 1e21 => {
            if x == 0.0 {
                f.write_str("0")
            } else {
                write!(f, "{:.0}", x)
            }
        }
        _ => write!(f, "{}", n),
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Number(n) => FieldValue::Number(n),
            Value::String(s) => FieldValue::Text(s),
            Value::Bool(b) => FieldValue::Flag(b),
            other => FieldValue::Other(other),
        }
    }
}

/// Text of an optional field; absent fields read as `""`.
pub fn field_text(field: &Option<FieldValue>) -> Cow<'_, str> {
    match field {
        None => Cow::Borrowed(""),
        Some(FieldValue::Text(s)) => Cow::Borrowed(s),
        Some(other) => Cow::Owned(other.to_string()),
    }
}

// =============================================================================
// Product Record
// =============================================================================

/// A product as listed in the remote catalog.
///
/// `Clone` is a deep copy: a cloned record shares nothing with its source,
/// which is what the store relies on when a record is selected.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductRecord {
    /// Identity assigned by the catalog service (opaque).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    /// Display name.
    #[serde(rename = "nama", skip_serializing_if = "Option::is_none")]
    pub name: Option<FieldValue>,

    /// Category label.
    #[serde(rename = "kategori", skip_serializing_if = "Option::is_none")]
    pub category: Option<FieldValue>,

    /// Unit price, numeric or numeric string.
    #[serde(rename = "harga", skip_serializing_if = "Option::is_none")]
    pub price: Option<FieldValue>,

    /// Stock on hand, numeric or numeric string.
    #[serde(rename = "stok", skip_serializing_if = "Option::is_none")]
    pub stock: Option<FieldValue>,

    /// Fields this crate does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProductRecord {
    /// Creates an empty record (every field absent).
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a record out of an arbitrary JSON value.
    ///
    /// Never fails: values that are not objects produce an empty record,
    /// which only matches the empty query. `nama`, `kategori`, `harga` and
    /// `stok` are read first; `name`, `category`, `price` and `stock` only
    /// fill in when the wire name is absent.
    pub fn from_value(value: Value) -> Self {
        let Value::Object(mut fields) = value else {
            return Self::default();
        };

        ProductRecord {
            id: fields.remove("id").filter(|v| !v.is_null()),
            name: take_field(&mut fields, "nama", "name"),
            category: take_field(&mut fields, "kategori", "category"),
            price: take_field(&mut fields, "harga", "price"),
            stock: take_field(&mut fields, "stok", "stock"),
            extra: fields,
        }
    }

    pub fn with_id(mut self, id: impl Into<Value>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<FieldValue>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<FieldValue>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_price(mut self, price: impl Into<FieldValue>) -> Self {
        self.price = Some(price.into());
        self
    }

    pub fn with_stock(mut self, stock: impl Into<FieldValue>) -> Self {
        self.stock = Some(stock.into());
        self
    }

    /// Name as stored, `""` when absent.
    pub fn name_text(&self) -> Cow<'_, str> {
        field_text(&self.name)
    }

    /// Category as stored, `""` when absent.
    pub fn category_text(&self) -> Cow<'_, str> {
        field_text(&self.category)
    }

    /// Price exactly as stored (no separators added), `""` when absent.
    pub fn price_text(&self) -> Cow<'_, str> {
        field_text(&self.price)
    }

    /// Stock exactly as stored, `""` when absent.
    pub fn stock_text(&self) -> Cow<'_, str> {
        field_text(&self.stock)
    }
}

impl<'de> Deserialize<'de> for ProductRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from_value)
    }
}

/// Removes `wire` from `fields`, falling back to `alias` only when `wire`
/// is missing. A `null` reads as absent.
fn take_field(fields: &mut Map<String, Value>, wire: &str, alias: &str) -> Option<FieldValue> {
    let value = match fields.remove(wire) {
        Some(value) => value,
        None => fields.remove(alias)?,
    };
    (!value.is_null()).then(|| FieldValue::from(value))
}

// =============================================================================
// Unit Tests
// =============================================================================
