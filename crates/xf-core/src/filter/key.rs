use chrono::NaiveDate;
use ordered_float::OrderedFloat;

/// A filterable key projected from a record
///
/// One dimension always projects a single variant; the cross-variant
/// ordering exists only so `Key` can be used in ordered collections.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
    /// Calendar date (document date)
    Date(NaiveDate),
    /// Continuous numeric value (text length, coordinates)
    Number(OrderedFloat<f64>),
    /// Discrete integer value (cluster id, record identity, bin index)
    Integer(i64),
    /// Categorical value (language)
    Text(String),
}

impl Key {
    pub fn number(value: f64) -> Self {
        Key::Number(OrderedFloat(value))
    }

    pub fn text(value: impl Into<String>) -> Self {
        Key::Text(value.into())
    }

    /// Numeric view of the key, if it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Key::Number(v) => Some(v.0),
            Key::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Whether two keys come from the same projection kind
    pub fn same_variant(&self, other: &Key) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl From<NaiveDate> for Key {
    fn from(value: NaiveDate) -> Self {
        Key::Date(value)
    }
}

impl From<f64> for Key {
    fn from(value: f64) -> Self {
        Key::number(value)
    }
}

impl From<i64> for Key {
    fn from(value: i64) -> Self {
        Key::Integer(value)
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key::text(value)
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key::Text(value)
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Key::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Key::Number(v) => write!(f, "{}", v.0),
            Key::Integer(v) => write!(f, "{}", v),
            Key::Text(v) => write!(f, "{}", v),
        }
    }
}
