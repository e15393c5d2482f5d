pub mod normalize;

pub use self::normalize::normalize;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

// Integer magnitudes above 2^53 lose precision through f64; mixed
// integer/float comparisons outside this window return None.
const F64_SAFE_I64: i64 = 1i64 << 53;
const F64_SAFE_U64: u64 = 1u64 << 53;

///
/// Value
///
/// The scalar/collection vocabulary condition nodes and sort keys speak.
/// `Null` models an explicitly absent field value (the SQL-null case);
/// a field missing from a record entirely is a separate condition handled
/// at evaluation time.
///
/// The serde encoding is externally tagged, so a serialized value is
/// self-describing and decodes back to the same variant.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    /// Ordered list of values; the right-hand side of membership operators.
    List(Vec<Self>),
    Null,
}

impl Value {
    ///
    /// CONSTRUCTION
    ///

    /// Build a `Value::List` from owned items.
    pub fn from_list<T>(items: Vec<T>) -> Self
    where
        T: Into<Self>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    ///
    /// TYPES
    ///

    /// Returns true for the variants numeric comparison supports.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Uint(_) | Self::Float(_))
    }

    /// Returns true if the value is Text.
    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    /// Stable variant name used in diagnostics.
    #[must_use]
    pub const fn variant_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "Bool",
            Self::Int(_) => "Int",
            Self::Uint(_) => "Uint",
            Self::Float(_) => "Float",
            Self::Text(_) => "Text",
            Self::Date(_) => "Date",
            Self::DateTime(_) => "DateTime",
            Self::List(_) => "List",
            Self::Null => "Null",
        }
    }

    ///
    /// CONVERSION
    ///

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let Self::Text(s) = self {
            Some(s.as_str())
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        if let Self::List(xs) = self {
            Some(xs.as_slice())
        } else {
            None
        }
    }

    /// Canonical textual rendering used when text operators are applied to
    /// non-text scalars. Collections have no rendering.
    #[must_use]
    pub fn render_text(&self) -> Option<String> {
        match self {
            Self::Bool(b) => Some(b.to_string()),
            Self::Int(i) => Some(i.to_string()),
            Self::Uint(u) => Some(u.to_string()),
            Self::Float(f) => Some(f.to_string()),
            Self::Text(s) => Some(s.clone()),
            Self::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
            Self::DateTime(dt) => Some(dt.format("%Y-%m-%dT%H:%M:%S").to_string()),
            Self::List(_) | Self::Null => None,
        }
    }

    ///
    /// COMPARISON
    ///

    /// Cross-width numeric comparison; None if either side is non-numeric or
    /// the comparison would pass through a lossy f64 conversion.
    #[must_use]
    pub fn cmp_numeric(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::Uint(a), Self::Uint(b)) => Some(a.cmp(b)),
            (Self::Int(a), Self::Uint(b)) => Some(i128::from(*a).cmp(&i128::from(*b))),
            (Self::Uint(a), Self::Int(b)) => Some(i128::from(*a).cmp(&i128::from(*b))),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            (Self::Float(a), _) => a.partial_cmp(&other.to_f64_lossless()?),
            (_, Self::Float(b)) => self.to_f64_lossless()?.partial_cmp(b),
            _ => None,
        }
    }

    /// Ordering between identical orderable variants. Text is lexical.
    /// Returns None for mismatched or non-orderable variants.
    #[must_use]
    pub fn strict_order_cmp(left: &Self, right: &Self) -> Option<Ordering> {
        match (left, right) {
            (Self::Bool(a), Self::Bool(b)) => Some(a.cmp(b)),
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::Uint(a), Self::Uint(b)) => Some(a.cmp(b)),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            (Self::Text(a), Self::Text(b)) => Some(a.cmp(b)),
            (Self::Date(a), Self::Date(b)) => Some(a.cmp(b)),
            (Self::DateTime(a), Self::DateTime(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Equality with numeric widening. Null equals only Null.
    #[must_use]
    pub fn loose_eq(left: &Self, right: &Self) -> bool {
        if left.is_numeric() && right.is_numeric() {
            return left.cmp_numeric(right) == Some(Ordering::Equal);
        }

        left == right
    }

    #[expect(clippy::cast_precision_loss)]
    fn to_f64_lossless(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) if (-F64_SAFE_I64..=F64_SAFE_I64).contains(i) => Some(*i as f64),
            Self::Uint(u) if *u <= F64_SAFE_U64 => Some(*u as f64),
            _ => None,
        }
    }

    ///
    /// TEXT OPERATIONS
    ///
    /// Ordinal (case-sensitive) matching; both sides must be Text.
    ///

    fn text_op(&self, other: &Self, f: impl Fn(&str, &str) -> bool) -> Option<bool> {
        let (a, b) = (self.as_text()?, other.as_text()?);
        Some(f(a, b))
    }

    /// Check whether `needle` is a substring of `self`.
    #[must_use]
    pub fn text_contains(&self, needle: &Self) -> Option<bool> {
        self.text_op(needle, |a, b| a.contains(b))
    }

    /// Check whether `self` starts with `needle`.
    #[must_use]
    pub fn text_starts_with(&self, needle: &Self) -> Option<bool> {
        self.text_op(needle, |a, b| a.starts_with(b))
    }

    /// Check whether `self` ends with `needle`.
    #[must_use]
    pub fn text_ends_with(&self, needle: &Self) -> Option<bool> {
        self.text_op(needle, |a, b| a.ends_with(b))
    }

    ///
    /// COLLECTIONS
    ///

    /// Returns true if `self` exists inside the provided list, with numeric
    /// widening on elements. None if `haystack` is not a list.
    #[must_use]
    pub fn in_list(&self, haystack: &Self) -> Option<bool> {
        let Self::List(items) = haystack else {
            return None;
        };

        Some(items.iter().any(|item| Self::loose_eq(item, self)))
    }
}

macro_rules! impl_from_for {
    ( $( $type:ty => $variant:ident ),* $(,)? ) => {
        $(
            impl From<$type> for Value {
                fn from(v: $type) -> Self {
                    Self::$variant(v.into())
                }
            }
        )*
    };
}

impl_from_for! {
    bool          => Bool,
    i8            => Int,
    i16           => Int,
    i32           => Int,
    i64           => Int,
    u8            => Uint,
    u16           => Uint,
    u32           => Uint,
    u64           => Uint,
    f32           => Float,
    f64           => Float,
    &str          => Text,
    String        => Text,
    NaiveDate     => Date,
    NaiveDateTime => DateTime,
}

impl From<Vec<Self>> for Value {
    fn from(vec: Vec<Self>) -> Self {
        Self::List(vec)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Null, Into::into)
    }
}
