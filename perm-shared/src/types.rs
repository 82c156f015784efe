//! Common types for the permission payload
//!
//! Scalar vocabulary shared by every model: identifiers that arrive either as
//! strings or integers, the two-valued status flags, permission keys, and the
//! closed value set used by open-ended extension maps.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Timestamp type (Unix milliseconds)
pub type Timestamp = i64;

// ── Identifier ──────────────────────────────────────────────────────

/// Identifier that is either a string or an integer on the wire
///
/// The wire variant is preserved: `"42"` stays a string and `42` stays an
/// integer after a round trip. Comparisons across the payload use
/// [`Identifier::normalized`], which renders integers in decimal, so a role
/// listing permission `"42"` resolves to a permission with id `42`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Identifier {
    Int(i64),
    Str(String),
}

impl Identifier {
    /// Canonical string form used for cross-references
    pub fn normalized(&self) -> String {
        match self {
            Self::Int(n) => n.to_string(),
            Self::Str(s) => s.clone(),
        }
    }

    /// Equality under normalization
    pub fn same_as(&self, other: &Identifier) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            _ => self.normalized() == other.normalized(),
        }
    }

    /// Whether this is the top-level parent sentinel (`0`, `""` or `"0"`)
    pub fn is_root_sentinel(&self) -> bool {
        match self {
            Self::Int(n) => *n == 0,
            Self::Str(s) => s.is_empty() || s == "0",
        }
    }

    /// The sentinel used for top-level nodes built by this crate
    pub fn root() -> Self {
        Self::Int(0)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Str(s) if s.trim().is_empty())
    }
}

impl Default for Identifier {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{}", n),
            Self::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Identifier {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for Identifier {
    fn from(n: i32) -> Self {
        Self::Int(n.into())
    }
}

impl From<&str> for Identifier {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Identifier {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl Serialize for Identifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Int(n) => serializer.serialize_i64(*n),
            Self::Str(s) => serializer.serialize_str(s),
        }
    }
}

struct IdentifierVisitor;

impl<'de> Visitor<'de> for IdentifierVisitor {
    type Value = Identifier;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a string or integer identifier")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Identifier, E> {
        Ok(Identifier::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Identifier, E> {
        i64::try_from(v)
            .map(Identifier::Int)
            .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(v), &self))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Identifier, E> {
        Ok(Identifier::Str(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Identifier, E> {
        Ok(Identifier::Str(v))
    }
}

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(IdentifierVisitor)
    }
}

// ── Binary flags ────────────────────────────────────────────────────

/// Marker carried by every out-of-range flag error message
pub(crate) const FLAG_EXPECTED: &str = "expected 0 or 1";

/// Error when a two-valued flag receives anything but 0 or 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid {field} value {value}, expected 0 or 1")]
pub struct InvalidFlag {
    pub field: &'static str,
    pub value: i64,
}

/// Account / role / permission status (0 = disabled, 1 = active)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "i64")]
#[repr(u8)]
pub enum Status {
    Disabled = 0,
    #[default]
    Active = 1,
}

impl Status {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl From<Status> for u8 {
    fn from(s: Status) -> Self {
        s as u8
    }
}

impl TryFrom<i64> for Status {
    type Error = InvalidFlag;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Disabled),
            1 => Ok(Self::Active),
            _ => Err(InvalidFlag {
                field: "status",
                value,
            }),
        }
    }
}

impl TryFrom<u8> for Status {
    type Error = InvalidFlag;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::try_from(i64::from(value))
    }
}

impl From<bool> for Status {
    fn from(active: bool) -> Self {
        if active { Self::Active } else { Self::Disabled }
    }
}

/// Menu visibility (0 = hidden, 1 = shown)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "i64")]
#[repr(u8)]
pub enum Visibility {
    Hidden = 0,
    #[default]
    Shown = 1,
}

impl Visibility {
    pub fn is_shown(&self) -> bool {
        matches!(self, Self::Shown)
    }
}

impl From<Visibility> for u8 {
    fn from(v: Visibility) -> Self {
        v as u8
    }
}

impl TryFrom<i64> for Visibility {
    type Error = InvalidFlag;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Hidden),
            1 => Ok(Self::Shown),
            _ => Err(InvalidFlag {
                field: "visible",
                value,
            }),
        }
    }
}

impl TryFrom<u8> for Visibility {
    type Error = InvalidFlag;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::try_from(i64::from(value))
    }
}

impl From<bool> for Visibility {
    fn from(shown: bool) -> Self {
        if shown { Self::Shown } else { Self::Hidden }
    }
}

// ── Permission key ──────────────────────────────────────────────────

/// Stable permission code, e.g. `sys:user:list`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionKey(pub String);

impl PermissionKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Colon-separated segments (`sys:user:list` → `["sys", "user", "list"]`)
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(':')
    }

    /// Check if this key grants access to the given action key
    ///
    /// `*` grants everything, `sys:user:*` grants every key under `sys:user:`,
    /// anything else must match exactly.
    pub fn grants(&self, action: &str) -> bool {
        if self.0 == "*" {
            return true;
        }
        if let Some(prefix) = self.0.strip_suffix('*')
            && prefix.ends_with(':')
        {
            return action.starts_with(prefix);
        }
        self.0 == action
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for PermissionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PermissionKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for PermissionKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for PermissionKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ── Extension values ────────────────────────────────────────────────

/// Open key/value map (`filterCondition`, `extConfig`)
pub type ExtMap = BTreeMap<String, ExtValue>;

/// Closed set of JSON-like values allowed inside extension maps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtValue {
    Null,
    Bool(bool),
    Integer(i64),
    /// Integers above `i64::MAX`
    UInteger(u64),
    Float(f64),
    String(String),
    List(Vec<ExtValue>),
    Map(ExtMap),
}

impl ExtValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Integer(n) => u64::try_from(*n).ok(),
            Self::UInteger(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<serde_json::Value> for ExtValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Integer(i)
                } else if let Some(u) = n.as_u64() {
                    Self::UInteger(u)
                } else {
                    Self::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => {
                Self::Map(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<ExtValue> for serde_json::Value {
    fn from(value: ExtValue) -> Self {
        use serde_json::Value;
        match value {
            ExtValue::Null => Value::Null,
            ExtValue::Bool(b) => Value::Bool(b),
            ExtValue::Integer(i) => Value::from(i),
            ExtValue::UInteger(u) => Value::from(u),
            // NaN and infinities have no JSON form
            ExtValue::Float(f) => serde_json::Number::from_f64(f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            ExtValue::String(s) => Value::String(s),
            ExtValue::List(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            ExtValue::Map(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<&str> for ExtValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<i64> for ExtValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<bool> for ExtValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_identifier_preserves_wire_variant() {
        let id: Identifier = serde_json::from_str("\"42\"").unwrap();
        assert_eq!(id, Identifier::Str("42".into()));
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"42\"");

        let id: Identifier = serde_json::from_str("42").unwrap();
        assert_eq!(id, Identifier::Int(42));
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");
    }

    #[test]
    fn test_identifier_rejects_other_types() {
        assert!(serde_json::from_str::<Identifier>("1.5").is_err());
        assert!(serde_json::from_str::<Identifier>("true").is_err());
        assert!(serde_json::from_str::<Identifier>("null").is_err());
        assert!(serde_json::from_str::<Identifier>("[1]").is_err());
        assert!(serde_json::from_str::<Identifier>("18446744073709551615").is_err());
    }

    #[test]
    fn test_identifier_normalization() {
        let a = Identifier::Int(42);
        let b = Identifier::from("42");
        assert_ne!(a, b);
        assert!(a.same_as(&b));
        assert_eq!(a.normalized(), "42");
        assert!(!Identifier::from("042").same_as(&a));
    }

    #[test]
    fn test_identifier_root_sentinel() {
        assert!(Identifier::Int(0).is_root_sentinel());
        assert!(Identifier::from("").is_root_sentinel());
        assert!(Identifier::from("0").is_root_sentinel());
        assert!(!Identifier::Int(1).is_root_sentinel());
        assert!(!Identifier::from("root").is_root_sentinel());
    }

    #[test]
    fn test_status_strict_values() {
        assert_eq!(serde_json::from_str::<Status>("0").unwrap(), Status::Disabled);
        assert_eq!(serde_json::from_str::<Status>("1").unwrap(), Status::Active);
        for bad in ["2", "-1", "255", "256", "1.0", "\"1\"", "true"] {
            assert!(serde_json::from_str::<Status>(bad).is_err(), "{bad}");
        }
        assert_eq!(serde_json::to_string(&Status::Disabled).unwrap(), "0");
    }

    #[test]
    fn test_status_error_message() {
        let err = serde_json::from_str::<Status>("2").unwrap_err();
        assert!(err.to_string().contains("invalid status value 2, expected 0 or 1"));

        for bad in ["256", "-1", "70000"] {
            let err = serde_json::from_str::<Status>(bad).unwrap_err();
            assert!(err.to_string().contains(FLAG_EXPECTED), "{bad}: {err}");
        }
        assert_eq!(Status::try_from(1u8).unwrap(), Status::Active);
        assert!(Visibility::try_from(2u8).is_err());
    }

    #[test]
    fn test_visibility_strict_values() {
        assert_eq!(
            serde_json::from_str::<Visibility>("0").unwrap(),
            Visibility::Hidden
        );
        assert_eq!(
            serde_json::from_str::<Visibility>("1").unwrap(),
            Visibility::Shown
        );
        let err = serde_json::from_str::<Visibility>("3").unwrap_err();
        assert!(err.to_string().contains("invalid visible value 3"));
        assert_eq!(serde_json::to_string(&Visibility::Shown).unwrap(), "1");
    }

    #[test]
    fn test_permission_key_grants() {
        assert!(PermissionKey::from("*").grants("sys:user:list"));
        assert!(PermissionKey::from("sys:user:*").grants("sys:user:list"));
        assert!(!PermissionKey::from("sys:user:*").grants("sys:role:list"));
        assert!(!PermissionKey::from("sys:user:*").grants("sys:username"));
        assert!(PermissionKey::from("sys:user:list").grants("sys:user:list"));
        assert!(!PermissionKey::from("sys:user:list").grants("sys:user:add"));
    }

    #[test]
    fn test_permission_key_segments() {
        let key = PermissionKey::from("sys:user:list");
        assert_eq!(key.segments().collect::<Vec<_>>(), vec!["sys", "user", "list"]);
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"sys:user:list\"");
    }

    #[test]
    fn test_ext_value_variants() {
        let map: ExtMap = serde_json::from_value(json!({
            "n": null,
            "b": true,
            "i": 7,
            "f": 1.5,
            "s": "x",
            "l": [1, "two"],
            "m": {"deep": {"deeper": 3}}
        }))
        .unwrap();

        assert!(map["n"].is_null());
        assert_eq!(map["b"].as_bool(), Some(true));
        assert_eq!(map["i"].as_i64(), Some(7));
        assert_eq!(map["f"], ExtValue::Float(1.5));
        assert_eq!(map["s"].as_str(), Some("x"));
        assert_eq!(
            map["l"],
            ExtValue::List(vec![ExtValue::Integer(1), ExtValue::from("two")])
        );
        assert!(matches!(map["m"], ExtValue::Map(_)));
    }

    #[test]
    fn test_ext_value_keeps_large_unsigned() {
        let json = format!("{{\"big\":{},\"max\":{}}}", u64::MAX, i64::MAX);
        let map: ExtMap = serde_json::from_str(&json).unwrap();
        assert_eq!(map["big"], ExtValue::UInteger(u64::MAX));
        assert_eq!(map["max"], ExtValue::Integer(i64::MAX));
        assert_eq!(map["big"].as_u64(), Some(u64::MAX));
        assert_eq!(serde_json::to_string(&map).unwrap(), json);

        let value = json!({"big": u64::MAX});
        assert_eq!(serde_json::Value::from(ExtValue::from(value.clone())), value);
    }

    #[test]
    fn test_ext_value_json_conversion() {
        let value = json!({"deptIds": [1, 2], "active": true, "ratio": 0.5});
        let ext = ExtValue::from(value.clone());
        assert_eq!(serde_json::Value::from(ext), value);
        assert_eq!(
            serde_json::Value::from(ExtValue::Float(f64::NAN)),
            serde_json::Value::Null
        );
    }
}
