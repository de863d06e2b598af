//! 平台附带的原始 extras（键值对）
//!
//! 平台给每次投递附带一组松散类型的键值对。这里用带标签的枚举表示值，
//! 让 payload 编码时的类型分派是穷尽的。

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// 单个 extras 值
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// 无法归类的值，保存其文本形式
    Other(String),
}

impl RawValue {
    /// 值的文本形式（用于不支持类型的兜底输出）
    pub fn to_text(&self) -> String {
        match self {
            RawValue::String(s) | RawValue::Other(s) => s.clone(),
            RawValue::Int(n) => n.to_string(),
            RawValue::Float(f) => f.to_string(),
            RawValue::Bool(b) => b.to_string(),
        }
    }
}

impl From<&Value> for RawValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::String(s) => RawValue::String(s.clone()),
            Value::Bool(b) => RawValue::Bool(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    RawValue::Int(i)
                } else if let Some(f) = n.as_f64() {
                    RawValue::Float(f)
                } else {
                    RawValue::Other(n.to_string())
                }
            }
            other => RawValue::Other(other.to_string()),
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::String(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::String(s)
    }
}

impl From<i64> for RawValue {
    fn from(n: i64) -> Self {
        RawValue::Int(n)
    }
}

impl From<i32> for RawValue {
    fn from(n: i32) -> Self {
        RawValue::Int(n as i64)
    }
}

impl From<f64> for RawValue {
    fn from(f: f64) -> Self {
        RawValue::Float(f)
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        RawValue::Bool(b)
    }
}

/// 按插入顺序保存的 extras
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawExtras {
    entries: Vec<(String, RawValue)>,
}

impl RawExtras {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入键值；已存在的键原位替换
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<RawValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// 链式插入
    pub fn with(mut self, key: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// 取字符串值（只接受字符串类型）
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.get(key)? {
            RawValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// 取 i32 值；超出范围视为缺失
    pub fn get_i32(&self, key: &str) -> Option<i32> {
        match self.get(key)? {
            RawValue::Int(n) => i32::try_from(*n).ok(),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 从 JSON 对象构建；非对象返回 None
    pub fn from_json(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let mut extras = RawExtras::new();
        for (key, value) in object {
            extras.insert(key.clone(), RawValue::from(value));
        }
        Some(extras)
    }
}

impl<K: Into<String>, V: Into<RawValue>> FromIterator<(K, V)> for RawExtras {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut extras = RawExtras::new();
        for (k, v) in iter {
            extras.insert(k, v);
        }
        extras
    }
}

impl<'de> Deserialize<'de> for RawExtras {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        RawExtras::from_json(&value)
            .ok_or_else(|| serde::de::Error::custom("extras must be a JSON object"))
    }
}

impl Serialize for RawExtras {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            match value {
                RawValue::String(s) | RawValue::Other(s) => map.serialize_entry(key, s)?,
                RawValue::Int(n) => map.serialize_entry(key, n)?,
                RawValue::Float(f) => map.serialize_entry(key, f)?,
                RawValue::Bool(b) => map.serialize_entry(key, b)?,
            }
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insert_replaces_in_place() {
        let mut extras = RawExtras::new();
        extras.insert("a", 1);
        extras.insert("b", "x");
        extras.insert("a", 2);

        let keys: Vec<&str> = extras.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(extras.get("a"), Some(&RawValue::Int(2)));
    }

    #[test]
    fn test_typed_accessors() {
        let extras = RawExtras::new()
            .with("notification_id", 7)
            .with("tag", "daily")
            .with("huge", i64::MAX);

        assert_eq!(extras.get_i32("notification_id"), Some(7));
        assert_eq!(extras.get_str("tag"), Some("daily"));
        // 类型不符时返回 None
        assert_eq!(extras.get_str("notification_id"), None);
        assert_eq!(extras.get_i32("tag"), None);
        // 超出 i32 范围
        assert_eq!(extras.get_i32("huge"), None);
    }

    #[test]
    fn test_from_json_maps_unsupported_to_other() {
        let value = json!({
            "s": "text",
            "n": 100,
            "f": 1.5,
            "b": true,
            "nil": null,
            "arr": [1, 2]
        });
        let extras = RawExtras::from_json(&value).unwrap();

        assert_eq!(extras.get("s"), Some(&RawValue::String("text".into())));
        assert_eq!(extras.get("n"), Some(&RawValue::Int(100)));
        assert_eq!(extras.get("f"), Some(&RawValue::Float(1.5)));
        assert_eq!(extras.get("b"), Some(&RawValue::Bool(true)));
        assert_eq!(extras.get("nil"), Some(&RawValue::Other("null".into())));
        assert_eq!(extras.get("arr"), Some(&RawValue::Other("[1,2]".into())));
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        assert!(RawExtras::from_json(&json!([1, 2])).is_none());
        assert!(serde_json::from_str::<RawExtras>("\"text\"").is_err());
    }

    #[test]
    fn test_deserialize_keeps_input_order() {
        let extras: RawExtras = serde_json::from_str(r#"{"z": 1, "a": 2, "m": 3}"#).unwrap();
        let keys: Vec<&str> = extras.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }
}
