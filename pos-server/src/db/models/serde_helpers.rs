//! RecordId 的 serde 适配
//!
//! API 与存储统一使用 "table:key" 文本形式；反序列化同时接受文本和
//! SurrealDB 原生形式，这样同一个模型既能收 JSON 请求也能读查询结果。

use serde::de::{MapAccess, Visitor, value::MapAccessDeserializer};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use surrealdb::RecordId;

/// 缺省为 true 的布尔反序列化 (null 和缺失都视为 true)
pub fn bool_true<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = Option::<bool>::deserialize(deserializer)?;
    Ok(value.unwrap_or(true))
}

/// 文本或原生形式都能解出的 RecordId
struct WireId(RecordId);

impl<'de> Deserialize<'de> for WireId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct WireIdVisitor;

        impl<'de> Visitor<'de> for WireIdVisitor {
            type Value = WireId;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("record id as 'table:key' text or native form")
            }

            fn visit_str<E: serde::de::Error>(self, text: &str) -> Result<WireId, E> {
                match text.parse::<RecordId>() {
                    Ok(id) => Ok(WireId(id)),
                    Err(_) => Err(E::custom(format_args!("malformed record id {text:?}"))),
                }
            }

            fn visit_map<A: MapAccess<'de>>(self, entries: A) -> Result<WireId, A::Error> {
                let id = RecordId::deserialize(MapAccessDeserializer::new(entries))?;
                Ok(WireId(id))
            }
        }

        deserializer.deserialize_any(WireIdVisitor)
    }
}

/// RecordId 的 Display 文本包装，供 serialize_some 使用
struct AsText<'a>(&'a RecordId);

impl Serialize for AsText<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self.0)
    }
}

/// 必填 RecordId 字段: `#[serde(with = "serde_helpers::record_id")]`
pub mod record_id {
    use super::*;

    pub fn serialize<S: Serializer>(id: &RecordId, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(id)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<RecordId, D::Error> {
        Ok(WireId::deserialize(deserializer)?.0)
    }
}

/// 可选 RecordId 字段: `#[serde(with = "serde_helpers::option_record_id")]`
pub mod option_record_id {
    use super::*;

    pub fn serialize<S: Serializer>(
        id: &Option<RecordId>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match id {
            Some(id) => serializer.serialize_some(&AsText(id)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<RecordId>, D::Error> {
        let wire = Option::<WireId>::deserialize(deserializer)?;
        Ok(wire.map(|w| w.0))
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use surrealdb::RecordId;

    #[derive(Serialize, Deserialize)]
    struct Row {
        #[serde(with = "super::record_id")]
        id: RecordId,
        #[serde(default, with = "super::option_record_id")]
        parent: Option<RecordId>,
    }

    #[test]
    fn record_ids_travel_as_text() {
        let json = r#"{"id":"product:p1","parent":"category:c1"}"#;
        let row: Row = serde_json::from_str(json).expect("parse row");
        assert_eq!(row.id, RecordId::from(("product", "p1")));

        let out = serde_json::to_string(&row).expect("serialize row");
        assert_eq!(out, json);
    }

    #[test]
    fn missing_optional_id_is_none() {
        let row: Row = serde_json::from_str(r#"{"id":"product:p1"}"#).expect("parse row");
        assert!(row.parent.is_none());
    }

    #[test]
    fn malformed_text_is_rejected() {
        assert!(serde_json::from_str::<Row>(r#"{"id":"no-table-part"}"#).is_err());
    }
}
