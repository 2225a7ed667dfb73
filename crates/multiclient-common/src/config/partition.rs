use crate::error::{MulticlientError, Result};
use serde_json::{json, Map, Value};

use super::liteserver::LiteServerDescriptor;

const DHT_FIELD: &str = "dht";
const TYPE_FIELD: &str = "@type";
const VALIDATOR_FIELD: &str = "validator";
const LITESERVERS_FIELD: &str = "liteservers";

/// A parsed global config.
///
/// Only the fields every per-liteserver document needs are kept. Each one is
/// held as a raw JSON value so that partitioned documents carry them
/// unchanged, including fields this crate knows nothing about.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalConfig {
    dht: Value,
    type_tag: Value,
    validator: Value,
    liteservers: Vec<Value>,
}

impl GlobalConfig {
    /// Parses a global config document.
    ///
    /// # Errors
    ///
    /// - `ConfigParse` if the text is not valid JSON
    /// - `InvalidConfig` if the document is not an object or a required field
    ///   is missing or has the wrong JSON type
    pub fn parse(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    /// Builds a global config from an already decoded JSON value.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut object) = value else {
            return Err(MulticlientError::InvalidConfig(
                "global config must be a JSON object".to_string(),
            ));
        };

        let dht = take_field(&mut object, DHT_FIELD, Value::is_object, "object")?;
        let type_tag = take_field(&mut object, TYPE_FIELD, Value::is_string, "string")?;
        let validator = take_field(&mut object, VALIDATOR_FIELD, Value::is_object, "object")?;
        let liteservers = match take_field(&mut object, LITESERVERS_FIELD, Value::is_array, "array")? {
            Value::Array(items) => items,
            _ => {
                return Err(MulticlientError::InvalidConfig(
                    "field 'liteservers' must be a JSON array".to_string(),
                ))
            }
        };

        Ok(Self {
            dht,
            type_tag,
            validator,
            liteservers,
        })
    }

    /// Number of liteserver entries.
    pub fn liteserver_count(&self) -> usize {
        self.liteservers.len()
    }

    /// Raw liteserver entries in document order.
    pub fn liteservers(&self) -> &[Value] {
        &self.liteservers
    }

    /// Typed view of the liteserver entries, in document order.
    pub fn liteserver_descriptors(&self) -> Result<Vec<LiteServerDescriptor>> {
        self.liteservers
            .iter()
            .map(|entry| {
                serde_json::from_value(entry.clone()).map_err(|e| {
                    MulticlientError::InvalidConfig(format!("malformed liteserver entry: {}", e))
                })
            })
            .collect()
    }

    /// Splits the config into one document per liteserver.
    ///
    /// Every document carries `dht`, `@type` and `validator` verbatim and a
    /// `liteservers` array holding exactly the i-th original entry. Order is
    /// preserved, so index `i` of the result addresses liteserver `i`.
    ///
    /// # Errors
    ///
    /// Returns `NoLiteServers` when the config lists no liteservers; a
    /// multiclient without routes is useless.
    pub fn partition(&self) -> Result<Vec<Value>> {
        if self.liteservers.is_empty() {
            return Err(MulticlientError::NoLiteServers);
        }

        Ok(self
            .liteservers
            .iter()
            .map(|liteserver| {
                json!({
                    DHT_FIELD: self.dht,
                    TYPE_FIELD: self.type_tag,
                    VALIDATOR_FIELD: self.validator,
                    LITESERVERS_FIELD: [liteserver],
                })
            })
            .collect())
    }
}

/// Parses `global_config` and renders one serialized document per liteserver.
pub fn split_global_config_by_liteservers(global_config: &str) -> Result<Vec<String>> {
    GlobalConfig::parse(global_config)?
        .partition()?
        .iter()
        .map(|doc| serde_json::to_string(doc).map_err(MulticlientError::from))
        .collect()
}

fn take_field(
    object: &mut Map<String, Value>,
    name: &str,
    has_type: fn(&Value) -> bool,
    type_name: &str,
) -> Result<Value> {
    let value = object
        .remove(name)
        .ok_or_else(|| MulticlientError::InvalidConfig(format!("missing field '{}'", name)))?;

    if !has_type(&value) {
        return Err(MulticlientError::InvalidConfig(format!(
            "field '{}' must be a JSON {}",
            name, type_name
        )));
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config(liteservers: Value) -> Value {
        json!({
            "@type": "config.global",
            "dht": {
                "@type": "dht.config.global",
                "k": 6,
                "a": 3,
                "static_nodes": { "@type": "dht.nodes", "nodes": [] }
            },
            "liteservers": liteservers,
            "validator": {
                "@type": "validator.config.global",
                "zero_state": { "workchain": -1, "shard": -9223372036854775808i64, "seqno": 0 },
                "init_block": { "workchain": -1, "seqno": 34835953 }
            }
        })
    }

    fn liteserver(ip: i64, port: u16) -> Value {
        json!({
            "ip": ip,
            "port": port,
            "id": { "@type": "pub.ed25519", "key": format!("key-{}", port) }
        })
    }

    #[test]
    fn test_partition_yields_one_document_per_liteserver() {
        let entries = vec![
            liteserver(1137658550, 4924),
            liteserver(-2018135749, 53312),
            liteserver(84478511, 19949),
        ];
        let original = sample_config(Value::Array(entries.clone()));
        let config = GlobalConfig::from_value(original.clone()).unwrap();

        let docs = config.partition().unwrap();
        assert_eq!(docs.len(), 3);

        for (i, doc) in docs.iter().enumerate() {
            assert_eq!(doc["dht"], original["dht"]);
            assert_eq!(doc["@type"], original["@type"]);
            assert_eq!(doc["validator"], original["validator"]);
            assert_eq!(doc["liteservers"], json!([entries[i].clone()]));
        }
    }

    #[test]
    fn test_partition_keeps_unknown_liteserver_fields() {
        let mut entry = liteserver(1, 1);
        entry["provided"] = json!("Beavis");
        let config = GlobalConfig::from_value(sample_config(json!([entry.clone()]))).unwrap();

        let docs = config.partition().unwrap();
        assert_eq!(docs[0]["liteservers"][0], entry);
    }

    #[test]
    fn test_partition_empty_liteservers_fails() {
        let config = GlobalConfig::from_value(sample_config(json!([]))).unwrap();
        assert!(matches!(config.partition(), Err(MulticlientError::NoLiteServers)));
    }

    #[test]
    fn test_missing_field_is_invalid_config() {
        let mut value = sample_config(json!([liteserver(1, 1)]));
        value.as_object_mut().unwrap().remove("validator");

        match GlobalConfig::from_value(value) {
            Err(MulticlientError::InvalidConfig(msg)) => assert!(msg.contains("validator")),
            other => panic!("expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_field_type_is_invalid_config() {
        let mut value = sample_config(json!([liteserver(1, 1)]));
        value["liteservers"] = json!({ "not": "an array" });

        match GlobalConfig::from_value(value) {
            Err(MulticlientError::InvalidConfig(msg)) => assert!(msg.contains("array")),
            other => panic!("expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_non_object_document_is_invalid_config() {
        assert!(matches!(
            GlobalConfig::from_value(json!([1, 2, 3])),
            Err(MulticlientError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_garbage_text_is_parse_error() {
        assert!(matches!(
            GlobalConfig::parse("{ not json"),
            Err(MulticlientError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_split_renders_parseable_documents() {
        let text = sample_config(json!([liteserver(1, 1), liteserver(2, 2)])).to_string();
        let docs = split_global_config_by_liteservers(&text).unwrap();
        assert_eq!(docs.len(), 2);

        // Each partitioned document is itself a valid single-liteserver config
        for doc in &docs {
            let reparsed = GlobalConfig::parse(doc).unwrap();
            assert_eq!(reparsed.liteserver_count(), 1);
        }
    }

    #[test]
    fn test_liteserver_descriptors() {
        let config =
            GlobalConfig::from_value(sample_config(json!([liteserver(1137658550, 4924)]))).unwrap();
        let descriptors = config.liteserver_descriptors().unwrap();
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].port, 4924);
        assert_eq!(descriptors[0].id.key, "key-4924");
    }
}
