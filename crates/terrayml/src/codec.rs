//! generic tree -> json -> yaml
use crate::value::Value;

#[derive(thiserror::Error, Debug)]
pub enum CodecError {
    #[error("Unable to encode json")]
    Json(#[from] serde_json::Error),
    #[error("Unable to encode yaml")]
    Yaml(#[from] serde_yaml::Error),
}

/// Pretty printed json of a generic tree
pub fn to_json(value: &Value) -> Result<String, CodecError> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Re-encode json text as yaml, keeping key order
pub fn json_to_yaml(json: &str) -> Result<String, CodecError> {
    let document: serde_yaml::Value = serde_json::from_str(json)?;
    Ok(serde_yaml::to_string(&document)?)
}

/// Both steps at once
pub fn to_yaml(value: &Value) -> Result<String, CodecError> {
    json_to_yaml(&to_json(value)?)
}
