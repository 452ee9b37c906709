//! generic tree representation
//!
//! Every source file is turned into a generic tree before anything else happens to it.
//! The tree contains the following data types
//! - null
//! - boolean (true/false)
//! - integer (signed, i64)
//! - decimal (f64)
//! - string (utf-8)
//! - array ("list" of values)
//! - object (order-preserving "map"/"dictionary", where the key is of type string)
//!
//! ## Shape
//!
//! The tree keeps the shape classic HCL decoders produce. Blocks are not merged by type, every
//! block is appended to a list under its identifier and every label adds one more level of
//! `[ { label: ... } ]`:
//!
//! ```hcl
//! resource "aws_instance" "web" {
//!   ami = "ami-123"
//! }
//! ```
//!
//! becomes
//!
//! ```json
//! { "resource": [ { "aws_instance": [ { "web": [ { "ami": "ami-123" } ] } ] } ] }
//! ```
//!
//! Expressions that can not be represented as data (variables, function calls, ...) are kept as
//! interpolation strings: `ami = var.ami` turns into `"${var.ami}"`.
use hcl::{Expression, ObjectKey, Structure, TemplateExpr};
use serde::{
    ser::{SerializeMap, SerializeSeq},
    Serializer,
};

/// Ordered map used for objects
pub type Map = indexmap::IndexMap<String, Value>;

/// All possible value types
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Decimal(f64),
    String(String),
    Array(Vec<Value>),
    Object(Map),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<Map> for Value {
    fn from(value: Map) -> Self {
        Self::Object(value)
    }
}

impl From<hcl::Number> for Value {
    fn from(value: hcl::Number) -> Self {
        if let Some(int) = value.as_i64() {
            return Value::Integer(int);
        }

        // u64 beyond i64::MAX is still representable as a float
        value.as_f64().map_or(Value::Null, Value::Decimal)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::Array(value.into_iter().map(Into::into).collect())
    }
}

/// Convert a parsed hcl body into a generic tree
pub fn from_body(body: hcl::Body) -> Result<Map, hcl::Error> {
    let mut map = Map::new();

    for structure in body {
        match structure {
            Structure::Attribute(attribute) => {
                map.insert(attribute.key.to_string(), from_expression(attribute.expr)?);
            }
            Structure::Block(block) => {
                let mut value = Value::Object(from_body(block.body)?);
                for label in block.labels.iter().rev() {
                    let mut wrapper = Map::new();
                    wrapper.insert(label.as_str().to_owned(), Value::Array(vec![value]));
                    value = Value::Object(wrapper);
                }

                let slot = map
                    .entry(block.identifier.to_string())
                    .or_insert_with(|| Value::Array(vec![]));
                match slot {
                    Value::Array(blocks) => blocks.push(value),
                    // an attribute with the same name came first, the block wins
                    other => *other = Value::Array(vec![value]),
                }
            }
        }
    }

    Ok(map)
}

/// Convert a single hcl expression
pub fn from_expression(expression: Expression) -> Result<Value, hcl::Error> {
    let value = match expression {
        Expression::Null => Value::Null,
        Expression::Bool(bool) => bool.into(),
        Expression::Number(num) => num.into(),
        Expression::String(s) => s.into(),
        Expression::Array(array) => Value::Array(
            array
                .into_iter()
                .map(from_expression)
                .collect::<Result<_, _>>()?,
        ),
        Expression::Object(object) => Value::Object(
            object
                .into_iter()
                .map(|(key, value)| Ok((object_key(key), from_expression(value)?)))
                .collect::<Result<_, hcl::Error>>()?,
        ),
        Expression::TemplateExpr(template) => match *template {
            TemplateExpr::QuotedString(s) => s.into(),
            TemplateExpr::Heredoc(heredoc) => heredoc.template.into(),
        },
        other => format!("${{{}}}", hcl::format::to_string(&other)?).into(),
    };

    Ok(value)
}

fn object_key(key: ObjectKey) -> String {
    match key {
        ObjectKey::Expression(Expression::String(s)) => s,
        other => other.to_string(),
    }
}

impl serde::ser::Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Boolean(value) => serializer.serialize_bool(*value),
            Value::Integer(value) => serializer.serialize_i64(*value),
            Value::Decimal(value) => serializer.serialize_f64(*value),
            Value::String(value) => serializer.serialize_str(value),
            Value::Array(value) => {
                let mut ser = serializer.serialize_seq(Some(value.len()))?;
                for element in value {
                    ser.serialize_element(element)?;
                }
                ser.end()
            }
            Value::Object(value) => {
                let mut ser = serializer.serialize_map(Some(value.len()))?;
                for (element_key, element_value) in value {
                    ser.serialize_entry(element_key, element_value)?;
                }
                ser.end()
            }
        }
    }
}
