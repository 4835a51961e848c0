use serde::de::{self, Unexpected};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::constants::features::{NEG, POLARITY_FIELD, POS, REVIEW_FIELD};

pub use crate::types::{ExampleId, MemberPath};

/// Sentiment category attached to each example.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    /// Negative review (class id 0).
    Neg,
    /// Positive review (class id 1).
    Pos,
}

impl Label {
    /// Category name as declared in the feature schema.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Label::Neg => NEG,
            Label::Pos => POS,
        }
    }

    /// Class id in the label feature (`neg` = 0, `pos` = 1).
    pub const fn class_id(&self) -> usize {
        match self {
            Label::Neg => 0,
            Label::Pos => 1,
        }
    }

    /// Collapse a source `polarity` value into a label.
    ///
    /// Only a value numerically equal to zero is negative; any other value,
    /// including `2`, strings and `null`, is positive.
    pub fn from_polarity(polarity: &Value) -> Self {
        let is_zero = match polarity {
            Value::Number(number) => number.as_f64() == Some(0.0),
            Value::Bool(flag) => !flag,
            _ => false,
        };
        if is_zero { Label::Neg } else { Label::Pos }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One decoded source line. Extra fields are ignored.
#[derive(Clone, Debug)]
pub struct RawRecord {
    /// Free-form review text.
    pub review: String,
    /// Source sentiment value; see `Label::from_polarity`.
    pub polarity: Value,
}

impl RawRecord {
    /// Build a record from one parsed line.
    ///
    /// The line must be a JSON object with a string `review` and any
    /// `polarity`. Arrays and scalars are rejected. When a key repeats, the
    /// last occurrence wins.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let mut fields = match value {
            Value::Object(fields) => fields,
            other => {
                return Err(de::Error::invalid_type(unexpected(&other), &"a JSON object"));
            }
        };
        let review = match take_field(&mut fields, REVIEW_FIELD)? {
            Value::String(review) => review,
            other => return Err(de::Error::invalid_type(unexpected(&other), &"a string")),
        };
        let polarity = take_field(&mut fields, POLARITY_FIELD)?;
        Ok(Self { review, polarity })
    }
}

fn take_field(
    fields: &mut Map<String, Value>,
    name: &'static str,
) -> Result<Value, serde_json::Error> {
    fields
        .remove(name)
        .ok_or_else(|| de::Error::missing_field(name))
}

fn unexpected(value: &Value) -> Unexpected<'_> {
    match value {
        Value::Null => Unexpected::Unit,
        Value::Bool(flag) => Unexpected::Bool(*flag),
        Value::Number(_) => Unexpected::Other("number"),
        Value::String(text) => Unexpected::Str(text),
        Value::Array(_) => Unexpected::Seq,
        Value::Object(_) => Unexpected::Map,
    }
}

/// Output unit produced for each source line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    /// Review text, unchanged from the source line.
    pub review: String,
    /// Collapsed sentiment label.
    pub label: Label,
}

impl From<RawRecord> for Example {
    fn from(raw: RawRecord) -> Self {
        Self {
            label: Label::from_polarity(&raw.polarity),
            review: raw.review,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn only_zero_polarity_is_negative() {
        assert_eq!(Label::from_polarity(&json!(0)), Label::Neg);
        assert_eq!(Label::from_polarity(&json!(0.0)), Label::Neg);
        assert_eq!(Label::from_polarity(&json!(false)), Label::Neg);
        assert_eq!(Label::from_polarity(&json!(1)), Label::Pos);
        assert_eq!(Label::from_polarity(&json!(2)), Label::Pos);
        assert_eq!(Label::from_polarity(&json!(-1)), Label::Pos);
        assert_eq!(Label::from_polarity(&json!("0")), Label::Pos);
        assert_eq!(Label::from_polarity(&Value::Null), Label::Pos);
    }

    #[test]
    fn raw_record_ignores_extra_fields() {
        let raw = RawRecord::from_value(json!({
            "film-url": "http://www.allocine.fr/film/1",
            "review": "Superbe film",
            "polarity": 1
        }))
        .unwrap();
        let example = Example::from(raw);
        assert_eq!(example.review, "Superbe film");
        assert_eq!(example.label, Label::Pos);
    }

    #[test]
    fn example_serializes_label_by_name() {
        let example = Example {
            review: "bof".to_string(),
            label: Label::Neg,
        };
        let encoded = serde_json::to_value(&example).unwrap();
        assert_eq!(encoded, json!({"review": "bof", "label": "neg"}));
        assert_eq!(Label::Neg.class_id(), 0);
        assert_eq!(Label::Pos.to_string(), "pos");
    }
}
