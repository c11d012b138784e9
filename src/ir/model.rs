//! Core record model for the object stream export.
//!
//! These shapes mirror the reflective JSON dump of the upstream object
//! stream: every serialized object is wrapped in a `{"class": ..., "fields":
//! {...}}` envelope, and a labeled object carries its regions under
//! `fields.alRegions`. Unknown sibling keys are tolerated and ignored.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};

/// One labeled object record from the export's object array.
#[derive(Clone, Debug, Deserialize)]
pub struct ObjectRecord {
    pub fields: ObjectFields,
}

/// The reflected field map of an object record.
#[derive(Clone, Debug, Deserialize)]
pub struct ObjectFields {
    /// Sub-regions of the object. Exactly one is required downstream; the
    /// count is validated by the pipeline, not at decode time, so that the
    /// error can name the offending object.
    #[serde(rename = "alRegions", default)]
    pub regions: Vec<RegionRecord>,
}

/// The envelope around one region's field map.
#[derive(Clone, Debug, Deserialize)]
pub struct RegionRecord {
    pub fields: Region,
}

/// One labeled area: parallel coordinate arrays where pair `i` is one
/// occupied pixel `(x[i], y[i])` on the integer pixel grid.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct Region {
    pub x: Vec<i64>,
    pub y: Vec<i64>,
}

impl Region {
    /// Creates a region from parallel coordinate arrays.
    pub fn new(x: Vec<i64>, y: Vec<i64>) -> Self {
        Self { x, y }
    }

    /// Number of coordinate pairs (not necessarily distinct pixels).
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// One cell of the tabular value stream.
///
/// The value rows are number-dominant but may carry strings, booleans, and
/// nulls; anything else (nested arrays or objects) is a structural error.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
}

impl Scalar {
    /// Numeric view used by the binary array store: numbers pass through,
    /// booleans map to 1.0/0.0, strings and nulls to NaN.
    pub fn to_f64(&self) -> f64 {
        match self {
            Scalar::Number(n) => *n,
            Scalar::Bool(true) => 1.0,
            Scalar::Bool(false) => 0.0,
            Scalar::Null | Scalar::String(_) => f64::NAN,
        }
    }
}

impl fmt::Display for Scalar {
    /// CSV cell rendering: nulls are empty fields, integral numbers print
    /// without a fractional part.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => Ok(()),
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Number(n) => write!(f, "{n}"),
            Scalar::String(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Number(value as f64)
    }
}

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ScalarVisitor;

        impl<'de> Visitor<'de> for ScalarVisitor {
            type Value = Scalar;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a JSON scalar (number, string, boolean, or null)")
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Scalar, E> {
                Ok(Scalar::Bool(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Scalar, E> {
                Ok(Scalar::Number(v as f64))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Scalar, E> {
                Ok(Scalar::Number(v as f64))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Scalar, E> {
                Ok(Scalar::Number(v))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Scalar, E> {
                Ok(Scalar::String(v.to_owned()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Scalar, E> {
                Ok(Scalar::String(v))
            }

            fn visit_unit<E: de::Error>(self) -> Result<Scalar, E> {
                Ok(Scalar::Null)
            }

            fn visit_none<E: de::Error>(self) -> Result<Scalar, E> {
                Ok(Scalar::Null)
            }
        }

        deserializer.deserialize_any(ScalarVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_record_parses_reflective_envelope() {
        let json = r#"{"class": "Obj", "fields": {"name": "cell-1",
            "alRegions": [{"class": "Reg", "fields": {"x": [2, 3], "y": [4, 4], "area": 2}}]}}"#;
        let record: ObjectRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.fields.regions.len(), 1);
        assert_eq!(record.fields.regions[0].fields.x, vec![2, 3]);
        assert_eq!(record.fields.regions[0].fields.y, vec![4, 4]);
    }

    #[test]
    fn object_record_without_regions_parses_empty() {
        let record: ObjectRecord = serde_json::from_str(r#"{"fields": {}}"#).unwrap();
        assert!(record.fields.regions.is_empty());
    }

    #[test]
    fn scalar_accepts_all_cell_kinds() {
        let row: Vec<Scalar> = serde_json::from_str(r#"[1, 2.5, "tag", true, null]"#).unwrap();
        assert_eq!(
            row,
            vec![
                Scalar::Number(1.0),
                Scalar::Number(2.5),
                Scalar::String("tag".into()),
                Scalar::Bool(true),
                Scalar::Null,
            ]
        );
    }

    #[test]
    fn scalar_rejects_nested_structure() {
        assert!(serde_json::from_str::<Scalar>("[1]").is_err());
        assert!(serde_json::from_str::<Scalar>("{}").is_err());
    }

    #[test]
    fn scalar_display_matches_csv_cells() {
        assert_eq!(Scalar::Number(7.0).to_string(), "7");
        assert_eq!(Scalar::Number(0.5).to_string(), "0.5");
        assert_eq!(Scalar::String("id".into()).to_string(), "id");
        assert_eq!(Scalar::Bool(false).to_string(), "false");
        assert_eq!(Scalar::Null.to_string(), "");
    }

    #[test]
    fn scalar_numeric_coercion() {
        assert_eq!(Scalar::Number(2.5).to_f64(), 2.5);
        assert_eq!(Scalar::Bool(true).to_f64(), 1.0);
        assert!(Scalar::Null.to_f64().is_nan());
        assert!(Scalar::String("x".into()).to_f64().is_nan());
    }
}
