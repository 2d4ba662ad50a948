//! Lenient deserializers for backend rows.
//!
//! Sea-service and ship rows are partly user-entered and partly OCR-derived,
//! so numeric columns arrive as numbers, decimal numbers, numeric strings or
//! garbage. Garbage becomes `None` instead of failing the whole row.

use serde::{de, Deserialize};

use super::credential::RouteCategory;

/// Deserialize a string or number as `Option<String>`.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct StringOrNumberVisitor;

    impl<'de> de::Visitor<'de> for StringOrNumberVisitor {
        type Value = Option<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a string or number")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E> {
            if v.is_empty() {
                Ok(None)
            } else {
                Ok(Some(v.to_string()))
            }
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E> {
            // spreadsheet imports turn 3 into 3.0
            if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
                Ok(Some((v as i64).to_string()))
            } else if v.is_finite() {
                Ok(Some(v.to_string()))
            } else {
                Ok(None)
            }
        }

        fn visit_none<E>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E> {
            Ok(None)
        }
    }

    deserializer.deserialize_any(StringOrNumberVisitor)
}

/// Deserialize a non-negative whole quantity (tonnage, day counts).
/// Negative, non-finite or unparseable values become `None`; fractions are
/// truncated.
pub(crate) fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct QuantityVisitor;

    impl<'de> de::Visitor<'de> for QuantityVisitor {
        type Value = Option<u32>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a non-negative number or numeric string")
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E> {
            Ok(u32::try_from(v).ok())
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E> {
            Ok(u32::try_from(v).ok())
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E> {
            if v.is_finite() && v >= 0.0 && v <= u32::MAX as f64 {
                Ok(Some(v as u32))
            } else {
                Ok(None)
            }
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            // OCR output often carries thousands separators ("1,600")
            let cleaned: String = v.chars().filter(|c| *c != ',' && !c.is_whitespace()).collect();
            if let Ok(n) = cleaned.parse::<u32>() {
                return Ok(Some(n));
            }
            match cleaned.parse::<f64>() {
                Ok(f) => de::Visitor::visit_f64(self, f),
                Err(_) => Ok(None),
            }
        }

        fn visit_bool<E>(self, _v: bool) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E> {
            Ok(None)
        }
    }

    deserializer.deserialize_any(QuantityVisitor)
}

/// Deserialize a route column. Blank means no route was recorded.
pub(crate) fn lenient_route<'de, D>(deserializer: D) -> Result<Option<RouteCategory>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(RouteCategory::parse_lenient))
}
