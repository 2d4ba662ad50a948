use serde::{Deserialize, Serialize};

use super::credential::RouteCategory;
use super::de;

/// Ship catalog entry. Read-only reference data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Ship {
    #[serde(default, deserialize_with = "de::string_or_number")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default)]
    pub operator: Option<String>,
    #[serde(default, deserialize_with = "de::lenient_u32")]
    pub grt: Option<u32>,
    #[serde(default, deserialize_with = "de::lenient_route")]
    pub route_category: Option<RouteCategory>,
    #[serde(default)]
    pub tonnage_band: Option<String>,
    #[serde(default)]
    pub hull_number: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
}

impl Ship {
    pub fn display_name(&self) -> String {
        let name = self
            .name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or("Unnamed vessel");
        match self.hull_number.as_deref().filter(|h| !h.trim().is_empty()) {
            Some(hull) => format!("{} ({})", name, hull),
            None => name.to_string(),
        }
    }

    pub fn operator_is(&self, key: &str) -> bool {
        self.operator
            .as_deref()
            .map(|op| op.trim().eq_ignore_ascii_case(key))
            .unwrap_or(false)
    }

    pub fn tonnage_band_is(&self, band: &str) -> bool {
        self.tonnage_band
            .as_deref()
            .map(|b| b.trim().eq_ignore_ascii_case(band))
            .unwrap_or(false)
    }
}
