use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::credential::{Department, RouteCategory};
use super::de;
use crate::utils::{normalize_name, parse_record_date};

/// One stretch of service aboard a single vessel.
///
/// Credited days are always derived from the sign-on/sign-off dates; the
/// stored `days_served` column is kept only so rows round-trip unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct SeaServicePeriod {
    #[serde(default, deserialize_with = "de::string_or_number")]
    pub id: Option<String>,
    #[serde(default)]
    pub vessel_name: Option<String>,
    #[serde(default)]
    pub sign_on_date: Option<String>,
    #[serde(default)]
    pub sign_off_date: Option<String>,
    #[serde(default, deserialize_with = "de::lenient_u32")]
    pub days_served: Option<u32>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default, deserialize_with = "de::lenient_u32")]
    pub grt: Option<u32>,
    #[serde(default, deserialize_with = "de::lenient_route")]
    pub route_category: Option<RouteCategory>,
    #[serde(default)]
    pub propulsion_type: Option<String>,
}

impl SeaServicePeriod {
    pub fn sign_on(&self) -> Option<NaiveDate> {
        self.sign_on_date.as_deref().and_then(parse_record_date)
    }

    pub fn sign_off(&self) -> Option<NaiveDate> {
        self.sign_off_date.as_deref().and_then(parse_record_date)
    }

    /// Days creditable from this period, counting both the sign-on and
    /// sign-off day. Missing dates or sign-off before sign-on give zero.
    pub fn credited_days(&self) -> u32 {
        match (self.sign_on(), self.sign_off()) {
            (Some(on), Some(off)) if off >= on => {
                u32::try_from((off - on).num_days() + 1).unwrap_or(0)
            }
            _ => 0,
        }
    }

    /// Recorded department, if it parses.
    pub fn department(&self) -> Option<Department> {
        self.department.as_deref().and_then(Department::parse_lenient)
    }

    /// Whether this period may count toward `department`'s ladder. Only a
    /// recognized label for the other department disqualifies.
    pub fn served_in(&self, department: Department) -> bool {
        match self.department() {
            Some(recorded) => recorded == department,
            None => true,
        }
    }

    pub fn vessel_display(&self) -> String {
        self.vessel_name
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "Unknown vessel".to_string())
    }
}

/// A completed training course.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct TrainingCertificate {
    #[serde(default, deserialize_with = "de::string_or_number")]
    pub id: Option<String>,
    #[serde(default, alias = "name")]
    pub certificate_name: Option<String>,
    #[serde(default)]
    pub issue_date: Option<String>,
    #[serde(default)]
    pub expiration_date: Option<String>,
}

impl TrainingCertificate {
    pub fn new(name: &str) -> Self {
        Self {
            certificate_name: Some(name.to_string()),
            ..Default::default()
        }
    }

    /// Name used when matching against required certificates.
    pub fn normalized_name(&self) -> Option<String> {
        self.certificate_name
            .as_deref()
            .map(normalize_name)
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn period(on: Option<&str>, off: Option<&str>) -> SeaServicePeriod {
        SeaServicePeriod {
            sign_on_date: on.map(str::to_string),
            sign_off_date: off.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_credited_days_inclusive() {
        assert_eq!(period(Some("2024-01-01"), Some("2024-01-01")).credited_days(), 1);
        assert_eq!(period(Some("2024-01-01"), Some("2024-01-31")).credited_days(), 31);
        // Leap year
        assert_eq!(period(Some("2024-01-01"), Some("2024-12-31")).credited_days(), 366);
    }

    #[test]
    fn test_credited_days_malformed_is_zero() {
        assert_eq!(period(Some("2024-02-01"), Some("2024-01-01")).credited_days(), 0);
        assert_eq!(period(None, Some("2024-01-01")).credited_days(), 0);
        assert_eq!(period(Some("2024-01-01"), None).credited_days(), 0);
        assert_eq!(period(Some("not a date"), Some("2024-01-01")).credited_days(), 0);
    }

    #[test]
    fn test_credited_days_ignores_stored_days() {
        let mut p = period(Some("2024-03-01"), Some("2024-03-10"));
        p.days_served = Some(500);
        assert_eq!(p.credited_days(), 10);
    }

    #[test]
    fn test_served_in() {
        let mut p = SeaServicePeriod::default();
        assert!(p.served_in(Department::Deck));
        assert!(p.served_in(Department::Engine));

        p.department = Some("Deck".to_string());
        assert!(p.served_in(Department::Deck));
        assert!(!p.served_in(Department::Engine));

        p.department = Some("Engine Dept.".to_string());
        assert!(p.served_in(Department::Engine));
        assert!(!p.served_in(Department::Deck));

        // unreadable labels count as unrecorded
        p.department = Some("galley".to_string());
        assert!(p.served_in(Department::Deck));
    }

    #[test]
    fn test_parse_sea_service_row() {
        let json = r#"{
            "id": 17,
            "vessel_name": "USNS Mercy",
            "sign_on_date": "2023-05-01",
            "sign_off_date": "2023-08-28T00:00:00Z",
            "days_served": "120",
            "department": "deck",
            "grt": "54,367",
            "route_category": "oceans",
            "propulsion_type": "steam"
        }"#;
        let p: SeaServicePeriod = serde_json::from_str(json).unwrap();
        assert_eq!(p.id.as_deref(), Some("17"));
        assert_eq!(p.grt, Some(54367));
        assert_eq!(p.route_category, Some(RouteCategory::Oceans));
        assert_eq!(p.credited_days(), 120);
    }

    #[test]
    fn test_certificate_normalized_name() {
        let cert: TrainingCertificate =
            serde_json::from_str(r#"{"name": "  Advanced   Meteorology "}"#).unwrap();
        assert_eq!(cert.normalized_name().as_deref(), Some("advanced meteorology"));
        assert_eq!(TrainingCertificate::default().normalized_name(), None);
        assert_eq!(TrainingCertificate::new("   ").normalized_name(), None);
    }
}
