use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::models::{
    CareerGoal, SeaServicePeriod, Ship, TrainingCertificate, UserRecords, UserSettings,
};

/// Snapshots older than a week are flagged as stale.
const SNAPSHOT_STALE_MINUTES: i64 = 7 * 24 * 60;

const GOAL: &str = "goal";
const SEA_SERVICE: &str = "sea_service";
const CERTIFICATES: &str = "certificates";
const SETTINGS: &str = "settings";
const SHIPS: &str = "ships";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot<T> {
    pub data: T,
    pub exported_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl<T> Snapshot<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            exported_at: Utc::now(),
            user_id: None,
        }
    }

    pub fn for_user(data: T, user_id: &str) -> Self {
        Self {
            user_id: Some(user_id.to_string()),
            ..Self::new(data)
        }
    }

    pub fn age_minutes(&self) -> i64 {
        (Utc::now() - self.exported_at).num_minutes()
    }

    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            // clock skew lands here too
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            let hours = minutes / 60;
            if minutes % 60 >= 30 {
                format!("{}h ago", hours + 1)
            } else {
                format!("{}h ago", hours)
            }
        } else {
            let days = minutes / 1440;
            if (minutes % 1440) / 60 >= 12 {
                format!("{}d ago", days + 1)
            } else {
                format!("{}d ago", days)
            }
        }
    }

    pub fn is_stale(&self) -> bool {
        self.age_minutes() > SNAPSHOT_STALE_MINUTES
    }
}

/// Fetched records as a directory of pretty-printed JSON files.
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    /// Open `dir` for writing, creating it if needed.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create snapshot directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    /// Open an existing snapshot directory for reading.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if !dir.is_dir() {
            anyhow::bail!("Snapshot directory not found: {}", dir.display());
        }
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", name))
    }

    fn load<T: DeserializeOwned>(&self, name: &str) -> Result<Option<Snapshot<T>>> {
        let path = self.path(name);
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read snapshot file: {}", name))?;

        let snapshot: Snapshot<T> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse snapshot file: {}", name))?;

        Ok(Some(snapshot))
    }

    fn save<T: Serialize>(&self, name: &str, snapshot: &Snapshot<T>) -> Result<()> {
        let contents = serde_json::to_string_pretty(snapshot)?;
        std::fs::write(self.path(name), contents)
            .with_context(|| format!("Failed to write snapshot file: {}", name))?;
        debug!(name, dir = %self.dir.display(), "Wrote snapshot");
        Ok(())
    }

    // ===== User records =====

    pub fn save_records(&self, records: &UserRecords) -> Result<()> {
        let user = records.user_id.as_str();
        self.save(GOAL, &Snapshot::for_user(&records.goal, user))?;
        self.save(SEA_SERVICE, &Snapshot::for_user(&records.sea_service, user))?;
        self.save(CERTIFICATES, &Snapshot::for_user(&records.certificates, user))?;
        self.save(SETTINGS, &Snapshot::for_user(&records.settings, user))?;
        Ok(())
    }

    /// Reassemble the user's records. None when the directory holds no
    /// sea-service file; other missing files read as empty. The snapshot
    /// carries the oldest export time of the parts.
    pub fn load_records(&self) -> Result<Option<Snapshot<UserRecords>>> {
        let sea_service = match self.load::<Vec<SeaServicePeriod>>(SEA_SERVICE)? {
            Some(s) => s,
            None => return Ok(None),
        };
        let goal = self.load::<Option<CareerGoal>>(GOAL)?;
        let certificates = self.load::<Vec<TrainingCertificate>>(CERTIFICATES)?;
        let settings = self.load::<Option<UserSettings>>(SETTINGS)?;

        let exported_at = [
            goal.as_ref().map(|s| s.exported_at),
            certificates.as_ref().map(|s| s.exported_at),
            settings.as_ref().map(|s| s.exported_at),
        ]
        .into_iter()
        .flatten()
        .fold(sea_service.exported_at, |oldest, t| oldest.min(t));

        let user_id = sea_service.user_id.clone().unwrap_or_default();
        let records = UserRecords {
            user_id: user_id.clone(),
            goal: goal.and_then(|s| s.data),
            sea_service: sea_service.data,
            certificates: certificates.map(|s| s.data).unwrap_or_default(),
            settings: settings.and_then(|s| s.data),
        };

        Ok(Some(Snapshot {
            data: records,
            exported_at,
            user_id: Some(user_id).filter(|id| !id.is_empty()),
        }))
    }

    // ===== Ship catalog =====

    pub fn save_ships(&self, ships: &[Ship]) -> Result<()> {
        self.save(SHIPS, &Snapshot::new(ships))
    }

    pub fn load_ships(&self) -> Result<Option<Snapshot<Vec<Ship>>>> {
        self.load(SHIPS)
    }
}

// ============================================================================
// Tests
// ============================================================================
