use crate::domain::TherapistProfile;
use crate::infrastructure::KeyValueStorage;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Well-known storage key holding the therapist profile.
pub const PROFILE_KEY: &str = "therapistData";

/// Current layout of the stored profile record.
pub const RECORD_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Storage write failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Serialize)]
struct RecordRef<'a> {
    version: u32,
    profile: &'a TherapistProfile,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredRecord {
    Versioned { version: u32, profile: TherapistProfile },
    // Unversioned record written before the envelope existed.
    Legacy(TherapistProfile),
}

/// Reads and writes the profile under [`PROFILE_KEY`].
pub struct ProfileRepository {
    storage: Box<dyn KeyValueStorage>,
}

impl ProfileRepository {
    pub fn new(storage: impl KeyValueStorage + 'static) -> Self {
        Self {
            storage: Box::new(storage),
        }
    }

    /// Stored profile, or `None` when absent, unreadable or unparseable.
    pub fn load(&self) -> Option<TherapistProfile> {
        let raw = match self.storage.get_item(PROFILE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = PROFILE_KEY, "no stored therapist profile");
                return None;
            }
            Err(e) => {
                warn!(key = PROFILE_KEY, error = %e, "failed to read therapist profile");
                return None;
            }
        };

        match serde_json::from_str::<StoredRecord>(&raw) {
            Ok(StoredRecord::Versioned { version, profile }) if version == RECORD_VERSION => {
                Some(profile)
            }
            Ok(StoredRecord::Versioned { version, .. }) => {
                warn!(key = PROFILE_KEY, version, "unsupported therapist profile version");
                None
            }
            Ok(StoredRecord::Legacy(profile)) => Some(profile),
            Err(e) => {
                warn!(key = PROFILE_KEY, error = %e, "error parsing saved therapist data");
                None
            }
        }
    }

    /// Serializes and writes the full record, replacing any previous one.
    pub fn save(&mut self, profile: &TherapistProfile) -> Result<(), StoreError> {
        let record = RecordRef {
            version: RECORD_VERSION,
            profile,
        };
        let json = serde_json::to_string_pretty(&record)?;
        self.storage.set_item(PROFILE_KEY, &json)?;
        debug!(key = PROFILE_KEY, bytes = json.len(), "therapist profile written");
        Ok(())
    }

    pub fn storage(&self) -> &dyn KeyValueStorage {
        self.storage.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ExperienceBracket, Gender, ProfileStats, Therapy, WorkingDay};
    use crate::infrastructure::{FileStorage, MemoryStorage};
    use chrono::{NaiveTime, TimeZone, Utc};
    use tempfile::TempDir;

    fn profile() -> TherapistProfile {
        TherapistProfile {
            full_name: "Asha Rao".to_string(),
            mobile: "+91 9876543210".to_string(),
            email: "asha@example.com".to_string(),
            gender: Gender::Female,
            specializations: vec![Therapy::Basti, Therapy::Nasya],
            experience: ExperienceBracket::OneToTwo,
            working_days: vec![WorkingDay::Monday, WorkingDay::Thursday],
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            location: String::new(),
            bio: "Panchakarma practitioner".to_string(),
            registration_date: Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap(),
            stats: ProfileStats::default(),
        }
    }

    #[test]
    fn test_load_without_record_is_none() {
        let repo = ProfileRepository::new(MemoryStorage::default());
        assert!(repo.load().is_none());
    }

    #[test]
    fn test_save_then_load_from_fresh_repository() {
        let dir = TempDir::new().unwrap();
        let mut repo = ProfileRepository::new(FileStorage::new(dir.path()));
        repo.save(&profile()).unwrap();

        let fresh = ProfileRepository::new(FileStorage::new(dir.path()));
        assert_eq!(fresh.load(), Some(profile()));
        // Repeated loads without a save agree.
        assert_eq!(fresh.load(), fresh.load());
    }

    #[test]
    fn test_saved_record_carries_version_tag() {
        let mut repo = ProfileRepository::new(MemoryStorage::default());
        repo.save(&profile()).unwrap();

        let raw = repo.storage().get_item(PROFILE_KEY).unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["version"], RECORD_VERSION);
        assert_eq!(json["profile"]["fullName"], "Asha Rao");
    }

    #[test]
    fn test_corrupted_record_loads_as_none() {
        let mut storage = MemoryStorage::default();
        storage.set_item(PROFILE_KEY, "{\"fullName\": \"Asha").unwrap();

        let repo = ProfileRepository::new(storage);
        assert!(repo.load().is_none());
    }

    #[test]
    fn test_unknown_version_loads_as_none() {
        let mut storage = MemoryStorage::default();
        let record = serde_json::json!({ "version": 99, "profile": profile() });
        storage.set_item(PROFILE_KEY, &record.to_string()).unwrap();

        let repo = ProfileRepository::new(storage);
        assert!(repo.load().is_none());
    }

    #[test]
    fn test_legacy_unversioned_record_is_accepted() {
        let mut storage = MemoryStorage::default();
        let legacy = serde_json::to_string(&profile()).unwrap();
        storage.set_item(PROFILE_KEY, &legacy).unwrap();

        let repo = ProfileRepository::new(storage);
        assert_eq!(repo.load(), Some(profile()));
    }

    #[test]
    fn test_save_overwrites_previous_record() {
        let mut repo = ProfileRepository::new(MemoryStorage::default());
        repo.save(&profile()).unwrap();

        let mut second = profile();
        second.full_name = "Kavitha Reddy".to_string();
        repo.save(&second).unwrap();

        assert_eq!(repo.load().unwrap().full_name, "Kavitha Reddy");
    }
}
