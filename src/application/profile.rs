//! Therapist profile lifecycle.
//!
//! The container owns the in-memory profile for the whole run and writes
//! every change straight through to the [`ProfileRepository`]. It is built
//! once at startup and handed to whoever needs it; there is no global.

use crate::domain::{ProfilePatch, RegistrationInput, TherapistProfile};
use crate::infrastructure::ProfileRepository;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    #[error("No therapist profile is registered yet")]
    NotRegistered,
}

/// Registration lifecycle: `Unregistered` until the first `register`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileState {
    Unregistered,
    Registered,
}

/// Single-writer holder of the therapist profile.
///
/// Concurrent edits do not exist; the last call wins.
pub struct ProfileContainer {
    profile: Option<TherapistProfile>,
    repository: ProfileRepository,
}

impl ProfileContainer {
    /// Loads the stored profile once; anything unusable means `Unregistered`.
    pub fn open(repository: ProfileRepository) -> Self {
        let profile = repository.load();
        if let Some(profile) = &profile {
            info!(
                full_name = %profile.full_name,
                registered_at = %profile.registration_date.to_rfc3339(),
                "loaded therapist data from storage"
            );
        }
        Self { profile, repository }
    }

    pub fn state(&self) -> ProfileState {
        if self.profile.is_some() {
            ProfileState::Registered
        } else {
            ProfileState::Unregistered
        }
    }

    pub fn is_registered(&self) -> bool {
        self.state() == ProfileState::Registered
    }

    pub fn profile(&self) -> Option<&TherapistProfile> {
        self.profile.as_ref()
    }

    pub fn repository(&self) -> &ProfileRepository {
        &self.repository
    }

    /// Creates the profile stamped with the current time.
    ///
    /// Registering again replaces the previous profile entirely, including
    /// its timestamp and statistics.
    pub fn register(&mut self, input: RegistrationInput) -> &TherapistProfile {
        self.register_at(input, Utc::now())
    }

    pub fn register_at(
        &mut self,
        input: RegistrationInput,
        registered_at: DateTime<Utc>,
    ) -> &TherapistProfile {
        let profile = TherapistProfile::from_registration(input, registered_at);
        info!(
            full_name = %profile.full_name,
            mobile = %profile.mobile,
            email = %profile.email,
            gender = profile.gender.label(),
            specializations = ?profile.specializations,
            experience = profile.experience.label(),
            working_days = ?profile.working_days,
            working_hours = %profile.working_hours(),
            location = %profile.location,
            bio = %profile.bio,
            registration_date = %profile.registration_date.to_rfc3339(),
            "therapist registration data saved"
        );
        self.commit(profile)
    }

    /// Applies `patch` over the registered profile and persists the result.
    pub fn update(&mut self, patch: ProfilePatch) -> Result<&TherapistProfile, ProfileError> {
        let current = self.profile.clone().ok_or(ProfileError::NotRegistered)?;
        let fields = patch.changed_fields();
        let updated = patch.apply(current);
        info!(updated_fields = ?fields, "therapist data updated");
        Ok(self.commit(updated))
    }

    fn commit(&mut self, profile: TherapistProfile) -> &TherapistProfile {
        // Storage trouble never fails the user's action.
        if let Err(e) = self.repository.save(&profile) {
            error!(error = %e, "failed to persist therapist profile");
        }
        self.profile.insert(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ExperienceBracket, Gender, ProfileStats, Therapy, WorkingDay};
    use crate::infrastructure::{FileStorage, KeyValueStorage, MemoryStorage, PROFILE_KEY};
    use chrono::{NaiveTime, TimeZone};
    use std::io;
    use tempfile::TempDir;

    fn asha() -> RegistrationInput {
        RegistrationInput {
            full_name: "Asha Rao".to_string(),
            mobile: "+91 9876543210".to_string(),
            email: "asha.rao@example.com".to_string(),
            gender: Gender::Female,
            specializations: vec![Therapy::Basti],
            experience: ExperienceBracket::ThreeToFive,
            working_days: vec![WorkingDay::Monday],
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            location: String::new(),
            bio: String::new(),
        }
    }

    fn memory_container() -> ProfileContainer {
        ProfileContainer::open(ProfileRepository::new(MemoryStorage::default()))
    }

    struct BrokenStorage;

    impl KeyValueStorage for BrokenStorage {
        fn get_item(&self, _key: &str) -> io::Result<Option<String>> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        }

        fn set_item(&mut self, _key: &str, _value: &str) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        }

        fn remove_item(&mut self, _key: &str) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_starts_unregistered_without_record() {
        let container = memory_container();
        assert!(!container.is_registered());
        assert!(container.profile().is_none());
        assert_eq!(container.state(), ProfileState::Unregistered);
    }

    #[test]
    fn test_register_stamps_time_and_zeroes_stats() {
        let mut container = memory_container();
        let profile = container.register(asha()).clone();

        assert!(container.is_registered());
        assert_eq!(profile.stats, ProfileStats::default());
        assert_eq!(profile.stats.total_patients, 0);
        assert!(!profile.registration_date.to_rfc3339().is_empty());
        assert_eq!(profile.full_name, "Asha Rao");
        assert_eq!(profile.specializations, vec![Therapy::Basti]);
    }

    #[test]
    fn test_register_persists_for_a_fresh_container() {
        let dir = TempDir::new().unwrap();
        let at = Utc.with_ymd_and_hms(2024, 1, 20, 9, 15, 0).unwrap();
        let mut container = ProfileContainer::open(ProfileRepository::new(FileStorage::new(dir.path())));
        container.register_at(asha(), at);

        let reopened = ProfileContainer::open(ProfileRepository::new(FileStorage::new(dir.path())));
        let expected = TherapistProfile::from_registration(asha(), at);
        assert_eq!(reopened.profile(), Some(&expected));
        assert!(reopened.is_registered());
    }

    #[test]
    fn test_second_register_overwrites_everything() {
        let dir = TempDir::new().unwrap();
        let first_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let second_at = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let mut container = ProfileContainer::open(ProfileRepository::new(FileStorage::new(dir.path())));
        container.register_at(asha(), first_at);
        container
            .update(ProfilePatch {
                stats: Some(ProfileStats {
                    total_patients: 10,
                    ..Default::default()
                }),
                ..Default::default()
            })
            .unwrap();

        let mut second = asha();
        second.full_name = "Kavitha Reddy".to_string();
        second.working_days = vec![WorkingDay::Saturday];
        container.register_at(second.clone(), second_at);

        let stored = container.repository().load().unwrap();
        assert_eq!(stored, TherapistProfile::from_registration(second, second_at));
        assert_eq!(stored.registration_date, second_at);
        assert_eq!(stored.stats.total_patients, 0);
    }

    #[test]
    fn test_update_merges_and_persists() {
        let mut container = memory_container();
        let before = container.register(asha()).clone();

        let patch = ProfilePatch {
            location: Some("Main Center".to_string()),
            specializations: Some(vec![Therapy::Nasya, Therapy::Vamana]),
            ..Default::default()
        };
        container.update(patch).unwrap();

        let stored = container.repository().load().unwrap();
        let mut expected = before;
        expected.location = "Main Center".to_string();
        expected.specializations = vec![Therapy::Nasya, Therapy::Vamana];
        assert_eq!(stored, expected);
        assert_eq!(container.profile(), Some(&expected));
    }

    #[test]
    fn test_update_requires_registration() {
        let mut container = memory_container();
        let patch = ProfilePatch {
            bio: Some("Hello".to_string()),
            ..Default::default()
        };

        assert_eq!(container.update(patch).unwrap_err(), ProfileError::NotRegistered);
        assert!(container.repository().load().is_none());
        assert!(!container.is_registered());
    }

    #[test]
    fn test_corrupted_record_starts_unregistered() {
        let mut storage = MemoryStorage::default();
        storage.set_item(PROFILE_KEY, "not json at all").unwrap();

        let container = ProfileContainer::open(ProfileRepository::new(storage));
        assert!(!container.is_registered());
    }

    #[test]
    fn test_storage_failure_keeps_in_memory_state() {
        let mut container = ProfileContainer::open(ProfileRepository::new(BrokenStorage));
        assert!(!container.is_registered());

        container.register(asha());

        assert!(container.is_registered());
        assert_eq!(container.profile().unwrap().full_name, "Asha Rao");
        assert!(container.repository().load().is_none());
    }
}
