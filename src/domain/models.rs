use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Panchakarma therapies offered at the centre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Therapy {
    Vamana,
    Virechana,
    Basti,
    Nasya,
    Raktamokshana,
}

impl Therapy {
    pub const ALL: [Therapy; 5] = [
        Therapy::Vamana,
        Therapy::Virechana,
        Therapy::Basti,
        Therapy::Nasya,
        Therapy::Raktamokshana,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Therapy::Vamana => "Vamana",
            Therapy::Virechana => "Virechana",
            Therapy::Basti => "Basti",
            Therapy::Nasya => "Nasya",
            Therapy::Raktamokshana => "Raktamokshana",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

/// Years-of-experience bracket picked at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExperienceBracket {
    #[serde(rename = "1-2")]
    OneToTwo,
    #[serde(rename = "3-5")]
    ThreeToFive,
    #[serde(rename = "6-10")]
    SixToTen,
    #[serde(rename = "10+")]
    OverTen,
}

impl ExperienceBracket {
    pub const ALL: [ExperienceBracket; 4] = [
        ExperienceBracket::OneToTwo,
        ExperienceBracket::ThreeToFive,
        ExperienceBracket::SixToTen,
        ExperienceBracket::OverTen,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ExperienceBracket::OneToTwo => "1-2 years",
            ExperienceBracket::ThreeToFive => "3-5 years",
            ExperienceBracket::SixToTen => "6-10 years",
            ExperienceBracket::OverTen => "10+ years",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkingDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl WorkingDay {
    pub const ALL: [WorkingDay; 7] = [
        WorkingDay::Monday,
        WorkingDay::Tuesday,
        WorkingDay::Wednesday,
        WorkingDay::Thursday,
        WorkingDay::Friday,
        WorkingDay::Saturday,
        WorkingDay::Sunday,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            WorkingDay::Monday => "Monday",
            WorkingDay::Tuesday => "Tuesday",
            WorkingDay::Wednesday => "Wednesday",
            WorkingDay::Thursday => "Thursday",
            WorkingDay::Friday => "Friday",
            WorkingDay::Saturday => "Saturday",
            WorkingDay::Sunday => "Sunday",
        }
    }
}

/// Practice statistics attached to a profile.
///
/// Zeroed at registration and only ever replaced as a whole block
/// through a [`ProfilePatch`]; nothing recomputes it from sessions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileStats {
    pub total_patients: u32,
    pub completed_sessions: u32,
    pub avg_rating: f32,
    pub upcoming_sessions: u32,
}

/// Validated registration form contents.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationInput {
    pub full_name: String,
    pub mobile: String,
    pub email: String,
    pub gender: Gender,
    pub specializations: Vec<Therapy>,
    pub experience: ExperienceBracket,
    pub working_days: Vec<WorkingDay>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub location: String,
    pub bio: String,
}

/// The singleton practitioner record owned by the profile container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TherapistProfile {
    pub full_name: String,
    pub mobile: String,
    pub email: String,
    pub gender: Gender,
    pub specializations: Vec<Therapy>,
    pub experience: ExperienceBracket,
    pub working_days: Vec<WorkingDay>,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub bio: String,
    pub registration_date: DateTime<Utc>,
    #[serde(default)]
    pub stats: ProfileStats,
}

impl TherapistProfile {
    /// Builds a fresh profile: every input field copied, timestamp stamped,
    /// statistics zeroed.
    pub fn from_registration(input: RegistrationInput, registered_at: DateTime<Utc>) -> Self {
        Self {
            full_name: input.full_name,
            mobile: input.mobile,
            email: input.email,
            gender: input.gender,
            specializations: input.specializations,
            experience: input.experience,
            working_days: input.working_days,
            start_time: input.start_time,
            end_time: input.end_time,
            location: input.location,
            bio: input.bio,
            registration_date: registered_at,
            stats: ProfileStats::default(),
        }
    }

    pub fn working_hours(&self) -> String {
        format!("{} - {}", self.start_time.format("%H:%M"), self.end_time.format("%H:%M"))
    }
}

/// Partial update for a [`TherapistProfile`].
///
/// Replacement rules, field by field:
/// * a `Some` field replaces the stored value, a `None` field keeps it;
/// * `specializations` and `working_days` are replaced as whole lists;
/// * `stats` is replaced as a whole block, never merged per counter.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProfilePatch {
    pub full_name: Option<String>,
    pub mobile: Option<String>,
    pub email: Option<String>,
    pub gender: Option<Gender>,
    pub specializations: Option<Vec<Therapy>>,
    pub experience: Option<ExperienceBracket>,
    pub working_days: Option<Vec<WorkingDay>>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub registration_date: Option<DateTime<Utc>>,
    pub stats: Option<ProfileStats>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.changed_fields().is_empty()
    }

    /// Names of the fields this patch overwrites, in stored-record spelling.
    pub fn changed_fields(&self) -> Vec<&'static str> {
        let present = [
            ("fullName", self.full_name.is_some()),
            ("mobile", self.mobile.is_some()),
            ("email", self.email.is_some()),
            ("gender", self.gender.is_some()),
            ("specializations", self.specializations.is_some()),
            ("experience", self.experience.is_some()),
            ("workingDays", self.working_days.is_some()),
            ("startTime", self.start_time.is_some()),
            ("endTime", self.end_time.is_some()),
            ("location", self.location.is_some()),
            ("bio", self.bio.is_some()),
            ("registrationDate", self.registration_date.is_some()),
            ("stats", self.stats.is_some()),
        ];
        present
            .into_iter()
            .filter_map(|(name, set)| set.then_some(name))
            .collect()
    }

    pub fn apply(self, mut profile: TherapistProfile) -> TherapistProfile {
        if let Some(v) = self.full_name {
            profile.full_name = v;
        }
        if let Some(v) = self.mobile {
            profile.mobile = v;
        }
        if let Some(v) = self.email {
            profile.email = v;
        }
        if let Some(v) = self.gender {
            profile.gender = v;
        }
        if let Some(v) = self.specializations {
            profile.specializations = v;
        }
        if let Some(v) = self.experience {
            profile.experience = v;
        }
        if let Some(v) = self.working_days {
            profile.working_days = v;
        }
        if let Some(v) = self.start_time {
            profile.start_time = v;
        }
        if let Some(v) = self.end_time {
            profile.end_time = v;
        }
        if let Some(v) = self.location {
            profile.location = v;
        }
        if let Some(v) = self.bio {
            profile.bio = v;
        }
        if let Some(v) = self.registration_date {
            profile.registration_date = v;
        }
        if let Some(v) = self.stats {
            profile.stats = v;
        }
        profile
    }

    /// Patch holding only the fields of `input` that differ from `current`.
    pub fn diff(current: &TherapistProfile, input: RegistrationInput) -> Self {
        fn changed<T: PartialEq>(old: &T, new: T) -> Option<T> {
            (*old != new).then_some(new)
        }

        Self {
            full_name: changed(&current.full_name, input.full_name),
            mobile: changed(&current.mobile, input.mobile),
            email: changed(&current.email, input.email),
            gender: changed(&current.gender, input.gender),
            specializations: changed(&current.specializations, input.specializations),
            experience: changed(&current.experience, input.experience),
            working_days: changed(&current.working_days, input.working_days),
            start_time: changed(&current.start_time, input.start_time),
            end_time: changed(&current.end_time, input.end_time),
            location: changed(&current.location, input.location),
            bio: changed(&current.bio, input.bio),
            registration_date: None,
            stats: None,
        }
    }
}

/// `HH:MM` wire format for times of day.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%H:%M";

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}
