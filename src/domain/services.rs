use crate::domain::{
    ExperienceBracket, FeedbackRecord, FeedbackStatus, Gender, RegistrationInput, SessionStatus,
    Therapy, TherapistProfile, TherapySession, ValidationError, ValidationResult, WorkingDay,
    hhmm,
};
use chrono::{NaiveDate, NaiveTime};

/// Adds `item` if absent, removes it if present.
///
/// Insertion order is kept, so checkbox lists stay in the order the user
/// ticked them.
pub fn toggle<T: PartialEq>(items: &mut Vec<T>, item: T) {
    if let Some(pos) = items.iter().position(|existing| *existing == item) {
        items.remove(pos);
    } else {
        items.push(item);
    }
}

/// Splits a comma separated entry, trimming and dropping blanks.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Rounded completion percentage of a therapy course.
pub fn progress_percentage(completed: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (f64::from(completed) / f64::from(total) * 100.0).round() as u32
}

/// Number of sessions per status, in [`SessionStatus::ALL`] order.
///
/// Statuses without sessions are still listed with a zero count.
pub fn status_counts(sessions: &[TherapySession]) -> [(SessionStatus, usize); 3] {
    SessionStatus::ALL.map(|status| {
        let count = sessions.iter().filter(|s| s.status == status).count();
        (status, count)
    })
}

/// Loose email shape check: one `@`, a non-empty local part and a dotted
/// domain, with no whitespace anywhere.
///
/// # Examples
///
/// ```
/// use ayurdesk::domain::is_valid_email;
///
/// assert!(is_valid_email("asha@example.com"));
/// assert!(!is_valid_email("asha@localhost"));
/// ```
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty() && !domain.starts_with('.'),
        None => false,
    }
}

/// Every weekday in calendar order, paired with whether it is a working day.
pub fn weekly_availability(working_days: &[WorkingDay]) -> [(WorkingDay, bool); 7] {
    WorkingDay::ALL.map(|day| (day, working_days.contains(&day)))
}

/// Parses a `YYYY-MM-DD` date typed into a prompt.
///
/// # Errors
///
/// [`ValidationError::MissingField`] for a blank entry and
/// [`ValidationError::InvalidDate`] for anything chrono cannot parse.
pub fn parse_date(raw: &str, field: &'static str) -> ValidationResult<NaiveDate> {
    let raw = required(raw, field)?;
    NaiveDate::parse_from_str(&raw, DATE_FORMAT).map_err(|_| ValidationError::InvalidDate(field))
}

/// Prompt and display format for calendar dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

fn required(value: &str, field: &'static str) -> ValidationResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(trimmed.to_string())
    }
}

fn required_time(value: &str, field: &'static str) -> ValidationResult<NaiveTime> {
    let raw = required(value, field)?;
    NaiveTime::parse_from_str(&raw, hhmm::FORMAT).map_err(|_| ValidationError::InvalidTime(field))
}

/// Raw registration form contents, as typed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RegistrationDraft {
    pub full_name: String,
    /// Free text, validated only for presence
    pub mobile: String,
    pub email: String,
    pub gender: Option<Gender>,
    pub specializations: Vec<Therapy>,
    pub experience: Option<ExperienceBracket>,
    pub working_days: Vec<WorkingDay>,
    /// `HH:MM`, parsed on submit
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    pub bio: String,
}

impl RegistrationDraft {
    /// Pre-fills the form from a stored profile for editing.
    pub fn from_profile(profile: &TherapistProfile) -> Self {
        Self {
            full_name: profile.full_name.clone(),
            mobile: profile.mobile.clone(),
            email: profile.email.clone(),
            gender: Some(profile.gender),
            specializations: profile.specializations.clone(),
            experience: Some(profile.experience),
            working_days: profile.working_days.clone(),
            start_time: profile.start_time.format(hhmm::FORMAT).to_string(),
            end_time: profile.end_time.format(hhmm::FORMAT).to_string(),
            location: profile.location.clone(),
            bio: profile.bio.clone(),
        }
    }

    /// Presence and format checks; the first failing field is reported.
    pub fn validate(&self) -> ValidationResult<RegistrationInput> {
        let full_name = required(&self.full_name, "Full name")?;
        let mobile = required(&self.mobile, "Mobile number")?;
        let email = required(&self.email, "Email")?;
        if !is_valid_email(&email) {
            return Err(ValidationError::InvalidEmail);
        }
        let gender = self.gender.ok_or(ValidationError::MissingField("Gender"))?;
        if self.specializations.is_empty() {
            return Err(ValidationError::EmptySelection("specialization"));
        }
        let experience = self
            .experience
            .ok_or(ValidationError::MissingField("Experience"))?;
        if self.working_days.is_empty() {
            return Err(ValidationError::EmptySelection("working day"));
        }
        let start_time = required_time(&self.start_time, "Start time")?;
        let end_time = required_time(&self.end_time, "End time")?;

        Ok(RegistrationInput {
            full_name,
            mobile,
            email,
            gender,
            specializations: self.specializations.clone(),
            experience,
            working_days: self.working_days.clone(),
            start_time,
            end_time,
            location: self.location.trim().to_string(),
            bio: self.bio.trim().to_string(),
        })
    }
}

/// Free-standing feedback entry from the feedback board.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeedbackDraft {
    pub patient_id: String,
    pub therapy: Option<Therapy>,
    pub comfort_rating: u8,
    pub side_effects: String,
    pub relief_signs: String,
    pub notes: String,
}

impl FeedbackDraft {
    /// Checks the required fields: patient id, therapy and a 1-5 rating.
    pub fn validate(&self) -> ValidationResult<()> {
        required(&self.patient_id, "Patient ID")?;
        if self.therapy.is_none() {
            return Err(ValidationError::MissingField("Therapy"));
        }
        if !(1..=5).contains(&self.comfort_rating) {
            return Err(ValidationError::RatingRequired);
        }
        Ok(())
    }

    /// Builds a pending-review record from the form.
    ///
    /// # Arguments
    ///
    /// * `id` - Identifier for the new record
    /// * `patient_name` - Display name resolved from the patient id
    /// * `date` - Day the feedback was given
    ///
    /// Side effects and relief signs are split on commas.
    pub fn into_record(
        &self,
        id: u32,
        patient_name: String,
        date: NaiveDate,
    ) -> ValidationResult<FeedbackRecord> {
        self.validate()?;
        let therapy = self.therapy.ok_or(ValidationError::MissingField("Therapy"))?;
        Ok(FeedbackRecord {
            id,
            patient_id: self.patient_id.trim().to_string(),
            patient_name,
            therapy,
            date,
            comfort_rating: self.comfort_rating,
            side_effects: split_list(&self.side_effects),
            relief_signs: split_list(&self.relief_signs),
            notes: self.notes.trim().to_string(),
            status: FeedbackStatus::PendingReview,
        })
    }
}

/// Feedback captured right after a completed session.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionFeedbackDraft {
    pub comfort_rating: u8,
    pub side_effect: Option<&'static str>,
    pub relief_sign: Option<&'static str>,
    pub notes: String,
}

impl SessionFeedbackDraft {
    /// Builds a pending-review record for `session`.
    ///
    /// Patient and therapy come from the session; the draft only adds the
    /// rating, at most one side effect, one relief sign and notes.
    pub fn into_record(
        &self,
        session: &TherapySession,
        id: u32,
        date: NaiveDate,
    ) -> ValidationResult<FeedbackRecord> {
        if !(1..=5).contains(&self.comfort_rating) {
            return Err(ValidationError::RatingRequired);
        }
        Ok(FeedbackRecord {
            id,
            patient_id: session.patient_id.clone(),
            patient_name: session.patient_name.clone(),
            therapy: session.therapy,
            date,
            comfort_rating: self.comfort_rating,
            side_effects: self.side_effect.map(str::to_string).into_iter().collect(),
            relief_signs: self.relief_sign.map(str::to_string).into_iter().collect(),
            notes: self.notes.trim().to_string(),
            status: FeedbackStatus::PendingReview,
        })
    }
}
