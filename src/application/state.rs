//! Dashboard state for the terminal user interface.
//!
//! Holds the injected [`ProfileContainer`] plus the view-local state of
//! every tab. Only the profile is ever persisted.

use crate::application::ProfileContainer;
use crate::domain::{
    ExperienceBracket, FeedbackDraft, FeedbackRecord, Gender, Patient, ProfilePatch,
    RELIEF_SIGN_OPTIONS, RegistrationDraft, RequestStatus, SIDE_EFFECT_OPTIONS, SessionFeedbackDraft,
    SessionStatus, Therapy, TherapyRequest, TherapySession, ValidationError, WorkingDay, DATE_FORMAT,
    parse_date, samples, toggle,
};
use crate::infrastructure::ExportError;
use chrono::{Local, NaiveDate};
use std::path::PathBuf;
use tracing::{info, warn};

/// How many processed requests the requests tab keeps on screen.
pub const RECENT_ACTIONS_LIMIT: usize = 5;

/// Steps `current` one place through `all`, wrapping at both ends.
fn cycle<T: Copy + PartialEq>(all: &[T], current: T, forward: bool) -> T {
    let pos = all.iter().position(|v| *v == current).unwrap_or(0);
    let len = all.len();
    let next = if forward { (pos + 1) % len } else { (pos + len - 1) % len };
    all[next]
}

/// Top-level dashboard tabs, in navigation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Registration,
    Schedule,
    Patients,
    Requests,
    Feedback,
    Profile,
}

impl Tab {
    pub const ALL: [Tab; 6] = [
        Tab::Registration,
        Tab::Schedule,
        Tab::Patients,
        Tab::Requests,
        Tab::Feedback,
        Tab::Profile,
    ];

    /// Caption shown in the tab bar.
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Registration => "Registration",
            Tab::Schedule => "Today's Schedule",
            Tab::Patients => "Patients",
            Tab::Requests => "Requests",
            Tab::Feedback => "Feedback",
            Tab::Profile => "Profile",
        }
    }

    /// Position in [`Tab::ALL`].
    pub fn index(&self) -> usize {
        Tab::ALL.iter().position(|t| t == self).unwrap_or(0)
    }
}

/// Represents the current mode of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Navigation between tabs, rows and form fields
    Normal,
    /// Typing into the focused text field
    Editing,
    /// Help screen is displayed
    Help,
    /// Post-session feedback dialog is open
    SessionFeedback,
    /// CSV export dialog is open
    ExportCsv,
    /// Typing a date to block out on the availability list
    AddUnavailableDate,
}

/// Focusable rows of the registration form, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationField {
    FullName,
    Mobile,
    Email,
    Gender,
    Specializations,
    Experience,
    WorkingDays,
    StartTime,
    EndTime,
    Location,
    Bio,
    Submit,
}

impl RegistrationField {
    pub const ALL: [RegistrationField; 12] = [
        RegistrationField::FullName,
        RegistrationField::Mobile,
        RegistrationField::Email,
        RegistrationField::Gender,
        RegistrationField::Specializations,
        RegistrationField::Experience,
        RegistrationField::WorkingDays,
        RegistrationField::StartTime,
        RegistrationField::EndTime,
        RegistrationField::Location,
        RegistrationField::Bio,
        RegistrationField::Submit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RegistrationField::FullName => "Full Name *",
            RegistrationField::Mobile => "Mobile Number *",
            RegistrationField::Email => "Email ID *",
            RegistrationField::Gender => "Gender *",
            RegistrationField::Specializations => "Specializations *",
            RegistrationField::Experience => "Years of Experience *",
            RegistrationField::WorkingDays => "Working Days *",
            RegistrationField::StartTime => "Start Time (HH:MM) *",
            RegistrationField::EndTime => "End Time (HH:MM) *",
            RegistrationField::Location => "Preferred Location/Center",
            RegistrationField::Bio => "Brief Bio/Introduction",
            RegistrationField::Submit => "",
        }
    }

    /// Whether Enter opens the field for typing rather than toggling it.
    pub fn is_text(&self) -> bool {
        matches!(
            self,
            RegistrationField::FullName
                | RegistrationField::Mobile
                | RegistrationField::Email
                | RegistrationField::StartTime
                | RegistrationField::EndTime
                | RegistrationField::Location
                | RegistrationField::Bio
        )
    }
}

/// Focusable rows of the new-feedback form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackField {
    PatientId,
    Therapy,
    Rating,
    SideEffects,
    ReliefSigns,
    Notes,
    Submit,
}

impl FeedbackField {
    pub const ALL: [FeedbackField; 7] = [
        FeedbackField::PatientId,
        FeedbackField::Therapy,
        FeedbackField::Rating,
        FeedbackField::SideEffects,
        FeedbackField::ReliefSigns,
        FeedbackField::Notes,
        FeedbackField::Submit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FeedbackField::PatientId => "Patient ID *",
            FeedbackField::Therapy => "Therapy Type *",
            FeedbackField::Rating => "Comfort Rating *",
            FeedbackField::SideEffects => "Side Effects (comma separated)",
            FeedbackField::ReliefSigns => "Relief Signs (comma separated)",
            FeedbackField::Notes => "Additional Notes",
            FeedbackField::Submit => "",
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(
            self,
            FeedbackField::PatientId
                | FeedbackField::SideEffects
                | FeedbackField::ReliefSigns
                | FeedbackField::Notes
        )
    }
}

/// Sections of the patient detail pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatientTab {
    Details,
    Therapy,
    History,
    Precautions,
}

impl PatientTab {
    pub const ALL: [PatientTab; 4] = [
        PatientTab::Details,
        PatientTab::Therapy,
        PatientTab::History,
        PatientTab::Precautions,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            PatientTab::Details => "Details",
            PatientTab::Therapy => "Therapy",
            PatientTab::History => "History",
            PatientTab::Precautions => "Precautions",
        }
    }
}

/// Sections of the profile tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileTab {
    Overview,
    Schedule,
    Availability,
    Settings,
}

impl ProfileTab {
    pub const ALL: [ProfileTab; 4] = [
        ProfileTab::Overview,
        ProfileTab::Schedule,
        ProfileTab::Availability,
        ProfileTab::Settings,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            ProfileTab::Overview => "Overview",
            ProfileTab::Schedule => "Schedule",
            ProfileTab::Availability => "Availability",
            ProfileTab::Settings => "Settings",
        }
    }
}

/// Account actions offered on the profile settings section.
///
/// Each one opens the registration form focused on the matching field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsAction {
    EditPersonalInfo,
    UpdateWorkingHours,
    ModifySpecializations,
}

impl SettingsAction {
    pub const ALL: [SettingsAction; 3] = [
        SettingsAction::EditPersonalInfo,
        SettingsAction::UpdateWorkingHours,
        SettingsAction::ModifySpecializations,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SettingsAction::EditPersonalInfo => "Edit Personal Information",
            SettingsAction::UpdateWorkingHours => "Update Working Hours",
            SettingsAction::ModifySpecializations => "Modify Specializations",
        }
    }

    /// Registration field that receives focus for this action.
    pub fn field(&self) -> RegistrationField {
        match self {
            SettingsAction::EditPersonalInfo => RegistrationField::FullName,
            SettingsAction::UpdateWorkingHours => RegistrationField::StartTime,
            SettingsAction::ModifySpecializations => RegistrationField::Specializations,
        }
    }
}

/// Focusable rows of the session feedback dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogField {
    Rating,
    SideEffect,
    ReliefSign,
    Notes,
    Submit,
}

impl DialogField {
    pub const ALL: [DialogField; 5] = [
        DialogField::Rating,
        DialogField::SideEffect,
        DialogField::ReliefSign,
        DialogField::Notes,
        DialogField::Submit,
    ];
}

/// Open post-session feedback dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionFeedbackDialog {
    pub session_index: usize,
    pub field: DialogField,
    pub draft: SessionFeedbackDraft,
}

/// Main application state containing the profile and all view state.
///
/// The profile container is injected so that tests and the binary can
/// pick their own storage.
///
/// # Examples
///
/// ```
/// use ayurdesk::application::{App, ProfileContainer, Tab};
/// use ayurdesk::infrastructure::{MemoryStorage, ProfileRepository};
///
/// let repository = ProfileRepository::new(MemoryStorage::default());
/// let app = App::new(ProfileContainer::open(repository));
/// assert_eq!(app.tab, Tab::Registration);
/// assert!(!app.profile.is_registered());
/// ```
pub struct App {
    pub profile: ProfileContainer,
    pub tab: Tab,
    pub mode: AppMode,
    /// Current input buffer (for editing mode)
    pub input: String,
    /// Cursor position within the input buffer
    pub cursor_position: usize,
    /// Scroll position in help text
    pub help_scroll: usize,
    /// Transient notice shown in the status bar
    pub status_message: Option<String>,
    /// Input buffer for filename entry
    pub filename_input: String,

    pub registration: RegistrationDraft,
    pub registration_field: RegistrationField,
    /// Highlighted checkbox inside a multi-select registration field
    pub option_cursor: usize,

    pub sessions: Vec<TherapySession>,
    pub selected_session: usize,
    pub session_feedback: Option<SessionFeedbackDialog>,

    pub requests: Vec<TherapyRequest>,
    /// Index into the pending requests
    pub selected_request: usize,

    pub patients: Vec<Patient>,
    pub selected_patient: usize,
    pub patient_tab: PatientTab,

    pub feedback: Vec<FeedbackRecord>,
    pub selected_feedback: usize,
    pub feedback_draft: FeedbackDraft,
    pub feedback_field: FeedbackField,

    pub profile_tab: ProfileTab,
    /// Blocked-out days, kept sorted; in memory only
    pub unavailable_dates: Vec<NaiveDate>,
    pub selected_unavailable: usize,
    pub selected_setting: usize,
}

impl App {
    /// Builds the dashboard around an already opened profile container.
    ///
    /// A registered profile pre-fills the registration form so that
    /// submitting it edits the profile.
    pub fn new(profile: ProfileContainer) -> Self {
        let registration = profile
            .profile()
            .map(RegistrationDraft::from_profile)
            .unwrap_or_default();
        let tab = if profile.is_registered() {
            Tab::Schedule
        } else {
            Tab::Registration
        };

        Self {
            profile,
            tab,
            mode: AppMode::Normal,
            input: String::new(),
            cursor_position: 0,
            help_scroll: 0,
            status_message: None,
            filename_input: String::new(),
            registration,
            registration_field: RegistrationField::FullName,
            option_cursor: 0,
            sessions: samples::todays_sessions(),
            selected_session: 0,
            session_feedback: None,
            requests: samples::therapy_requests(),
            selected_request: 0,
            patients: samples::patients(),
            selected_patient: 0,
            patient_tab: PatientTab::Details,
            feedback: samples::feedback_records(),
            selected_feedback: 0,
            feedback_draft: FeedbackDraft::default(),
            feedback_field: FeedbackField::PatientId,
            profile_tab: ProfileTab::Overview,
            unavailable_dates: samples::unavailable_dates(),
            selected_unavailable: 0,
            selected_setting: 0,
        }
    }

    fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    fn next_feedback_id(&self) -> u32 {
        self.feedback.iter().map(|f| f.id).max().unwrap_or(0) + 1
    }

    /// Switches to `tab`, clearing any status notice from the previous one.
    pub fn select_tab(&mut self, tab: Tab) {
        self.tab = tab;
        self.status_message = None;
    }

    /// Moves to the next tab, wrapping from Profile back to Registration.
    pub fn next_tab(&mut self) {
        self.select_tab(cycle(&Tab::ALL, self.tab, true));
    }

    /// Moves to the previous tab, wrapping from Registration to Profile.
    pub fn previous_tab(&mut self) {
        self.select_tab(cycle(&Tab::ALL, self.tab, false));
    }

    /// Moves the row or field focus of the active tab.
    pub fn move_selection(&mut self, forward: bool) {
        fn step(index: &mut usize, len: usize, forward: bool) {
            if len == 0 {
                *index = 0;
            } else if forward {
                *index = (*index + 1).min(len - 1);
            } else {
                *index = index.saturating_sub(1);
            }
        }

        match self.tab {
            Tab::Registration => {
                self.registration_field =
                    cycle(&RegistrationField::ALL, self.registration_field, forward);
                self.option_cursor = 0;
            }
            Tab::Schedule => step(&mut self.selected_session, self.sessions.len(), forward),
            Tab::Patients => step(&mut self.selected_patient, self.patients.len(), forward),
            Tab::Requests => {
                let pending = self.pending_requests().len();
                step(&mut self.selected_request, pending, forward);
            }
            Tab::Feedback => {
                self.feedback_field = cycle(&FeedbackField::ALL, self.feedback_field, forward);
            }
            Tab::Profile => match self.profile_tab {
                ProfileTab::Availability => {
                    step(&mut self.selected_unavailable, self.unavailable_dates.len(), forward)
                }
                ProfileTab::Settings => {
                    step(&mut self.selected_setting, SettingsAction::ALL.len(), forward)
                }
                ProfileTab::Overview | ProfileTab::Schedule => {}
            },
        }
    }

    /// Left/right inside the focused control: select values, checkbox
    /// cursor, rating, or the patient detail sub-tab.
    pub fn adjust_focused(&mut self, forward: bool) {
        match self.tab {
            Tab::Registration => match self.registration_field {
                RegistrationField::Gender => {
                    self.registration.gender = Some(match self.registration.gender {
                        Some(g) => cycle(&Gender::ALL, g, forward),
                        None => Gender::ALL[0],
                    });
                }
                RegistrationField::Experience => {
                    self.registration.experience = Some(match self.registration.experience {
                        Some(e) => cycle(&ExperienceBracket::ALL, e, forward),
                        None => ExperienceBracket::ALL[0],
                    });
                }
                RegistrationField::Specializations => {
                    self.option_cursor =
                        cycle_index(self.option_cursor, Therapy::ALL.len(), forward);
                }
                RegistrationField::WorkingDays => {
                    self.option_cursor =
                        cycle_index(self.option_cursor, WorkingDay::ALL.len(), forward);
                }
                _ => {}
            },
            Tab::Feedback => match self.feedback_field {
                FeedbackField::Therapy => {
                    self.feedback_draft.therapy = Some(match self.feedback_draft.therapy {
                        Some(t) => cycle(&Therapy::ALL, t, forward),
                        None => Therapy::ALL[0],
                    });
                }
                FeedbackField::Rating => {
                    let rating = self.feedback_draft.comfort_rating;
                    self.feedback_draft.comfort_rating = if forward {
                        (rating + 1).min(5)
                    } else {
                        rating.saturating_sub(1)
                    };
                }
                _ => {}
            },
            Tab::Patients => {
                self.patient_tab = cycle(&PatientTab::ALL, self.patient_tab, forward);
            }
            Tab::Profile => {
                self.profile_tab = cycle(&ProfileTab::ALL, self.profile_tab, forward);
            }
            _ => {}
        }
    }

    /// Toggles the highlighted checkbox of a multi-select registration field.
    pub fn toggle_option(&mut self) {
        match self.registration_field {
            RegistrationField::Specializations => {
                if let Some(therapy) = Therapy::ALL.get(self.option_cursor) {
                    toggle(&mut self.registration.specializations, *therapy);
                }
            }
            RegistrationField::WorkingDays => {
                if let Some(day) = WorkingDay::ALL.get(self.option_cursor) {
                    toggle(&mut self.registration.working_days, *day);
                }
            }
            RegistrationField::Gender | RegistrationField::Experience => {
                self.adjust_focused(true);
            }
            _ => {}
        }
    }

    fn focused_text_mut(&mut self) -> Option<&mut String> {
        match self.tab {
            Tab::Registration => {
                let draft = &mut self.registration;
                match self.registration_field {
                    RegistrationField::FullName => Some(&mut draft.full_name),
                    RegistrationField::Mobile => Some(&mut draft.mobile),
                    RegistrationField::Email => Some(&mut draft.email),
                    RegistrationField::StartTime => Some(&mut draft.start_time),
                    RegistrationField::EndTime => Some(&mut draft.end_time),
                    RegistrationField::Location => Some(&mut draft.location),
                    RegistrationField::Bio => Some(&mut draft.bio),
                    _ => None,
                }
            }
            Tab::Feedback => {
                let draft = &mut self.feedback_draft;
                match self.feedback_field {
                    FeedbackField::PatientId => Some(&mut draft.patient_id),
                    FeedbackField::SideEffects => Some(&mut draft.side_effects),
                    FeedbackField::ReliefSigns => Some(&mut draft.relief_signs),
                    FeedbackField::Notes => Some(&mut draft.notes),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// Enter on a form: edit a text field or submit. On the profile
    /// settings section it runs the highlighted account action.
    pub fn activate_focused(&mut self) {
        if self.tab == Tab::Profile && self.profile_tab == ProfileTab::Settings {
            if let Some(action) = SettingsAction::ALL.get(self.selected_setting) {
                self.run_settings_action(*action);
            }
            return;
        }
        match (self.tab, self.registration_field, self.feedback_field) {
            (Tab::Registration, RegistrationField::Submit, _) => self.submit_registration(),
            (Tab::Registration, field, _) if !field.is_text() => self.toggle_option(),
            (Tab::Feedback, _, FeedbackField::Submit) => self.submit_feedback(),
            (Tab::Registration | Tab::Feedback, _, _) => self.start_editing(),
            _ => {}
        }
    }

    /// Switches to editing mode for the focused text field.
    pub fn start_editing(&mut self) {
        let Some(current) = self.focused_text_mut().map(|s| s.clone()) else {
            return;
        };
        self.mode = AppMode::Editing;
        self.input = current;
        self.cursor_position = self.input.len();
    }

    /// Writes the input buffer back into the focused field.
    pub fn finish_editing(&mut self) {
        let value = std::mem::take(&mut self.input);
        if let Some(field) = self.focused_text_mut() {
            *field = value;
        }
        self.mode = AppMode::Normal;
        self.cursor_position = 0;
    }

    /// Cancels editing and returns to normal mode without saving changes.
    pub fn cancel_editing(&mut self) {
        self.mode = AppMode::Normal;
        self.input.clear();
        self.cursor_position = 0;
    }

    /// Registers, or updates the existing profile with the changed fields.
    ///
    /// Validation failures leave the profile untouched.
    pub fn submit_registration(&mut self) {
        let input = match self.registration.validate() {
            Ok(input) => input,
            Err(e) => {
                self.reject_form("Registration", &e);
                return;
            }
        };

        let patch = self
            .profile
            .profile()
            .map(|current| ProfilePatch::diff(current, input.clone()));

        let message = match patch {
            None => {
                let profile = self.profile.register(input);
                self.registration = RegistrationDraft::from_profile(profile);
                "Registration Successful! Your therapist profile has been created.".to_string()
            }
            Some(patch) if patch.is_empty() => "No changes to save".to_string(),
            Some(patch) => match self.profile.update(patch) {
                Ok(profile) => {
                    self.registration = RegistrationDraft::from_profile(profile);
                    "Profile updated".to_string()
                }
                Err(e) => format!("Update failed: {e}"),
            },
        };
        self.status_message = Some(message);
    }

    fn reject_form(&mut self, form: &str, error: &ValidationError) {
        warn!(form, reason = %error, "form submission blocked");
        self.status_message = Some(format!("{form} blocked: {error}"));
    }

    /// Starts editing the profile from the profile tab.
    pub fn edit_profile(&mut self) {
        match self.profile.profile() {
            Some(profile) => {
                self.registration = RegistrationDraft::from_profile(profile);
                self.registration_field = RegistrationField::FullName;
                self.select_tab(Tab::Registration);
            }
            None => {
                self.select_tab(Tab::Registration);
                self.status_message = Some("Complete registration to create your profile".to_string());
            }
        }
    }

    /// Opens the registration form at the field the action is about.
    pub fn run_settings_action(&mut self, action: SettingsAction) {
        self.edit_profile();
        self.registration_field = action.field();
        self.option_cursor = 0;
    }

    /// Prompts for a `YYYY-MM-DD` date, pre-filled with today.
    pub fn start_unavailable_date(&mut self) {
        self.mode = AppMode::AddUnavailableDate;
        self.input = Self::today().format(DATE_FORMAT).to_string();
        self.cursor_position = self.input.len();
        self.status_message = None;
    }

    /// Adds the prompted date to the availability list.
    ///
    /// An unparseable date keeps the prompt open; a date already on the
    /// list is left alone.
    pub fn submit_unavailable_date(&mut self) {
        let date = match parse_date(&self.input, "Unavailable date") {
            Ok(date) => date,
            Err(e) => {
                self.reject_form("Availability", &e);
                return;
            }
        };

        self.status_message = Some(if self.unavailable_dates.contains(&date) {
            format!("{} is already marked unavailable", date.format(DATE_FORMAT))
        } else {
            self.unavailable_dates.push(date);
            self.unavailable_dates.sort_unstable();
            self.selected_unavailable = self
                .unavailable_dates
                .iter()
                .position(|d| *d == date)
                .unwrap_or(0);
            info!(date = %date, "unavailable date added");
            format!("Marked {} as unavailable", date.format(DATE_FORMAT))
        });
        self.cancel_editing();
    }

    /// Removes the highlighted unavailable date.
    pub fn remove_unavailable_date(&mut self) {
        if self.selected_unavailable >= self.unavailable_dates.len() {
            return;
        }
        let date = self.unavailable_dates.remove(self.selected_unavailable);
        self.selected_unavailable = self
            .selected_unavailable
            .min(self.unavailable_dates.len().saturating_sub(1));
        info!(date = %date, "unavailable date removed");
        self.status_message = Some(format!("{} is available again", date.format(DATE_FORMAT)));
    }

    /// Sets the status of the highlighted session and logs the change.
    pub fn set_session_status(&mut self, status: SessionStatus) {
        if let Some(session) = self.sessions.get_mut(self.selected_session) {
            session.status = status;
            info!(
                session_id = session.id,
                patient_id = %session.patient_id,
                status = status.label(),
                "session status changed"
            );
        }
    }

    /// Opens the feedback dialog; only completed sessions take feedback.
    pub fn open_session_feedback(&mut self) {
        match self.sessions.get(self.selected_session) {
            Some(session) if session.status == SessionStatus::Completed => {
                self.session_feedback = Some(SessionFeedbackDialog {
                    session_index: self.selected_session,
                    field: DialogField::Rating,
                    draft: SessionFeedbackDraft::default(),
                });
                self.mode = AppMode::SessionFeedback;
                self.status_message = None;
            }
            Some(_) => {
                self.status_message =
                    Some("Feedback can be added once the session is completed".to_string());
            }
            None => {}
        }
    }

    /// Discards the dialog and its draft.
    pub fn close_session_feedback(&mut self) {
        self.session_feedback = None;
        self.mode = AppMode::Normal;
    }

    /// Moves focus between the dialog's fields, wrapping at both ends.
    pub fn move_dialog_field(&mut self, forward: bool) {
        if let Some(dialog) = self.session_feedback.as_mut() {
            dialog.field = cycle(&DialogField::ALL, dialog.field, forward);
        }
    }

    /// Left/right on the focused dialog field.
    ///
    /// Steps the rating within 0-5, or cycles the side effect and relief
    /// sign through their fixed option lists.
    pub fn adjust_dialog_field(&mut self, forward: bool) {
        fn pick(options: &[&'static str], current: Option<&'static str>, forward: bool) -> &'static str {
            match current {
                Some(value) => cycle(options, value, forward),
                None => options[0],
            }
        }

        let Some(dialog) = self.session_feedback.as_mut() else {
            return;
        };
        let draft = &mut dialog.draft;
        match dialog.field {
            DialogField::Rating => {
                draft.comfort_rating = if forward {
                    (draft.comfort_rating + 1).min(5)
                } else {
                    draft.comfort_rating.saturating_sub(1)
                };
            }
            DialogField::SideEffect => {
                draft.side_effect = Some(pick(&SIDE_EFFECT_OPTIONS, draft.side_effect, forward));
            }
            DialogField::ReliefSign => {
                draft.relief_sign = Some(pick(&RELIEF_SIGN_OPTIONS, draft.relief_sign, forward));
            }
            DialogField::Notes | DialogField::Submit => {}
        }
    }

    /// Sets the comfort rating directly, capped at 5.
    pub fn set_dialog_rating(&mut self, rating: u8) {
        if let Some(dialog) = self.session_feedback.as_mut() {
            dialog.draft.comfort_rating = rating.min(5);
        }
    }

    /// Notes buffer, but only while the notes field has focus.
    pub fn dialog_notes_mut(&mut self) -> Option<&mut String> {
        self.session_feedback
            .as_mut()
            .filter(|d| d.field == DialogField::Notes)
            .map(|d| &mut d.draft.notes)
    }

    /// Records the dialog's feedback; a missing rating keeps the dialog open.
    pub fn submit_session_feedback(&mut self) {
        let Some(dialog) = self.session_feedback.as_ref() else {
            return;
        };
        let Some(session) = self.sessions.get(dialog.session_index) else {
            self.close_session_feedback();
            return;
        };

        match dialog
            .draft
            .into_record(session, self.next_feedback_id(), Self::today())
        {
            Ok(record) => {
                info!(
                    patient_id = %record.patient_id,
                    patient_name = %record.patient_name,
                    therapy = record.therapy.label(),
                    comfort_rating = record.comfort_rating,
                    side_effects = ?record.side_effects,
                    relief_signs = ?record.relief_signs,
                    notes = %record.notes,
                    "session feedback submitted"
                );
                self.status_message = Some(format!(
                    "Feedback for {} has been recorded and sent to the doctor.",
                    record.patient_name
                ));
                self.feedback.push(record);
                self.close_session_feedback();
            }
            Err(e) => self.reject_form("Feedback", &e),
        }
    }

    /// Requests still waiting for a decision, in arrival order.
    pub fn pending_requests(&self) -> Vec<&TherapyRequest> {
        self.requests
            .iter()
            .filter(|r| r.status == RequestStatus::Pending)
            .collect()
    }

    /// Most recently processed requests, oldest first.
    pub fn processed_requests(&self) -> Vec<&TherapyRequest> {
        let processed: Vec<&TherapyRequest> = self
            .requests
            .iter()
            .filter(|r| r.status != RequestStatus::Pending)
            .collect();
        let skip = processed.len().saturating_sub(RECENT_ACTIONS_LIMIT);
        processed.into_iter().skip(skip).collect()
    }

    /// Accepts the highlighted pending request.
    ///
    /// The request leaves the pending list and shows up under recent
    /// actions.
    pub fn accept_request(&mut self) {
        self.process_request(RequestStatus::Accepted);
    }

    /// Rejects the highlighted pending request.
    pub fn reject_request(&mut self) {
        self.process_request(RequestStatus::Rejected);
    }

    fn process_request(&mut self, status: RequestStatus) {
        let Some(id) = self
            .pending_requests()
            .get(self.selected_request)
            .map(|r| r.id.clone())
        else {
            return;
        };
        let Some(request) = self.requests.iter_mut().find(|r| r.id == id) else {
            return;
        };
        request.status = status;

        info!(
            request_id = %request.id,
            patient_name = %request.patient_name,
            patient_id = %request.patient_id,
            therapy = request.therapy.label(),
            date = %request.requested_date,
            time = %request.requested_time,
            room_bed = %request.room_bed,
            status = status.label(),
            "therapy request processed"
        );
        self.status_message = Some(match status {
            RequestStatus::Accepted => format!(
                "Request Accepted: therapy session for {} has been accepted and scheduled.",
                request.patient_name
            ),
            _ => format!(
                "Request Rejected: therapy request for {} has been rejected.",
                request.patient_name
            ),
        });

        let remaining = self.pending_requests().len();
        self.selected_request = self.selected_request.min(remaining.saturating_sub(1));
    }

    /// Patient whose record fills the detail pane.
    pub fn selected_patient(&self) -> Option<&Patient> {
        self.patients.get(self.selected_patient)
    }

    /// Emits the selected patient record to the log.
    pub fn log_selected_patient(&mut self) {
        let Some(patient) = self.patients.get(self.selected_patient) else {
            return;
        };
        info!(
            patient_id = %patient.id,
            name = %patient.name,
            age = patient.age,
            gender = %patient.gender,
            phone = %patient.phone,
            email = %patient.email,
            address = %patient.address,
            prakriti = %patient.prakriti,
            dosha_imbalance = %patient.dosha_imbalance,
            allergies = ?patient.allergies,
            current_therapy = ?patient.current_therapy,
            session_history = ?patient.session_history,
            precautions = ?patient.precautions,
            "patient data"
        );
        self.status_message = Some(format!("Patient {} sent to log", patient.id));
    }

    /// Moves the feedback card highlight, stopping at the first and last card.
    pub fn select_feedback(&mut self, forward: bool) {
        if self.feedback.is_empty() {
            return;
        }
        self.selected_feedback = if forward {
            (self.selected_feedback + 1).min(self.feedback.len() - 1)
        } else {
            self.selected_feedback.saturating_sub(1)
        };
    }

    /// Emits the selected feedback record to the log.
    pub fn log_selected_feedback(&mut self) {
        let Some(feedback) = self.feedback.get(self.selected_feedback) else {
            return;
        };
        info!(
            patient_id = %feedback.patient_id,
            patient_name = %feedback.patient_name,
            therapy = feedback.therapy.label(),
            date = %feedback.date,
            comfort_rating = feedback.comfort_rating,
            side_effects = ?feedback.side_effects,
            relief_signs = ?feedback.relief_signs,
            notes = %feedback.notes,
            status = feedback.status.label(),
            "feedback data"
        );
        self.status_message = Some(format!("Feedback for {} sent to log", feedback.patient_name));
    }

    /// Records the feedback board's form and clears it.
    pub fn submit_feedback(&mut self) {
        let patient_id = self.feedback_draft.patient_id.trim().to_string();
        let patient_name = self
            .patients
            .iter()
            .find(|p| p.id == patient_id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| patient_id.clone());

        match self
            .feedback_draft
            .into_record(self.next_feedback_id(), patient_name, Self::today())
        {
            Ok(record) => {
                info!(
                    patient_id = %record.patient_id,
                    therapy = record.therapy.label(),
                    date = %record.date,
                    comfort_rating = record.comfort_rating,
                    side_effects = ?record.side_effects,
                    relief_signs = ?record.relief_signs,
                    notes = %record.notes,
                    "new feedback submitted"
                );
                self.feedback.push(record);
                self.feedback_draft = FeedbackDraft::default();
                self.feedback_field = FeedbackField::PatientId;
                self.status_message = Some("Feedback Submitted: patient feedback has been recorded.".to_string());
            }
            Err(e) => self.reject_form("Feedback", &e),
        }
    }

    /// Switches to CSV export mode to prompt for a filename.
    pub fn start_csv_export(&mut self) {
        self.mode = AppMode::ExportCsv;
        self.filename_input = "feedback.csv".to_string();
        self.cursor_position = self.filename_input.len();
        self.status_message = None;
    }

    /// Gets the filename to use for CSV export.
    pub fn get_csv_export_filename(&self) -> PathBuf {
        if self.filename_input.trim().is_empty() {
            PathBuf::from("feedback.csv")
        } else {
            PathBuf::from(self.filename_input.trim())
        }
    }

    /// Cancels filename input and returns to normal mode.
    pub fn cancel_filename_input(&mut self) {
        self.mode = AppMode::Normal;
        self.filename_input.clear();
        self.cursor_position = 0;
    }

    /// Processes the result of a CSV export operation.
    pub fn set_csv_export_result(&mut self, result: Result<PathBuf, ExportError>) {
        self.status_message = Some(match result {
            Ok(path) => {
                info!(path = %path.display(), records = self.feedback.len(), "feedback exported");
                format!("Exported {} feedback records to {}", self.feedback.len(), path.display())
            }
            Err(e) => {
                warn!(error = %e, "feedback export failed");
                format!("Export failed: {e}")
            }
        });
        self.cancel_filename_input();
    }
}

fn cycle_index(index: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if forward { (index + 1) % len } else { (index + len - 1) % len }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ProfileState;
    use crate::domain::{ExperienceBracket, Gender};
    use crate::infrastructure::{FileStorage, MemoryStorage, ProfileRepository};
    use tempfile::TempDir;

    fn app() -> App {
        App::new(ProfileContainer::open(ProfileRepository::new(MemoryStorage::default())))
    }

    fn fill_registration(app: &mut App) {
        app.registration = RegistrationDraft {
            full_name: "Asha Rao".to_string(),
            mobile: "+91 9876543210".to_string(),
            email: "asha@example.com".to_string(),
            gender: Some(Gender::Female),
            specializations: vec![Therapy::Basti],
            experience: Some(ExperienceBracket::ThreeToFive),
            working_days: vec![WorkingDay::Monday],
            start_time: "09:00".to_string(),
            end_time: "17:00".to_string(),
            location: String::new(),
            bio: String::new(),
        };
    }

    #[test]
    fn test_app_default_state() {
        let app = app();
        assert_eq!(app.tab, Tab::Registration);
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.profile.state(), ProfileState::Unregistered);
        assert_eq!(app.sessions.len(), 5);
        assert_eq!(app.pending_requests().len(), 4);
        assert!(app.status_message.is_none());
    }

    #[test]
    fn test_tab_navigation_wraps() {
        let mut app = app();
        app.previous_tab();
        assert_eq!(app.tab, Tab::Profile);
        app.next_tab();
        assert_eq!(app.tab, Tab::Registration);
    }

    #[test]
    fn test_incomplete_registration_is_blocked() {
        let mut app = app();
        app.submit_registration();

        assert!(!app.profile.is_registered());
        assert_eq!(
            app.status_message.as_deref(),
            Some("Registration blocked: Full name is required")
        );
    }

    #[test]
    fn test_registration_then_edit_updates_profile() {
        let mut app = app();
        fill_registration(&mut app);
        app.submit_registration();

        assert!(app.profile.is_registered());
        let registered_at = app.profile.profile().unwrap().registration_date;

        app.registration.location = "Main Center".to_string();
        app.submit_registration();

        let profile = app.profile.profile().unwrap();
        assert_eq!(profile.location, "Main Center");
        assert_eq!(profile.registration_date, registered_at);
        assert_eq!(app.status_message.as_deref(), Some("Profile updated"));

        app.submit_registration();
        assert_eq!(app.status_message.as_deref(), Some("No changes to save"));
    }

    #[test]
    fn test_registered_profile_opens_on_schedule() {
        let dir = TempDir::new().unwrap();
        let open = || ProfileContainer::open(ProfileRepository::new(FileStorage::new(dir.path())));

        let mut first = App::new(open());
        fill_registration(&mut first);
        first.submit_registration();

        let app = App::new(open());
        assert_eq!(app.tab, Tab::Schedule);
        assert_eq!(app.registration.full_name, "Asha Rao");
    }

    #[test]
    fn test_editing_writes_back_to_focused_field() {
        let mut app = app();
        app.registration_field = RegistrationField::Email;
        app.start_editing();
        assert_eq!(app.mode, AppMode::Editing);

        app.input = "asha@example.com".to_string();
        app.finish_editing();

        assert_eq!(app.registration.email, "asha@example.com");
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn test_toggle_specialization_checkbox() {
        let mut app = app();
        app.registration_field = RegistrationField::Specializations;
        app.adjust_focused(true);
        app.toggle_option();
        assert_eq!(app.registration.specializations, vec![Therapy::Virechana]);

        app.toggle_option();
        assert!(app.registration.specializations.is_empty());
    }

    #[test]
    fn test_select_fields_cycle() {
        let mut app = app();
        app.registration_field = RegistrationField::Gender;
        app.adjust_focused(true);
        assert_eq!(app.registration.gender, Some(Gender::Male));
        app.adjust_focused(false);
        assert_eq!(app.registration.gender, Some(Gender::Other));
    }

    #[test]
    fn test_session_status_change() {
        let mut app = app();
        app.selected_session = 0;
        app.set_session_status(SessionStatus::Ongoing);
        assert_eq!(app.sessions[0].status, SessionStatus::Ongoing);
    }

    #[test]
    fn test_feedback_dialog_only_for_completed_sessions() {
        let mut app = app();
        app.selected_session = 0;
        app.open_session_feedback();
        assert!(app.session_feedback.is_none());
        assert_eq!(app.mode, AppMode::Normal);

        app.selected_session = 2;
        app.open_session_feedback();
        assert!(app.session_feedback.is_some());
        assert_eq!(app.mode, AppMode::SessionFeedback);
    }

    #[test]
    fn test_session_feedback_requires_rating() {
        let mut app = app();
        app.selected_session = 2;
        app.open_session_feedback();

        app.submit_session_feedback();
        assert_eq!(app.mode, AppMode::SessionFeedback);
        assert_eq!(app.feedback.len(), 3);

        app.set_dialog_rating(4);
        app.move_dialog_field(true);
        app.adjust_dialog_field(true);
        app.submit_session_feedback();

        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.feedback.len(), 4);
        let record = app.feedback.last().unwrap();
        assert_eq!(record.patient_name, "Meera Patel");
        assert_eq!(record.comfort_rating, 4);
        assert_eq!(record.side_effects, vec!["None".to_string()]);
        assert_eq!(record.id, 4);
    }

    #[test]
    fn test_accept_and_reject_requests() {
        let mut app = app();
        app.accept_request();
        assert_eq!(app.requests[0].status, RequestStatus::Accepted);
        assert_eq!(app.pending_requests().len(), 3);

        app.selected_request = 2;
        app.reject_request();
        assert_eq!(app.requests[3].status, RequestStatus::Rejected);
        assert_eq!(app.selected_request, 1);

        let processed: Vec<&str> = app.processed_requests().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(processed, vec!["REQ001", "REQ004"]);
    }

    #[test]
    fn test_processed_requests_keep_last_five() {
        let mut app = app();
        let mut extra = app.requests.clone();
        for (i, request) in extra.iter_mut().enumerate() {
            request.id = format!("EXTRA{i}");
        }
        app.requests.extend(extra);
        for request in app.requests.iter_mut() {
            request.status = RequestStatus::Accepted;
        }

        let processed = app.processed_requests();
        assert_eq!(processed.len(), RECENT_ACTIONS_LIMIT);
        assert_eq!(processed[0].id, "REQ004");
    }

    #[test]
    fn test_new_feedback_resolves_patient_name() {
        let mut app = app();
        app.feedback_draft = FeedbackDraft {
            patient_id: "P002".to_string(),
            therapy: Some(Therapy::Nasya),
            comfort_rating: 5,
            side_effects: "None".to_string(),
            relief_signs: "Breathing Improved, Mood Improved".to_string(),
            notes: String::new(),
        };

        app.submit_feedback();

        let record = app.feedback.last().unwrap();
        assert_eq!(record.patient_name, "Raj Kumar");
        assert_eq!(record.relief_signs.len(), 2);
        assert_eq!(app.feedback_draft, FeedbackDraft::default());
    }

    #[test]
    fn test_new_feedback_without_rating_keeps_form() {
        let mut app = app();
        app.feedback_draft.patient_id = "P001".to_string();
        app.feedback_draft.therapy = Some(Therapy::Vamana);

        app.submit_feedback();

        assert_eq!(app.feedback.len(), 3);
        assert_eq!(app.feedback_draft.patient_id, "P001");
        assert!(app.status_message.unwrap().contains("comfort rating"));
    }

    #[test]
    fn test_patient_sub_tabs_cycle() {
        let mut app = app();
        app.select_tab(Tab::Patients);
        app.adjust_focused(false);
        assert_eq!(app.patient_tab, PatientTab::Precautions);
    }

    #[test]
    fn test_csv_export_filename_defaults() {
        let mut app = app();
        app.start_csv_export();
        assert_eq!(app.mode, AppMode::ExportCsv);
        assert_eq!(app.get_csv_export_filename(), PathBuf::from("feedback.csv"));

        app.filename_input.clear();
        assert_eq!(app.get_csv_export_filename(), PathBuf::from("feedback.csv"));
    }

    #[test]
    fn test_edit_profile_without_registration() {
        let mut app = app();
        app.select_tab(Tab::Profile);
        app.edit_profile();
        assert_eq!(app.tab, Tab::Registration);
        assert!(app.status_message.is_some());
    }

    #[test]
    fn test_profile_sub_tabs_cycle() {
        let mut app = app();
        app.select_tab(Tab::Profile);
        assert_eq!(app.profile_tab, ProfileTab::Overview);

        app.adjust_focused(true);
        assert_eq!(app.profile_tab, ProfileTab::Schedule);
        app.adjust_focused(false);
        app.adjust_focused(false);
        assert_eq!(app.profile_tab, ProfileTab::Settings);
    }

    #[test]
    fn test_add_unavailable_date_keeps_list_sorted() {
        let mut app = app();
        app.select_tab(Tab::Profile);
        app.profile_tab = ProfileTab::Availability;

        app.start_unavailable_date();
        assert_eq!(app.mode, AppMode::AddUnavailableDate);
        app.input = "2024-02-01".to_string();
        app.submit_unavailable_date();

        let expected: Vec<NaiveDate> = [(1, 28), (1, 29), (2, 1), (2, 5)]
            .iter()
            .map(|(m, d)| NaiveDate::from_ymd_opt(2024, *m, *d).unwrap())
            .collect();
        assert_eq!(app.unavailable_dates, expected);
        assert_eq!(app.selected_unavailable, 2);
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.status_message.as_deref(), Some("Marked 2024-02-01 as unavailable"));
    }

    #[test]
    fn test_duplicate_unavailable_date_is_ignored() {
        let mut app = app();
        app.start_unavailable_date();
        app.input = "2024-01-28".to_string();
        app.submit_unavailable_date();

        assert_eq!(app.unavailable_dates.len(), 3);
        assert!(app.status_message.unwrap().contains("already marked"));
    }

    #[test]
    fn test_invalid_unavailable_date_keeps_prompt_open() {
        let mut app = app();
        app.start_unavailable_date();
        app.input = "28/01/2024".to_string();
        app.submit_unavailable_date();

        assert_eq!(app.mode, AppMode::AddUnavailableDate);
        assert_eq!(app.unavailable_dates.len(), 3);
        assert_eq!(
            app.status_message.as_deref(),
            Some("Availability blocked: Unavailable date must be a date in YYYY-MM-DD format")
        );
    }

    #[test]
    fn test_remove_unavailable_date() {
        let mut app = app();
        app.select_tab(Tab::Profile);
        app.profile_tab = ProfileTab::Availability;
        app.move_selection(true);
        app.move_selection(true);
        app.move_selection(true);
        assert_eq!(app.selected_unavailable, 2);

        app.remove_unavailable_date();
        assert_eq!(app.unavailable_dates.len(), 2);
        assert_eq!(app.selected_unavailable, 1);

        app.remove_unavailable_date();
        app.remove_unavailable_date();
        assert!(app.unavailable_dates.is_empty());
        app.remove_unavailable_date();
        assert_eq!(app.selected_unavailable, 0);
    }

    #[test]
    fn test_settings_action_focuses_registration_field() {
        let mut app = app();
        fill_registration(&mut app);
        app.submit_registration();

        app.select_tab(Tab::Profile);
        app.profile_tab = ProfileTab::Settings;
        app.move_selection(true);
        app.activate_focused();

        assert_eq!(app.tab, Tab::Registration);
        assert_eq!(app.registration_field, RegistrationField::StartTime);
        assert_eq!(app.registration.start_time, "09:00");
    }
}
