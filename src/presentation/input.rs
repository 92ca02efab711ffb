use crate::application::{App, AppMode, ProfileTab, Tab};
use crate::domain::SessionStatus;
use crate::infrastructure::FeedbackCsvExporter;
use crossterm::event::{KeyCode, KeyModifiers};

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        match app.mode {
            AppMode::Normal => Self::handle_normal_mode(app, key, modifiers),
            AppMode::Editing => Self::handle_editing_mode(app, key),
            AppMode::Help => Self::handle_help_mode(app, key),
            AppMode::SessionFeedback => Self::handle_session_feedback_mode(app, key),
            AppMode::ExportCsv => Self::handle_filename_input_mode(app, key),
            AppMode::AddUnavailableDate => Self::handle_date_input_mode(app, key),
        }
    }

    fn handle_normal_mode(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            if let KeyCode::Char('e') = key {
                app.start_csv_export();
            }
            return;
        }

        match key {
            KeyCode::Tab => app.next_tab(),
            KeyCode::BackTab => app.previous_tab(),
            KeyCode::Char(c @ '1'..='6') => {
                let index = c as usize - '1' as usize;
                app.select_tab(Tab::ALL[index]);
            }
            KeyCode::Up | KeyCode::Char('k') => app.move_selection(false),
            KeyCode::Down | KeyCode::Char('j') => app.move_selection(true),
            KeyCode::Left | KeyCode::Char('h') => app.adjust_focused(false),
            KeyCode::Right | KeyCode::Char('l') => app.adjust_focused(true),
            KeyCode::F(1) | KeyCode::Char('?') => {
                app.mode = AppMode::Help;
                app.help_scroll = 0;
            }
            KeyCode::Char('q') => {
                // Will be handled by main loop
            }
            _ => Self::handle_tab_action(app, key),
        }
    }

    fn handle_tab_action(app: &mut App, key: KeyCode) {
        match (app.tab, key) {
            (Tab::Registration | Tab::Feedback, KeyCode::Enter) => app.activate_focused(),
            (Tab::Registration, KeyCode::Char(' ')) => app.toggle_option(),
            (Tab::Schedule, KeyCode::Char('p')) => app.set_session_status(SessionStatus::Pending),
            (Tab::Schedule, KeyCode::Char('o')) => app.set_session_status(SessionStatus::Ongoing),
            (Tab::Schedule, KeyCode::Char('c')) => app.set_session_status(SessionStatus::Completed),
            (Tab::Schedule, KeyCode::Char('f')) => app.open_session_feedback(),
            (Tab::Requests, KeyCode::Char('a')) => app.accept_request(),
            (Tab::Requests, KeyCode::Char('r')) => app.reject_request(),
            (Tab::Patients, KeyCode::Char('s')) => app.log_selected_patient(),
            (Tab::Feedback, KeyCode::Char('[')) => app.select_feedback(false),
            (Tab::Feedback, KeyCode::Char(']')) => app.select_feedback(true),
            (Tab::Feedback, KeyCode::Char('s')) => app.log_selected_feedback(),
            (Tab::Profile, KeyCode::Char('e')) => app.edit_profile(),
            (Tab::Profile, KeyCode::Enter) => app.activate_focused(),
            (Tab::Profile, KeyCode::Char('a')) if app.profile_tab == ProfileTab::Availability => {
                app.start_unavailable_date()
            }
            (Tab::Profile, KeyCode::Char('x') | KeyCode::Delete)
                if app.profile_tab == ProfileTab::Availability =>
            {
                app.remove_unavailable_date()
            }
            (_, KeyCode::Esc) => app.status_message = None,
            _ => {}
        }
    }

    fn handle_editing_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter => app.finish_editing(),
            KeyCode::Esc => app.cancel_editing(),
            _ => Self::edit_buffer(&mut app.input, &mut app.cursor_position, key),
        }
    }

    fn handle_help_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('q') => {
                app.mode = AppMode::Normal;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                app.help_scroll = app.help_scroll.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.help_scroll += 1;
            }
            KeyCode::PageUp => {
                app.help_scroll = app.help_scroll.saturating_sub(5);
            }
            KeyCode::PageDown => {
                app.help_scroll += 5;
            }
            KeyCode::Home => {
                app.help_scroll = 0;
            }
            _ => {}
        }
    }

    fn handle_session_feedback_mode(app: &mut App, key: KeyCode) {
        if let Some(notes) = app.dialog_notes_mut() {
            match key {
                KeyCode::Char(c) => {
                    notes.push(c);
                    return;
                }
                KeyCode::Backspace => {
                    notes.pop();
                    return;
                }
                _ => {}
            }
        }

        match key {
            KeyCode::Esc => app.close_session_feedback(),
            KeyCode::Up | KeyCode::BackTab => app.move_dialog_field(false),
            KeyCode::Down | KeyCode::Tab => app.move_dialog_field(true),
            KeyCode::Left => app.adjust_dialog_field(false),
            KeyCode::Right => app.adjust_dialog_field(true),
            KeyCode::Char(c @ '1'..='5') => app.set_dialog_rating(c as u8 - b'0'),
            KeyCode::Enter => app.submit_session_feedback(),
            _ => {}
        }
    }

    fn handle_filename_input_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter => {
                let path = app.get_csv_export_filename();
                let result = FeedbackCsvExporter::export_to_file(&app.feedback, &path);
                app.set_csv_export_result(result);
            }
            KeyCode::Esc => app.cancel_filename_input(),
            _ => Self::edit_buffer(&mut app.filename_input, &mut app.cursor_position, key),
        }
    }

    fn handle_date_input_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter => app.submit_unavailable_date(),
            KeyCode::Esc => app.cancel_editing(),
            _ => Self::edit_buffer(&mut app.input, &mut app.cursor_position, key),
        }
    }

    /// Cursor-aware single line editing shared by every text prompt.
    fn edit_buffer(buffer: &mut String, cursor: &mut usize, key: KeyCode) {
        match key {
            KeyCode::Backspace => {
                if *cursor > 0 {
                    let prev = buffer[..*cursor]
                        .char_indices()
                        .next_back()
                        .map(|(i, _)| i)
                        .unwrap_or(0);
                    buffer.remove(prev);
                    *cursor = prev;
                }
            }
            KeyCode::Delete => {
                if *cursor < buffer.len() {
                    buffer.remove(*cursor);
                }
            }
            KeyCode::Left => {
                if let Some((i, _)) = buffer[..*cursor].char_indices().next_back() {
                    *cursor = i;
                }
            }
            KeyCode::Right => {
                if let Some(c) = buffer[*cursor..].chars().next() {
                    *cursor += c.len_utf8();
                }
            }
            KeyCode::Home => *cursor = 0,
            KeyCode::End => *cursor = buffer.len(),
            KeyCode::Char(c) => {
                buffer.insert(*cursor, c);
                *cursor += c.len_utf8();
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{ProfileContainer, RegistrationField};
    use crate::domain::RequestStatus;
    use crate::infrastructure::{MemoryStorage, ProfileRepository};

    fn app() -> App {
        App::new(ProfileContainer::open(ProfileRepository::new(MemoryStorage::default())))
    }

    fn press(app: &mut App, key: KeyCode) {
        InputHandler::handle_key_event(app, key, KeyModifiers::NONE);
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_number_keys_switch_tabs() {
        let mut app = app();
        press(&mut app, KeyCode::Char('4'));
        assert_eq!(app.tab, Tab::Requests);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.tab, Tab::Feedback);
    }

    #[test]
    fn test_type_into_registration_field() {
        let mut app = app();
        assert_eq!(app.registration_field, RegistrationField::FullName);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, AppMode::Editing);
        type_text(&mut app, "Asha Rap");
        press(&mut app, KeyCode::Backspace);
        type_text(&mut app, "o");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.registration.full_name, "Asha Rao");
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn test_escape_discards_edit() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "discard me");
        press(&mut app, KeyCode::Esc);

        assert!(app.registration.full_name.is_empty());
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn test_full_registration_by_keyboard() {
        let mut app = app();
        let mut fill = |app: &mut App, text: &str| {
            press(app, KeyCode::Enter);
            type_text(app, text);
            press(app, KeyCode::Enter);
            press(app, KeyCode::Down);
        };

        fill(&mut app, "Asha Rao");
        fill(&mut app, "+91 9876543210");
        fill(&mut app, "asha@example.com");
        // Gender: first option
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Down);
        // Specializations: Basti is the third checkbox
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Down);
        // Experience
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Down);
        // Working days: Monday
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Down);
        fill(&mut app, "09:00");
        fill(&mut app, "17:00");
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.registration_field, RegistrationField::Submit);

        press(&mut app, KeyCode::Enter);

        let profile = app.profile.profile().unwrap();
        assert_eq!(profile.full_name, "Asha Rao");
        assert_eq!(profile.specializations, vec![crate::domain::Therapy::Basti]);
        assert_eq!(profile.stats.total_patients, 0);
    }

    #[test]
    fn test_request_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char('4'));
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.requests[0].status, RequestStatus::Rejected);
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.requests[1].status, RequestStatus::Accepted);
    }

    #[test]
    fn test_schedule_feedback_dialog_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Char('f'));
        assert_eq!(app.mode, AppMode::Normal);

        press(&mut app, KeyCode::Char('c'));
        press(&mut app, KeyCode::Char('f'));
        assert_eq!(app.mode, AppMode::SessionFeedback);

        press(&mut app, KeyCode::Char('5'));
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        type_text(&mut app, "calm");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, AppMode::Normal);
        let record = app.feedback.last().unwrap();
        assert_eq!(record.patient_name, "Priya Sharma");
        assert_eq!(record.comfort_rating, 5);
        assert_eq!(record.notes, "calm");
    }

    #[test]
    fn test_csv_export_key_binding() {
        let mut app = app();
        InputHandler::handle_key_event(&mut app, KeyCode::Char('e'), KeyModifiers::CONTROL);

        assert_eq!(app.mode, AppMode::ExportCsv);
        assert_eq!(app.filename_input, "feedback.csv");

        type_text(&mut app, "x");
        assert_eq!(app.filename_input, "feedback.csvx");
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.filename_input, "feedback.csv");

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.filename_input.is_empty());
    }

    #[test]
    fn test_csv_export_writes_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        let mut app = app();
        InputHandler::handle_key_event(&mut app, KeyCode::Char('e'), KeyModifiers::CONTROL);
        app.filename_input = path.display().to_string();
        press(&mut app, KeyCode::Enter);

        assert!(path.exists());
        assert!(app.status_message.unwrap().starts_with("Exported 3 feedback records"));
    }

    #[test]
    fn test_help_toggle() {
        let mut app = app();
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.mode, AppMode::Help);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.help_scroll, 1);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn test_unavailable_date_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char('6'));
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.profile_tab, ProfileTab::Availability);

        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.mode, AppMode::AddUnavailableDate);
        press(&mut app, KeyCode::Home);
        for _ in 0..10 {
            press(&mut app, KeyCode::Delete);
        }
        type_text(&mut app, "2024-03-10");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.unavailable_dates.len(), 4);
        assert_eq!(app.selected_unavailable, 3);

        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.unavailable_dates.len(), 3);
    }

    #[test]
    fn test_date_prompt_escape_adds_nothing() {
        let mut app = app();
        press(&mut app, KeyCode::Char('6'));
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.profile_tab, ProfileTab::Availability);

        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.unavailable_dates.len(), 3);
    }

    #[test]
    fn test_profile_edit_key() {
        let mut app = app();
        press(&mut app, KeyCode::Char('6'));
        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.tab, Tab::Registration);
    }
}
