use crate::application::{
    App, AppMode, DialogField, FeedbackField, PatientTab, ProfileTab, RegistrationField,
    SettingsAction, Tab,
};
use crate::domain::{
    DATE_FORMAT, ExperienceBracket, Gender, Patient, RELIEF_SIGN_OPTIONS, SIDE_EFFECT_OPTIONS,
    SessionStatus, Therapy, TherapistProfile, WorkingDay, progress_percentage, status_counts,
    weekly_availability,
};
use chrono::Local;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs, Wrap},
    Frame,
};

pub const NOT_PROVIDED: &str = "Not provided";

pub fn render_ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);
    render_tabs(f, app, chunks[1]);
    match app.tab {
        Tab::Registration => render_registration(f, app, chunks[2]),
        Tab::Schedule => render_schedule(f, app, chunks[2]),
        Tab::Patients => render_patients(f, app, chunks[2]),
        Tab::Requests => render_requests(f, app, chunks[2]),
        Tab::Feedback => render_feedback(f, app, chunks[2]),
        Tab::Profile => render_profile(f, app, chunks[2]),
    }
    render_status_bar(f, app, chunks[3]);

    match app.mode {
        AppMode::Help => render_help_popup(f, app.help_scroll),
        AppMode::SessionFeedback => render_session_feedback_popup(f, app),
        _ => {}
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let therapist = app
        .profile
        .profile()
        .map(|p| p.full_name.as_str())
        .unwrap_or("not registered");
    let header = Paragraph::new(format!("AyurDesk - Therapist Dashboard | Therapist: {therapist}"))
        .style(Style::default().fg(Color::Cyan));
    f.render_widget(header, area);
}

fn render_tabs(f: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<String> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| format!("{} {}", i + 1, tab.title()))
        .collect();
    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL))
        .select(app.tab.index())
        .highlight_style(Style::default().fg(Color::Black).bg(Color::LightGreen));
    f.render_widget(tabs, area);
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().bg(Color::Blue).fg(Color::White)
    } else {
        Style::default()
    }
}

fn checkbox(checked: bool) -> &'static str {
    if checked { "[x]" } else { "[ ]" }
}

/// One span per option; the highlighted option is underlined.
fn option_spans<T: Copy + PartialEq>(
    all: &[T],
    label: impl Fn(&T) -> &'static str,
    is_checked: impl Fn(&T) -> bool,
    cursor: Option<usize>,
) -> Vec<Span<'static>> {
    all.iter()
        .enumerate()
        .map(|(i, value)| {
            let text = format!("{} {}  ", checkbox(is_checked(value)), label(value));
            let style = if cursor == Some(i) {
                Style::default().add_modifier(Modifier::UNDERLINED | Modifier::BOLD)
            } else {
                Style::default()
            };
            Span::styled(text, style)
        })
        .collect()
}

fn text_value(app: &App, focused: bool, value: &str) -> String {
    if focused && app.mode == AppMode::Editing {
        with_cursor(&app.input, app.cursor_position)
    } else {
        value.to_string()
    }
}

/// Draws the `_` marker where the next typed character will land.
pub fn with_cursor(input: &str, cursor: usize) -> String {
    let cursor = if input.is_char_boundary(cursor) { cursor } else { input.len() };
    let (before, after) = input.split_at(cursor);
    format!("{before}_{after}")
}

fn render_registration(f: &mut Frame, app: &App, area: Rect) {
    let draft = &app.registration;
    let mut lines = Vec::new();

    for field in RegistrationField::ALL {
        let focused = app.registration_field == field;
        let cursor = focused.then_some(app.option_cursor);
        let label = Span::styled(
            format!("{:<28}", field.label()),
            focus_style(focused).add_modifier(Modifier::BOLD),
        );

        let mut spans = vec![label];
        match field {
            RegistrationField::FullName => spans.push(Span::raw(text_value(app, focused, &draft.full_name))),
            RegistrationField::Mobile => spans.push(Span::raw(text_value(app, focused, &draft.mobile))),
            RegistrationField::Email => spans.push(Span::raw(text_value(app, focused, &draft.email))),
            RegistrationField::StartTime => spans.push(Span::raw(text_value(app, focused, &draft.start_time))),
            RegistrationField::EndTime => spans.push(Span::raw(text_value(app, focused, &draft.end_time))),
            RegistrationField::Location => spans.push(Span::raw(text_value(app, focused, &draft.location))),
            RegistrationField::Bio => spans.push(Span::raw(text_value(app, focused, &draft.bio))),
            RegistrationField::Gender => spans.extend(option_spans(
                &Gender::ALL,
                Gender::label,
                |g| draft.gender == Some(*g),
                None,
            )),
            RegistrationField::Experience => spans.extend(option_spans(
                &ExperienceBracket::ALL,
                ExperienceBracket::label,
                |e| draft.experience == Some(*e),
                None,
            )),
            RegistrationField::Specializations => spans.extend(option_spans(
                &Therapy::ALL,
                Therapy::label,
                |t| draft.specializations.contains(t),
                cursor,
            )),
            RegistrationField::WorkingDays => spans.extend(option_spans(
                &WorkingDay::ALL,
                WorkingDay::label,
                |d| draft.working_days.contains(d),
                cursor,
            )),
            RegistrationField::Submit => {
                spans.clear();
                let action = if app.profile.is_registered() {
                    "[ Update Profile ]"
                } else {
                    "[ Complete Registration ]"
                };
                spans.push(Span::styled(action, focus_style(focused).fg(Color::LightGreen)));
            }
        }
        lines.push(Line::from(spans));
    }

    let title = if app.profile.is_registered() {
        "Edit Therapist Profile"
    } else {
        "Therapist Registration"
    };
    let form = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false });
    f.render_widget(form, area);
}

fn status_color(status: SessionStatus) -> Color {
    match status {
        SessionStatus::Pending => Color::Yellow,
        SessionStatus::Ongoing => Color::LightBlue,
        SessionStatus::Completed => Color::Green,
    }
}

fn render_schedule(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(4)])
        .split(area);

    let counts: Vec<String> = status_counts(&app.sessions)
        .iter()
        .map(|(status, count)| format!("{}: {}", status.label(), count))
        .collect();
    let summary = Paragraph::new(format!(
        "{} | {}",
        Local::now().format("%A, %B %-d, %Y"),
        counts.join(" | ")
    ))
    .block(Block::default().borders(Borders::ALL).title("Today's Therapy Sessions"));
    f.render_widget(summary, chunks[0]);

    let header = Row::new(["Time", "Patient", "ID", "Therapy", "Room/Bed", "Status"])
        .style(Style::default().fg(Color::Yellow));
    let rows: Vec<Row> = app
        .sessions
        .iter()
        .enumerate()
        .map(|(i, session)| {
            Row::new(vec![
                Cell::from(session.time_slot.clone()),
                Cell::from(session.patient_name.clone()),
                Cell::from(session.patient_id.clone()),
                Cell::from(session.therapy.label()),
                Cell::from(session.room_bed.clone()),
                Cell::from(session.status.label()).style(Style::default().fg(status_color(session.status))),
            ])
            .style(focus_style(i == app.selected_session))
        })
        .collect();
    let widths = [
        Constraint::Length(20),
        Constraint::Length(16),
        Constraint::Length(6),
        Constraint::Length(16),
        Constraint::Length(14),
        Constraint::Length(10),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title("Sessions"))
        .column_spacing(1);
    f.render_widget(table, chunks[1]);

    let instructions = app
        .sessions
        .get(app.selected_session)
        .map(|s| s.pre_care_instructions.clone())
        .unwrap_or_default();
    let care = Paragraph::new(instructions)
        .block(Block::default().borders(Borders::ALL).title("Pre-Care Instructions"))
        .wrap(Wrap { trim: true });
    f.render_widget(care, chunks[2]);
}

fn render_patients(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(area);

    let lines: Vec<Line> = app
        .patients
        .iter()
        .enumerate()
        .map(|(i, patient)| {
            let therapy = &patient.current_therapy;
            Line::styled(
                format!(
                    "{} {} - {} {}%",
                    patient.id,
                    patient.name,
                    therapy.therapy.label(),
                    progress_percentage(therapy.completed_sessions, therapy.total_sessions)
                ),
                focus_style(i == app.selected_patient),
            )
        })
        .collect();
    let list = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Patients"));
    f.render_widget(list, chunks[0]);

    let detail = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(chunks[1]);

    let tabs = Tabs::new(PatientTab::ALL.iter().map(|t| t.title()).collect::<Vec<_>>())
        .block(Block::default().borders(Borders::ALL))
        .select(PatientTab::ALL.iter().position(|t| *t == app.patient_tab).unwrap_or(0))
        .highlight_style(Style::default().fg(Color::Black).bg(Color::LightGreen));
    f.render_widget(tabs, detail[0]);

    let lines = app
        .selected_patient()
        .map(|patient| patient_lines(patient, app.patient_tab))
        .unwrap_or_default();
    let body = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Patient Record"))
        .wrap(Wrap { trim: false });
    f.render_widget(body, detail[1]);
}

fn patient_lines(patient: &Patient, tab: PatientTab) -> Vec<Line<'static>> {
    let field = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("{label:<18}"), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(value),
        ])
    };

    match tab {
        PatientTab::Details => vec![
            field("Name", patient.name.clone()),
            field("Age / Gender", format!("{} / {}", patient.age, patient.gender)),
            field("Phone", patient.phone.clone()),
            field("Email", patient.email.clone()),
            field("Address", patient.address.clone()),
            field("Prakriti", patient.prakriti.clone()),
            field("Dosha Imbalance", patient.dosha_imbalance.clone()),
            field("Allergies", patient.allergies.join(", ")),
        ],
        PatientTab::Therapy => {
            let therapy = &patient.current_therapy;
            let percent = progress_percentage(therapy.completed_sessions, therapy.total_sessions);
            let filled = (percent / 5) as usize;
            vec![
                field("Current Therapy", therapy.therapy.label().to_string()),
                field("Started", therapy.start_date.format("%Y-%m-%d").to_string()),
                field(
                    "Sessions",
                    format!("{} of {}", therapy.completed_sessions, therapy.total_sessions),
                ),
                field(
                    "Progress",
                    format!("{}{} {percent}%", "#".repeat(filled), ".".repeat(20 - filled.min(20))),
                ),
            ]
        }
        PatientTab::History => patient
            .session_history
            .iter()
            .map(|entry| {
                Line::from(vec![
                    Span::raw(format!("{}  ", entry.date.format("%Y-%m-%d"))),
                    Span::raw(format!("{:<16}", entry.therapy.label())),
                    Span::styled(
                        format!("{:<10}", entry.status.label()),
                        Style::default().fg(status_color(entry.status)),
                    ),
                    Span::raw(entry.notes.clone()),
                ])
            })
            .collect(),
        PatientTab::Precautions => patient
            .precautions
            .iter()
            .map(|p| Line::raw(format!("• {p}")))
            .collect(),
    }
}

fn render_requests(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(5), Constraint::Length(7)])
        .split(area);

    let pending = app.pending_requests();
    let header = Row::new(["ID", "Patient", "Therapy", "Date", "Time", "Room/Bed", "Urgency"])
        .style(Style::default().fg(Color::Yellow));
    let rows: Vec<Row> = pending
        .iter()
        .enumerate()
        .map(|(i, request)| {
            Row::new(vec![
                Cell::from(request.id.clone()),
                Cell::from(request.patient_name.clone()),
                Cell::from(request.therapy.label()),
                Cell::from(request.requested_date.format("%Y-%m-%d").to_string()),
                Cell::from(request.requested_time.clone()),
                Cell::from(request.room_bed.clone()),
                Cell::from(request.urgency.label()),
            ])
            .style(focus_style(i == app.selected_request))
        })
        .collect();
    let widths = [
        Constraint::Length(7),
        Constraint::Length(16),
        Constraint::Length(16),
        Constraint::Length(11),
        Constraint::Length(9),
        Constraint::Length(14),
        Constraint::Length(8),
    ];
    let title = format!("Pending Requests ({})", pending.len());
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title))
        .column_spacing(1);
    f.render_widget(table, chunks[0]);

    let detail = match pending.get(app.selected_request) {
        Some(request) => format!(
            "{} ({}, {}) | Duration: {} | Referred by: {}\n{}",
            request.patient_name,
            request.patient_age,
            request.patient_gender,
            request.duration,
            request.referred_by,
            request.notes
        ),
        None => "No pending requests".to_string(),
    };
    let detail = Paragraph::new(detail)
        .block(Block::default().borders(Borders::ALL).title("Request Details"))
        .wrap(Wrap { trim: true });
    f.render_widget(detail, chunks[1]);

    let recent: Vec<Line> = app
        .processed_requests()
        .iter()
        .map(|request| {
            Line::from(format!(
                "{} {} - {} ({})",
                request.id,
                request.patient_name,
                request.therapy.label(),
                request.status.label()
            ))
        })
        .collect();
    let recent = Paragraph::new(recent).block(Block::default().borders(Borders::ALL).title("Recent Actions"));
    f.render_widget(recent, chunks[2]);
}

fn render_feedback(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let draft = &app.feedback_draft;
    let lines: Vec<Line> = FeedbackField::ALL
        .iter()
        .map(|field| {
            let focused = app.feedback_field == *field;
            let value = match field {
                FeedbackField::PatientId => text_value(app, focused, &draft.patient_id),
                FeedbackField::Therapy => draft.therapy.map(|t| t.label()).unwrap_or("-").to_string(),
                FeedbackField::Rating => format!(
                    "{}{}",
                    "*".repeat(draft.comfort_rating as usize),
                    ".".repeat(5 - draft.comfort_rating.min(5) as usize)
                ),
                FeedbackField::SideEffects => text_value(app, focused, &draft.side_effects),
                FeedbackField::ReliefSigns => text_value(app, focused, &draft.relief_signs),
                FeedbackField::Notes => text_value(app, focused, &draft.notes),
                FeedbackField::Submit => {
                    return Line::styled("[ Submit Feedback ]", focus_style(focused).fg(Color::LightGreen));
                }
            };
            Line::from(vec![
                Span::styled(format!("{:<32}", field.label()), focus_style(focused)),
                Span::raw(value),
            ])
        })
        .collect();
    let form = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Add New Feedback"))
        .wrap(Wrap { trim: false });
    f.render_widget(form, chunks[0]);

    let mut cards = Vec::new();
    for (i, record) in app.feedback.iter().enumerate() {
        let style = focus_style(i == app.selected_feedback);
        cards.push(Line::styled(
            format!(
                "#{} {} ({}) - {} - {} - {}/5 - {}",
                record.id,
                record.patient_name,
                record.patient_id,
                record.therapy.label(),
                record.date.format("%Y-%m-%d"),
                record.comfort_rating,
                record.status.label()
            ),
            style.add_modifier(Modifier::BOLD),
        ));
        cards.push(Line::raw(format!("   Side effects: {}", record.side_effects.join(", "))));
        cards.push(Line::raw(format!("   Relief signs: {}", record.relief_signs.join(", "))));
        if !record.notes.is_empty() {
            cards.push(Line::raw(format!("   Notes: {}", record.notes)));
        }
        cards.push(Line::raw(""));
    }
    let cards = Paragraph::new(cards)
        .block(Block::default().borders(Borders::ALL).title("Patient Feedback"))
        .wrap(Wrap { trim: false })
        .scroll((feedback_scroll(app), 0));
    f.render_widget(cards, chunks[1]);
}

/// Keeps the selected card near the top of the feedback list.
fn feedback_scroll(app: &App) -> u16 {
    app.feedback
        .iter()
        .take(app.selected_feedback)
        .map(|r| if r.notes.is_empty() { 4 } else { 5 })
        .sum::<u16>()
}

/// Label/value pairs for the profile tab; every value falls back to
/// [`NOT_PROVIDED`] when nobody is registered.
pub fn profile_summary(profile: Option<&TherapistProfile>) -> Vec<(&'static str, String)> {
    let value = |f: &dyn Fn(&TherapistProfile) -> String| match profile {
        Some(p) => {
            let v = f(p);
            if v.trim().is_empty() { NOT_PROVIDED.to_string() } else { v }
        }
        None => NOT_PROVIDED.to_string(),
    };
    let list = |items: Vec<&'static str>| items.join(", ");

    vec![
        ("Full Name", value(&|p| p.full_name.clone())),
        ("Mobile", value(&|p| p.mobile.clone())),
        ("Email", value(&|p| p.email.clone())),
        ("Gender", value(&|p| p.gender.label().to_string())),
        (
            "Specializations",
            value(&|p| list(p.specializations.iter().map(Therapy::label).collect())),
        ),
        ("Experience", value(&|p| p.experience.label().to_string())),
        (
            "Working Days",
            value(&|p| list(p.working_days.iter().map(WorkingDay::label).collect())),
        ),
        ("Working Hours", value(&|p| p.working_hours())),
        ("Location", value(&|p| p.location.clone())),
        ("Bio", value(&|p| p.bio.clone())),
        (
            "Registered",
            value(&|p| p.registration_date.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()),
        ),
    ]
}

fn render_profile(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(11), Constraint::Length(3), Constraint::Min(0)])
        .split(area);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(chunks[0]);

    let profile = app.profile.profile();
    // Bio and the registration stamp live on the overview section.
    let lines: Vec<Line> = profile_summary(profile)
        .into_iter()
        .filter(|(label, _)| !matches!(*label, "Bio" | "Registered"))
        .map(|(label, value)| labelled(label, value))
        .collect();
    let details = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Therapist Profile"))
        .wrap(Wrap { trim: false });
    f.render_widget(details, top[0]);

    let stats = profile.map(|p| p.stats.clone()).unwrap_or_default();
    let stats = Paragraph::new(vec![
        Line::raw(format!("Total Patients:     {}", stats.total_patients)),
        Line::raw(format!("Completed Sessions: {}", stats.completed_sessions)),
        Line::raw(format!("Average Rating:     {:.1}", stats.avg_rating)),
        Line::raw(format!("Upcoming Sessions:  {}", stats.upcoming_sessions)),
    ])
    .block(Block::default().borders(Borders::ALL).title("Statistics"));
    f.render_widget(stats, top[1]);

    let tabs = Tabs::new(ProfileTab::ALL.iter().map(|t| t.title()).collect::<Vec<_>>())
        .block(Block::default().borders(Borders::ALL))
        .select(ProfileTab::ALL.iter().position(|t| *t == app.profile_tab).unwrap_or(0))
        .highlight_style(Style::default().fg(Color::Black).bg(Color::LightGreen));
    f.render_widget(tabs, chunks[1]);

    let (title, lines) = match app.profile_tab {
        ProfileTab::Overview => ("About Me", profile_overview_lines(profile)),
        ProfileTab::Schedule => ("Weekly Schedule", weekly_schedule_lines(profile)),
        ProfileTab::Availability => ("Upcoming Unavailable Dates", availability_lines(app)),
        ProfileTab::Settings => ("Account Settings", settings_lines(app)),
    };
    let body = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false });
    f.render_widget(body, chunks[2]);
}

fn labelled(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:<18}"), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(value),
    ])
}

fn profile_overview_lines(profile: Option<&TherapistProfile>) -> Vec<Line<'static>> {
    let summary = profile_summary(profile);
    let get = |label: &str| {
        summary
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, v)| v.clone())
            .unwrap_or_else(|| NOT_PROVIDED.to_string())
    };
    let days = profile
        .map(|p| {
            p.working_days
                .iter()
                .map(|d| &d.label()[..3])
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| NOT_PROVIDED.to_string());
    let stats = profile.map(|p| p.stats.clone()).unwrap_or_default();

    vec![
        Line::raw(get("Bio")),
        Line::raw(""),
        labelled("Joined", get("Registered")),
        labelled("Working Days", days),
        Line::raw(""),
        Line::styled("Performance Metrics", Style::default().add_modifier(Modifier::BOLD)),
        labelled("Satisfaction", format!("{:.1} / 5.0", stats.avg_rating)),
        labelled("Completed", stats.completed_sessions.to_string()),
        labelled("Upcoming", stats.upcoming_sessions.to_string()),
    ]
}

/// Available/Off per weekday, then the daily hours.
fn weekly_schedule_lines(profile: Option<&TherapistProfile>) -> Vec<Line<'static>> {
    let working_days = profile.map(|p| p.working_days.as_slice()).unwrap_or_default();
    let mut lines: Vec<Line> = weekly_availability(working_days)
        .iter()
        .map(|(day, available)| {
            let (text, color) = if *available {
                ("Available", Color::Green)
            } else {
                ("Off", Color::DarkGray)
            };
            Line::from(vec![
                Span::raw(format!("{:<12}", day.label())),
                Span::styled(text, Style::default().fg(color)),
            ])
        })
        .collect();

    let time = |t: Option<String>| t.unwrap_or_else(|| NOT_PROVIDED.to_string());
    lines.push(Line::raw(""));
    lines.push(labelled(
        "Start Time",
        time(profile.map(|p| p.start_time.format("%H:%M").to_string())),
    ));
    lines.push(labelled(
        "End Time",
        time(profile.map(|p| p.end_time.format("%H:%M").to_string())),
    ));
    lines
}

fn availability_lines(app: &App) -> Vec<Line<'static>> {
    if app.unavailable_dates.is_empty() {
        return vec![Line::raw("No unavailable dates. Press a to add one.")];
    }
    app.unavailable_dates
        .iter()
        .enumerate()
        .map(|(i, date)| {
            Line::styled(
                format!("{}  Personal Leave", date.format(DATE_FORMAT)),
                focus_style(i == app.selected_unavailable),
            )
        })
        .collect()
}

fn settings_lines(app: &App) -> Vec<Line<'static>> {
    SettingsAction::ALL
        .iter()
        .enumerate()
        .map(|(i, action)| Line::styled(action.label(), focus_style(i == app.selected_setting)))
        .collect()
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let input_text = match app.mode {
        AppMode::Normal => {
            if let Some(ref status) = app.status_message {
                status.clone()
            } else {
                format!("{} | Tab/1-6: switch tab | F1/?: help | q: quit", tab_hint(app.tab))
            }
        }
        AppMode::Editing => format!(
            "Editing: {} (Enter to save, Esc to cancel)",
            with_cursor(&app.input, app.cursor_position)
        ),
        AppMode::Help => "↑↓/jk: scroll | PgUp/PgDn: fast scroll | Home: top | Esc/q: close help".to_string(),
        AppMode::SessionFeedback => {
            "↑↓: field | ←→: choose | 1-5: rating | Enter: submit | Esc: cancel".to_string()
        }
        AppMode::ExportCsv => format!("Export CSV as: {} (Enter to export, Esc to cancel)", app.filename_input),
        AppMode::AddUnavailableDate => format!(
            "Unavailable date (YYYY-MM-DD): {} (Enter to add, Esc to cancel)",
            with_cursor(&app.input, app.cursor_position)
        ),
    };

    let input = Paragraph::new(input_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(match app.mode {
            AppMode::Normal => Style::default(),
            AppMode::Editing => Style::default().fg(Color::Green),
            AppMode::Help => Style::default().fg(Color::Cyan),
            AppMode::SessionFeedback => Style::default().fg(Color::Yellow),
            AppMode::ExportCsv => Style::default().fg(Color::Magenta),
            AppMode::AddUnavailableDate => Style::default().fg(Color::Yellow),
        });
    f.render_widget(input, area);
}

fn tab_hint(tab: Tab) -> &'static str {
    match tab {
        Tab::Registration => "↑↓: field | Enter: edit/submit | ←→ Space: choose",
        Tab::Schedule => "↑↓: session | p/o/c: set status | f: add feedback",
        Tab::Patients => "↑↓: patient | ←→: section | s: send to log",
        Tab::Requests => "↑↓: request | a: accept | r: reject",
        Tab::Feedback => "↑↓: field | [/]: select card | s: send to log | Ctrl+E: export CSV",
        Tab::Profile => "←→: section | ↑↓: select | a/x: add/remove date | Enter: run setting | e: edit",
    }
}

fn popup_area(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let scale = |len: u16, percent: u16| (u32::from(len) * u32::from(percent.min(100)) / 100) as u16;
    let width = scale(area.width, width_percent);
    let height = scale(area.height, height_percent);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_session_feedback_popup(f: &mut Frame, app: &App) {
    let Some(dialog) = app.session_feedback.as_ref() else {
        return;
    };
    let popup_area = popup_area(f.area(), 60, 50);
    f.render_widget(Clear, popup_area);

    let session = app.sessions.get(dialog.session_index);
    let draft = &dialog.draft;
    let row = |field: DialogField, label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("{label:<16}"), focus_style(dialog.field == field)),
            Span::raw(value),
        ])
    };

    let mut lines = vec![
        Line::raw(match session {
            Some(s) => format!("{} - {} ({})", s.patient_name, s.therapy.label(), s.time_slot),
            None => String::new(),
        }),
        Line::raw(""),
        row(
            DialogField::Rating,
            "Comfort (1-5)",
            format!(
                "{}{}",
                "*".repeat(draft.comfort_rating as usize),
                ".".repeat(5 - draft.comfort_rating.min(5) as usize)
            ),
        ),
        row(
            DialogField::SideEffect,
            "Side Effects",
            format!("< {} >  ({} options)", draft.side_effect.unwrap_or("-"), SIDE_EFFECT_OPTIONS.len()),
        ),
        row(
            DialogField::ReliefSign,
            "Relief Signs",
            format!("< {} >  ({} options)", draft.relief_sign.unwrap_or("-"), RELIEF_SIGN_OPTIONS.len()),
        ),
        row(DialogField::Notes, "Notes", draft.notes.clone()),
        Line::raw(""),
    ];
    lines.push(Line::styled(
        "[ Submit Feedback ]",
        focus_style(dialog.field == DialogField::Submit).fg(Color::LightGreen),
    ));

    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Session Feedback")
                .style(Style::default().fg(Color::Yellow)),
        )
        .style(Style::default().fg(Color::White))
        .wrap(Wrap { trim: false });
    f.render_widget(widget, popup_area);
}

fn render_help_popup(f: &mut Frame, scroll: usize) {
    let area = f.area();
    let popup_area = Rect {
        x: area.width / 10,
        y: area.height / 10,
        width: area.width * 4 / 5,
        height: area.height * 4 / 5,
    };

    f.render_widget(Clear, popup_area);

    let help_text = get_help_text();
    let help_lines: Vec<&str> = help_text.lines().collect();
    let visible_height = popup_area.height.saturating_sub(2) as usize;

    let start_line = scroll.min(help_lines.len().saturating_sub(visible_height));
    let end_line = (start_line + visible_height).min(help_lines.len());

    let visible_text = help_lines[start_line..end_line].join("\n");

    let help_widget = Paragraph::new(visible_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("AyurDesk Help (Line {}/{})", start_line + 1, help_lines.len()))
                .style(Style::default().fg(Color::Cyan)),
        )
        .style(Style::default().fg(Color::White));

    f.render_widget(help_widget, popup_area);
}

fn get_help_text() -> String {
    r#"AYURDESK KEY BINDINGS

=== EVERYWHERE ===
Tab / Shift+Tab     Next / previous tab
1-6                 Jump to tab
↑↓ / jk             Move between rows or form fields
←→ / hl             Change the focused choice
F1 / ?              Toggle this help
Esc                 Clear the status message
q                   Quit

=== REGISTRATION ===
Enter               Edit the focused text field, or submit
Space               Toggle the highlighted checkbox
←→                  Move between checkboxes, cycle gender and experience
                    Submitting with a profile already registered saves
                    only the fields you changed.

=== TODAY'S SCHEDULE ===
p / o / c           Mark session Pending / Ongoing / Completed
f                   Add feedback (completed sessions only)

=== SESSION FEEDBACK DIALOG ===
1-5                 Comfort rating
↑↓ / Tab            Move between fields
←→                  Choose side effect or relief sign
Enter               Submit
Esc                 Cancel

=== PATIENTS ===
←→                  Details / Therapy / History / Precautions
s                   Send the patient record to the log

=== REQUESTS ===
a                   Accept the selected request
r                   Reject the selected request

=== FEEDBACK ===
Enter               Edit the focused field, or submit
←→                  Choose therapy or comfort rating
[ / ]               Select previous / next feedback card
s                   Send the selected feedback to the log
Ctrl+E              Export all feedback to CSV

=== PROFILE ===
←→                  Overview / Schedule / Availability / Settings
↑↓                  Select a date or a setting
a                   Add an unavailable date (Availability)
x / Delete          Remove the selected date (Availability)
Enter               Run the selected setting (Settings)
e                   Edit your profile

=== EDITING ===
Enter               Save the field
Esc                 Discard changes
←→ Home End         Move the cursor
Backspace / Delete  Remove characters"#
        .to_string()
}
