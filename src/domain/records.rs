//! Clinic records shown by the dashboard views.
//!
//! None of these are persisted; they live in view state for the
//! duration of a run.

use crate::domain::Therapy;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Pending,
    Ongoing,
    Completed,
}

impl SessionStatus {
    pub const ALL: [SessionStatus; 3] = [
        SessionStatus::Pending,
        SessionStatus::Ongoing,
        SessionStatus::Completed,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SessionStatus::Pending => "Pending",
            SessionStatus::Ongoing => "Ongoing",
            SessionStatus::Completed => "Completed",
        }
    }
}

/// One slot on today's schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct TherapySession {
    pub id: u32,
    pub time_slot: String,
    pub patient_name: String,
    pub patient_id: String,
    pub therapy: Therapy,
    pub room_bed: String,
    pub pre_care_instructions: String,
    pub status: SessionStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
}

impl RequestStatus {
    pub fn label(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Accepted => "accepted",
            RequestStatus::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    Low,
    Normal,
    High,
}

impl Urgency {
    pub fn label(&self) -> &'static str {
        match self {
            Urgency::Low => "low",
            Urgency::Normal => "normal",
            Urgency::High => "high",
        }
    }
}

/// Incoming request to book a therapy session with this practitioner.
#[derive(Debug, Clone, PartialEq)]
pub struct TherapyRequest {
    pub id: String,
    pub patient_name: String,
    pub patient_id: String,
    pub therapy: Therapy,
    pub requested_date: NaiveDate,
    pub requested_time: String,
    pub room_bed: String,
    pub duration: String,
    pub urgency: Urgency,
    pub patient_age: u8,
    pub patient_gender: String,
    pub referred_by: String,
    pub notes: String,
    pub status: RequestStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentTherapy {
    pub therapy: Therapy,
    pub total_sessions: u32,
    pub completed_sessions: u32,
    pub start_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionHistoryEntry {
    pub date: NaiveDate,
    pub therapy: Therapy,
    pub status: SessionStatus,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Patient {
    pub id: String,
    pub name: String,
    pub age: u8,
    pub gender: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub prakriti: String,
    pub dosha_imbalance: String,
    pub allergies: Vec<String>,
    pub current_therapy: CurrentTherapy,
    pub session_history: Vec<SessionHistoryEntry>,
    pub precautions: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedbackStatus {
    #[serde(rename = "Reviewed")]
    Reviewed,
    #[serde(rename = "Pending Review")]
    PendingReview,
}

impl FeedbackStatus {
    pub fn label(&self) -> &'static str {
        match self {
            FeedbackStatus::Reviewed => "Reviewed",
            FeedbackStatus::PendingReview => "Pending Review",
        }
    }
}

/// Post-session feedback as shown on the feedback board and exported to CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRecord {
    pub id: u32,
    pub patient_id: String,
    pub patient_name: String,
    pub therapy: Therapy,
    pub date: NaiveDate,
    pub comfort_rating: u8,
    pub side_effects: Vec<String>,
    pub relief_signs: Vec<String>,
    pub notes: String,
    pub status: FeedbackStatus,
}

/// Side effects offered by the post-session feedback dialog.
pub const SIDE_EFFECT_OPTIONS: [&str; 8] = [
    "None",
    "Nausea",
    "Dizziness",
    "Fatigue",
    "Mild Discomfort",
    "Excessive Sweating",
    "Headache",
    "Other (specify in notes)",
];

/// Relief signs offered by the post-session feedback dialog.
pub const RELIEF_SIGN_OPTIONS: [&str; 9] = [
    "No immediate relief",
    "Pain Reduced",
    "Breathing Improved",
    "Muscle Tension Released",
    "Energy Level Increased",
    "Mood Improved",
    "Better Sleep Quality",
    "Digestion Improved",
    "Better Circulation",
];
