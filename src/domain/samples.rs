//! Built-in clinic data the dashboard starts with.

use crate::domain::{
    CurrentTherapy, FeedbackRecord, FeedbackStatus, Patient, RequestStatus, SessionHistoryEntry,
    SessionStatus, Therapy, TherapyRequest, TherapySession, Urgency,
};
use chrono::NaiveDate;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[allow(clippy::too_many_arguments)]
fn session(
    id: u32,
    time_slot: &str,
    patient_name: &str,
    patient_id: &str,
    therapy: Therapy,
    room_bed: &str,
    pre_care_instructions: &str,
    status: SessionStatus,
) -> TherapySession {
    TherapySession {
        id,
        time_slot: time_slot.to_string(),
        patient_name: patient_name.to_string(),
        patient_id: patient_id.to_string(),
        therapy,
        room_bed: room_bed.to_string(),
        pre_care_instructions: pre_care_instructions.to_string(),
        status,
    }
}

pub fn todays_sessions() -> Vec<TherapySession> {
    vec![
        session(
            1,
            "09:00 AM - 10:00 AM",
            "Priya Sharma",
            "P001",
            Therapy::Virechana,
            "Room 101 - Bed A",
            "Fasting required, no water 2 hours before",
            SessionStatus::Pending,
        ),
        session(
            2,
            "10:30 AM - 11:30 AM",
            "Raj Kumar",
            "P002",
            Therapy::Nasya,
            "Room 102 - Bed B",
            "Light breakfast, oil preparation needed",
            SessionStatus::Ongoing,
        ),
        session(
            3,
            "12:00 PM - 01:00 PM",
            "Meera Patel",
            "P003",
            Therapy::Basti,
            "Room 103 - Bed C",
            "Empty stomach, warm oil massage prep",
            SessionStatus::Completed,
        ),
        session(
            4,
            "02:30 PM - 03:30 PM",
            "Arjun Singh",
            "P004",
            Therapy::Vamana,
            "Room 101 - Bed A",
            "Strict fasting, emotional preparation",
            SessionStatus::Pending,
        ),
        session(
            5,
            "04:00 PM - 05:00 PM",
            "Kavita Joshi",
            "P005",
            Therapy::Raktamokshana,
            "Room 104 - Bed D",
            "Blood parameters checked, sterile setup",
            SessionStatus::Pending,
        ),
    ]
}

pub fn therapy_requests() -> Vec<TherapyRequest> {
    let request = |id: &str,
                   patient_name: &str,
                   patient_id: &str,
                   therapy: Therapy,
                   requested_date: NaiveDate,
                   requested_time: &str,
                   room_bed: &str,
                   urgency: Urgency,
                   patient_age: u8,
                   patient_gender: &str,
                   referred_by: &str,
                   notes: &str| TherapyRequest {
        id: id.to_string(),
        patient_name: patient_name.to_string(),
        patient_id: patient_id.to_string(),
        therapy,
        requested_date,
        requested_time: requested_time.to_string(),
        room_bed: room_bed.to_string(),
        duration: "60 minutes".to_string(),
        urgency,
        patient_age,
        patient_gender: patient_gender.to_string(),
        referred_by: referred_by.to_string(),
        notes: notes.to_string(),
        status: RequestStatus::Pending,
    };

    vec![
        request(
            "REQ001",
            "Anjali Verma",
            "P006",
            Therapy::Virechana,
            date(2024, 1, 25),
            "10:00 AM - 11:00 AM",
            "Room 102 - Bed A",
            Urgency::Normal,
            28,
            "Female",
            "Dr. Sharma",
            "First time virechana treatment. Patient has mild pitta imbalance.",
        ),
        request(
            "REQ002",
            "Vikram Singh",
            "P007",
            Therapy::Nasya,
            date(2024, 1, 25),
            "02:30 PM - 03:30 PM",
            "Room 101 - Bed B",
            Urgency::High,
            42,
            "Male",
            "Dr. Patel",
            "Follow-up nasya treatment. Patient shows good response to previous sessions.",
        ),
        request(
            "REQ003",
            "Lakshmi Nair",
            "P008",
            Therapy::Basti,
            date(2024, 1, 26),
            "09:30 AM - 10:30 AM",
            "Room 103 - Bed C",
            Urgency::Normal,
            35,
            "Female",
            "Dr. Kumar",
            "Second basti session. Monitor for any digestive discomfort.",
        ),
        request(
            "REQ004",
            "Rohit Agarwal",
            "P009",
            Therapy::Raktamokshana,
            date(2024, 1, 26),
            "11:00 AM - 12:00 PM",
            "Room 104 - Bed D",
            Urgency::High,
            38,
            "Male",
            "Dr. Iyer",
            "Blood purification therapy. Ensure sterile conditions and pre-treatment blood work.",
        ),
    ]
}

pub fn patients() -> Vec<Patient> {
    let completed = |date: NaiveDate, therapy: Therapy, notes: &str| SessionHistoryEntry {
        date,
        therapy,
        status: SessionStatus::Completed,
        notes: notes.to_string(),
    };

    vec![
        Patient {
            id: "P001".to_string(),
            name: "Priya Sharma".to_string(),
            age: 34,
            gender: "Female".to_string(),
            phone: "+91 9876543210".to_string(),
            email: "priya.sharma@email.com".to_string(),
            address: "Mumbai, Maharashtra".to_string(),
            prakriti: "Vata-Pitta".to_string(),
            dosha_imbalance: "Excess Vata".to_string(),
            allergies: strings(&["Sesame Oil", "Dairy Products"]),
            current_therapy: CurrentTherapy {
                therapy: Therapy::Virechana,
                total_sessions: 7,
                completed_sessions: 3,
                start_date: date(2024, 1, 15),
            },
            session_history: vec![
                completed(date(2024, 1, 15), Therapy::Virechana, "Good response, mild nausea"),
                completed(date(2024, 1, 17), Therapy::Virechana, "Excellent tolerance"),
                completed(date(2024, 1, 19), Therapy::Virechana, "Some fatigue reported"),
            ],
            precautions: strings(&[
                "Avoid oil massage - allergic to sesame oil",
                "Monitor blood pressure during treatment",
                "Ensure adequate hydration",
            ]),
        },
        Patient {
            id: "P002".to_string(),
            name: "Raj Kumar".to_string(),
            age: 45,
            gender: "Male".to_string(),
            phone: "+91 9876543211".to_string(),
            email: "raj.kumar@email.com".to_string(),
            address: "Delhi, India".to_string(),
            prakriti: "Kapha-Vata".to_string(),
            dosha_imbalance: "Kapha excess".to_string(),
            allergies: strings(&["Nuts", "Shellfish"]),
            current_therapy: CurrentTherapy {
                therapy: Therapy::Nasya,
                total_sessions: 5,
                completed_sessions: 1,
                start_date: date(2024, 1, 20),
            },
            session_history: vec![completed(
                date(2024, 1, 20),
                Therapy::Nasya,
                "Good initial response",
            )],
            precautions: strings(&[
                "Breathing exercise before treatment",
                "Check for nasal congestion",
            ]),
        },
    ]
}

pub fn feedback_records() -> Vec<FeedbackRecord> {
    vec![
        FeedbackRecord {
            id: 1,
            patient_id: "P001".to_string(),
            patient_name: "Rajesh Kumar".to_string(),
            therapy: Therapy::Vamana,
            date: date(2024, 1, 15),
            comfort_rating: 4,
            side_effects: strings(&["Mild nausea"]),
            relief_signs: strings(&["Reduced congestion", "Better breathing"]),
            notes: "Patient responded well to treatment. Minimal discomfort observed.".to_string(),
            status: FeedbackStatus::Reviewed,
        },
        FeedbackRecord {
            id: 2,
            patient_id: "P002".to_string(),
            patient_name: "Priya Sharma".to_string(),
            therapy: Therapy::Virechana,
            date: date(2024, 1, 14),
            comfort_rating: 5,
            side_effects: strings(&["None"]),
            relief_signs: strings(&["Improved digestion", "Increased energy"]),
            notes: "Excellent response to treatment. Patient felt significant improvement."
                .to_string(),
            status: FeedbackStatus::PendingReview,
        },
        FeedbackRecord {
            id: 3,
            patient_id: "P003".to_string(),
            patient_name: "Mohammed Ali".to_string(),
            therapy: Therapy::Basti,
            date: date(2024, 1, 13),
            comfort_rating: 3,
            side_effects: strings(&["Mild cramping"]),
            relief_signs: strings(&["Joint pain relief"]),
            notes: "Some initial discomfort but good therapeutic response.".to_string(),
            status: FeedbackStatus::Reviewed,
        },
    ]
}

/// Days the therapist has already blocked out as personal leave.
pub fn unavailable_dates() -> Vec<NaiveDate> {
    vec![date(2024, 1, 28), date(2024, 1, 29), date(2024, 2, 5)]
}
