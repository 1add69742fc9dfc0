use std::collections::BTreeMap;

use jiff::civil::{DateTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::layout::TimeSpan;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppointmentKind {
    #[serde(rename = "checkup")]
    Checkup,
    #[serde(rename = "consultation")]
    Consultation,
    #[serde(rename = "follow-up")]
    FollowUp,
    #[serde(rename = "procedure")]
    Procedure,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    #[serde(rename = "doctorId")]
    pub doctor_id: String,
    #[serde(rename = "patientId")]
    pub patient_id: String,
    #[serde(rename = "startTime")]
    pub start_time: DateTime,
    #[serde(rename = "endTime")]
    pub end_time: DateTime,
    #[serde(rename = "type")]
    pub kind: AppointmentKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl TimeSpan for Appointment {
    fn span_start(&self) -> DateTime {
        self.start_time
    }

    fn span_end(&self) -> DateTime {
        self.end_time
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoursRange {
    pub start: String,
    pub end: String,
}

/// Weekly working hours keyed by lowercase weekday name ("monday"..),
/// matching the wire shape of the dataset. Days without an entry are
/// non-working days.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkingHours(pub BTreeMap<String, HoursRange>);

impl WorkingHours {
    pub fn on(&self, weekday: Weekday) -> Option<&HoursRange> {
        self.0.get(weekday_key(weekday))
    }
}

pub fn weekday_key(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Monday => "monday",
        Weekday::Tuesday => "tuesday",
        Weekday::Wednesday => "wednesday",
        Weekday::Thursday => "thursday",
        Weekday::Friday => "friday",
        Weekday::Saturday => "saturday",
        Weekday::Sunday => "sunday",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: String,
    pub name: String,
    pub specialty: String,
    #[serde(rename = "workingHours", default)]
    pub working_hours: WorkingHours,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PopulatedAppointment<'a> {
    #[serde(flatten)]
    pub appointment: &'a Appointment,
    pub patient: &'a Patient,
    pub doctor: &'a Doctor,
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    #[test]
    fn test_appointment_json_round_trip() {
        let json = r#"{
            "id": "a1",
            "doctorId": "d1",
            "patientId": "p1",
            "startTime": "2025-03-10T09:00:00",
            "endTime": "2025-03-10T09:30:00",
            "type": "checkup"
        }"#;
        let appt: Appointment = serde_json::from_str(json).unwrap();
        assert_eq!(appt.start_time, date(2025, 3, 10).at(9, 0, 0, 0));
        assert_eq!(appt.kind, AppointmentKind::Checkup);
        assert!(appt.notes.is_none());

        let out = serde_json::to_value(&appt).unwrap();
        assert_eq!(out["startTime"], "2025-03-10T09:00:00");
        assert_eq!(out["type"], "checkup");
    }

    #[test]
    fn test_appointment_bad_timestamp_is_rejected() {
        let json = r#"{
            "id": "a1",
            "doctorId": "d1",
            "patientId": "p1",
            "startTime": "not a datetime",
            "endTime": "2025-03-10T09:30:00",
            "type": "checkup"
        }"#;
        assert!(serde_json::from_str::<Appointment>(json).is_err());
    }

    #[test]
    fn test_working_hours_lookup() {
        let mut hours = WorkingHours::default();
        hours.0.insert(
            "monday".to_string(),
            HoursRange {
                start: "09:00".to_string(),
                end: "17:00".to_string(),
            },
        );
        assert_eq!(hours.on(Weekday::Monday).unwrap().start, "09:00");
        assert!(hours.on(Weekday::Sunday).is_none());
    }
}
