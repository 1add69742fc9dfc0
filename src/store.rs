use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use jiff::ToSpan;
use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{
    Appointment, AppointmentKind, Doctor, HoursRange, Patient, PopulatedAppointment, WorkingHours,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read dataset {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("malformed dataset {path}: {source}")]
    Malformed {
        path: String,
        source: serde_json::Error,
    },
}

/// In-memory dataset of doctors, patients and appointments. Built once at
/// startup and passed by reference to whatever assembles calendar views.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Store {
    doctors: Vec<Doctor>,
    patients: Vec<Patient>,
    appointments: Vec<Appointment>,
}

impl Store {
    pub fn from_file(path: &str) -> Result<Store, StoreError> {
        let raw = fs::read_to_string(Path::new(path)).map_err(|source| StoreError::Read {
            path: path.to_string(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| StoreError::Malformed {
            path: path.to_string(),
            source,
        })
    }

    pub fn doctors(&self) -> &[Doctor] {
        &self.doctors
    }

    pub fn doctor(&self, id: &str) -> Option<&Doctor> {
        self.doctors.iter().find(|d| d.id == id)
    }

    pub fn patient(&self, id: &str) -> Option<&Patient> {
        self.patients.iter().find(|p| p.id == id)
    }

    pub fn appointments_for_doctor(&self, doctor_id: &str) -> Vec<&Appointment> {
        self.appointments
            .iter()
            .filter(|a| a.doctor_id == doctor_id)
            .collect()
    }

    pub fn appointments_on(&self, doctor_id: &str, date: Date) -> Vec<&Appointment> {
        self.appointments
            .iter()
            .filter(|a| a.doctor_id == doctor_id && a.start_time.date() == date)
            .collect()
    }

    /// Appointments whose start date falls in `[from, to]`, both inclusive.
    pub fn appointments_between(&self, doctor_id: &str, from: Date, to: Date) -> Vec<&Appointment> {
        self.appointments
            .iter()
            .filter(|a| {
                a.doctor_id == doctor_id && a.start_time.date() >= from && a.start_time.date() <= to
            })
            .collect()
    }

    /// Joins an appointment with its patient and doctor records; None when
    /// either reference dangles.
    pub fn populate<'a>(&'a self, appointment: &'a Appointment) -> Option<PopulatedAppointment<'a>> {
        let patient = self.patient(&appointment.patient_id)?;
        let doctor = self.doctor(&appointment.doctor_id)?;
        Some(PopulatedAppointment {
            appointment,
            patient,
            doctor,
        })
    }
}

fn weekday_hours(days: &[&str], start: &str, end: &str) -> WorkingHours {
    let mut map = BTreeMap::new();
    for day in days {
        map.insert(
            day.to_string(),
            HoursRange {
                start: start.to_string(),
                end: end.to_string(),
            },
        );
    }
    WorkingHours(map)
}

impl Store {
    /// Demo dataset seeded relative to `week_anchor` (normally the Monday of
    /// the week being viewed), including the overlap clusters the layout
    /// engine exists for.
    pub fn demo(week_anchor: Date) -> Store {
        let day = |offset: i64| week_anchor.checked_add(offset.days()).unwrap();

        let doctors = vec![
            Doctor {
                id: "doc-1".to_string(),
                name: "Dr. Sarah Chen".to_string(),
                specialty: "General Practice".to_string(),
                working_hours: weekday_hours(
                    &["monday", "tuesday", "wednesday", "thursday", "friday"],
                    "08:00",
                    "17:00",
                ),
            },
            Doctor {
                id: "doc-2".to_string(),
                name: "Dr. Miguel Alvarez".to_string(),
                specialty: "Cardiology".to_string(),
                working_hours: weekday_hours(
                    &["monday", "wednesday", "friday"],
                    "09:00",
                    "18:00",
                ),
            },
        ];

        let patients = vec![
            Patient {
                id: "pat-1".to_string(),
                name: "James Holden".to_string(),
                phone: Some("555-0101".to_string()),
            },
            Patient {
                id: "pat-2".to_string(),
                name: "Naomi Nagata".to_string(),
                phone: Some("555-0102".to_string()),
            },
            Patient {
                id: "pat-3".to_string(),
                name: "Amos Burton".to_string(),
                phone: None,
            },
            Patient {
                id: "pat-4".to_string(),
                name: "Alex Kamal".to_string(),
                phone: Some("555-0104".to_string()),
            },
        ];

        let appt = |id: &str,
                    doctor: &str,
                    patient: &str,
                    date: Date,
                    start: (i8, i8),
                    end: (i8, i8),
                    kind: AppointmentKind| Appointment {
            id: id.to_string(),
            doctor_id: doctor.to_string(),
            patient_id: patient.to_string(),
            start_time: date.at(start.0, start.1, 0, 0),
            end_time: date.at(end.0, end.1, 0, 0),
            kind,
            notes: None,
        };

        let appointments = vec![
            // Monday: an overlapping cluster for doc-1.
            appt("apt-1", "doc-1", "pat-1", day(0), (9, 0), (10, 0), AppointmentKind::Checkup),
            appt("apt-2", "doc-1", "pat-2", day(0), (9, 30), (9, 45), AppointmentKind::FollowUp),
            appt("apt-3", "doc-1", "pat-3", day(0), (9, 45), (10, 30), AppointmentKind::Consultation),
            appt("apt-4", "doc-1", "pat-4", day(0), (11, 0), (11, 30), AppointmentKind::Checkup),
            // Tuesday: back-to-back, no overlap.
            appt("apt-5", "doc-1", "pat-2", day(1), (8, 30), (9, 0), AppointmentKind::Checkup),
            appt("apt-6", "doc-1", "pat-4", day(1), (9, 0), (9, 30), AppointmentKind::FollowUp),
            // Wednesday belongs to doc-2.
            appt("apt-7", "doc-2", "pat-1", day(2), (10, 0), (11, 0), AppointmentKind::Procedure),
            appt("apt-8", "doc-2", "pat-3", day(2), (10, 30), (11, 30), AppointmentKind::Consultation),
            // Friday afternoon.
            appt("apt-9", "doc-1", "pat-1", day(4), (14, 0), (15, 0), AppointmentKind::Consultation),
            appt("apt-10", "doc-2", "pat-2", day(4), (16, 0), (16, 30), AppointmentKind::Checkup),
        ];

        Store {
            doctors,
            patients,
            appointments,
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    fn monday() -> Date {
        date(2025, 3, 10)
    }

    #[test]
    fn test_demo_lookups() {
        let store = Store::demo(monday());
        assert_eq!(store.doctors().len(), 2);
        assert_eq!(store.doctor("doc-2").unwrap().specialty, "Cardiology");
        assert!(store.doctor("doc-99").is_none());
        assert_eq!(store.patient("pat-3").unwrap().name, "Amos Burton");
    }

    #[test]
    fn test_appointments_on_filters_by_doctor_and_date() {
        let store = Store::demo(monday());
        let on_monday = store.appointments_on("doc-1", monday());
        assert_eq!(on_monday.len(), 4);
        assert!(on_monday.iter().all(|a| a.doctor_id == "doc-1"));
        assert!(store.appointments_on("doc-2", monday()).is_empty());
    }

    #[test]
    fn test_appointments_between_is_inclusive() {
        let store = Store::demo(monday());
        let week = store.appointments_between("doc-1", monday(), date(2025, 3, 16));
        assert_eq!(week.len(), 7);
        // Friday is the last day with a doc-1 appointment.
        let until_thursday = store.appointments_between("doc-1", monday(), date(2025, 3, 13));
        assert_eq!(until_thursday.len(), 6);
    }

    #[test]
    fn test_populate_joins_patient_and_doctor() {
        let store = Store::demo(monday());
        let appointment = store.appointments_on("doc-1", monday())[0];
        let populated = store.populate(appointment).unwrap();
        assert_eq!(populated.patient.name, "James Holden");
        assert_eq!(populated.doctor.name, "Dr. Sarah Chen");
    }

    #[test]
    fn test_populate_returns_none_for_dangling_reference() {
        let mut store = Store::demo(monday());
        store.patients.clear();
        let appointment = store.appointments[0].clone();
        assert!(store.populate(&appointment).is_none());
    }

    #[test]
    fn test_from_file_rejects_malformed_json() {
        let dir = std::env::temp_dir().join("rotaserve-store-test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        let err = Store::from_file(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, StoreError::Malformed { .. }));
    }

    #[test]
    fn test_from_file_round_trips_demo_dataset() {
        let store = Store::demo(monday());
        let dir = std::env::temp_dir().join("rotaserve-store-test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("demo.json");
        fs::write(&path, serde_json::to_string_pretty(&store).unwrap()).unwrap();

        let loaded = Store::from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(loaded.doctors.len(), store.doctors.len());
        assert_eq!(loaded.appointments.len(), store.appointments.len());
        assert_eq!(loaded.appointments[0].start_time, store.appointments[0].start_time);
    }
}
