use jiff::civil::{Date, DateTime};
use serde::Serialize;
use thiserror::Error;

use crate::config::Calendar;
use crate::layout::{self, LayoutError};
use crate::model::{Appointment, AppointmentKind, Doctor, HoursRange};
use crate::slot::{self, TimeSlot};
use crate::store::Store;

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("unknown doctor {0}")]
    UnknownDoctor(String),
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// One appointment card, already positioned on the grid and joined with the
/// names the renderer shows.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedCard {
    pub appointment_id: String,
    pub patient_name: String,
    pub doctor_name: String,
    #[serde(rename = "type")]
    pub kind: AppointmentKind,
    pub start_time: DateTime,
    pub end_time: DateTime,
    pub width: f64,
    pub left: f64,
    pub top: i32,
    pub height: i32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySchedule {
    pub doctor: Doctor,
    pub date: Date,
    /// The doctor's hours for this weekday; None on a non-working day.
    pub working_hours: Option<HoursRange>,
    pub slots: Vec<TimeSlot>,
    pub container_height: i32,
    /// Pixel offset of the current-time line, present only when `date` is
    /// today and the line falls inside the container.
    pub now_marker: Option<i32>,
    pub cards: Vec<PlacedCard>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekDay {
    pub date: Date,
    pub now_marker: Option<i32>,
    pub cards: Vec<PlacedCard>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekSchedule {
    pub doctor: Doctor,
    pub week_start: Date,
    pub slots: Vec<TimeSlot>,
    pub container_height: i32,
    pub days: Vec<WeekDay>,
}

// One extra padding row below the last slot.
const SLOT_PADDING_BOTTOM: i32 = 1;

fn container_height(slot_count: usize, cal: &Calendar) -> i32 {
    ((slot_count as i32 + SLOT_PADDING_BOTTOM) as f64 * cal.slot_height).round() as i32
}

fn minutes_from_start(cal: &Calendar) -> impl Fn(DateTime) -> f64 {
    let origin = cal.start_hour as f64;
    move |dt: DateTime| (dt.hour() as f64 - origin) * 60.0 + dt.minute() as f64
}

fn now_marker(date: Date, now: DateTime, height: i32, cal: &Calendar) -> Option<i32> {
    if now.date() != date {
        return None;
    }
    let minutes = minutes_from_start(cal)(now);
    let top = (minutes / cal.slot_minutes as f64 * cal.slot_height).round() as i32;
    (0..=height).contains(&top).then_some(top)
}

fn place_cards(
    store: &Store,
    appointments: &[&Appointment],
    cal: &Calendar,
) -> Result<Vec<PlacedCard>, LayoutError> {
    let arranged = layout::arrange_with(
        appointments,
        minutes_from_start(cal),
        cal.slot_height,
        cal.slot_minutes as f64,
        layout::ArrangeOptions {
            min_height: cal.min_card_height,
            ..layout::ArrangeOptions::default()
        },
    )?;

    let cards = arranged
        .into_iter()
        .map(|placed| {
            let appointment: &Appointment = *placed.item;
            let (patient_name, doctor_name) = match store.populate(appointment) {
                Some(populated) => (
                    populated.patient.name.clone(),
                    populated.doctor.name.clone(),
                ),
                None => ("Unknown".to_string(), "Unknown".to_string()),
            };
            PlacedCard {
                appointment_id: appointment.id.clone(),
                patient_name,
                doctor_name,
                kind: appointment.kind,
                start_time: appointment.start_time,
                end_time: appointment.end_time,
                width: placed.width,
                left: placed.left,
                top: placed.top,
                height: placed.height,
            }
        })
        .collect();
    Ok(cards)
}

pub fn day_schedule(
    store: &Store,
    doctor_id: &str,
    date: Date,
    now: DateTime,
    cal: &Calendar,
) -> Result<DaySchedule, ViewError> {
    let doctor = store
        .doctor(doctor_id)
        .ok_or_else(|| ViewError::UnknownDoctor(doctor_id.to_string()))?;

    let slots = slot::day_slots(date, cal.start_hour, cal.end_hour, cal.slot_minutes);
    let height = container_height(slots.len(), cal);
    let appointments = store.appointments_on(doctor_id, date);
    let cards = place_cards(store, &appointments, cal)?;

    Ok(DaySchedule {
        working_hours: doctor.working_hours.on(date.weekday()).cloned(),
        doctor: doctor.clone(),
        date,
        now_marker: now_marker(date, now, height, cal),
        container_height: height,
        slots,
        cards,
    })
}

pub fn week_schedule(
    store: &Store,
    doctor_id: &str,
    date: Date,
    now: DateTime,
    cal: &Calendar,
) -> Result<WeekSchedule, ViewError> {
    let doctor = store
        .doctor(doctor_id)
        .ok_or_else(|| ViewError::UnknownDoctor(doctor_id.to_string()))?;

    let days = slot::week_days(date);
    let week_start = days[0];
    let slots = slot::day_slots(week_start, cal.start_hour, cal.end_hour, cal.slot_minutes);
    let height = container_height(slots.len(), cal);

    let week_appointments = store.appointments_between(doctor_id, days[0], days[6]);
    let mut columns = Vec::with_capacity(days.len());
    for day in days {
        let on_day: Vec<&Appointment> = week_appointments
            .iter()
            .copied()
            .filter(|a| a.start_time.date() == day)
            .collect();
        columns.push(WeekDay {
            date: day,
            now_marker: now_marker(day, now, height, cal),
            cards: place_cards(store, &on_day, cal)?,
        });
    }

    Ok(WeekSchedule {
        doctor: doctor.clone(),
        week_start,
        slots,
        container_height: height,
        days: columns,
    })
}
