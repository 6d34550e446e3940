//! Appointment repository — list/get/create/update/cancel over the entity
//! store, with slot validation in front of every mutation that changes
//! timing.
//!
//! Each operation takes the store lock once and holds it for its whole
//! read-validate-write cycle, so two mutations can never both pass the
//! overlap check against the same stale snapshot.

use std::sync::Arc;

use chrono::Local;

use crate::booking::{self, SlotCandidate};
use crate::error::BookingError;
use crate::models::{
    Appointment, AppointmentPatch, AppointmentStatus, NewAppointment, Pet, RecordId, Service,
};
use crate::store::{collections, EntityStore};

/// Repository over the appointment collection.
pub struct AppointmentBook {
    store: Arc<EntityStore>,
}

impl AppointmentBook {
    pub fn new(store: Arc<EntityStore>) -> Self {
        Self { store }
    }

    /// All appointments, newest first.
    pub fn list(&self) -> Vec<Appointment> {
        let store = self.store.lock();
        let mut appointments: Vec<Appointment> = store.load(collections::APPOINTMENTS);
        appointments.sort_by(|a, b| b.date.cmp(&a.date));
        appointments
    }

    pub fn get(&self, id: RecordId) -> Result<Appointment, BookingError> {
        let store = self.store.lock();
        store
            .load::<Appointment>(collections::APPOINTMENTS)
            .into_iter()
            .find(|a| a.id == id)
            .ok_or(BookingError::NotFound(id))
    }

    /// Book a new appointment. Validates the slot before anything is
    /// written; on rejection the store is untouched.
    pub fn create(&self, payload: NewAppointment) -> Result<Appointment, BookingError> {
        let store = self.store.lock();
        let mut appointments: Vec<Appointment> = store.load(collections::APPOINTMENTS);
        let services: Vec<Service> = store.load(collections::SERVICES);
        let pets: Vec<Pet> = store.load(collections::PETS);

        let candidate = SlotCandidate { service_id: payload.service_id, date: payload.date };
        booking::validate_slot(
            candidate,
            &appointments,
            &services,
            None,
            Local::now().naive_local(),
        )?;

        let created = Appointment {
            id: store.next_id()?,
            pet_id: payload.pet_id,
            service_id: payload.service_id,
            date: payload.date,
            status: AppointmentStatus::Scheduled,
            notes: payload.notes.unwrap_or_default(),
            cancel_reason: None,
            cancelled_at: None,
            pet_name: pet_name(&pets, payload.pet_id),
            service_name: service_name(&services, payload.service_id),
        };

        appointments.push(created.clone());
        store.save(collections::APPOINTMENTS, &appointments);
        tracing::info!(id = created.id, date = %created.date, "appointment created");
        Ok(created)
    }

    /// Merge a patch over an existing appointment, re-validating the merged
    /// slot with the record itself excluded from the overlap scan.
    ///
    /// Status is preserved unless the patch supplies one. A cancelled
    /// appointment stays editable, but its status is pinned: the lifecycle
    /// only moves forward.
    pub fn update(&self, id: RecordId, patch: AppointmentPatch) -> Result<Appointment, BookingError> {
        let store = self.store.lock();
        let mut appointments: Vec<Appointment> = store.load(collections::APPOINTMENTS);
        let idx = appointments
            .iter()
            .position(|a| a.id == id)
            .ok_or(BookingError::NotFound(id))?;

        let services: Vec<Service> = store.load(collections::SERVICES);
        let pets: Vec<Pet> = store.load(collections::PETS);

        let current = &appointments[idx];
        let candidate = SlotCandidate {
            service_id: patch.service_id.or(current.service_id),
            date: patch.date.unwrap_or(current.date),
        };
        booking::validate_slot(
            candidate,
            &appointments,
            &services,
            Some(id),
            Local::now().naive_local(),
        )?;

        let current = &appointments[idx];
        let pet_id = patch.pet_id.or(current.pet_id);
        let merged = Appointment {
            id,
            pet_id,
            service_id: candidate.service_id,
            date: candidate.date,
            // Cancelled is terminal; a patch cannot move it back.
            status: if current.status.is_cancelled() {
                AppointmentStatus::Cancelled
            } else {
                patch.status.unwrap_or(current.status)
            },
            notes: patch.notes.unwrap_or_else(|| current.notes.clone()),
            cancel_reason: current.cancel_reason.clone(),
            cancelled_at: current.cancelled_at,
            pet_name: pet_name(&pets, pet_id),
            service_name: service_name(&services, candidate.service_id),
        };

        appointments[idx] = merged.clone();
        store.save(collections::APPOINTMENTS, &appointments);
        tracing::info!(id, "appointment updated");
        Ok(merged)
    }

    /// Cancel an appointment and stamp the audit fields.
    ///
    /// Never re-validates timing: cancelling only shrinks the active set,
    /// so it cannot violate the scheduling invariants of others.
    pub fn cancel(&self, id: RecordId, reason: Option<String>) -> Result<Appointment, BookingError> {
        let store = self.store.lock();
        let mut appointments: Vec<Appointment> = store.load(collections::APPOINTMENTS);
        let entry = appointments
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(BookingError::NotFound(id))?;

        entry.status = AppointmentStatus::Cancelled;
        entry.cancel_reason = Some(reason.unwrap_or_default());
        entry.cancelled_at = Some(Local::now().naive_local());
        let cancelled = entry.clone();

        store.save(collections::APPOINTMENTS, &appointments);
        tracing::info!(id, "appointment cancelled");
        Ok(cancelled)
    }
}

fn pet_name(pets: &[Pet], id: Option<RecordId>) -> String {
    id.and_then(|id| pets.iter().find(|p| p.id == id))
        .map(|p| p.name.clone())
        .unwrap_or_default()
}

fn service_name(services: &[Service], id: Option<RecordId>) -> String {
    id.and_then(|id| services.iter().find(|s| s.id == id))
        .map(|s| s.name.clone())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use chrono::{Duration, NaiveDateTime};

    fn setup_book() -> AppointmentBook {
        let store = Arc::new(EntityStore::open_in_memory().expect("open_in_memory"));
        store.seed_defaults();
        AppointmentBook::new(store)
    }

    fn tomorrow_at(hour: u32, minute: u32) -> NaiveDateTime {
        (Local::now().date_naive() + Duration::days(1))
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn banho_booking(date: NaiveDateTime) -> NewAppointment {
        NewAppointment { pet_id: Some(1), service_id: Some(1), date, notes: None }
    }

    #[test]
    fn create_assigns_id_and_snapshots_names() {
        let book = setup_book();
        let created = book.create(banho_booking(tomorrow_at(9, 0))).unwrap();

        assert!(created.id > 100);
        assert_eq!(created.status, AppointmentStatus::Scheduled);
        assert_eq!(created.pet_name, "Rex");
        assert_eq!(created.service_name, "Banho");
        assert_eq!(book.get(created.id).unwrap().id, created.id);
    }

    #[test]
    fn overlap_rejection_leaves_store_untouched() {
        let book = setup_book();
        let first = book.create(banho_booking(tomorrow_at(9, 0))).unwrap();

        let err = book.create(banho_booking(tomorrow_at(9, 30))).unwrap_err();
        assert!(matches!(
            err,
            BookingError::Validation(ValidationError::OverlapConflict { conflicting_id })
                if conflicting_id == first.id
        ));
        assert_eq!(book.list().len(), 1);
    }

    #[test]
    fn back_to_back_booking_is_accepted() {
        let book = setup_book();
        book.create(banho_booking(tomorrow_at(9, 0))).unwrap();
        book.create(banho_booking(tomorrow_at(10, 0))).unwrap();
        assert_eq!(book.list().len(), 2);
    }

    #[test]
    fn past_booking_is_rejected() {
        let book = setup_book();
        let yesterday = (Local::now().date_naive() - Duration::days(1))
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let err = book.create(banho_booking(yesterday)).unwrap_err();
        assert!(matches!(err, BookingError::Validation(ValidationError::PastDate)));
    }

    #[test]
    fn slot_past_closing_is_rejected() {
        let book = setup_book();
        let err = book.create(banho_booking(tomorrow_at(17, 30))).unwrap_err();
        assert!(matches!(err, BookingError::Validation(ValidationError::OutOfBusinessHours)));
    }

    #[test]
    fn get_unknown_id_is_not_found() {
        let book = setup_book();
        assert!(matches!(book.get(999), Err(BookingError::NotFound(999))));
    }

    #[test]
    fn notes_only_update_does_not_self_conflict() {
        let book = setup_book();
        let created = book.create(banho_booking(tomorrow_at(9, 0))).unwrap();

        let patch = AppointmentPatch { notes: Some("trazer coleira".into()), ..Default::default() };
        let updated = book.update(created.id, patch).unwrap();

        assert_eq!(updated.notes, "trazer coleira");
        assert_eq!(updated.date, created.date);
        assert_eq!(updated.status, AppointmentStatus::Scheduled);
    }

    #[test]
    fn update_can_move_into_a_freed_slot() {
        let book = setup_book();
        let created = book.create(banho_booking(tomorrow_at(9, 0))).unwrap();

        let patch = AppointmentPatch { date: Some(tomorrow_at(11, 0)), ..Default::default() };
        book.update(created.id, patch).unwrap();

        // The 09:00 slot is free again.
        book.create(banho_booking(tomorrow_at(9, 0))).unwrap();
    }

    #[test]
    fn update_into_occupied_slot_is_rejected() {
        let book = setup_book();
        let first = book.create(banho_booking(tomorrow_at(9, 0))).unwrap();
        let second = book.create(banho_booking(tomorrow_at(11, 0))).unwrap();

        let patch = AppointmentPatch { date: Some(tomorrow_at(9, 30)), ..Default::default() };
        let err = book.update(second.id, patch).unwrap_err();
        assert!(matches!(
            err,
            BookingError::Validation(ValidationError::OverlapConflict { conflicting_id })
                if conflicting_id == first.id
        ));
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let book = setup_book();
        let err = book.update(999, AppointmentPatch::default()).unwrap_err();
        assert!(matches!(err, BookingError::NotFound(999)));
    }

    #[test]
    fn cancel_stamps_audit_fields_and_frees_the_slot() {
        let book = setup_book();
        let created = book.create(banho_booking(tomorrow_at(9, 0))).unwrap();

        let cancelled = book.cancel(created.id, Some("cliente doente".into())).unwrap();
        assert_eq!(cancelled.status, AppointmentStatus::Cancelled);
        assert_eq!(cancelled.cancel_reason.as_deref(), Some("cliente doente"));
        assert!(cancelled.cancelled_at.is_some());

        // The slot no longer blocks new bookings.
        book.create(banho_booking(tomorrow_at(9, 0))).unwrap();
    }

    #[test]
    fn cancel_unknown_id_is_not_found() {
        let book = setup_book();
        assert!(matches!(book.cancel(999, None), Err(BookingError::NotFound(999))));
    }

    #[test]
    fn cancelled_stays_cancelled_through_updates() {
        let book = setup_book();
        let created = book.create(banho_booking(tomorrow_at(9, 0))).unwrap();
        book.cancel(created.id, None).unwrap();

        let patch = AppointmentPatch { notes: Some("remarcar depois".into()), ..Default::default() };
        let updated = book.update(created.id, patch).unwrap();
        assert_eq!(updated.status, AppointmentStatus::Cancelled);
        assert!(updated.cancelled_at.is_some());
    }

    #[test]
    fn status_patch_cannot_revert_a_cancellation() {
        let book = setup_book();
        let created = book.create(banho_booking(tomorrow_at(9, 0))).unwrap();
        book.cancel(created.id, None).unwrap();

        let patch = AppointmentPatch {
            status: Some(AppointmentStatus::Scheduled),
            ..Default::default()
        };
        let updated = book.update(created.id, patch).unwrap();
        assert_eq!(updated.status, AppointmentStatus::Cancelled);
    }

    #[test]
    fn list_is_sorted_newest_first() {
        let book = setup_book();
        let early = book.create(banho_booking(tomorrow_at(9, 0))).unwrap();
        let late = book.create(banho_booking(tomorrow_at(14, 0))).unwrap();

        let listed = book.list();
        assert_eq!(listed[0].id, late.id);
        assert_eq!(listed[1].id, early.id);
    }

    #[test]
    fn records_without_status_read_back_as_scheduled() {
        let book = setup_book();
        let legacy = serde_json::json!([{
            "id": 42,
            "pet_id": 1,
            "service_id": 1,
            "date": "2030-01-02T09:00:00",
            "notes": ""
        }]);
        book.store
            .lock()
            .save(collections::APPOINTMENTS, legacy.as_array().unwrap());

        let listed = book.list();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].status, AppointmentStatus::Scheduled);
    }

    #[test]
    fn patch_rejects_unknown_fields() {
        let raw = serde_json::json!({ "notes": "ok", "groomer": "Paula" });
        assert!(serde_json::from_value::<AppointmentPatch>(raw).is_err());
    }
}
