//! Service and pet catalog — thin pass-through CRUD over the entity store.
//!
//! No business rules here beyond the storage round-trip; the booking core
//! only reads these collections for durations and display-name snapshots.

use crate::models::{NewPet, NewService, Pet, RecordId, Service};
use crate::store::{collections, EntityStore, StoreError};

pub fn list_services(store: &EntityStore) -> Vec<Service> {
    store.lock().load(collections::SERVICES)
}

pub fn create_service(store: &EntityStore, payload: NewService) -> Result<Service, StoreError> {
    let guard = store.lock();
    let mut services: Vec<Service> = guard.load(collections::SERVICES);
    let created = Service {
        id: guard.next_id()?,
        name: payload.name,
        duration: payload.duration,
        price: payload.price,
    };
    services.push(created.clone());
    guard.save(collections::SERVICES, &services);
    Ok(created)
}

pub fn remove_service(store: &EntityStore, id: RecordId) {
    let guard = store.lock();
    let mut services: Vec<Service> = guard.load(collections::SERVICES);
    services.retain(|s| s.id != id);
    guard.save(collections::SERVICES, &services);
}

pub fn list_pets(store: &EntityStore) -> Vec<Pet> {
    store.lock().load(collections::PETS)
}

pub fn create_pet(store: &EntityStore, payload: NewPet) -> Result<Pet, StoreError> {
    let guard = store.lock();
    let mut pets: Vec<Pet> = guard.load(collections::PETS);
    let created = Pet {
        id: guard.next_id()?,
        name: payload.name,
        owner_id: payload.owner_id,
        owner_name: payload.owner_name.unwrap_or_default(),
        breed: payload.breed.unwrap_or_default(),
        notes: payload.notes.unwrap_or_default(),
    };
    pets.push(created.clone());
    guard.save(collections::PETS, &pets);
    Ok(created)
}

pub fn remove_pet(store: &EntityStore, id: RecordId) {
    let guard = store.lock();
    let mut pets: Vec<Pet> = guard.load(collections::PETS);
    pets.retain(|p| p.id != id);
    guard.save(collections::PETS, &pets);
}
