//! In-memory record store.
//!
//! One [`CarStore`] owns the whole collection behind a mutex, so inserts,
//! updates and deletes are serialized and two concurrent inserts can never be
//! handed the same id. Nothing is persisted: a restart brings back the seed
//! records.

use std::sync::{Mutex, MutexGuard};

use thiserror::Error;
use tracing::info;

use crate::car::{CarPatch, CarRecord, NewCar};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("car `{0}` not found")]
    NotFound(String),
    #[error("store lock poisoned during {0}")]
    LockPoisoned(&'static str),
}

pub struct CarStore {
    inner: Mutex<Inventory>,
}

struct Inventory {
    cars: Vec<CarRecord>,
    // Highest numeric id ever issued or seeded. Survives deletes so ids are
    // never reused.
    high_water: u64,
}

impl CarStore {
    /// A store holding the two seed cars.
    pub fn seeded() -> Self {
        Self::with_records(vec![
            CarRecord {
                id: "1".into(),
                brand: "Toyota".into(),
                model: "Camry".into(),
                year: Some(2020),
                price: 25000.0,
                mileage: Some(15000),
            },
            CarRecord {
                id: "2".into(),
                brand: "BMW".into(),
                model: "X5".into(),
                year: Some(2019),
                price: 45000.0,
                mileage: Some(30000),
            },
        ])
    }

    pub fn empty() -> Self {
        Self::with_records(Vec::new())
    }

    pub fn with_records(cars: Vec<CarRecord>) -> Self {
        let high_water = cars
            .iter()
            .filter_map(|car| car.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        Self {
            inner: Mutex::new(Inventory { cars, high_water }),
        }
    }

    fn lock(&self, operation: &'static str) -> Result<MutexGuard<'_, Inventory>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::LockPoisoned(operation))
    }

    /// Snapshot of every car in insertion order.
    pub fn list(&self) -> Result<Vec<CarRecord>, StoreError> {
        Ok(self.lock("list")?.cars.clone())
    }

    pub fn get(&self, id: &str) -> Result<CarRecord, StoreError> {
        self.lock("get")?
            .cars
            .iter()
            .find(|car| car.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_owned()))
    }

    pub fn insert(&self, candidate: NewCar) -> Result<CarRecord, StoreError> {
        let mut inventory = self.lock("insert")?;
        inventory.high_water += 1;
        let car = candidate.into_record(inventory.high_water.to_string());
        inventory.cars.push(car.clone());
        info!(id = %car.id, brand = %car.brand, model = %car.model, "car added");
        Ok(car)
    }

    pub fn update(&self, id: &str, patch: CarPatch) -> Result<CarRecord, StoreError> {
        let mut inventory = self.lock("update")?;
        let car = inventory
            .cars
            .iter_mut()
            .find(|car| car.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_owned()))?;
        car.merge(patch);
        info!(id, "car updated");
        Ok(car.clone())
    }

    pub fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut inventory = self.lock("delete")?;
        let before = inventory.cars.len();
        inventory.cars.retain(|car| car.id != id);
        if inventory.cars.len() == before {
            return Err(StoreError::NotFound(id.to_owned()));
        }
        info!(id, "car deleted");
        Ok(())
    }

    /// False once a panic has poisoned the lock.
    pub fn is_available(&self) -> bool {
        !self.inner.is_poisoned()
    }
}

impl Default for CarStore {
    fn default() -> Self {
        Self::seeded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(brand: &str) -> NewCar {
        NewCar {
            brand: brand.into(),
            model: "Any".into(),
            year: None,
            price: 1000.0,
            mileage: None,
        }
    }

    #[test]
    fn ids_follow_the_historical_maximum() {
        let store = CarStore::empty();
        assert_eq!(store.insert(candidate("A")).unwrap().id, "1");
        assert_eq!(store.insert(candidate("B")).unwrap().id, "2");
        store.delete("1").unwrap();
        assert_eq!(store.insert(candidate("C")).unwrap().id, "3");
    }

    #[test]
    fn deleting_the_newest_car_does_not_recycle_its_id() {
        let store = CarStore::seeded();
        store.delete("2").unwrap();
        assert_eq!(store.insert(candidate("Lada")).unwrap().id, "3");
    }

    #[test]
    fn seeded_store_keeps_insertion_order() {
        let store = CarStore::seeded();
        let brands: Vec<_> = store.list().unwrap().into_iter().map(|c| c.brand).collect();
        assert_eq!(brands, ["Toyota", "BMW"]);
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let store = CarStore::seeded();
        assert_eq!(store.get("9"), Err(StoreError::NotFound("9".into())));
        assert_eq!(
            store.update("9", CarPatch::default()),
            Err(StoreError::NotFound("9".into()))
        );
        assert_eq!(store.delete("9"), Err(StoreError::NotFound("9".into())));
        assert_eq!(store.list().unwrap().len(), 2);
    }

    #[test]
    fn update_merges_in_place() {
        let store = CarStore::seeded();
        let patch = CarPatch {
            price: Some(41000.0),
            ..CarPatch::default()
        };
        let car = store.update("2", patch).unwrap();
        assert_eq!(car.price, 41000.0);
        assert_eq!(car.brand, "BMW");
        assert_eq!(store.get("2").unwrap(), car);
    }

    #[test]
    fn concurrent_inserts_get_distinct_ids() {
        use std::sync::Arc;

        let store = Arc::new(CarStore::empty());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.insert(candidate("X")).unwrap().id)
            })
            .collect();
        let mut ids: Vec<u64> = handles
            .into_iter()
            .map(|h| h.join().unwrap().parse().unwrap())
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, (1..=8).collect::<Vec<_>>());
    }
}
