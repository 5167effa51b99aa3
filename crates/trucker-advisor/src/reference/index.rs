use super::domain::{
    CargoId, CargoType, CompanyId, CompanyType, Location, LocationId, TrailerId, TrailerType,
};
use super::ReferenceData;
use std::collections::HashMap;
use std::hash::Hash;
use tracing::debug;

/// A company serving a location, with the number of physical depots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompanyLink {
    pub company_id: CompanyId,
    pub count: u32,
}

/// Contiguous slot assignment for one entity table.
#[derive(Debug)]
struct SlotMap<K> {
    slots: HashMap<K, usize>,
}

impl<K> Default for SlotMap<K> {
    fn default() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }
}

impl<K: Copy + Eq + Hash> SlotMap<K> {
    fn build(ids: impl Iterator<Item = K>) -> Self {
        let mut slots = HashMap::new();
        for (slot, id) in ids.enumerate() {
            slots.insert(id, slot);
        }
        Self { slots }
    }

    fn get(&self, id: K) -> Option<usize> {
        self.slots.get(&id).copied()
    }
}

/// Read-only lookup structures over one reference-data snapshot.
///
/// Every entity table keeps its input order and each external id maps to a
/// contiguous slot; a repeated id resolves to its last row. Location and
/// company links are keyed by the ids the link rows carry, so they survive a
/// missing entity row. Trailer compatibility is stored per slot and only kept
/// when both the trailer and the cargo exist. The index exposes no mutation
/// once built; share it by reference or `Arc`.
#[derive(Debug, Default)]
pub struct ReferenceIndex {
    locations: Vec<Location>,
    companies: Vec<CompanyType>,
    cargo: Vec<CargoType>,
    trailers: Vec<TrailerType>,
    location_slots: SlotMap<LocationId>,
    company_slots: SlotMap<CompanyId>,
    cargo_slots: SlotMap<CargoId>,
    trailer_slots: SlotMap<TrailerId>,
    location_companies: HashMap<LocationId, Vec<CompanyLink>>,
    company_cargo: HashMap<CompanyId, Vec<CargoId>>,
    trailer_cargo: Vec<Vec<CargoId>>,
    cargo_trailers: Vec<Vec<TrailerId>>,
}

impl ReferenceIndex {
    pub fn build(data: ReferenceData) -> Self {
        let ReferenceData {
            locations,
            companies,
            cargo,
            trailers,
            location_companies: location_company_rows,
            company_cargo: company_cargo_rows,
            cargo_trailers: cargo_trailer_rows,
        } = data;

        let location_slots = SlotMap::build(locations.iter().map(|location| location.id));
        let company_slots = SlotMap::build(companies.iter().map(|company| company.id));
        let cargo_slots = SlotMap::build(cargo.iter().map(|cargo| cargo.id));
        let trailer_slots = SlotMap::build(trailers.iter().map(|trailer| trailer.id));

        let mut location_companies: HashMap<LocationId, Vec<CompanyLink>> = HashMap::new();
        for link in &location_company_rows {
            location_companies
                .entry(link.location_id)
                .or_default()
                .push(CompanyLink {
                    company_id: link.company_id,
                    count: link.count,
                });
        }

        let mut company_cargo: HashMap<CompanyId, Vec<CargoId>> = HashMap::new();
        for link in &company_cargo_rows {
            company_cargo
                .entry(link.company_id)
                .or_default()
                .push(link.cargo_id);
        }

        let mut dropped = 0usize;

        let mut trailer_cargo: Vec<Vec<CargoId>> = vec![Vec::new(); trailers.len()];
        let mut cargo_trailers: Vec<Vec<TrailerId>> = vec![Vec::new(); cargo.len()];
        for link in &cargo_trailer_rows {
            let (Some(trailer_slot), Some(cargo_slot)) = (
                trailer_slots.get(link.trailer_id),
                cargo_slots.get(link.cargo_id),
            ) else {
                dropped += 1;
                continue;
            };

            if !trailer_cargo[trailer_slot].contains(&link.cargo_id) {
                trailer_cargo[trailer_slot].push(link.cargo_id);
            }
            if !cargo_trailers[cargo_slot].contains(&link.trailer_id) {
                cargo_trailers[cargo_slot].push(link.trailer_id);
            }
        }
        for compatible in &mut trailer_cargo {
            compatible.sort_unstable();
        }

        debug!(
            locations = locations.len(),
            companies = companies.len(),
            cargo = cargo.len(),
            trailers = trailers.len(),
            dropped_compatibility_links = dropped,
            "reference index built"
        );

        Self {
            locations,
            companies,
            cargo,
            trailers,
            location_slots,
            company_slots,
            cargo_slots,
            trailer_slots,
            location_companies,
            company_cargo,
            trailer_cargo,
            cargo_trailers,
        }
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn companies(&self) -> &[CompanyType] {
        &self.companies
    }

    pub fn cargo_types(&self) -> &[CargoType] {
        &self.cargo
    }

    pub fn trailers(&self) -> &[TrailerType] {
        &self.trailers
    }

    pub fn location(&self, id: LocationId) -> Option<&Location> {
        self.location_slots.get(id).map(|slot| &self.locations[slot])
    }

    pub fn company(&self, id: CompanyId) -> Option<&CompanyType> {
        self.company_slots.get(id).map(|slot| &self.companies[slot])
    }

    pub fn cargo(&self, id: CargoId) -> Option<&CargoType> {
        self.cargo_slots.get(id).map(|slot| &self.cargo[slot])
    }

    pub fn trailer(&self, id: TrailerId) -> Option<&TrailerType> {
        self.trailer_slots.get(id).map(|slot| &self.trailers[slot])
    }

    /// Companies serving a location in input order, duplicates preserved.
    pub fn location_companies(&self, id: LocationId) -> &[CompanyLink] {
        self.location_companies
            .get(&id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn company_cargo(&self, id: CompanyId) -> &[CargoId] {
        self.company_cargo
            .get(&id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Deduplicated, sorted cargo ids a trailer can haul.
    pub fn trailer_cargo(&self, id: TrailerId) -> &[CargoId] {
        self.trailer_slots
            .get(id)
            .map(|slot| self.trailer_cargo[slot].as_slice())
            .unwrap_or_default()
    }

    pub fn cargo_trailers(&self, id: CargoId) -> &[TrailerId] {
        self.cargo_slots
            .get(id)
            .map(|slot| self.cargo_trailers[slot].as_slice())
            .unwrap_or_default()
    }

    pub fn trailer_hauls(&self, trailer: TrailerId, cargo: CargoId) -> bool {
        self.trailer_cargo(trailer).binary_search(&cargo).is_ok()
    }

    /// Ownable trailers in table order.
    pub fn ownable_trailers(&self) -> impl Iterator<Item = &TrailerType> {
        self.trailers.iter().filter(|trailer| trailer.ownable)
    }
}
