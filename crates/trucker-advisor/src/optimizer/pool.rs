use crate::reference::{CargoId, CompanyId, LocationId, ReferenceIndex};

/// One job opportunity at a location: a cargo offered by one company link.
///
/// Entries are not merged across companies, so a cargo offered by two depot
/// types at the same location appears twice with each link's depot count.
#[derive(Debug, Clone, PartialEq)]
pub struct CargoPoolEntry {
    pub company_id: CompanyId,
    pub depot_count: u32,
    pub cargo_id: CargoId,
    pub cargo_name: String,
    /// Base value with fragile/high-value bonuses applied.
    pub value: f64,
}

impl CargoPoolEntry {
    pub fn contribution(&self) -> f64 {
        self.value * f64::from(self.depot_count)
    }
}

/// Expand the companies serving `location` into its cargo pool.
pub fn cargo_pool(index: &ReferenceIndex, location: LocationId) -> Vec<CargoPoolEntry> {
    let mut pool = Vec::new();

    for link in index.location_companies(location) {
        for &cargo_id in index.company_cargo(link.company_id) {
            let Some(cargo) = index.cargo(cargo_id) else {
                continue;
            };
            if cargo.excluded {
                continue;
            }

            pool.push(CargoPoolEntry {
                company_id: link.company_id,
                depot_count: link.count,
                cargo_id,
                cargo_name: cargo.name.clone(),
                value: cargo.adjusted_value(),
            });
        }
    }

    pool
}
