pub mod domain;
mod index;
mod loader;

pub use domain::{
    CargoId, CargoTrailerLink, CargoType, CompanyCargoLink, CompanyId, CompanyType, Location,
    LocationCompanyLink, LocationId, TrailerId, TrailerType,
};
pub use index::{CompanyLink, ReferenceIndex};
pub use loader::{read_table, DatasetError, DatasetFormat, SnapshotInfo, TableName};

/// The seven flat tables of a reference snapshot, in source order.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub locations: Vec<Location>,
    pub companies: Vec<CompanyType>,
    pub cargo: Vec<CargoType>,
    pub trailers: Vec<TrailerType>,
    pub location_companies: Vec<LocationCompanyLink>,
    pub company_cargo: Vec<CompanyCargoLink>,
    pub cargo_trailers: Vec<CargoTrailerLink>,
}

impl ReferenceData {
    pub fn index(self) -> ReferenceIndex {
        ReferenceIndex::build(self)
    }
}
