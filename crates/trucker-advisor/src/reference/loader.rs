use super::ReferenceData;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Files making up a reference snapshot, named after the export documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TableName {
    Cities,
    Companies,
    Cargo,
    Trailers,
    CityCompanies,
    CompanyCargo,
    CargoTrailers,
}

impl TableName {
    pub const fn file_stem(self) -> &'static str {
        match self {
            Self::Cities => "cities",
            Self::Companies => "companies",
            Self::Cargo => "cargo",
            Self::Trailers => "trailers",
            Self::CityCompanies => "city-companies",
            Self::CompanyCargo => "company-cargo",
            Self::CargoTrailers => "cargo-trailers",
        }
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_stem())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetFormat {
    Json,
    Csv,
}

impl DatasetFormat {
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("reference table '{table}' not found in {dir} (expected {table}.json or {table}.csv)")]
    MissingTable { table: TableName, dir: PathBuf },
    #[error("failed to read reference table '{table}': {source}")]
    Io {
        table: TableName,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in reference table '{table}': {source}")]
    Json {
        table: TableName,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid CSV in reference table '{table}': {source}")]
    Csv {
        table: TableName,
        #[source]
        source: csv::Error,
    },
    #[error("location {location_id} lists company {company_id} with a depot count of zero")]
    ZeroDepotCount { location_id: u32, company_id: u32 },
}

/// Provenance and row counts of a loaded snapshot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotInfo {
    pub source: PathBuf,
    pub loaded_at: DateTime<Utc>,
    pub locations: usize,
    pub companies: usize,
    pub cargo: usize,
    pub trailers: usize,
    pub location_company_links: usize,
    pub company_cargo_links: usize,
    pub cargo_trailer_links: usize,
}

impl SnapshotInfo {
    pub fn describe(data: &ReferenceData, source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            loaded_at: Utc::now(),
            locations: data.locations.len(),
            companies: data.companies.len(),
            cargo: data.cargo.len(),
            trailers: data.trailers.len(),
            location_company_links: data.location_companies.len(),
            company_cargo_links: data.company_cargo.len(),
            cargo_trailer_links: data.cargo_trailers.len(),
        }
    }
}

impl ReferenceData {
    /// Load every table from `dir`, preferring `<table>.json` over `<table>.csv`.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, DatasetError> {
        let dir = dir.as_ref();
        let data = Self {
            locations: load_table(dir, TableName::Cities)?,
            companies: load_table(dir, TableName::Companies)?,
            cargo: load_table(dir, TableName::Cargo)?,
            trailers: load_table(dir, TableName::Trailers)?,
            location_companies: load_table(dir, TableName::CityCompanies)?,
            company_cargo: load_table(dir, TableName::CompanyCargo)?,
            cargo_trailers: load_table(dir, TableName::CargoTrailers)?,
        };
        data.validate()?;

        info!(
            dir = %dir.display(),
            locations = data.locations.len(),
            companies = data.companies.len(),
            cargo = data.cargo.len(),
            trailers = data.trailers.len(),
            "reference data loaded"
        );

        Ok(data)
    }

    fn validate(&self) -> Result<(), DatasetError> {
        match self.location_companies.iter().find(|link| link.count == 0) {
            Some(link) => Err(DatasetError::ZeroDepotCount {
                location_id: link.location_id.0,
                company_id: link.company_id.0,
            }),
            None => Ok(()),
        }
    }
}

fn load_table<T: DeserializeOwned>(dir: &Path, table: TableName) -> Result<Vec<T>, DatasetError> {
    for format in [DatasetFormat::Json, DatasetFormat::Csv] {
        let path = dir.join(format!("{}.{}", table.file_stem(), format.extension()));
        if path.is_file() {
            let file = File::open(&path).map_err(|source| DatasetError::Io { table, source })?;
            return read_table(BufReader::new(file), format, table);
        }
    }

    Err(DatasetError::MissingTable {
        table,
        dir: dir.to_path_buf(),
    })
}

/// Parse one table from any reader in the given format.
pub fn read_table<T, R>(
    reader: R,
    format: DatasetFormat,
    table: TableName,
) -> Result<Vec<T>, DatasetError>
where
    T: DeserializeOwned,
    R: Read,
{
    match format {
        DatasetFormat::Json => {
            serde_json::from_reader(reader).map_err(|source| DatasetError::Json { table, source })
        }
        DatasetFormat::Csv => {
            let mut csv_reader = csv::ReaderBuilder::new()
                .trim(csv::Trim::All)
                .from_reader(reader);
            csv_reader
                .deserialize::<T>()
                .collect::<Result<Vec<_>, _>>()
                .map_err(|source| DatasetError::Csv { table, source })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::domain::{CargoId, CargoType, Location, LocationId};
    use std::io::Cursor;

    #[test]
    fn reads_export_json_documents() {
        let cities: Vec<Location> = read_table(
            Cursor::new(r#"[{"id":1,"name":"Berlin","country":"Germany"}]"#),
            DatasetFormat::Json,
            TableName::Cities,
        )
        .expect("cities parse");
        assert_eq!(cities[0].id, LocationId(1));
        assert_eq!(cities[0].country, "Germany");
    }

    #[test]
    fn reads_csv_tables_with_optional_flags() {
        let cargo: Vec<CargoType> = read_table(
            Cursor::new("id,name,value,fragile\n4, Furniture ,1.5,true\n"),
            DatasetFormat::Csv,
            TableName::Cargo,
        )
        .expect("cargo parses");
        assert_eq!(cargo[0].id, CargoId(4));
        assert_eq!(cargo[0].name, "Furniture");
        assert!(cargo[0].fragile);
        assert!(!cargo[0].high_value);
        assert!(!cargo[0].excluded);
    }

    #[test]
    fn malformed_json_names_the_table() {
        let error = read_table::<Location, _>(
            Cursor::new("[{"),
            DatasetFormat::Json,
            TableName::Cities,
        )
        .expect_err("truncated document fails");
        assert!(error.to_string().contains("'cities'"));
    }

    #[test]
    fn missing_directory_reports_first_table() {
        let error = ReferenceData::from_dir("./does-not-exist").expect_err("missing dir fails");
        match error {
            DatasetError::MissingTable { table, .. } => assert_eq!(table, TableName::Cities),
            other => panic!("expected missing table, got {other:?}"),
        }
    }
}
