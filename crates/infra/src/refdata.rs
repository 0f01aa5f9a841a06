//! Immutable geographic and option lookups backing the pickers. Loaded
//! once per process; deployments can point `REFDATA_PATH` at a fuller
//! dataset than the embedded one.

use once_cell::sync::Lazy;
use serde::Deserialize;

use crate::models::{Level, Standing};

static BUILTIN: &str = include_str!("../assets/refdata.json");

static SNAPSHOT: Lazy<ReferenceData> = Lazy::new(|| {
    if let Ok(path) = std::env::var("REFDATA_PATH") {
        match std::fs::read_to_string(&path) {
            Ok(raw) => match ReferenceData::from_json(&raw) {
                Ok(data) => return data,
                Err(error) => {
                    tracing::warn!(%error, %path, "reference data file is invalid, using builtin")
                }
            },
            Err(error) => {
                tracing::warn!(%error, %path, "reference data file unreadable, using builtin")
            }
        }
    }
    ReferenceData::from_json(BUILTIN).expect("embedded reference data is valid")
});

#[derive(Debug, Clone, Deserialize)]
pub struct Municipality {
    pub name: String,
    pub province: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Barangay {
    pub name: String,
    pub citymun: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReferenceData {
    provinces: Vec<String>,
    municipalities: Vec<Municipality>,
    barangays: Vec<Barangay>,
    countries: Vec<String>,
}

impl ReferenceData {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let mut data: ReferenceData = serde_json::from_str(raw)?;
        data.provinces.sort();
        data.countries.sort();
        data.municipalities.sort_by(|a, b| a.name.cmp(&b.name));
        data.barangays.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(data)
    }

    /// Process-wide snapshot.
    pub fn global() -> &'static ReferenceData {
        &SNAPSHOT
    }

    pub fn provinces(&self) -> &[String] {
        &self.provinces
    }

    pub fn countries(&self) -> &[String] {
        &self.countries
    }

    pub fn municipalities_of(&self, province: &str) -> Vec<&str> {
        self.municipalities
            .iter()
            .filter(|m| m.province.eq_ignore_ascii_case(province))
            .map(|m| m.name.as_str())
            .collect()
    }

    /// Barangays of a municipality/city, matched the way the picker always
    /// has: the "citymun" key contains the municipality name.
    pub fn barangays_of(&self, municipality: &str) -> Vec<&str> {
        let needle = municipality.to_lowercase();
        self.barangays
            .iter()
            .filter(|b| b.citymun.to_lowercase().contains(&needle))
            .map(|b| b.name.as_str())
            .collect()
    }
}

/// Level picker options, in display order.
pub fn levels() -> Vec<&'static str> {
    Level::ALL.iter().map(|level| level.as_str()).collect()
}

pub fn standings() -> Vec<&'static str> {
    Standing::ALL
        .iter()
        .map(|standing| standing.as_str())
        .collect()
}
