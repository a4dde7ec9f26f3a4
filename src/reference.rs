//! Static reference tables for Jordan's governorates.
//!
//! Everything here is immutable for the lifetime of the process. Tables are
//! indexed by [`Governorate::index`] and [`Sector::index`], so every
//! (governorate, sector) combination has exactly one entry.

use std::{collections::HashSet, fmt, str::FromStr};

use serde::{Serialize, Serializer};

use crate::error::{DashboardError, DashboardResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Governorate {
    Amman,
    Irbid,
    Zarqa,
    Balqa,
    Mafraq,
    Karak,
    Tafilah,
    Maan,
    Aqaba,
    Ajloun,
    Jerash,
    Madaba,
}

pub const GOVERNORATE_COUNT: usize = 12;

impl Governorate {
    pub const ALL: [Governorate; GOVERNORATE_COUNT] = [
        Governorate::Amman,
        Governorate::Irbid,
        Governorate::Zarqa,
        Governorate::Balqa,
        Governorate::Mafraq,
        Governorate::Karak,
        Governorate::Tafilah,
        Governorate::Maan,
        Governorate::Aqaba,
        Governorate::Ajloun,
        Governorate::Jerash,
        Governorate::Madaba,
    ];

    /// Selection used whenever the URL carries no usable value.
    pub const DEFAULT: Governorate = Governorate::Amman;

    pub fn name(self) -> &'static str {
        match self {
            Governorate::Amman => "Amman",
            Governorate::Irbid => "Irbid",
            Governorate::Zarqa => "Zarqa",
            Governorate::Balqa => "Balqa",
            Governorate::Mafraq => "Mafraq",
            Governorate::Karak => "Karak",
            Governorate::Tafilah => "Tafilah",
            Governorate::Maan => "Ma’an",
            Governorate::Aqaba => "Aqaba",
            Governorate::Ajloun => "Ajloun",
            Governorate::Jerash => "Jerash",
            Governorate::Madaba => "Madaba",
        }
    }

    /// Position in the enumeration order shared by every table and chart axis.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn profile(self) -> &'static GovernorateProfile {
        &PROFILES[self.index()]
    }
}

impl fmt::Display for Governorate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Governorate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl FromStr for Governorate {
    type Err = DashboardError;

    /// Exact, case-sensitive match against the display names.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Governorate::ALL
            .into_iter()
            .find(|gov| gov.name() == value)
            .ok_or_else(|| DashboardError::InvalidSelection(value.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Sector {
    Agriculture,
    Municipal,
    Industrial,
    Other,
}

pub const SECTOR_COUNT: usize = 4;

impl Sector {
    pub const ALL: [Sector; SECTOR_COUNT] = [
        Sector::Agriculture,
        Sector::Municipal,
        Sector::Industrial,
        Sector::Other,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Sector::Agriculture => "Agriculture",
            Sector::Municipal => "Municipal",
            Sector::Industrial => "Industrial",
            Sector::Other => "Other",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GovernorateProfile {
    pub population: u64,
    pub elevation_m: i32,
    pub centroid: LatLon,
}

static PROFILES: [GovernorateProfile; GOVERNORATE_COUNT] = [
    profile(4_200_000, 900, 31.95, 35.91),
    profile(1_900_000, 620, 32.55, 35.85),
    profile(1_500_000, 605, 32.07, 36.09),
    profile(500_000, 790, 32.03, 35.72),
    profile(600_000, 700, 32.34, 36.21),
    profile(320_000, 930, 31.18, 35.70),
    profile(200_000, 940, 30.83, 35.60),
    profile(150_000, 1000, 30.20, 35.73),
    profile(180_000, 60, 29.53, 35.01),
    profile(180_000, 1100, 32.33, 35.75),
    profile(250_000, 650, 32.28, 35.89),
    profile(270_000, 740, 31.72, 35.80),
];

const fn profile(population: u64, elevation_m: i32, lat: f64, lon: f64) -> GovernorateProfile {
    GovernorateProfile {
        population,
        elevation_m,
        centroid: LatLon::new(lat, lon),
    }
}

/// Well counts, one row per sector, columns in governorate order.
static SECTOR_COUNTS: [[u32; GOVERNORATE_COUNT]; SECTOR_COUNT] = [
    [120, 95, 100, 80, 110, 90, 40, 70, 50, 30, 35, 60],
    [60, 40, 55, 35, 50, 45, 20, 25, 20, 10, 15, 30],
    [20, 15, 25, 10, 30, 10, 5, 10, 5, 3, 4, 8],
    [10, 5, 8, 6, 7, 5, 3, 4, 2, 2, 1, 3],
];

pub fn sector_count(governorate: Governorate, sector: Sector) -> u32 {
    SECTOR_COUNTS[sector.index()][governorate.index()]
}

/// Counts for one sector across all governorates, in enumeration order.
pub fn sector_row(sector: Sector) -> &'static [u32; GOVERNORATE_COUNT] {
    &SECTOR_COUNTS[sector.index()]
}

pub fn total_wells(governorate: Governorate) -> u32 {
    Sector::ALL
        .iter()
        .map(|sector| sector_count(governorate, *sector))
        .sum()
}

// Bounding box of the Hashemite Kingdom, padded slightly.
const LAT_RANGE: (f64, f64) = (29.0, 33.5);
const LON_RANGE: (f64, f64) = (34.8, 39.5);

/// Sanity checks run once before the dashboard starts serving.
pub fn validate() -> DashboardResult<()> {
    let mut names = HashSet::new();
    for gov in Governorate::ALL {
        if !names.insert(gov.name()) {
            return Err(DashboardError::Initialization(format!(
                "governorate '{gov}' listed more than once"
            )));
        }
        if gov.name().parse::<Governorate>().ok() != Some(gov) {
            return Err(DashboardError::Initialization(format!(
                "governorate '{gov}' does not round-trip through its name"
            )));
        }

        let profile = gov.profile();
        if profile.population == 0 {
            return Err(DashboardError::Initialization(format!(
                "governorate '{gov}' has no population"
            )));
        }
        let LatLon { lat, lon } = profile.centroid;
        if !(LAT_RANGE.0..=LAT_RANGE.1).contains(&lat) || !(LON_RANGE.0..=LON_RANGE.1).contains(&lon)
        {
            return Err(DashboardError::Initialization(format!(
                "centroid ({lat}, {lon}) of '{gov}' lies outside Jordan"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_tables_validate() {
        validate().expect("built-in tables are consistent");
    }

    #[test]
    fn governorate_names_match_exactly() {
        assert_eq!("Irbid".parse::<Governorate>().unwrap(), Governorate::Irbid);
        assert_eq!("Ma’an".parse::<Governorate>().unwrap(), Governorate::Maan);
        assert!("irbid".parse::<Governorate>().is_err());
        assert!("Ma'an".parse::<Governorate>().is_err());
        assert!("".parse::<Governorate>().is_err());
        assert!(" Amman".parse::<Governorate>().is_err());
    }

    #[test]
    fn enumeration_order_matches_indices() {
        for (position, gov) in Governorate::ALL.iter().enumerate() {
            assert_eq!(gov.index(), position);
        }
        for (position, sector) in Sector::ALL.iter().enumerate() {
            assert_eq!(sector.index(), position);
        }
    }

    #[test]
    fn lookups_use_the_right_column() {
        assert_eq!(sector_count(Governorate::Amman, Sector::Agriculture), 120);
        assert_eq!(sector_count(Governorate::Madaba, Sector::Other), 3);
        assert_eq!(sector_count(Governorate::Maan, Sector::Municipal), 25);
        assert_eq!(total_wells(Governorate::Irbid), 95 + 40 + 15 + 5);
        assert_eq!(Governorate::Irbid.profile().population, 1_900_000);
        assert_eq!(Governorate::Aqaba.profile().elevation_m, 60);
    }

    #[test]
    fn governorate_serializes_as_display_name() {
        let json = serde_json::to_string(&Governorate::Maan).unwrap();
        assert_eq!(json, "\"Ma’an\"");
    }
}
