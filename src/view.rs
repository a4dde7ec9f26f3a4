//! Shapes reference data and session points into the payloads the browser
//! widgets consume. Nothing here is cached; every evaluation recomputes.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
    points::WellPoint,
    reference::{self, Governorate, LatLon, Sector, GOVERNORATE_COUNT},
};

pub const MAP_CENTER: LatLon = LatLon::new(31.9, 35.9);
pub const MAP_ZOOM: u8 = 7;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    pub sector: Sector,
    pub values: [u32; GOVERNORATE_COUNT],
}

/// One series per sector, values in governorate enumeration order.
pub fn bar_series() -> Vec<BarSeries> {
    Sector::ALL
        .into_iter()
        .map(|sector| BarSeries {
            sector,
            values: *reference::sector_row(sector),
        })
        .collect()
}

pub fn sector_breakdown(selection: Governorate) -> BTreeMap<Sector, u32> {
    Sector::ALL
        .into_iter()
        .map(|sector| (sector, reference::sector_count(selection, sector)))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub lat: f64,
    pub lon: f64,
    pub governorate: Governorate,
    pub label: String,
}

pub fn markers(points: &[WellPoint]) -> Vec<Marker> {
    points
        .iter()
        .map(|point| Marker {
            lat: point.lat,
            lon: point.lon,
            governorate: point.governorate,
            label: format!("{} Well", point.governorate),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sidebar {
    pub governorate: Governorate,
    pub population: u64,
    pub elevation_m: i32,
    pub population_label: String,
    pub elevation_label: String,
}

pub fn sidebar(selection: Governorate) -> Sidebar {
    let profile = selection.profile();
    Sidebar {
        governorate: selection,
        population: profile.population,
        elevation_m: profile.elevation_m,
        population_label: format_thousands(profile.population),
        elevation_label: format!("{} m", profile.elevation_m),
    }
}

/// `1900000` -> `"1,900,000"`.
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub name: &'static str,
    pub data: Vec<u32>,
}

/// Stacked column chart input. Clicking a column writes its category into
/// the `gov` query parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChartSpec {
    pub title: &'static str,
    pub categories: Vec<&'static str>,
    pub series: Vec<ChartSeries>,
}

impl BarChartSpec {
    pub fn from_series(series: &[BarSeries]) -> Self {
        Self {
            title: "Wells in Jordan by Governorate",
            categories: Governorate::ALL.iter().map(|gov| gov.name()).collect(),
            series: series
                .iter()
                .map(|entry| ChartSeries {
                    name: entry.sector.name(),
                    data: entry.values.to_vec(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieChartSpec {
    pub title: String,
    pub labels: Vec<&'static str>,
    pub values: Vec<u32>,
}

impl PieChartSpec {
    pub fn from_breakdown(selection: Governorate, breakdown: &BTreeMap<Sector, u32>) -> Self {
        Self {
            title: format!("Wells by Sector in {selection}"),
            labels: breakdown.keys().map(|sector| sector.name()).collect(),
            values: breakdown.values().copied().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapSpec {
    pub center: LatLon,
    pub zoom: u8,
    pub cluster: bool,
    pub markers: Vec<Marker>,
}

impl MapSpec {
    pub fn from_markers(markers: Vec<Marker>) -> Self {
        Self {
            center: MAP_CENTER,
            zoom: MAP_ZOOM,
            cluster: true,
            markers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_separators() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1_000), "1,000");
        assert_eq!(format_thousands(150_000), "150,000");
        assert_eq!(format_thousands(1_900_000), "1,900,000");
        assert_eq!(format_thousands(4_200_000), "4,200,000");
    }

    #[test]
    fn bar_chart_mirrors_series() {
        let chart = BarChartSpec::from_series(&bar_series());
        assert_eq!(chart.categories.len(), 12);
        assert_eq!(chart.categories[7], "Ma’an");
        let names: Vec<_> = chart.series.iter().map(|s| s.name).collect();
        assert_eq!(names, ["Agriculture", "Municipal", "Industrial", "Other"]);
        assert_eq!(chart.series[0].data[0], 120);
    }

    #[test]
    fn pie_follows_sector_order() {
        let breakdown = sector_breakdown(Governorate::Zarqa);
        let pie = PieChartSpec::from_breakdown(Governorate::Zarqa, &breakdown);
        assert_eq!(pie.title, "Wells by Sector in Zarqa");
        assert_eq!(pie.labels, ["Agriculture", "Municipal", "Industrial", "Other"]);
        assert_eq!(pie.values, [100, 55, 25, 8]);
    }

    #[test]
    fn markers_are_labelled_by_owner() {
        let points = [WellPoint {
            governorate: Governorate::Jerash,
            lat: 32.29,
            lon: 35.88,
        }];
        let marks = markers(&points);
        assert_eq!(marks[0].label, "Jerash Well");
        assert_eq!(marks[0].governorate, Governorate::Jerash);
    }
}
