//! Jittered well locations for the cluster map.
//!
//! Points are generated once per session and then shared, so the map keeps
//! the same markers across every re-render triggered by a chart click.

use std::sync::Arc;

use rand::Rng;
use serde::Serialize;

use crate::reference::Governorate;

pub const DEFAULT_POINTS_PER_GOVERNORATE: usize = 20;
pub const DEFAULT_JITTER_DEGREES: f64 = 0.03;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WellPoint {
    pub governorate: Governorate,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JitterSettings {
    pub points_per_governorate: usize,
    /// Maximum offset from the centroid on each axis, in degrees.
    pub jitter_degrees: f64,
}

impl Default for JitterSettings {
    fn default() -> Self {
        Self {
            points_per_governorate: DEFAULT_POINTS_PER_GOVERNORATE,
            jitter_degrees: DEFAULT_JITTER_DEGREES,
        }
    }
}

/// Governorates in enumeration order; within each point the latitude offset
/// is drawn before the longitude offset.
pub fn generate_well_points<R: Rng>(
    rng: &mut R,
    settings: JitterSettings,
) -> Vec<WellPoint> {
    let jitter = settings.jitter_degrees;
    let mut points = Vec::with_capacity(Governorate::ALL.len() * settings.points_per_governorate);
    for governorate in Governorate::ALL {
        let centroid = governorate.profile().centroid;
        for _ in 0..settings.points_per_governorate {
            let lat = centroid.lat + rng.gen_range(-jitter..=jitter);
            let lon = centroid.lon + rng.gen_range(-jitter..=jitter);
            points.push(WellPoint {
                governorate,
                lat,
                lon,
            });
        }
    }
    points
}

/// Write-once cache owning the random source it will generate from.
pub struct WellPointCache<R> {
    rng: R,
    settings: JitterSettings,
    points: Option<Arc<[WellPoint]>>,
}

impl<R: Rng> WellPointCache<R> {
    pub fn new(rng: R, settings: JitterSettings) -> Self {
        Self {
            rng,
            settings,
            points: None,
        }
    }

    /// Generates on first call; afterwards returns the same shared slice.
    pub fn get_well_points(&mut self) -> Arc<[WellPoint]> {
        if let Some(points) = &self.points {
            return Arc::clone(points);
        }
        let points: Arc<[WellPoint]> = generate_well_points(&mut self.rng, self.settings).into();
        self.points = Some(Arc::clone(&points));
        points
    }

    pub fn is_generated(&self) -> bool {
        self.points.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn offsets_come_from_the_injected_rng() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let points = generate_well_points(&mut rng, JitterSettings::default());

        let mut expected = ChaCha8Rng::seed_from_u64(7);
        let amman = Governorate::Amman.profile().centroid;
        let lat = amman.lat + expected.gen_range(-0.03..=0.03);
        let lon = amman.lon + expected.gen_range(-0.03..=0.03);

        assert_eq!(points[0].governorate, Governorate::Amman);
        assert_eq!(points[0].lat, lat);
        assert_eq!(points[0].lon, lon);
    }

    #[test]
    fn zero_jitter_lands_on_centroids() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let settings = JitterSettings {
            points_per_governorate: 2,
            jitter_degrees: 0.0,
        };
        let points = generate_well_points(&mut rng, settings);
        assert_eq!(points.len(), 24);
        for point in points {
            let centroid = point.governorate.profile().centroid;
            assert_eq!((point.lat, point.lon), (centroid.lat, centroid.lon));
        }
    }

    #[test]
    fn cache_generates_lazily_and_once() {
        let mut cache = WellPointCache::new(ChaCha8Rng::seed_from_u64(3), JitterSettings::default());
        assert!(!cache.is_generated());

        let first = cache.get_well_points();
        let second = cache.get_well_points();

        assert!(cache.is_generated());
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.len(), 240);
    }
}
