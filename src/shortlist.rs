//! Geometric pre-filter that bounds how many routing calls a dispatch makes.

use rayon::prelude::*;

use crate::haversine::haversine_km;
use crate::model::{Candidate, Coordinate, Technician};

/// Default number of technicians sent to authoritative routing.
pub const DEFAULT_SHORTLIST_SIZE: usize = 5;

/// Rank technicians by great-circle distance to `target` and keep the
/// closest `size`.
///
/// Inactive technicians are skipped. The returned candidates are ordered
/// ascending by estimate and carry their position as `rank`.
///
/// Ranking runs on the rayon pool and blocks the calling task until it
/// finishes.
pub fn shortlist(target: Coordinate, technicians: &[Technician], size: usize) -> Vec<Candidate> {
    let mut ranked: Vec<(f64, &Technician)> = technicians
        .par_iter()
        .filter(|technician| technician.active)
        .map(|technician| (haversine_km(target, technician.location), technician))
        .collect();

    ranked.par_sort_unstable_by(|a, b| a.0.total_cmp(&b.0));

    ranked
        .into_iter()
        .take(size)
        .enumerate()
        .map(|(rank, (estimate_km, technician))| Candidate {
            technician_id: technician.id,
            location: technician.location,
            estimate_km,
            rank,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TechnicianId;

    fn tech(id: i32, lat: f64, lng: f64) -> Technician {
        Technician {
            id: TechnicianId(id),
            location: Coordinate::new(lat, lng),
            active: true,
        }
    }

    #[test]
    fn test_empty_fleet() {
        assert!(shortlist(Coordinate::new(0.0, 0.0), &[], DEFAULT_SHORTLIST_SIZE).is_empty());
    }

    #[test]
    fn test_returns_min_of_fleet_and_size() {
        let origin = Coordinate::new(0.0, 0.0);
        for n in 0..9 {
            let fleet: Vec<_> = (0..n).map(|i| tech(i, 0.0, i as f64 * 0.1)).collect();
            let list = shortlist(origin, &fleet, DEFAULT_SHORTLIST_SIZE);
            assert_eq!(list.len(), (n as usize).min(DEFAULT_SHORTLIST_SIZE));
        }
    }

    #[test]
    fn test_sorted_ascending_with_ranks() {
        let origin = Coordinate::new(36.17, -115.14);
        let fleet = vec![
            tech(1, 36.90, -115.90),
            tech(2, 36.18, -115.15),
            tech(3, 36.50, -115.40),
            tech(4, 36.17, -115.14),
            tech(5, 37.50, -116.00),
            tech(6, 36.30, -115.20),
            tech(7, 40.00, -120.00),
        ];

        let list = shortlist(origin, &fleet, 5);
        let ids: Vec<i32> = list.iter().map(|c| c.technician_id.0).collect();
        assert_eq!(ids, vec![4, 2, 6, 3, 1]);

        for window in list.windows(2) {
            assert!(window[0].estimate_km <= window[1].estimate_km);
        }
        for (position, candidate) in list.iter().enumerate() {
            assert_eq!(candidate.rank, position);
        }
    }

    #[test]
    fn test_inactive_technicians_are_skipped() {
        let origin = Coordinate::new(0.0, 0.0);
        let mut closest = tech(1, 0.0, 0.01);
        closest.active = false;
        let fleet = vec![closest, tech(2, 0.0, 0.5)];

        let list = shortlist(origin, &fleet, 5);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].technician_id, TechnicianId(2));
    }
}
