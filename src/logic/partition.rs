//! Interesting-station partition
//!
//! Splits the station list into the stations flagged by user reports and
//! the rest. Every station lands in exactly one of the two sets.

use std::collections::HashMap;

use crate::api::{InterestingStation, Station};

#[derive(Debug, Default)]
pub struct Partition<'a> {
    /// Flagged stations with their report count
    pub interesting: Vec<(&'a Station, u32)>,
    /// Everything else (eligible for clustering)
    pub standard: Vec<&'a Station>,
}

/// Partition `stations` by membership in `interesting`.
///
/// Report entries for unknown stations are ignored. Duplicate report entries
/// keep the highest count.
pub fn partition_stations<'a>(
    stations: &'a [Station],
    interesting: &[InterestingStation],
) -> Partition<'a> {
    let mut counts: HashMap<&str, u32> = HashMap::new();
    for entry in interesting {
        let count = counts.entry(entry.station_id.as_str()).or_insert(0);
        *count = (*count).max(entry.count);
    }

    let mut partition = Partition::default();
    for station in stations {
        match counts.get(station.id.as_str()) {
            Some(&count) => partition.interesting.push((station, count)),
            None => partition.standard.push(station),
        }
    }
    partition
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(id: &str) -> Station {
        Station {
            id: id.to_string(),
            name: id.to_string(),
            longitude: 25.0,
            latitude: 64.0,
            updated_time: None,
        }
    }

    fn flagged(id: &str, count: u32) -> InterestingStation {
        InterestingStation {
            station_id: id.to_string(),
            count,
        }
    }

    #[test]
    fn test_no_reports_everything_standard() {
        let stations = vec![station("A"), station("B")];
        let p = partition_stations(&stations, &[]);
        assert!(p.interesting.is_empty());
        assert_eq!(p.standard.len(), 2);
    }

    #[test]
    fn test_flagged_station_only_in_interesting() {
        let stations = vec![station("A"), station("B"), station("C")];
        let p = partition_stations(&stations, &[flagged("B", 4)]);
        assert_eq!(p.interesting.len(), 1);
        assert_eq!(p.interesting[0].0.id, "B");
        assert_eq!(p.interesting[0].1, 4);
        assert!(p.standard.iter().all(|s| s.id != "B"));
        assert_eq!(p.standard.len(), 2);
    }

    #[test]
    fn test_duplicate_reports_do_not_duplicate_station() {
        let stations = vec![station("A")];
        let p = partition_stations(&stations, &[flagged("A", 1), flagged("A", 3)]);
        assert_eq!(p.interesting.len(), 1);
        assert_eq!(p.interesting[0].1, 3);
    }

    #[test]
    fn test_unknown_report_ignored() {
        let stations = vec![station("A")];
        let p = partition_stations(&stations, &[flagged("ZZ", 9)]);
        assert!(p.interesting.is_empty());
        assert_eq!(p.standard.len(), 1);
    }
}
