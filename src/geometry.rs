//! Distance oracle (C1).
//!
//! Cell size, hashing, whatever the domain — the pattern this module
//! follows is the same one a spatial index in this codebase always
//! follows: precompute once, store flat, query with no further
//! allocation. Here the "index" is an N×N Euclidean distance matrix plus,
//! per station, a ranking of every other station by non-decreasing
//! distance — the nearest-neighbour list the cost kernel scans.

use crate::error::{Result, RspError};

/// One input station: an id in `[1, N]` and its planar coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Station {
    pub id: u32,
    pub x: f64,
    pub y: f64,
}

/// Immutable-after-build distance and ranking index.
///
/// `dist[i][j]` is the Euclidean distance between the station at row `i`
/// and the station at row `j`, using zero-based rows (station id `i+1`).
/// `rank[i]` is a permutation of `0..n` sorted by non-decreasing
/// `dist[i][·]`, ties broken by ascending index.
pub struct DistanceOracle {
    n: usize,
    dist: Vec<f64>,
    rank: Vec<Vec<u32>>,
}

impl DistanceOracle {
    /// Builds the matrix and per-row rankings from a station table.
    /// Stations must be ids `1..=n` in order; this is the one place a
    /// malformed dataset surfaces as an algorithmic precondition error
    /// rather than an input error, since by the time this is called the
    /// dataset reader has already validated id contiguity.
    pub fn build(stations: &[Station]) -> Result<Self> {
        let n = stations.len();
        if n < 3 {
            return Err(RspError::Precondition(format!(
                "distance oracle requires at least 3 stations, got {n}"
            )));
        }

        let mut dist = vec![0.0f64; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let dx = stations[i].x - stations[j].x;
                let dy = stations[i].y - stations[j].y;
                let d = (dx * dx + dy * dy).sqrt();
                dist[i * n + j] = d;
                dist[j * n + i] = d;
            }
        }

        let mut rank = Vec::with_capacity(n);
        for i in 0..n {
            let mut order: Vec<u32> = (0..n as u32).collect();
            order.sort_by(|&a, &b| {
                let da = dist[i * n + a as usize];
                let db = dist[i * n + b as usize];
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal).then(a.cmp(&b))
            });
            rank.push(order);
        }

        Ok(DistanceOracle { n, dist, rank })
    }

    pub fn n(&self) -> usize {
        self.n
    }

    /// Distance between two station ids (`1..=n`).
    #[inline]
    pub fn dist(&self, a: u32, b: u32) -> f64 {
        let (i, j) = (self.row(a), self.row(b));
        self.dist[i * self.n + j]
    }

    /// The nearest-neighbour ranking for station `id`, as zero-based row
    /// indices (`rank()[k] + 1` is the (k+1)-th nearest station id).
    #[inline]
    pub fn rank(&self, id: u32) -> &[u32] {
        &self.rank[self.row(id)]
    }

    #[inline]
    fn row(&self, id: u32) -> usize {
        debug_assert!(id >= 1 && (id as usize) <= self.n, "station id out of range: {id}");
        (id - 1) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Station> {
        vec![
            Station { id: 1, x: 0.0, y: 0.0 },
            Station { id: 2, x: 10.0, y: 0.0 },
            Station { id: 3, x: 10.0, y: 10.0 },
            Station { id: 4, x: 0.0, y: 10.0 },
        ]
    }

    #[test]
    fn symmetric_and_zero_diagonal() {
        let oracle = DistanceOracle::build(&square()).unwrap();
        for a in 1..=4u32 {
            assert_eq!(oracle.dist(a, a), 0.0);
            for b in 1..=4u32 {
                assert!((oracle.dist(a, b) - oracle.dist(b, a)).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn adjacent_edges_are_ten() {
        let oracle = DistanceOracle::build(&square()).unwrap();
        assert!((oracle.dist(1, 2) - 10.0).abs() < 1e-9);
        assert!((oracle.dist(2, 3) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn diagonal_is_ten_root_two() {
        let oracle = DistanceOracle::build(&square()).unwrap();
        let expected = 10.0 * std::f64::consts::SQRT_2;
        assert!((oracle.dist(1, 3) - expected).abs() < 1e-9);
    }

    #[test]
    fn ranking_sorted_by_nondecreasing_distance() {
        let oracle = DistanceOracle::build(&square()).unwrap();
        for id in 1..=4u32 {
            let row = oracle.rank(id);
            for w in row.windows(2) {
                let da = oracle.dist(id, w[0] + 1);
                let db = oracle.dist(id, w[1] + 1);
                assert!(da <= db + 1e-9);
            }
            // self is always nearest (distance zero)
            assert_eq!(row[0], id - 1);
        }
    }

    #[test]
    fn rejects_fewer_than_three_stations() {
        let stations = vec![
            Station { id: 1, x: 0.0, y: 0.0 },
            Station { id: 2, x: 1.0, y: 0.0 },
        ];
        assert!(DistanceOracle::build(&stations).is_err());
    }
}
