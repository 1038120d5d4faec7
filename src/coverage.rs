use std::{collections::BTreeMap, sync::Arc};

use geo::{Distance, Euclidean, Point};

use crate::{
    error::CoverageError,
    table::{operator_name, TowerTable},
};

/// Box prefilter seed, in degrees. One degree around the query point is
/// enough for all four operators almost everywhere in France.
const INITIAL_RADIUS: f64 = 1.0;

/// Growth cap. A 16-degree box centered anywhere inside the supported
/// region spans the whole country, so reaching the cap means some
/// operator has no towers at all and the search must stop.
const MAX_RADIUS: f64 = 16.0;

/// Operator display name -> network label -> "true"/"false".
///
/// Flags are serialized as strings, not booleans. That is the wire
/// contract inherited from the original API consumers.
pub type CoverageReport = BTreeMap<String, BTreeMap<String, String>>;

/// Nearest-tower search over the shared tower table.
#[derive(Debug)]
pub struct Resolver {
    table: Arc<TowerTable>,
    networks: Vec<String>,
    /// Column index in the table for each requested network.
    network_cols: Vec<usize>,
}

impl Resolver {
    /// Fails with `UnknownNetwork` if a requested label is not a column
    /// of the table. Checked once here, never per request.
    pub fn new(table: Arc<TowerTable>, networks: Vec<String>) -> Result<Self, CoverageError> {
        let mut network_cols = Vec::with_capacity(networks.len());
        for label in &networks {
            let col = table
                .networks()
                .iter()
                .position(|n| n == label)
                .ok_or_else(|| CoverageError::UnknownNetwork(label.clone()))?;
            network_cols.push(col);
        }
        Ok(Resolver {
            table,
            networks,
            network_cols,
        })
    }

    /// Shrinks the table to the towers inside an axis-aligned box around
    /// `point`, doubling the box radius until every operator in the full
    /// table is represented or the radius cap is hit. Returns indices
    /// into the table.
    ///
    /// The reduction is a performance filter only: the box always
    /// contains the query point, grows monotonically, and only stops
    /// once no operator is missing, so the nearest tower per represented
    /// operator is the same as a full-table scan would find.
    pub fn reduce(&self, point: Point, initial_radius: f64) -> Vec<usize> {
        let wanted = self.table.operators().len();
        let mut radius = initial_radius;
        loop {
            let subset: Vec<usize> = self
                .table
                .towers()
                .iter()
                .enumerate()
                .filter(|(_, t)| {
                    let lat = t.position.y();
                    let lon = t.position.x();
                    lat > point.y() - radius
                        && lat < point.y() + radius
                        && lon > point.x() - radius
                        && lon < point.x() + radius
                })
                .map(|(i, _)| i)
                .collect();

            let found = subset
                .iter()
                .map(|&i| self.table.towers()[i].operator)
                .collect::<std::collections::BTreeSet<_>>()
                .len();
            if found >= wanted || radius >= MAX_RADIUS {
                return subset;
            }
            radius *= 2.0;
        }
    }

    /// Per-operator minimum-distance scan, Euclidean in degree-space.
    /// First-encountered minimum wins on an exact tie, which keeps the
    /// result deterministic for a fixed table order.
    pub fn select_nearest(&self, subset: &[usize], point: Point) -> BTreeMap<u32, usize> {
        let mut nearest: BTreeMap<u32, (f64, usize)> = BTreeMap::new();
        for &i in subset {
            let tower = &self.table.towers()[i];
            let dist = Euclidean::distance(point, tower.position);
            // strict comparison: an established winner is only displaced
            // by a strictly smaller distance, so ties keep the first
            // tower seen and a NaN distance can never take over
            let better = match nearest.get(&tower.operator) {
                Some(&(best, _)) => dist < best,
                None => true,
            };
            if better {
                nearest.insert(tower.operator, (dist, i));
            }
        }
        nearest.into_iter().map(|(op, (_, i))| (op, i)).collect()
    }

    /// Full resolution for a validated in-region point.
    pub fn resolve(&self, point: Point) -> Result<CoverageReport, CoverageError> {
        let subset = self.reduce(point, INITIAL_RADIUS);
        let winners = self.select_nearest(&subset, point);

        let mut report = CoverageReport::new();
        for (operator, index) in winners {
            let name = operator_name(operator).ok_or(CoverageError::UnknownOperator(operator))?;
            let tower = &self.table.towers()[index];
            let mut flags = BTreeMap::new();
            for (label, &col) in self.networks.iter().zip(&self.network_cols) {
                let value = if tower.coverage[col] { "true" } else { "false" };
                flags.insert(label.clone(), value.to_string());
            }
            report.insert(name.to_string(), flags);
        }
        Ok(report)
    }
}
