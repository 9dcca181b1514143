//! Mission segment state as seen by the energy network.

use crate::imports::*;
use crate::energy::conditions::SegmentConditions;

/// State carried by one mission segment
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default, ApproxEq)]
pub struct SegmentState {
    /// number of control points in the segment
    n_cpt: usize,
    #[serde(default)]
    pub conditions: SegmentConditions,
    /// solver unknowns keyed by name, one value per control point
    #[serde(default)]
    pub unknowns: BTreeMap<String, Array1<f64>>,
}

impl SegmentState {
    pub fn new(n_cpt: usize) -> Self {
        Self {
            n_cpt,
            ..Default::default()
        }
    }

    pub fn n_cpt(&self) -> usize {
        self.n_cpt
    }

    /// `n_cpt × n` matrix of ones, the shape template for per-segment series
    pub fn ones_row(&self, n: usize) -> Array2<f64> {
        Array2::ones((self.n_cpt, n))
    }

    /// zero-filled series with one value per control point
    pub fn zeros(&self) -> Array1<f64> {
        self.ones_row(1).index_axis_move(Axis(1), 0) * 0.0
    }

    /// Checks that every unknown has one value per control point
    pub fn check_unknowns(&self) -> anyhow::Result<()> {
        for (name, values) in &self.unknowns {
            ensure!(
                values.len() == self.n_cpt,
                AerosimError::configuration(format!(
                    "unknown `{name}` has {} values but the segment has {} control points",
                    values.len(),
                    self.n_cpt
                ))
            );
        }
        Ok(())
    }
}

/// One mission segment
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default, ApproxEq, SerdeAPI)]
pub struct Segment {
    pub tag: String,
    /// position of the segment in the mission; segment 0 has no predecessor
    pub index: usize,
    pub state: SegmentState,
}

impl Segment {
    pub fn new<S: Into<String>>(tag: S, index: usize, n_cpt: usize) -> Self {
        Self {
            tag: tag.into(),
            index,
            state: SegmentState::new(n_cpt),
        }
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }
}
