//! Chain-local scratch buffers reused across IK solves.

use crate::vec2::Vec2;

#[derive(Debug, Default)]
pub struct IkScratch {
    /// Pre-mutation segment lengths; `lengths[i]` spans `bones[i]..bones[i + 1]`.
    pub lengths: Vec<f32>,
    /// Solved joint positions, base to tip.
    pub joints: Vec<Vec2>,
    /// Bone indices of the chain being solved.
    pub indices: Vec<usize>,
}

impl IkScratch {
    pub fn with_capacity(chain_len: usize) -> Self {
        Self {
            lengths: Vec::with_capacity(chain_len),
            joints: Vec::with_capacity(chain_len),
            indices: Vec::with_capacity(chain_len),
        }
    }

    /// Clear transient vectors before solving the next chain.
    #[inline]
    pub fn begin_chain(&mut self) {
        self.lengths.clear();
        self.joints.clear();
        self.indices.clear();
    }
}
