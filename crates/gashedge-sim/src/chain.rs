use gashedge_types::BlockNumber;

/// A block counter standing in for the chain's height source
#[derive(Debug, Clone)]
pub struct SimChain {
    height: BlockNumber,
}

impl SimChain {
    pub fn new() -> Self {
        SimChain { height: 1 }
    }

    pub fn at_height(height: BlockNumber) -> Self {
        SimChain { height }
    }

    pub fn height(&self) -> BlockNumber {
        self.height
    }

    /// Mine one block
    pub fn mine(&mut self) -> BlockNumber {
        self.height += 1;
        self.height
    }

    /// Mine until the given height is reached. Does nothing if the
    /// chain is already past it.
    pub fn mine_to(&mut self, target: BlockNumber) {
        if target > self.height {
            self.height = target;
        }
    }
}

impl Default for SimChain {
    fn default() -> Self {
        Self::new()
    }
}
