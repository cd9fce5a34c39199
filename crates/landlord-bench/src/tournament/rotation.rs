/// Cyclic seatings of the agent list: rotation `r` puts agent `(i + r) % n`
/// in the `i`-th seat of turn order, so across all rotations every agent
/// sits every seat once.
pub struct SeatRotations {
    rotations: Vec<Vec<usize>>,
}

impl SeatRotations {
    pub fn new(seats: usize, count: usize) -> Self {
        let limit = count.min(seats);
        let rotations = (0..limit)
            .map(|shift| (0..seats).map(|seat| (seat + shift) % seats).collect())
            .collect();
        Self { rotations }
    }

    pub fn as_slice(&self) -> &[Vec<usize>] {
        &self.rotations
    }

    pub fn len(&self) -> usize {
        self.rotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rotations.is_empty()
    }
}
