//! Rolling angle history for the diagnostic trail
//!
//! Keeps the last N aggregated angles in chronological order so the host can
//! draw a live angle chart next to the counter.

pub struct AngleHistory {
    /// Circular buffer data
    data: Vec<f32>,
    capacity: usize,
    /// Next slot to write
    write_index: usize,
    /// Whether buffer has wrapped at least once
    filled: bool,
}

impl AngleHistory {
    /// `capacity` of 0 is bumped to 1
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            data: vec![0.0; capacity],
            capacity,
            write_index: 0,
            filled: false,
        }
    }

    pub fn push(&mut self, angle: f32) {
        self.data[self.write_index] = angle;
        self.write_index = (self.write_index + 1) % self.capacity;

        if self.write_index == 0 {
            self.filled = true;
        }
    }

    pub fn len(&self) -> usize {
        if self.filled {
            self.capacity
        } else {
            self.write_index
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Oldest to newest
    pub fn to_vec(&self) -> Vec<f32> {
        if !self.filled {
            return self.data[..self.write_index].to_vec();
        }
        let mut result = Vec::with_capacity(self.capacity);
        result.extend_from_slice(&self.data[self.write_index..]);
        result.extend_from_slice(&self.data[..self.write_index]);
        result
    }

    pub fn clear(&mut self) {
        self.data.iter_mut().for_each(|v| *v = 0.0);
        self.write_index = 0;
        self.filled = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_fill_in_order() {
        let mut h = AngleHistory::new(4);
        h.push(170.0);
        h.push(150.0);
        assert_eq!(h.to_vec(), vec![170.0, 150.0]);
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn test_wraps_keeping_newest() {
        let mut h = AngleHistory::new(3);
        for a in [1.0, 2.0, 3.0, 4.0, 5.0] {
            h.push(a);
        }
        assert_eq!(h.to_vec(), vec![3.0, 4.0, 5.0]);
        assert_eq!(h.len(), 3);
    }

    #[test]
    fn test_clear() {
        let mut h = AngleHistory::new(2);
        h.push(1.0);
        h.push(2.0);
        h.clear();
        assert!(h.is_empty());
        assert!(h.to_vec().is_empty());
    }
}
