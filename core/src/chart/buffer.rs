use crate::prelude::{ChartPoint, ChartTarget};

/// Fixed-capacity series that evicts its oldest points first.
#[derive(Debug, Clone)]
pub struct SeriesBuffer {
    points: Vec<ChartPoint>,
    capacity: usize,
}

impl SeriesBuffer {
    /// Capacities below one are raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, x: f32, y: f32) {
        self.points.push(ChartPoint::new(x, y));
        self.trim();
    }

    /// Appends in order, then trims once.
    pub fn extend<I>(&mut self, points: I)
    where
        I: IntoIterator<Item = ChartPoint>,
    {
        self.points.extend(points);
        self.trim();
    }

    /// Empties the buffer; the capacity is kept.
    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        self.trim();
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points in insertion order, oldest first.
    pub fn points(&self) -> &[ChartPoint] {
        &self.points
    }

    pub fn last(&self) -> Option<ChartPoint> {
        self.points.last().copied()
    }

    fn trim(&mut self) {
        let overflow = self.points.len().saturating_sub(self.capacity);
        if overflow > 0 {
            self.points.drain(..overflow);
        }
    }
}

impl ChartTarget for SeriesBuffer {
    fn push(&mut self, x: f32, y: f32) {
        SeriesBuffer::push(self, x, y);
    }

    fn clear(&mut self) {
        SeriesBuffer::clear(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ys(buffer: &SeriesBuffer) -> Vec<f32> {
        buffer.points().iter().map(|p| p.y).collect()
    }

    #[test]
    fn oldest_points_are_evicted_first() {
        let mut buffer = SeriesBuffer::with_capacity(3);
        for v in [1.0, 2.0, 3.0, 4.0] {
            buffer.push(v, v);
        }
        assert_eq!(ys(&buffer), vec![2.0, 3.0, 4.0]);

        buffer.clear();
        assert!(buffer.points().is_empty());
        assert_eq!(buffer.capacity(), 3);
    }

    #[test]
    fn shrinking_capacity_trims_all_overflow_at_once() {
        let mut buffer = SeriesBuffer::with_capacity(10);
        for v in 0..10 {
            buffer.push(v as f32, v as f32);
        }
        buffer.set_capacity(4);
        assert_eq!(ys(&buffer), vec![6.0, 7.0, 8.0, 9.0]);
    }

    #[test]
    fn bulk_extend_keeps_newest_in_order() {
        let mut buffer = SeriesBuffer::with_capacity(3);
        buffer.push(0.0, 0.0);
        buffer.extend((1..=5).map(|v| ChartPoint::new(v as f32, v as f32)));
        assert_eq!(ys(&buffer), vec![3.0, 4.0, 5.0]);
        assert_eq!(buffer.last(), Some(ChartPoint::new(5.0, 5.0)));
    }

    #[test]
    fn duplicates_are_kept() {
        let mut buffer = SeriesBuffer::with_capacity(4);
        buffer.push(1.0, 7.0);
        buffer.push(1.0, 7.0);
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        let mut buffer = SeriesBuffer::with_capacity(0);
        buffer.push(1.0, 1.0);
        buffer.push(2.0, 2.0);
        assert_eq!(buffer.capacity(), 1);
        assert_eq!(ys(&buffer), vec![2.0]);
    }

    #[test]
    fn usable_through_the_chart_target_trait() {
        let mut target: Box<dyn ChartTarget> = Box::new(SeriesBuffer::with_capacity(2));
        target.push(0.0, 1.0);
        target.clear();
    }
}
