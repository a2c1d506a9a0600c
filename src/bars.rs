// src/bars.rs

use crate::event::Cue;
use crate::stage::{BarTransform, Stage};

pub type BarId = u32;

/// One visual element per array slot.
///
/// Bars do NOT own sample data.
/// The sort task owns the array; a bar only remembers the value it was
/// spawned with so it can be drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub id: BarId,
    pub value: i32,
    pub x: f32,
    pub height: f32,
    pub highlighted: bool,
}

/// Ordered bar handles.
///
/// Responsibilities:
/// - keep bar order equal to array order (slot `i` holds the bar drawn
///   for array index `i`)
/// - forward every visual change to the stage
/// - track positions while a swap is in flight
///
/// Does NOT:
/// - compare or reorder values on its own
/// - decide when a swap is complete
#[derive(Debug, Default)]
pub struct BarSet {
    bars: Vec<Bar>,
    next_id: BarId,
}

impl BarSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn one bar per value, left to right.
    pub fn spawn(&mut self, values: &[i32], height_scale: f32, stage: &mut dyn Stage) {
        self.bars.reserve(values.len());

        for (slot, &value) in values.iter().enumerate() {
            let id = self.next_id;
            self.next_id = self.next_id.wrapping_add(1);

            let height = value as f32 * height_scale;
            let transform = BarTransform {
                x: slot as f32,
                y: height / 2.0,
                height,
            };

            stage.spawn_bar(id, value, transform);
            self.bars.push(Bar {
                id,
                value,
                x: transform.x,
                height,
                highlighted: false,
            });
        }
    }

    /// Destroy at most `limit` bars, starting from the leftmost.
    ///
    /// Returns the number of bars destroyed.
    pub fn clear_bounded(&mut self, limit: usize, stage: &mut dyn Stage) -> usize {
        let count = limit.min(self.bars.len());
        for bar in self.bars.drain(..count) {
            stage.destroy_bar(bar.id);
        }
        count
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn get(&self, slot: usize) -> Option<&Bar> {
        self.bars.get(slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bar> + '_ {
        self.bars.iter()
    }

    /// Bar values in slot order.
    pub fn values(&self) -> Vec<i32> {
        self.bars.iter().map(|b| b.value).collect()
    }

    /// Resolve a sort cue against the current slot order.
    pub fn apply_cue(&mut self, cue: Cue, stage: &mut dyn Stage) {
        match cue {
            Cue::Highlight { slot } => self.set_highlight(slot, true, stage),
            Cue::Unhighlight { slot } => self.set_highlight(slot, false, stage),
        }
    }

    pub fn set_highlight(&mut self, slot: usize, on: bool, stage: &mut dyn Stage) {
        if let Some(bar) = self.bars.get_mut(slot) {
            bar.highlighted = on;
            stage.set_highlight(bar.id, on);
        }
    }

    /// Return every highlighted bar to its default visual state.
    pub fn clear_highlights(&mut self, stage: &mut dyn Stage) {
        for bar in self.bars.iter_mut().filter(|b| b.highlighted) {
            bar.highlighted = false;
            stage.set_highlight(bar.id, false);
        }
    }

    /// Move the bar in `slot` by `dx`, returning its new position.
    pub fn translate(&mut self, slot: usize, dx: f32, stage: &mut dyn Stage) -> Option<f32> {
        let bar = self.bars.get_mut(slot)?;
        bar.x += dx;
        stage.move_bar(bar.id, bar.x);
        Some(bar.x)
    }

    /// Put the bar in `slot` at exactly `x`.
    pub fn place(&mut self, slot: usize, x: f32, stage: &mut dyn Stage) {
        if let Some(bar) = self.bars.get_mut(slot) {
            bar.x = x;
            stage.move_bar(bar.id, x);
        }
    }

    /// Exchange the handles held by two slots.
    #[inline]
    pub fn swap_slots(&mut self, a: usize, b: usize) {
        if a < self.bars.len() && b < self.bars.len() {
            self.bars.swap(a, b);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::RecordingStage;

    #[test]
    fn test_spawn_positions_and_heights() {
        let mut stage = RecordingStage::new();
        let mut bars = BarSet::new();
        bars.spawn(&[10, 20, 5], 0.3, &mut stage);

        assert_eq!(bars.len(), 3);
        assert_eq!(stage.live_count(), 3);

        let second = bars.get(1).unwrap();
        assert_eq!(second.x, 1.0);
        assert!((second.height - 6.0).abs() < 1e-5);
        assert_eq!(bars.values(), vec![10, 20, 5]);
    }

    #[test]
    fn test_ids_are_unique_across_spawns() {
        let mut stage = RecordingStage::new();
        let mut bars = BarSet::new();
        bars.spawn(&[1, 2], 1.0, &mut stage);
        let first: Vec<BarId> = bars.iter().map(|b| b.id).collect();

        bars.clear_bounded(100, &mut stage);
        bars.spawn(&[3, 4], 1.0, &mut stage);
        assert!(bars.iter().all(|b| !first.contains(&b.id)));
    }

    #[test]
    fn test_clear_is_bounded() {
        let mut stage = RecordingStage::new();
        let mut bars = BarSet::new();
        bars.spawn(&[1, 2, 3, 4, 5], 1.0, &mut stage);

        assert_eq!(bars.clear_bounded(3, &mut stage), 3);
        assert_eq!(bars.len(), 2);
        assert_eq!(bars.values(), vec![4, 5]);
        assert_eq!(stage.live_count(), 2);

        assert_eq!(bars.clear_bounded(3, &mut stage), 2);
        assert!(bars.is_empty());
        assert_eq!(stage.live_count(), 0);
    }

    #[test]
    fn test_cues_resolve_through_slot_order() {
        let mut stage = RecordingStage::new();
        let mut bars = BarSet::new();
        bars.spawn(&[7, 8], 1.0, &mut stage);
        let left_id = bars.get(0).unwrap().id;

        bars.swap_slots(0, 1);
        bars.apply_cue(Cue::Highlight { slot: 1 }, &mut stage);

        assert!(bars.get(1).unwrap().highlighted);
        assert!(stage.bar(left_id).unwrap().highlighted);

        bars.apply_cue(Cue::Highlight { slot: 0 }, &mut stage);
        bars.clear_highlights(&mut stage);
        assert_eq!(stage.highlighted_count(), 0);
        bars.apply_cue(Cue::Highlight { slot: 1 }, &mut stage);

        // Out-of-range slots are ignored.
        bars.apply_cue(Cue::Unhighlight { slot: 9 }, &mut stage);
        assert_eq!(stage.highlighted_count(), 1);
    }

    #[test]
    fn test_translate_and_place() {
        let mut stage = RecordingStage::new();
        let mut bars = BarSet::new();
        bars.spawn(&[7, 8], 1.0, &mut stage);

        assert_eq!(bars.translate(0, 0.25, &mut stage), Some(0.25));
        assert_eq!(bars.translate(5, 0.25, &mut stage), None);

        bars.place(0, 1.0, &mut stage);
        assert_eq!(bars.get(0).unwrap().x, 1.0);
    }
}
