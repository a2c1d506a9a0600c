// src/stage.rs
//
// Visual provisioning seam.
//
// The engine never renders. It asks a Stage to create, destroy,
// highlight and move bars; the host decides what that means.

use std::collections::BTreeMap;

use crate::bars::BarId;
use crate::event::StageEvent;

/// Where a freshly spawned bar sits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarTransform {
    /// Horizontal position; equals the bar's slot at spawn time.
    pub x: f32,

    /// Vertical centre (half the height, so bars stand on y = 0).
    pub y: f32,

    /// Bar height, proportional to its value.
    pub height: f32,
}

/// Host-side visual element provider.
pub trait Stage {
    /// Create the visual element for `bar`.
    fn spawn_bar(&mut self, bar: BarId, value: i32, transform: BarTransform);

    /// Destroy the visual element for `bar`.
    fn destroy_bar(&mut self, bar: BarId);

    /// Switch between highlighted and default visual state.
    fn set_highlight(&mut self, bar: BarId, highlighted: bool);

    /// Update the horizontal position of `bar`.
    fn move_bar(&mut self, bar: BarId, x: f32);
}

// ═══════════════════════════════════════════════════════════════════
// HeadlessStage
// ═══════════════════════════════════════════════════════════════════

/// Stage that ignores every request.
///
/// For hosts that read bar state back from the engine instead of
/// reacting to requests.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessStage;

impl Stage for HeadlessStage {
    fn spawn_bar(&mut self, _: BarId, _: i32, _: BarTransform) {}
    fn destroy_bar(&mut self, _: BarId) {}
    fn set_highlight(&mut self, _: BarId, _: bool) {}
    fn move_bar(&mut self, _: BarId, _: f32) {}
}

// ═══════════════════════════════════════════════════════════════════
// RecordingStage
// ═══════════════════════════════════════════════════════════════════

/// Mirror of what a host would display, plus the raw request log.
#[derive(Debug, Default)]
pub struct RecordingStage {
    events: Vec<StageEvent>,
    live: BTreeMap<BarId, LiveBar>,
    spawned: usize,
}

/// Last known state of a bar on a `RecordingStage`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiveBar {
    pub value: i32,
    pub x: f32,
    pub highlighted: bool,
}

impl RecordingStage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every request received so far, oldest first.
    pub fn events(&self) -> &[StageEvent] {
        &self.events
    }

    /// Drain the request log. Live bar state is kept.
    pub fn take_events(&mut self) -> Vec<StageEvent> {
        std::mem::take(&mut self.events)
    }

    /// Number of bars spawned and not yet destroyed.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Total number of spawn requests ever received.
    pub fn spawned_count(&self) -> usize {
        self.spawned
    }

    pub fn bar(&self, bar: BarId) -> Option<&LiveBar> {
        self.live.get(&bar)
    }

    /// Number of live bars currently highlighted.
    pub fn highlighted_count(&self) -> usize {
        self.live.values().filter(|b| b.highlighted).count()
    }

    /// Live bar values ordered by their on-screen position.
    pub fn values_by_position(&self) -> Vec<i32> {
        let mut bars: Vec<&LiveBar> = self.live.values().collect();
        bars.sort_by(|a, b| a.x.total_cmp(&b.x));
        bars.into_iter().map(|b| b.value).collect()
    }
}

impl Stage for RecordingStage {
    fn spawn_bar(&mut self, bar: BarId, value: i32, transform: BarTransform) {
        self.spawned += 1;
        self.live.insert(
            bar,
            LiveBar {
                value,
                x: transform.x,
                highlighted: false,
            },
        );
        self.events.push(StageEvent::Spawn {
            bar,
            value,
            x: transform.x,
            y: transform.y,
            height: transform.height,
        });
    }

    fn destroy_bar(&mut self, bar: BarId) {
        self.live.remove(&bar);
        self.events.push(StageEvent::Destroy { bar });
    }

    fn set_highlight(&mut self, bar: BarId, highlighted: bool) {
        if let Some(live) = self.live.get_mut(&bar) {
            live.highlighted = highlighted;
        }
        self.events.push(StageEvent::Highlight {
            bar,
            on: highlighted,
        });
    }

    fn move_bar(&mut self, bar: BarId, x: f32) {
        if let Some(live) = self.live.get_mut(&bar) {
            live.x = x;
        }
        self.events.push(StageEvent::Move { bar, x });
    }
}
