//! Fakes shared by the unit tests

use crate::capture::context::CursorStyle;
use crate::capture::input::types::{ButtonStates, MouseSnapshot, Point, SnapshotKind};
use crate::capture::traits::{InputHost, ListenerKind};
use crate::replay::surface::{ClickAnimation, ReplaySurface};
use parking_lot::Mutex as ParkingMutex;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::time::Instant;

#[derive(Debug, Default)]
pub struct FakeHost {
    pub scroll: Point,
    pub subscriptions: Arc<ParkingMutex<HashSet<ListenerKind>>>,
}

impl InputHost for FakeHost {
    fn scroll_position(&self) -> Point {
        self.scroll
    }

    fn subscribe(&mut self, kind: ListenerKind) {
        self.subscriptions.lock().insert(kind);
    }

    fn unsubscribe(&mut self, kind: ListenerKind) {
        self.subscriptions.lock().remove(&kind);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    Move(Point),
    Hide,
    Style(CursorStyle),
    Scroll(Point),
    Spawn(ClickAnimation),
    Remove(u64),
    ClearAnimations,
    Trail(Vec<Point>),
}

/// Surface that remembers every call together with the virtual time it happened
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub calls: Arc<ParkingMutex<Vec<(Instant, SurfaceCall)>>>,
}

impl RecordingSurface {
    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.calls.lock().iter().map(|(_, call)| call.clone()).collect()
    }

    pub fn timed_calls(&self) -> Vec<(Instant, SurfaceCall)> {
        self.calls.lock().clone()
    }

    fn push(&self, call: SurfaceCall) {
        self.calls.lock().push((Instant::now(), call));
    }
}

impl ReplaySurface for RecordingSurface {
    fn move_cursor(&mut self, position: Point) {
        self.push(SurfaceCall::Move(position));
    }

    fn hide_cursor(&mut self) {
        self.push(SurfaceCall::Hide);
    }

    fn set_cursor_style(&mut self, style: &CursorStyle) {
        self.push(SurfaceCall::Style(style.clone()));
    }

    fn scroll_to(&mut self, position: Point) {
        self.push(SurfaceCall::Scroll(position));
    }

    fn spawn_click_animation(&mut self, animation: &ClickAnimation) {
        self.push(SurfaceCall::Spawn(animation.clone()));
    }

    fn remove_click_animation(&mut self, id: u64) {
        self.push(SurfaceCall::Remove(id));
    }

    fn clear_click_animations(&mut self) {
        self.push(SurfaceCall::ClearAnimations);
    }

    fn draw_trail(&mut self, points: &[Point]) {
        self.push(SurfaceCall::Trail(points.to_vec()));
    }
}

pub fn snapshot(x: f64, y: f64, timestamp: u64, kind: SnapshotKind) -> MouseSnapshot {
    MouseSnapshot {
        x,
        y,
        timestamp: timestamp as f64,
        kind,
        button: None,
        button_states: ButtonStates::default(),
        scroll_position: Point::default(),
        scroll_delta: None,
    }
}

/// move (0,0) -> move (10,0) after 50ms -> left down at (10,0) with no delay
pub fn clean_replay_log() -> Vec<MouseSnapshot> {
    let mut down = snapshot(10.0, 0.0, 0, SnapshotKind::Down);
    down.button = Some(0);
    down.button_states.left = true;

    vec![
        snapshot(0.0, 0.0, 0, SnapshotKind::Move),
        snapshot(10.0, 0.0, 50, SnapshotKind::Move),
        down,
    ]
}
