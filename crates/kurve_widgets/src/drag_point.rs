//! Draggable control point
//!
//! A square handle the user can pick up and move around its container. While
//! a drag is active the point polls the pointer on a fixed interval instead of
//! reacting to every move event, and keeps its whole extent inside the
//! container.

use crate::widget::{Widget, WidgetId};
use kurve_core::events::event_types;
use kurve_core::{
    Event, EventData, Point, PointerInput, PositionProvider, Rect, Scheduler, Size, TimerId,
};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

/// Drag point configuration
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragPointConfig {
    /// Visual extent of the handle
    pub size: Size,
    /// How often the pointer is polled while dragging
    pub poll_interval: Duration,
    pub drag_enabled: bool,
}

impl Default for DragPointConfig {
    fn default() -> Self {
        Self {
            size: Size::square(15.0),
            poll_interval: Duration::from_millis(25),
            drag_enabled: true,
        }
    }
}

struct DragState {
    center: Point,
    enabled: bool,
    dragging: bool,
    /// Pointer position relative to the center when the drag began
    offset: Point,
    timer: Option<TimerId>,
}

struct DragShared {
    id: WidgetId,
    config: DragPointConfig,
    pointer: Rc<dyn PointerInput>,
    scheduler: Rc<dyn Scheduler>,
    state: RefCell<DragState>,
}

/// A draggable handle whose center is its position.
///
/// Clones share the same point.
#[derive(Clone)]
pub struct DragPoint {
    shared: Rc<DragShared>,
}

impl DragPoint {
    pub fn new(
        id: WidgetId,
        pointer: Rc<dyn PointerInput>,
        scheduler: Rc<dyn Scheduler>,
        config: DragPointConfig,
    ) -> Self {
        Self {
            shared: Rc::new(DragShared {
                id,
                config,
                pointer,
                scheduler,
                state: RefCell::new(DragState {
                    center: Point::ZERO,
                    enabled: config.drag_enabled,
                    dragging: false,
                    offset: Point::ZERO,
                    timer: None,
                }),
            }),
        }
    }

    /// Move the point programmatically, e.g. for its initial placement
    pub fn place(&self, center: Point) {
        self.shared.state.borrow_mut().center = center;
    }

    pub fn size(&self) -> Size {
        self.shared.config.size
    }

    /// Current extent
    pub fn bounds(&self) -> Rect {
        Rect::from_center(self.position(), self.size())
    }

    pub fn is_dragging(&self) -> bool {
        self.shared.state.borrow().dragging
    }

    pub fn is_drag_enabled(&self) -> bool {
        self.shared.state.borrow().enabled
    }

    /// Allow or forbid dragging. Disabling ends a drag in progress.
    pub fn set_drag_enabled(&self, enabled: bool) {
        self.shared.state.borrow_mut().enabled = enabled;
        if !enabled {
            self.end_drag();
        }
    }

    /// Pick the point up at the current pointer position
    pub fn begin_drag(&self) {
        let pointer = self.shared.pointer.pointer_position();
        self.shared.begin_drag(pointer);
    }

    /// Put the point down where it is
    pub fn end_drag(&self) {
        let timer = {
            let mut state = self.shared.state.borrow_mut();
            if !state.dragging {
                return;
            }
            state.dragging = false;
            state.timer.take()
        };
        if let Some(id) = timer {
            self.shared.scheduler.cancel(id);
        }
        tracing::debug!(id = ?self.shared.id, "drag ended");
    }
}

impl Widget for DragPoint {
    fn id(&self) -> WidgetId {
        self.shared.id
    }

    fn handle_event(&self, event: &Event) {
        match event.event_type {
            event_types::POINTER_DOWN => {
                let pointer = match event.data {
                    EventData::Pointer { x, y, .. } => Point::new(x, y),
                    _ => self.shared.pointer.pointer_position(),
                };
                self.shared.begin_drag(pointer);
            }
            event_types::POINTER_UP | event_types::DRAG_END => self.end_drag(),
            _ => {}
        }
    }
}

impl PositionProvider for DragPoint {
    fn position(&self) -> Point {
        self.shared.state.borrow().center
    }
}

impl std::fmt::Debug for DragPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.shared.state.borrow();
        f.debug_struct("DragPoint")
            .field("id", &self.shared.id)
            .field("center", &state.center)
            .field("dragging", &state.dragging)
            .finish()
    }
}

impl DragShared {
    fn begin_drag(self: &Rc<Self>, pointer: Point) {
        {
            let mut state = self.state.borrow_mut();
            if !state.enabled {
                tracing::trace!(id = ?self.id, "drag disabled, ignoring pointer down");
                return;
            }
            if state.dragging {
                return;
            }
            state.dragging = true;
            state.offset = pointer - state.center;
        }
        tracing::debug!(id = ?self.id, x = pointer.x, y = pointer.y, "drag started");
        self.schedule_follow();
    }

    fn schedule_follow(self: &Rc<Self>) {
        let weak: Weak<Self> = Rc::downgrade(self);
        let id = self.scheduler.schedule_once(
            self.config.poll_interval,
            Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    shared.follow();
                }
            }),
        );
        self.state.borrow_mut().timer = Some(id);
    }

    fn follow(self: &Rc<Self>) {
        let pointer = self.pointer.pointer_position();
        let container = self.pointer.container_size();
        {
            let mut state = self.state.borrow_mut();
            state.timer = None;
            if !state.dragging {
                return;
            }
            let wanted = pointer - state.offset;
            state.center = Point::new(
                clamp_axis(wanted.x, self.config.size.width, container.width),
                clamp_axis(wanted.y, self.config.size.height, container.height),
            );
            tracing::trace!(id = ?self.id, x = state.center.x, y = state.center.y, "drag follow");
        }
        self.schedule_follow();
    }
}

impl Drop for DragShared {
    fn drop(&mut self) {
        if let Some(id) = self.state.get_mut().timer.take() {
            self.scheduler.cancel(id);
        }
    }
}

/// Keep a span of `extent` centered on `center` inside `0..limit`. The low
/// edge wins when the span is wider than the limit.
fn clamp_axis(center: f32, extent: f32, limit: f32) -> f32 {
    let half = extent / 2.0;
    center.min(limit - half).max(half)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurve_core::{FixedPointer, VirtualScheduler};

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn setup(config: DragPointConfig) -> (Rc<VirtualScheduler>, Rc<FixedPointer>, DragPoint) {
        let scheduler = Rc::new(VirtualScheduler::new());
        let pointer = Rc::new(FixedPointer::new(Size::new(700.0, 500.0)));
        let point = DragPoint::new(
            WidgetId::default(),
            pointer.clone(),
            scheduler.clone(),
            config,
        );
        point.place(Point::new(100.0, 100.0));
        (scheduler, pointer, point)
    }

    fn press(point: &DragPoint, x: f32, y: f32) {
        point.handle_event(&Event::pointer(event_types::POINTER_DOWN, 0, x, y));
    }

    #[test]
    fn test_follows_pointer_keeping_grab_offset() {
        let (scheduler, pointer, point) = setup(DragPointConfig::default());
        press(&point, 105.0, 97.0);
        assert!(point.is_dragging());

        // nothing moves until the next poll
        pointer.move_to(Point::new(305.0, 197.0));
        assert_eq!(point.position(), Point::new(100.0, 100.0));

        scheduler.advance(ms(25));
        assert_eq!(point.position(), Point::new(300.0, 200.0));

        pointer.move_to(Point::new(405.0, 297.0));
        scheduler.advance(ms(25));
        assert_eq!(point.position(), Point::new(400.0, 300.0));
        assert_eq!(scheduler.pending_count(), 1);
    }

    #[test]
    fn test_press_without_coordinates_grabs_at_pointer() {
        let (scheduler, pointer, point) = setup(DragPointConfig::default());
        pointer.move_to(Point::new(110.0, 100.0));
        point.handle_event(&Event::new(event_types::POINTER_DOWN, 0));
        assert!(point.is_dragging());

        pointer.move_to(Point::new(210.0, 150.0));
        scheduler.advance(ms(25));
        assert_eq!(point.position(), Point::new(200.0, 150.0));
    }

    #[test]
    fn test_clamped_to_container() {
        let (scheduler, pointer, point) = setup(DragPointConfig::default());
        press(&point, 100.0, 100.0);

        pointer.move_to(Point::new(-50.0, 900.0));
        scheduler.advance(ms(25));
        assert_eq!(point.position(), Point::new(7.5, 492.5));
        assert_eq!(point.bounds().x, 0.0);
        assert_eq!(point.bounds().bottom(), 500.0);

        pointer.move_to(Point::new(1000.0, -3.0));
        scheduler.advance(ms(25));
        assert_eq!(point.position(), Point::new(692.5, 7.5));
    }

    #[test]
    fn test_container_resize_is_observed() {
        let (scheduler, pointer, point) = setup(DragPointConfig::default());
        press(&point, 100.0, 100.0);
        pointer.resize(Size::new(200.0, 200.0));
        pointer.move_to(Point::new(650.0, 150.0));
        scheduler.advance(ms(25));
        assert_eq!(point.position(), Point::new(192.5, 150.0));
    }

    #[test]
    fn test_oversized_point_pins_low_edge() {
        let config = DragPointConfig {
            size: Size::new(800.0, 15.0),
            ..DragPointConfig::default()
        };
        let (scheduler, pointer, point) = setup(config);
        press(&point, 100.0, 100.0);
        pointer.move_to(Point::new(600.0, 100.0));
        scheduler.advance(ms(25));
        assert_eq!(point.bounds().x, 0.0);
    }

    #[test]
    fn test_release_stops_following() {
        let (scheduler, pointer, point) = setup(DragPointConfig::default());
        press(&point, 100.0, 100.0);
        point.handle_event(&Event::pointer(event_types::POINTER_UP, 0, 100.0, 100.0));

        assert!(!point.is_dragging());
        assert_eq!(scheduler.pending_count(), 0);
        pointer.move_to(Point::new(300.0, 300.0));
        scheduler.advance(ms(100));
        assert_eq!(point.position(), Point::new(100.0, 100.0));

        // drag end works the same way
        press(&point, 100.0, 100.0);
        point.handle_event(&Event::new(event_types::DRAG_END, 0));
        assert!(!point.is_dragging());
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_disabled_point_ignores_pointer() {
        let (scheduler, pointer, point) = setup(DragPointConfig::default());
        point.set_drag_enabled(false);
        press(&point, 100.0, 100.0);
        assert!(!point.is_dragging());
        assert_eq!(scheduler.pending_count(), 0);

        point.set_drag_enabled(true);
        press(&point, 100.0, 100.0);
        pointer.move_to(Point::new(150.0, 150.0));
        scheduler.advance(ms(25));

        // disabling mid-drag puts the point down
        point.set_drag_enabled(false);
        assert!(!point.is_dragging());
        assert_eq!(scheduler.pending_count(), 0);
        pointer.move_to(Point::new(300.0, 300.0));
        scheduler.advance(ms(100));
        assert_eq!(point.position(), Point::new(150.0, 150.0));
        assert!(!point.is_drag_enabled());
    }

    #[test]
    fn test_begin_drag_reads_pointer_input() {
        let (scheduler, pointer, point) = setup(DragPointConfig::default());
        pointer.move_to(Point::new(90.0, 110.0));
        point.begin_drag();
        pointer.move_to(Point::new(190.0, 210.0));
        scheduler.advance(ms(25));
        assert_eq!(point.position(), Point::new(200.0, 200.0));
    }

    #[test]
    fn test_drop_cancels_poll() {
        let (scheduler, _pointer, point) = setup(DragPointConfig::default());
        press(&point, 100.0, 100.0);
        assert_eq!(scheduler.pending_count(), 1);
        drop(point);
        assert_eq!(scheduler.pending_count(), 0);
    }
}
