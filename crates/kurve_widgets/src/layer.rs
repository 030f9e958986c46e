//! Drag layer
//!
//! Owns the draggable points of one container and routes pointer events to
//! them by widget id.

use crate::drag_point::{DragPoint, DragPointConfig};
use crate::widget::{Widget, WidgetId};
use kurve_core::events::event_types;
use kurve_core::{Event, EventDispatcher, Point, PointerInput, PositionProvider, Scheduler};
use slotmap::SlotMap;
use std::rc::Rc;

pub struct DragLayer {
    pointer: Rc<dyn PointerInput>,
    scheduler: Rc<dyn Scheduler>,
    points: SlotMap<WidgetId, DragPoint>,
    /// Insertion order, which is curve order
    order: Vec<WidgetId>,
    dispatcher: EventDispatcher,
}

impl DragLayer {
    pub fn new(pointer: Rc<dyn PointerInput>, scheduler: Rc<dyn Scheduler>) -> Self {
        Self {
            pointer,
            scheduler,
            points: SlotMap::with_key(),
            order: Vec::new(),
            dispatcher: EventDispatcher::new(),
        }
    }

    /// Create a point centered on `center`
    pub fn add(&mut self, center: Point, config: DragPointConfig) -> WidgetId {
        let pointer = self.pointer.clone();
        let scheduler = self.scheduler.clone();
        let id = self.points.insert_with_key(|id| {
            let point = DragPoint::new(id, pointer, scheduler, config);
            point.place(center);
            point
        });

        let target = id.event_target();
        for event_type in [
            event_types::POINTER_DOWN,
            event_types::POINTER_UP,
            event_types::DRAG_END,
        ] {
            if let Some(point) = self.points.get(id) {
                let point = point.clone();
                self.dispatcher
                    .register(target, event_type, move |event| point.handle_event(event));
            }
        }

        self.order.push(id);
        tracing::debug!(?id, x = center.x, y = center.y, "drag point added");
        id
    }

    pub fn get(&self, id: WidgetId) -> Option<&DragPoint> {
        self.points.get(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Points in the order they were added
    pub fn points(&self) -> impl Iterator<Item = &DragPoint> + '_ {
        self.order.iter().filter_map(|id| self.points.get(*id))
    }

    /// Live position handles, first added first
    pub fn providers(&self) -> Vec<Rc<dyn PositionProvider>> {
        self.points()
            .map(|point| Rc::new(point.clone()) as Rc<dyn PositionProvider>)
            .collect()
    }

    /// Deliver `event` to the point it targets. Returns the number of
    /// handlers that ran.
    pub fn dispatch(&self, event: &mut Event) -> usize {
        self.dispatcher.dispatch(event)
    }

    /// Put every point down
    pub fn release_all(&self) {
        for point in self.points.values() {
            point.end_drag();
        }
    }
}
