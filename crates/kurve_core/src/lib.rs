//! Kurve Core Runtime
//!
//! This crate provides the foundational primitives shared by every Kurve crate:
//!
//! - **Geometry**: `Point`, `Size` and `Rect` value types
//! - **Scheduling**: a single-threaded, cancellable one-shot timer API and a
//!   deterministic virtual-time implementation of it
//! - **Pointer Input**: pointer events and the capabilities draggable things
//!   need (`PositionProvider`, `PointerInput`)
//!
//! # Example
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use std::time::Duration;
//! use kurve_core::{Scheduler, VirtualScheduler};
//!
//! let scheduler = VirtualScheduler::new();
//! let fired = Rc::new(Cell::new(false));
//!
//! let flag = fired.clone();
//! scheduler.schedule_once(Duration::from_millis(25), Box::new(move || flag.set(true)));
//!
//! scheduler.advance(Duration::from_millis(24));
//! assert!(!fired.get());
//! scheduler.advance(Duration::from_millis(1));
//! assert!(fired.get());
//! ```

pub mod events;
pub mod geometry;
pub mod input;
pub mod scheduler;

pub use events::{Event, EventData, EventDispatcher, EventType};
pub use geometry::{Point, Rect, Size};
pub use input::{FixedPointer, PointerInput, PositionProvider};
pub use scheduler::{Scheduler, TimerCallback, TimerId, VirtualScheduler};
