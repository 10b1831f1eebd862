//! Input-event dispatch
//!
//! Explicit registration of which chart regions redraw when an input control
//! changes. The hosting layer (the WebSocket session) owns the current
//! [`Selection`], applies control values to it and calls
//! [`Dispatcher::dispatch`]; everything here is synchronous and pure.

mod registry;
mod selection;

pub use registry::{heatmap_handler, slopechart_handler, Dispatcher, Figure, Handler, RegionUpdate};
pub use selection::{ChartRegion, ControlId, EventKind, Selection};
