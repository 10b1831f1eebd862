//! WebSocket Interactive Sessions
//!
//! Drives the dashboard charts from the browser's input controls.
//!
//! ## Architecture
//!
//! - **Handler**: Handles WebSocket upgrade and message processing
//! - **Session**: One viewer's selection; applies control changes and dispatches
//! - **Messages**: Defines client and server message formats
//!
//! ## Protocol
//!
//! On connect the server sends `connected` followed by one `figure` per chart
//! region. Each `input_changed` message updates the session's selection and
//! yields a `figure` (or `error`) for every region wired to that control.
//!
//! ## Example
//!
//! ```javascript
//! // Browser
//! const ws = new WebSocket('ws://localhost:8050/ws');
//!
//! ws.onopen = () => {
//!   ws.send(JSON.stringify({type: 'input_changed', control: 'selected-year', value: '2016'}));
//! };
//!
//! ws.onmessage = (event) => {
//!   const msg = JSON.parse(event.data);
//!   if (msg.type === 'figure') Plotly.react(msg.target, msg.figure.data, msg.figure.layout);
//! };
//! ```

mod handler;
mod messages;
mod session;

pub use handler::websocket_handler;
pub use messages::{ClientMessage, ServerMessage};
pub use session::Session;
