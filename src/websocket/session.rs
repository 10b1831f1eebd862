//! Interactive Session
//!
//! Holds one viewer's current selection and turns client messages into the
//! server messages that answer them. No sockets here, so the flow is testable
//! on its own.

use crate::binder::SelectionBinder;
use crate::dispatch::{Dispatcher, Selection};

use super::messages::{ClientMessage, ServerMessage};

/// State of one WebSocket connection
#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    selection: Selection,
}

impl Session {
    pub fn new(selection: Selection) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            selection,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Greeting plus one figure (or error) per chart region
    pub fn open(&self, binder: &SelectionBinder, dispatcher: &Dispatcher) -> Vec<ServerMessage> {
        let mut messages = vec![ServerMessage::Connected {
            connection_id: self.id.clone(),
            selection: self.selection.clone(),
        }];
        messages.extend(
            dispatcher
                .render_all(binder, &self.selection)
                .into_iter()
                .map(ServerMessage::from),
        );
        messages
    }

    /// Handle one client message
    pub fn handle(
        &mut self,
        binder: &SelectionBinder,
        dispatcher: &Dispatcher,
        message: ClientMessage,
    ) -> Vec<ServerMessage> {
        match message {
            ClientMessage::InputChanged {
                control,
                value,
                event,
            } => {
                if let Err(e) = self.selection.apply(binder, control, &value) {
                    tracing::warn!(
                        connection_id = %self.id,
                        control = %control,
                        value = %value,
                        error = %e,
                        "Rejected selection"
                    );
                    return vec![ServerMessage::bind_error(None, &e)];
                }

                tracing::debug!(
                    connection_id = %self.id,
                    control = %control,
                    value = %value,
                    "Selection changed"
                );

                dispatcher
                    .dispatch(binder, &self.selection, control, event)
                    .into_iter()
                    .map(ServerMessage::from)
                    .collect()
            }
            ClientMessage::Ping => vec![ServerMessage::Pong],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Dataset, FlowType, HeatmapMatrix, LineSeries};
    use crate::dispatch::{ChartRegion, ControlId, EventKind};
    use std::sync::Arc;

    fn binder() -> SelectionBinder {
        let matrix = HeatmapMatrix {
            x: vec!["RU".into()],
            y: vec!["PL".into()],
            z: vec![vec![Some(0.5)]],
        };
        let dataset = Dataset::builder()
            .years(["2016", "2017"])
            .partners(["RU", "CN"])
            .heatmap(FlowType::Export, "2016", matrix.clone())
            .heatmap(FlowType::Export, "2017", matrix)
            .slope(
                FlowType::Export,
                "RU",
                vec![LineSeries::new("PL").point("2016", 0.4).point("2017", 0.5)],
            )
            .build()
            .unwrap();
        SelectionBinder::new(Arc::new(dataset))
    }

    fn change(control: ControlId, value: &str) -> ClientMessage {
        ClientMessage::InputChanged {
            control,
            value: value.to_string(),
            event: EventKind::Change,
        }
    }

    fn figure_targets(messages: &[ServerMessage]) -> Vec<ChartRegion> {
        messages
            .iter()
            .filter_map(|m| match m {
                ServerMessage::Figure { target, .. } => Some(*target),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_open_renders_every_region() {
        let session = Session::new(Selection::new("2017", FlowType::Export, "RU"));
        let messages = session.open(&binder(), &Dispatcher::dashboard());

        assert!(matches!(messages[0], ServerMessage::Connected { .. }));
        assert_eq!(
            figure_targets(&messages),
            vec![ChartRegion::Heatmap, ChartRegion::Slopechart]
        );
    }

    #[test]
    fn test_year_change_redraws_heatmap() {
        let binder = binder();
        let dispatcher = Dispatcher::dashboard();
        let mut session = Session::new(Selection::new("2017", FlowType::Export, "RU"));

        let messages = session.handle(
            &binder,
            &dispatcher,
            change(ControlId::SelectedYear, "2016"),
        );

        assert_eq!(figure_targets(&messages), vec![ChartRegion::Heatmap]);
        assert_eq!(session.selection().year, "2016");
    }

    #[test]
    fn test_missing_slice_reports_region_error() {
        let binder = binder();
        let dispatcher = Dispatcher::dashboard();
        let mut session = Session::new(Selection::new("2017", FlowType::Export, "RU"));

        let messages = session.handle(
            &binder,
            &dispatcher,
            change(ControlId::SelectedPartner, "CN"),
        );

        assert_eq!(messages.len(), 1);
        assert!(matches!(
            &messages[0],
            ServerMessage::Error {
                target: Some(ChartRegion::Slopechart),
                code,
                ..
            } if code == "DATA_NOT_FOUND"
        ));
        assert_eq!(session.selection().partner, "CN");
    }

    #[test]
    fn test_invalid_value_keeps_selection() {
        let binder = binder();
        let dispatcher = Dispatcher::dashboard();
        let mut session = Session::new(Selection::new("2017", FlowType::Export, "RU"));

        let messages = session.handle(
            &binder,
            &dispatcher,
            change(ControlId::SelectedFlow, "TRANSIT"),
        );

        assert!(matches!(
            &messages[0],
            ServerMessage::Error {
                target: None,
                code,
                ..
            } if code == "INVALID_SELECTION"
        ));
        assert_eq!(session.selection().flow, FlowType::Export);
    }

    #[test]
    fn test_ping() {
        let mut session = Session::new(Selection::default());
        let messages = session.handle(&binder(), &Dispatcher::dashboard(), ClientMessage::Ping);
        assert!(matches!(messages[..], [ServerMessage::Pong]));
    }
}
