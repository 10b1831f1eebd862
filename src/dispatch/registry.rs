//! Event-handler registry
//!
//! Maps `(control, event)` pairs to the chart handlers that must run when the
//! control fires. Handlers are plain functions of the binder and the current
//! selection, so the wiring can be exercised without a browser.

use serde::Serialize;
use std::collections::HashMap;

use super::selection::{ChartRegion, ControlId, EventKind, Selection};
use crate::binder::{BindResult, HeatmapSpec, SelectionBinder, SlopeChartSpec};

/// A renderable chart description for one region
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Figure {
    Heatmap(HeatmapSpec),
    SlopeChart(SlopeChartSpec),
}

/// Pure chart handler
pub type Handler = fn(&SelectionBinder, &Selection) -> BindResult<Figure>;

/// Outcome of one handler run; regions resolve independently
#[derive(Debug, Clone)]
pub struct RegionUpdate {
    pub region: ChartRegion,
    pub result: BindResult<Figure>,
}

/// Redraws the heatmap for the selected flow and year
pub fn heatmap_handler(binder: &SelectionBinder, selection: &Selection) -> BindResult<Figure> {
    binder
        .resolve_heatmap(selection.flow, &selection.year)
        .map(Figure::Heatmap)
}

/// Redraws the slope chart for the selected flow and partner
pub fn slopechart_handler(binder: &SelectionBinder, selection: &Selection) -> BindResult<Figure> {
    binder
        .resolve_slope_chart(selection.flow, &selection.partner)
        .map(Figure::SlopeChart)
}

#[derive(Clone, Copy)]
struct Registration {
    region: ChartRegion,
    handler: Handler,
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("region", &self.region)
            .finish_non_exhaustive()
    }
}

/// Registry of `(control, event) -> [(region, handler)]`
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    routes: HashMap<(ControlId, EventKind), Vec<Registration>>,
}

impl Dispatcher {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Standard dashboard wiring
    ///
    /// - year change -> heatmap
    /// - flow change -> heatmap and slope chart
    /// - partner change -> slope chart
    pub fn dashboard() -> Self {
        let mut dispatcher = Self::new();
        dispatcher
            .register(
                ControlId::SelectedYear,
                EventKind::Change,
                ChartRegion::Heatmap,
                heatmap_handler,
            )
            .register(
                ControlId::SelectedFlow,
                EventKind::Change,
                ChartRegion::Heatmap,
                heatmap_handler,
            )
            .register(
                ControlId::SelectedFlow,
                EventKind::Change,
                ChartRegion::Slopechart,
                slopechart_handler,
            )
            .register(
                ControlId::SelectedPartner,
                EventKind::Change,
                ChartRegion::Slopechart,
                slopechart_handler,
            );
        dispatcher
    }

    /// Register a handler; re-registering a region for the same pair replaces it
    pub fn register(
        &mut self,
        control: ControlId,
        event: EventKind,
        region: ChartRegion,
        handler: Handler,
    ) -> &mut Self {
        let entries = self.routes.entry((control, event)).or_default();
        match entries.iter_mut().find(|r| r.region == region) {
            Some(existing) => existing.handler = handler,
            None => entries.push(Registration { region, handler }),
        }
        self
    }

    /// Regions redrawn when `control` raises `event`
    pub fn targets(&self, control: ControlId, event: EventKind) -> Vec<ChartRegion> {
        self.routes
            .get(&(control, event))
            .map(|entries| entries.iter().map(|r| r.region).collect())
            .unwrap_or_default()
    }

    /// Run every handler registered for `(control, event)`
    pub fn dispatch(
        &self,
        binder: &SelectionBinder,
        selection: &Selection,
        control: ControlId,
        event: EventKind,
    ) -> Vec<RegionUpdate> {
        let Some(entries) = self.routes.get(&(control, event)) else {
            tracing::debug!(control = %control, event = ?event, "No handlers registered");
            return Vec::new();
        };

        entries
            .iter()
            .map(|r| RegionUpdate {
                region: r.region,
                result: (r.handler)(binder, selection),
            })
            .collect()
    }

    /// Resolve every region once, for the initial page load
    ///
    /// Each region uses the handler of the first control, in `ControlId::all()`
    /// order, that has it registered for a change event.
    pub fn render_all(&self, binder: &SelectionBinder, selection: &Selection) -> Vec<RegionUpdate> {
        ChartRegion::all()
            .iter()
            .filter_map(|region| {
                let handler = self.initial_handler(*region)?;
                Some(RegionUpdate {
                    region: *region,
                    result: handler(binder, selection),
                })
            })
            .collect()
    }

    fn initial_handler(&self, region: ChartRegion) -> Option<Handler> {
        ControlId::all().iter().find_map(|control| {
            self.routes
                .get(&(*control, EventKind::Change))?
                .iter()
                .find(|r| r.region == region)
                .map(|r| r.handler)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binder::BindError;
    use crate::data::{Dataset, FlowType, HeatmapMatrix, LineSeries};
    use std::sync::Arc;

    fn binder() -> SelectionBinder {
        let dataset = Dataset::builder()
            .years(["2016", "2017"])
            .partners(["RU", "CN"])
            .heatmap(
                FlowType::Export,
                "2017",
                HeatmapMatrix {
                    x: vec!["RU".into()],
                    y: vec!["PL".into()],
                    z: vec![vec![Some(0.5)]],
                },
            )
            .slope(
                FlowType::Export,
                "RU",
                vec![LineSeries::new("PL").point("2016", 0.4).point("2017", 0.5)],
            )
            .build()
            .unwrap();
        SelectionBinder::new(Arc::new(dataset))
    }

    #[test]
    fn test_dashboard_wiring() {
        let dispatcher = Dispatcher::dashboard();

        assert_eq!(
            dispatcher.targets(ControlId::SelectedYear, EventKind::Change),
            vec![ChartRegion::Heatmap]
        );
        assert_eq!(
            dispatcher.targets(ControlId::SelectedFlow, EventKind::Change),
            vec![ChartRegion::Heatmap, ChartRegion::Slopechart]
        );
        assert_eq!(
            dispatcher.targets(ControlId::SelectedPartner, EventKind::Change),
            vec![ChartRegion::Slopechart]
        );
    }

    #[test]
    fn test_dispatch_runs_handlers() {
        let binder = binder();
        let selection = Selection::new("2017", FlowType::Export, "RU");

        let updates = Dispatcher::dashboard().dispatch(
            &binder,
            &selection,
            ControlId::SelectedYear,
            EventKind::Change,
        );

        assert_eq!(updates.len(), 1);
        assert!(matches!(updates[0].result, Ok(Figure::Heatmap(_))));
    }

    #[test]
    fn test_regions_fail_independently() {
        let binder = binder();
        let selection = Selection::new("2016", FlowType::Export, "RU");

        let updates = Dispatcher::dashboard().dispatch(
            &binder,
            &selection,
            ControlId::SelectedFlow,
            EventKind::Change,
        );

        assert_eq!(updates.len(), 2);
        assert!(matches!(
            updates[0].result,
            Err(BindError::DataNotFound { .. })
        ));
        assert!(matches!(updates[1].result, Ok(Figure::SlopeChart(_))));
    }

    #[test]
    fn test_unregistered_pair_is_empty() {
        let binder = binder();
        let updates = Dispatcher::new().dispatch(
            &binder,
            &Selection::default(),
            ControlId::SelectedYear,
            EventKind::Change,
        );
        assert!(updates.is_empty());
    }

    #[test]
    fn test_register_replaces_region() {
        fn always_missing(_: &SelectionBinder, s: &Selection) -> BindResult<Figure> {
            Err(BindError::DataNotFound {
                table: "heatmap",
                flow: s.flow,
                key: s.year.clone(),
            })
        }

        let mut dispatcher = Dispatcher::dashboard();
        dispatcher.register(
            ControlId::SelectedYear,
            EventKind::Change,
            ChartRegion::Heatmap,
            always_missing,
        );

        let updates = dispatcher.dispatch(
            &binder(),
            &Selection::new("2017", FlowType::Export, "RU"),
            ControlId::SelectedYear,
            EventKind::Change,
        );
        assert_eq!(updates.len(), 1);
        assert!(updates[0].result.is_err());
    }

    #[test]
    fn test_render_all() {
        let binder = binder();
        let selection = Selection::new("2017", FlowType::Export, "RU");

        let updates = Dispatcher::dashboard().render_all(&binder, &selection);
        let regions: Vec<ChartRegion> = updates.iter().map(|u| u.region).collect();

        assert_eq!(regions, vec![ChartRegion::Heatmap, ChartRegion::Slopechart]);
        assert!(updates.iter().all(|u| u.result.is_ok()));
    }

    #[test]
    fn test_render_all_prefers_first_control() {
        fn always_missing(_: &SelectionBinder, s: &Selection) -> BindResult<Figure> {
            Err(BindError::DataNotFound {
                table: "heatmap",
                flow: s.flow,
                key: s.year.clone(),
            })
        }

        let binder = binder();
        let selection = Selection::new("2017", FlowType::Export, "RU");

        for _ in 0..50 {
            let mut dispatcher = Dispatcher::dashboard();
            dispatcher.register(
                ControlId::SelectedYear,
                EventKind::Change,
                ChartRegion::Heatmap,
                always_missing,
            );

            let updates = dispatcher.render_all(&binder, &selection);
            assert_eq!(updates[0].region, ChartRegion::Heatmap);
            assert!(matches!(
                updates[0].result,
                Err(BindError::DataNotFound { .. })
            ));
            assert!(matches!(updates[1].result, Ok(Figure::SlopeChart(_))));
        }
    }
}
