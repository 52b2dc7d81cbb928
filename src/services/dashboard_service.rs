use tracing::{debug, error, info};

use crate::config::{ChartBinding, DashboardLayout, RenderSettings};
use crate::models::{ChartOutcome, ChartSpec, ChartStatus, DashboardReport, Payload, Series};
use crate::services::chart_service::ChartRenderer;
use crate::services::payload_service::extract_payload;
use crate::utils::{Page, SurfaceSink};

/// Attempt every chart of the layout, in order, and report what happened.
///
/// Charts are independent: a missing, malformed or failing chart never stops
/// the ones after it.
pub fn render_dashboard(
    page: &Page,
    layout: &DashboardLayout,
    settings: &RenderSettings,
    renderer: &dyn ChartRenderer,
    sink: &mut dyn SurfaceSink,
) -> DashboardReport {
    let mut report = DashboardReport::new();

    for binding in &layout.charts {
        let payload = extract_payload(page, &binding.data_slot);
        if payload.has_data() && !page.has_element(&binding.surface) {
            debug!(surface = %binding.surface, "Page has no element for this surface");
        }
        let status = render_chart(binding, payload, settings, renderer, sink);

        report.outcomes.push(ChartOutcome {
            name: binding.name.clone(),
            data_slot: binding.data_slot.clone(),
            surface: binding.surface.clone(),
            status,
        });
    }

    info!(
        "Rendered {}/{} charts",
        report.rendered_count(),
        report.outcomes.len()
    );
    report
}

/// Render one chart from its payload. Absent, malformed and empty payloads
/// skip drawing entirely.
pub fn render_chart(
    binding: &ChartBinding,
    payload: Payload,
    settings: &RenderSettings,
    renderer: &dyn ChartRenderer,
    sink: &mut dyn SurfaceSink,
) -> ChartStatus {
    let entries = match payload {
        Payload::Absent => return ChartStatus::NoData,
        Payload::Malformed(reason) => return ChartStatus::Malformed(reason),
        Payload::Present(entries) if entries.is_empty() => return ChartStatus::Empty,
        Payload::Present(entries) => entries,
    };

    let chart = ChartSpec {
        surface: binding.surface.clone(),
        kind: binding.kind,
        series: Series::from_entries(entries, binding.order),
        width: settings.width,
        height: settings.height,
    };
    let points = chart.series.points().count();

    let result = renderer
        .render(&chart)
        .and_then(|svg| sink.present(&chart.surface, svg));

    match result {
        Ok(()) => {
            info!(
                chart = %binding.name,
                surface = %binding.surface,
                kind = %binding.kind,
                "Chart rendered with {} points",
                points
            );
            ChartStatus::Rendered { points }
        }
        Err(e) => {
            error!(chart = %binding.name, surface = %binding.surface, "{}", e);
            ChartStatus::Failed(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{DashboardError, MemorySurfaces};
    use std::cell::RefCell;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    /// Collects formatted log output in memory
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for LogBuffer {
        type Writer = LogBuffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    /// Run `f` with every event down to TRACE written to a buffer
    fn logged<T>(f: impl FnOnce() -> T) -> (T, String) {
        let buffer = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(buffer.clone())
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .finish();
        let result = tracing::subscriber::with_default(subscriber, f);
        let output = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        (result, output)
    }

    /// Lines logged at WARN or ERROR
    fn warnings(logs: &str) -> Vec<&str> {
        logs.lines()
            .filter(|line| line.contains("WARN") || line.contains("ERROR"))
            .collect()
    }

    /// Records what it was asked to draw
    #[derive(Default)]
    struct RecordingRenderer {
        charts: RefCell<Vec<ChartSpec>>,
    }

    impl ChartRenderer for RecordingRenderer {
        fn render(&self, chart: &ChartSpec) -> Result<String, DashboardError> {
            self.charts.borrow_mut().push(chart.clone());
            Ok(format!("<svg id=\"{}\"></svg>", chart.surface))
        }
    }

    impl RecordingRenderer {
        fn drawn(&self, surface: &str) -> Option<ChartSpec> {
            self.charts
                .borrow()
                .iter()
                .find(|c| c.surface == surface)
                .cloned()
        }
    }

    /// Fails on one surface, draws the rest
    struct FailingOn(&'static str);

    impl ChartRenderer for FailingOn {
        fn render(&self, chart: &ChartSpec) -> Result<String, DashboardError> {
            if chart.surface == self.0 {
                Err(DashboardError::Draw("backend exploded".to_string()))
            } else {
                Ok(String::from("<svg></svg>"))
            }
        }
    }

    fn slot(id: &str, json: &str) -> String {
        format!(r#"<script type="application/json" id="{}">{}</script>"#, id, json)
    }

    fn page(slots: &[String]) -> Page {
        Page::parse(&format!(
            r#"<html><body>{}<canvas id="yearChart"></canvas><canvas id="ptypeChart"></canvas><canvas id="bedChart"></canvas></body></html>"#,
            slots.join("\n")
        ))
    }

    fn run(page: &Page) -> (DashboardReport, RecordingRenderer, MemorySurfaces) {
        let renderer = RecordingRenderer::default();
        let mut sink = MemorySurfaces::default();
        let report = render_dashboard(
            page,
            &DashboardLayout::default(),
            &RenderSettings::default(),
            &renderer,
            &mut sink,
        );
        (report, renderer, sink)
    }

    fn full_page() -> Page {
        page(&[
            slot("yearData", r#"{"2021": 5, "2019": 2, "2020": 9}"#),
            slot("ptypeMedianData", r#"{"Condo": 300000, "House": 450000}"#),
            slot("bedMedianData", r#"{"2": 520000, "3": 610000, "4": 780000}"#),
        ])
    }

    #[test]
    fn test_all_charts_rendered() {
        let (report, renderer, sink) = run(&full_page());

        assert_eq!(report.rendered_count(), 3);
        assert_eq!(report.diagnostics().count(), 0);
        assert_eq!(renderer.charts.borrow().len(), 3);
        for surface in ["yearChart", "ptypeChart", "bedChart"] {
            assert!(sink.charts.contains_key(surface), "missing {}", surface);
        }
    }

    #[test]
    fn test_charts_attempted_in_layout_order() {
        let (report, renderer, _) = run(&full_page());

        let names: Vec<&str> = report.outcomes.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["yearly", "property_type", "bedrooms"]);
        let surfaces: Vec<String> = renderer
            .charts
            .borrow()
            .iter()
            .map(|c| c.surface.clone())
            .collect();
        assert_eq!(surfaces, vec!["yearChart", "ptypeChart", "bedChart"]);
    }

    #[test]
    fn test_yearly_series_sorted_numerically() {
        let (_, renderer, _) = run(&full_page());

        let yearly = renderer.drawn("yearChart").expect("yearly chart drawn");
        assert_eq!(yearly.kind, crate::models::ChartKind::Line);
        assert_eq!(yearly.series.labels, vec!["2019", "2020", "2021"]);
        assert_eq!(yearly.series.values, vec![Some(2.0), Some(9.0), Some(5.0)]);
    }

    #[test]
    fn test_category_series_keep_source_order() {
        let page = page(&[slot(
            "ptypeMedianData",
            r#"{"House": 450000, "Condo": 300000}"#,
        )]);
        let (_, renderer, _) = run(&page);

        let ptype = renderer.drawn("ptypeChart").expect("ptype chart drawn");
        assert_eq!(ptype.kind, crate::models::ChartKind::Bar);
        assert_eq!(ptype.series.labels, vec!["House", "Condo"]);
        assert_eq!(ptype.series.values, vec![Some(450000.0), Some(300000.0)]);

        let (_, renderer, _) = run(&full_page());
        let ptype = renderer.drawn("ptypeChart").expect("ptype chart drawn");
        assert_eq!(ptype.series.labels, vec!["Condo", "House"]);
    }

    #[test]
    fn test_absent_slots_skip_silently() {
        let ((report, renderer, sink), logs) = logged(|| run(&page(&[])));

        assert_eq!(report.rendered_count(), 0);
        assert_eq!(report.diagnostics().count(), 0);
        assert!(warnings(&logs).is_empty(), "unexpected warnings:\n{}", logs);
        assert!(logs
            .lines()
            .filter(|line| line.contains("Data slot not found"))
            .all(|line| line.contains("TRACE")));
        assert!(renderer.charts.borrow().is_empty());
        assert!(sink.charts.is_empty());
        assert!(report
            .outcomes
            .iter()
            .all(|o| o.status == ChartStatus::NoData));
    }

    #[test]
    fn test_malformed_slot_logs_one_warning_each() {
        for (data_slot, surface) in [
            ("yearData", "yearChart"),
            ("ptypeMedianData", "ptypeChart"),
            ("bedMedianData", "bedChart"),
        ] {
            let ((report, renderer, sink), logs) =
                logged(|| run(&page(&[slot(data_slot, "{\"2020\": ")])));

            let warned = warnings(&logs);
            assert_eq!(warned.len(), 1, "slot {}:\n{}", data_slot, logs);
            assert!(warned[0].contains("WARN"));
            assert!(warned[0].contains(data_slot));

            let diagnostics: Vec<&ChartOutcome> = report.diagnostics().collect();
            assert_eq!(diagnostics.len(), 1, "slot {}", data_slot);
            assert_eq!(diagnostics[0].data_slot, data_slot);
            assert!(matches!(diagnostics[0].status, ChartStatus::Malformed(_)));
            assert!(renderer.drawn(surface).is_none());
            assert!(!sink.charts.contains_key(surface));
        }
    }

    #[test]
    fn test_empty_objects_skip_silently() {
        for (data_slot, surface) in [
            ("yearData", "yearChart"),
            ("ptypeMedianData", "ptypeChart"),
            ("bedMedianData", "bedChart"),
        ] {
            let ((report, renderer, _), logs) = logged(|| run(&page(&[slot(data_slot, "{}")])));

            let outcome = report
                .outcomes
                .iter()
                .find(|o| o.data_slot == data_slot)
                .expect("outcome recorded");
            assert_eq!(outcome.status, ChartStatus::Empty);
            assert_eq!(report.diagnostics().count(), 0);
            assert!(warnings(&logs).is_empty(), "slot {}:\n{}", data_slot, logs);
            assert!(renderer.drawn(surface).is_none());
        }
    }

    #[test]
    fn test_malformed_yearly_does_not_block_others() {
        let page = page(&[
            slot("yearData", "[not json"),
            slot("ptypeMedianData", r#"{"Condo": 300000, "House": 450000}"#),
            slot("bedMedianData", r#"{"3": 610000}"#),
        ]);
        let (report, renderer, sink) = run(&page);

        assert!(matches!(
            report.outcome("yearly").map(|o| &o.status),
            Some(ChartStatus::Malformed(_))
        ));
        assert_eq!(
            report.outcome("property_type").map(|o| &o.status),
            Some(&ChartStatus::Rendered { points: 2 })
        );
        assert_eq!(
            report.outcome("bedrooms").map(|o| &o.status),
            Some(&ChartStatus::Rendered { points: 1 })
        );
        assert!(renderer.drawn("yearChart").is_none());
        assert!(sink.charts.contains_key("ptypeChart"));
        assert!(sink.charts.contains_key("bedChart"));
    }

    #[test]
    fn test_render_failure_does_not_block_others() {
        let mut sink = MemorySurfaces::default();
        let report = render_dashboard(
            &full_page(),
            &DashboardLayout::default(),
            &RenderSettings::default(),
            &FailingOn("yearChart"),
            &mut sink,
        );

        assert!(matches!(
            report.outcome("yearly").map(|o| &o.status),
            Some(ChartStatus::Failed(_))
        ));
        assert_eq!(report.rendered_count(), 2);
        assert_eq!(report.diagnostics().count(), 1);
        assert!(!sink.charts.contains_key("yearChart"));
    }

    #[test]
    fn test_gaps_are_counted_out_of_points() {
        let page = page(&[slot("bedMedianData", r#"{"1": null, "2": 520000}"#)]);
        let (report, renderer, _) = run(&page);

        assert_eq!(
            report.outcome("bedrooms").map(|o| &o.status),
            Some(&ChartStatus::Rendered { points: 1 })
        );
        let bed = renderer.drawn("bedChart").expect("bed chart drawn");
        assert_eq!(bed.series.labels, vec!["1", "2"]);
    }

    #[test]
    fn test_settings_size_reaches_renderer() {
        let renderer = RecordingRenderer::default();
        let mut sink = MemorySurfaces::default();
        let settings = RenderSettings {
            width: 640,
            height: 320,
            ..RenderSettings::default()
        };
        render_dashboard(
            &full_page(),
            &DashboardLayout::default(),
            &settings,
            &renderer,
            &mut sink,
        );

        let yearly = renderer.drawn("yearChart").expect("yearly chart drawn");
        assert_eq!((yearly.width, yearly.height), (640, 320));
    }
}
