use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, Legend, Plot};

use crate::color;
use crate::data::chart::{BarSeries, ChartData};
use crate::data::pipeline::NoticeLevel;

/// Total width of one row's group of bars, in plot units.
const GROUP_WIDTH: f64 = 0.8;

// ---------------------------------------------------------------------------
// Bar chart (inside a file card)
// ---------------------------------------------------------------------------

/// Render the chart for one file, or a warning when there is nothing numeric.
pub fn bar_chart(ui: &mut Ui, id: &str, chart: &ChartData) {
    let series = match chart {
        ChartData::Bars(series) => series,
        ChartData::NoNumericData => {
            ui.colored_label(
                color::notice(NoticeLevel::Warning),
                "⚠ No numeric data available for visualization!",
            );
            return;
        }
    };

    let colours = color::series_palette(series.len());
    let bar_width = GROUP_WIDTH / series.len() as f64;

    Plot::new(("bar_chart", id))
        .legend(Legend::default())
        .height(260.0)
        .x_axis_label("Row")
        .allow_scroll(false)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .show(ui, |plot_ui| {
            for (k, (s, colour)) in series.iter().zip(colours).enumerate() {
                // Centre the group of bars on the row label.
                let offset = (k as f64 - (series.len() - 1) as f64 / 2.0) * bar_width;
                plot_ui.bar_chart(
                    BarChart::new(bars_for(s, offset, bar_width))
                        .name(&s.name)
                        .color(colour),
                );
            }
        });
}

fn bars_for(series: &BarSeries, offset: f64, width: f64) -> Vec<Bar> {
    series
        .bars
        .iter()
        .map(|&(row, value)| Bar::new(row as f64 + offset, value).width(width))
        .collect()
}
