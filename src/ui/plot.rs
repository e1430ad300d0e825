use eframe::egui::{vec2, Stroke, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoint, PlotPoints, Points, Polygon};

use crate::color::{class_color, diverging_color};
use crate::data::model::Class;
use crate::state::AppState;
use crate::views::{
    self, CorrelationResult, DistributionResult, ProjectionResult, TemporalResult, ViewError,
};

// ---------------------------------------------------------------------------
// Chart grid (central panel)
// ---------------------------------------------------------------------------

/// Render the four linked charts in a 2×2 grid.
pub fn chart_grid(ui: &mut Ui, state: &AppState) {
    let Some(outputs) = &state.outputs else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to explore transactions  (File → Open…)");
        });
        return;
    };

    let spacing = ui.spacing().item_spacing;
    let half_w = (ui.available_width() - spacing.x) / 2.0;
    let half_h = (ui.available_height() - spacing.y) / 2.0;

    ui.horizontal(|ui: &mut Ui| {
        histogram_chart(ui, &outputs.distribution, half_w, half_h);
        temporal_chart(ui, &outputs.temporal, half_w, half_h);
    });
    ui.horizontal(|ui: &mut Ui| {
        projection_chart(ui, &outputs.projection, half_w, half_h);
        correlation_chart(ui, &outputs.correlation, half_w, half_h);
    });
}

/// A failed view renders as a message in its quadrant; the other three
/// charts are unaffected.
fn placeholder(ui: &mut Ui, width: f32, height: f32, message: &str) {
    ui.allocate_ui(vec2(width, height), |ui: &mut Ui| {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label(message);
        });
    });
}

// ---------------------------------------------------------------------------
// Histogram (per-class feature distribution)
// ---------------------------------------------------------------------------

fn histogram_chart(
    ui: &mut Ui,
    distribution: &Result<DistributionResult, ViewError>,
    width: f32,
    height: f32,
) {
    let dist = match distribution {
        Ok(dist) => dist,
        Err(e) => {
            placeholder(ui, width, height, &format!("Histogram unavailable: {e}"));
            return;
        }
    };

    Plot::new(views::HISTOGRAM_ID)
        .legend(Legend::default())
        .width(width)
        .height(height)
        .x_axis_label(dist.feature.clone())
        .y_axis_label("count")
        .show(ui, |plot_ui| {
            for class in Class::ALL {
                let Some(bins) = dist.counts.get(&class) else {
                    continue;
                };
                let color = class_color(class);
                let bars: Vec<Bar> = bins
                    .iter()
                    .enumerate()
                    .filter(|(_, &count)| count > 0)
                    .map(|(i, &count)| {
                        Bar::new(dist.bin_center(i), count as f64)
                            .width(dist.bin_width * 0.9)
                            .fill(color.gamma_multiply(0.75))
                    })
                    .collect();

                plot_ui.bar_chart(BarChart::new(bars).color(color).name(class.to_string()));
            }
        });
}

// ---------------------------------------------------------------------------
// Transactions by hour (per-class line chart)
// ---------------------------------------------------------------------------

fn temporal_chart(ui: &mut Ui, temporal: &TemporalResult, width: f32, height: f32) {
    Plot::new(views::TX_BY_HOUR_ID)
        .legend(Legend::default())
        .width(width)
        .height(height)
        .x_axis_label("hour of day")
        .y_axis_label("transactions")
        .show(ui, |plot_ui| {
            for class in Class::ALL {
                let points: PlotPoints = temporal
                    .series(class)
                    .map(|(hour, count)| [f64::from(hour), count as f64])
                    .collect();

                let line = Line::new(points)
                    .name(class.to_string())
                    .color(class_color(class))
                    .width(1.5);

                plot_ui.line(line);
            }
        });
}

// ---------------------------------------------------------------------------
// PCA scatter
// ---------------------------------------------------------------------------

fn projection_chart(
    ui: &mut Ui,
    projection: &Result<ProjectionResult, ViewError>,
    width: f32,
    height: f32,
) {
    let result = match projection {
        Ok(result) => result,
        Err(e) => {
            placeholder(ui, width, height, &format!("PCA unavailable: {e}"));
            return;
        }
    };

    let [ev1, ev2] = result.explained_variance;

    Plot::new(views::PCA_SCATTER_ID)
        .legend(Legend::default())
        .width(width)
        .height(height)
        .x_axis_label(format!("PC1 ({:.0}%)", ev1 * 100.0))
        .y_axis_label(format!("PC2 ({:.0}%)", ev2 * 100.0))
        .show(ui, |plot_ui| {
            for class in Class::ALL {
                let points: PlotPoints = result
                    .points
                    .iter()
                    .filter(|p| p.class == class)
                    .map(|p| [p.x, p.y])
                    .collect();

                plot_ui.points(
                    Points::new(points)
                        .name(class.to_string())
                        .color(class_color(class))
                        .radius(2.0),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Correlation heatmap
// ---------------------------------------------------------------------------

fn correlation_chart(
    ui: &mut Ui,
    correlation: &Result<CorrelationResult, ViewError>,
    width: f32,
    height: f32,
) {
    let result = match correlation {
        Ok(result) => result,
        Err(e) => {
            placeholder(ui, width, height, &format!("Correlation unavailable: {e}"));
            return;
        }
    };

    let size = result.size();
    let columns = result.columns.clone();
    let matrix = result.matrix.clone();

    Plot::new(views::CORR_HEATMAP_ID)
        .width(width)
        .height(height)
        .data_aspect(1.0)
        .show_axes([false, false])
        .show_grid(false)
        .allow_drag(false)
        .allow_scroll(false)
        .label_formatter(move |_name, point: &PlotPoint| {
            cell_label(&columns, &matrix, size, point)
        })
        .show(ui, |plot_ui| {
            for row in 0..size {
                for col in 0..size {
                    let r = result.get(row, col);
                    // First matrix row is drawn at the top.
                    let x = col as f64;
                    let y = (size - 1 - row) as f64;
                    let corners: PlotPoints = vec![
                        [x, y],
                        [x + 1.0, y],
                        [x + 1.0, y + 1.0],
                        [x, y + 1.0],
                    ]
                    .into();

                    plot_ui.polygon(
                        Polygon::new(corners)
                            .fill_color(diverging_color(r))
                            .stroke(Stroke::NONE),
                    );
                }
            }
        });
}

/// Hover text for a heatmap cell: the column pair and its r value.
fn cell_label(columns: &[String], matrix: &[Vec<f64>], size: usize, point: &PlotPoint) -> String {
    if point.x < 0.0 || point.y < 0.0 {
        return String::new();
    }
    let col = point.x.floor() as usize;
    let row_from_bottom = point.y.floor() as usize;
    if col >= size || row_from_bottom >= size {
        return String::new();
    }
    let row = size - 1 - row_from_bottom;
    format!(
        "{} × {}: {:+.2}",
        columns[row], columns[col], matrix[row][col]
    )
}
