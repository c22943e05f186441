use plotly::common::{Line, Mode};
use plotly::layout::{Axis, Layout};
use plotly::{Plot, Scatter};

use crate::stats::History;

/// Plot the per-epoch curve of `metric` and, when recorded, its
/// `val_`-prefixed validation counterpart.
///
/// # Arguments
///
/// * `history` - Training history returned by a fit
/// * `metric` - Training metric name, e.g. `loss` or `accuracy`
/// * `title` - The title of the plot
/// * `y_title` - The y-axis label
pub fn plot_history_metric(
    history: &History,
    metric: &str,
    title: &str,
    y_title: &str,
) -> Result<Plot, String> {
    let train = history
        .get(metric)
        .ok_or_else(|| format!("Metric '{}' was not recorded", metric))?;
    let epochs: Vec<f64> = (1..=train.len()).map(|e| e as f64).collect();

    let mut plot = Plot::new();
    plot.add_trace(
        Scatter::new(epochs.clone(), train.to_vec())
            .name("Train")
            .mode(Mode::Lines)
            .line(Line::new().color("rgba(31, 119, 180, 1.0)")),
    );

    if let Some(val) = history.get(&format!("val_{}", metric)) {
        plot.add_trace(
            Scatter::new(epochs, val.to_vec())
                .name("Validation")
                .mode(Mode::Lines)
                .line(Line::new().color("rgba(255, 127, 14, 1.0)")),
        );
    }

    plot.set_layout(
        Layout::new()
            .title(title)
            .x_axis(Axis::new().title("Epoch"))
            .y_axis(Axis::new().title(y_title)),
    );

    Ok(plot)
}
