//! HTML reporting for finished experiments.
pub mod builder;
pub mod plots;

use maud::html;

use crate::config::ModelConfig;
use crate::runner::ExperimentResult;

pub use builder::{Report, ReportSection};
pub use plots::plot_history_metric;

/// Build the experiment report: a summary table, the loss and accuracy
/// curves, and the configuration the run used.
pub fn build_html_report(result: &ExperimentResult, config: &ModelConfig) -> Report {
    let mut report = Report::new("Abacus Experiment Report", env!("CARGO_PKG_VERSION"));

    /* Section 1: Summary */
    {
        let mut summary = ReportSection::new("Summary");
        summary.add_content(html! {
            table {
                tr { th { "Test accuracy" } td { (format!("{:.4}", result.test_accuracy)) } }
                tr { th { "Test loss" } td { (format!("{:.4}", result.test_loss)) } }
                tr { th { "Epochs" } td { (result.training_history.epochs()) } }
                tr { th { "Features" } td { (result.feature_columns.join(", ")) } }
                @for (label, code) in result.target_map.entries() {
                    tr { th { "Class " (code) } td { (label) } }
                }
            }
        });
        report.add_section(summary);
    }

    /* Section 2: Training curves */
    {
        let mut curves = ReportSection::new("Training");
        curves.add_content(html! {
            "Per-epoch metrics on the fitting rows and on the validation rows held out by the fitting procedure."
        });
        for (metric, title, y_title) in [
            ("loss", "Loss Over Epochs", "Binary cross-entropy"),
            ("accuracy", "Accuracy Over Epochs", "Accuracy"),
        ] {
            match plot_history_metric(&result.training_history, metric, title, y_title) {
                Ok(plot) => curves.add_plot(plot),
                Err(e) => log::warn!("Skipping {} plot: {}", metric, e),
            }
        }
        report.add_section(curves);
    }

    /* Section 3: Configuration */
    {
        let mut config_section = ReportSection::new("Configuration");
        let json = serde_json::to_string_pretty(config).unwrap_or_default();
        config_section.add_content(html! {
            pre { code { (json) } }
        });
        report.add_section(config_section);
    }

    report
}
