//! Minimal self-contained HTML report: a title block followed by sections
//! of free-form markup and inline plotly figures.
use std::fs;
use std::path::Path;

use maud::{html, Markup, PreEscaped, DOCTYPE};
use plotly::Plot;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.12.1.min.js";

pub struct ReportSection {
    title: String,
    content: Vec<Markup>,
    plots: usize,
}

impl ReportSection {
    pub fn new(title: &str) -> Self {
        ReportSection {
            title: title.to_string(),
            content: Vec::new(),
            plots: 0,
        }
    }

    pub fn add_content(&mut self, content: Markup) {
        self.content.push(content);
    }

    /// Embed `plot` as an inline `<div>` with a stable id.
    pub fn add_plot(&mut self, plot: Plot) {
        self.plots += 1;
        let id = format!(
            "{}-plot-{}",
            self.title.to_lowercase().replace(' ', "-"),
            self.plots
        );
        self.content.push(PreEscaped(plot.to_inline_html(Some(&id))));
    }
}

pub struct Report {
    title: String,
    version: String,
    sections: Vec<ReportSection>,
}

impl Report {
    pub fn new(title: &str, version: &str) -> Self {
        Report {
            title: title.to_string(),
            version: version.to_string(),
            sections: Vec::new(),
        }
    }

    pub fn add_section(&mut self, section: ReportSection) {
        self.sections.push(section);
    }

    pub fn render(&self) -> Markup {
        let generated = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="utf-8";
                    title { (self.title) }
                    script src=(PLOTLY_CDN) {}
                    style {
                        "body { font-family: sans-serif; margin: 2em auto; max-width: 960px; }
                        table { border-collapse: collapse; }
                        td, th { border: 1px solid #ddd; padding: 4px 10px; text-align: left; }
                        .meta { color: #777; }"
                    }
                }
                body {
                    h1 { (self.title) }
                    p class="meta" { "Generated " (generated.to_string()) " by abacus " (self.version) }
                    @for section in &self.sections {
                        section {
                            h2 { (section.title) }
                            @for block in &section.content {
                                div class="block" { (block) }
                            }
                        }
                    }
                }
            }
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        fs::write(path, self.render().into_string())
    }
}
