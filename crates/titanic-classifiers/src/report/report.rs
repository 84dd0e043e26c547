use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use maud::{html, Markup, PreEscaped, DOCTYPE};
use plotly::Plot;

use crate::config::PipelineConfig;
use crate::pipeline::PipelineOutcome;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.12.1.min.js";

const STYLE: &str = "
body { font-family: sans-serif; margin: 2em auto; max-width: 1100px; color: #222; }
header { border-bottom: 2px solid #ddd; margin-bottom: 1em; }
.meta { color: #666; font-size: 0.9em; }
table { border-collapse: collapse; margin: 1em 0; }
th, td { border: 1px solid #ccc; padding: 4px 10px; text-align: right; }
th:first-child, td:first-child { text-align: left; }
.code-container { background-color: #f5f5f5; padding: 10px; border-radius: 5px; overflow-x: auto; font-family: monospace; white-space: pre-wrap; }
";

/// One titled block of the report: free markup and embedded plots in
/// insertion order.
pub struct ReportSection {
    title: String,
    blocks: Vec<Markup>,
    n_plots: usize,
}

impl ReportSection {
    pub fn new(title: &str) -> Self {
        ReportSection {
            title: title.to_string(),
            blocks: Vec::new(),
            n_plots: 0,
        }
    }

    pub fn add_content(&mut self, content: Markup) {
        self.blocks.push(content);
    }

    pub fn add_plot(&mut self, plot: Plot) {
        let id = format!(
            "{}-plot-{}",
            self.title.to_lowercase().replace(' ', "-"),
            self.n_plots
        );
        self.n_plots += 1;
        self.blocks
            .push(PreEscaped(plot.to_inline_html(Some(id.as_str()))));
    }
}

/// Standalone HTML report; plots load plotly.js from the CDN.
pub struct Report {
    title: String,
    version: String,
    subtitle: String,
    generated: String,
    sections: Vec<ReportSection>,
}

impl Report {
    pub fn new(title: &str, version: &str, subtitle: &str) -> Self {
        Report {
            title: title.to_string(),
            version: version.to_string(),
            subtitle: subtitle.to_string(),
            generated: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            sections: Vec::new(),
        }
    }

    pub fn add_section(&mut self, section: ReportSection) {
        self.sections.push(section);
    }

    pub fn render(&self) -> Markup {
        html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="utf-8";
                    title { (self.title) }
                    script src=(PLOTLY_CDN) {}
                    style { (PreEscaped(STYLE)) }
                }
                body {
                    header {
                        h1 { (self.title) }
                        h3 { (self.subtitle) }
                        p class="meta" {
                            "Version " (self.version) " | Generated " (self.generated)
                        }
                    }
                    @for part in &self.sections {
                        section {
                            h2 { (part.title) }
                            @for block in &part.blocks {
                                div { (block) }
                            }
                        }
                    }
                }
            }
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create output directory: {}", parent.display())
                })?;
            }
        }
        fs::write(path, self.render().into_string())
            .with_context(|| format!("Failed to write report: {}", path.display()))
    }
}

/// Assemble the run report: overview, model, sample passengers, plots and
/// the configuration used.
pub fn build_report(
    outcome: &PipelineOutcome,
    config: &PipelineConfig,
    plots: Vec<(&str, Plot)>,
) -> Result<Report> {
    let mut report = Report::new(
        "Titanic Survival",
        env!("CARGO_PKG_VERSION"),
        "Logistic Regression Report",
    );

    let mut overview = ReportSection::new("Overview");
    overview.add_content(html! {
        p {
            "Passengers: " (outcome.table.n_rows())
            ", train split: " (outcome.split.train.len())
            ", test split: " (outcome.split.test.len())
            " (seed " (config.seed) ")."
        }
        p { "Missing ages filled with the mean age " (format!("{:.4}", outcome.age_fill_value)) "." }
        table {
            tr { th { "Split" } th { "Accuracy" } }
            tr { td { "Train" } td { (format!("{:.4}", outcome.train_score)) } }
            tr { td { "Test" } td { (format!("{:.4}", outcome.test_score)) } }
        }
    });
    report.add_section(overview);

    let metrics = &outcome.test_metrics;
    let coefficients = outcome.model.coefficients();
    let mut model = ReportSection::new("Model");
    model.add_content(html! {
        table {
            tr { th { "Feature" } th { "Coefficient" } th { "Scaler mean" } th { "Scaler std" } }
            @for (idx, name) in outcome.feature_names.iter().enumerate() {
                tr {
                    td { (name) }
                    td { (format!("{:.6}", coefficients[idx])) }
                    td { (format!("{:.4}", outcome.scaler.mean[idx])) }
                    td { (format!("{:.4}", outcome.scaler.std[idx])) }
                }
            }
            tr { td { "intercept" } td { (format!("{:.6}", outcome.model.intercept())) } td {} td {} }
        }
        h4 { "Test split" }
        table {
            tr { th {} th { "Predicted died" } th { "Predicted survived" } }
            tr { td { "Died" } td { (metrics.true_negatives) } td { (metrics.false_positives) } }
            tr { td { "Survived" } td { (metrics.false_negatives) } td { (metrics.true_positives) } }
        }
        table {
            tr { th { "Precision" } th { "Recall" } th { "F1" } }
            tr {
                td { (format!("{:.4}", metrics.precision)) }
                td { (format!("{:.4}", metrics.recall)) }
                td { (format!("{:.4}", metrics.f1)) }
            }
        }
    });
    report.add_section(model);

    let samples = &outcome.samples;
    let mut passengers = ReportSection::new("Sample Passengers");
    passengers.add_content(html! {
        table {
            tr {
                th { "Name" }
                @for name in &outcome.feature_names { th { (name) } }
                th { "Prediction" } th { "P(died)" } th { "P(survived)" }
            }
            @for (idx, name) in samples.names.iter().enumerate() {
                tr {
                    td { (name) }
                    @for value in samples.features.row(idx) { td { (value) } }
                    td { (samples.predictions[idx]) }
                    td { (format!("{:.4}", samples.probabilities[(idx, 0)])) }
                    td { (format!("{:.4}", samples.probabilities[(idx, 1)])) }
                }
            }
        }
    });
    report.add_section(passengers);

    let mut figures = ReportSection::new("Plots");
    for (_, plot) in plots {
        figures.add_plot(plot);
    }
    report.add_section(figures);

    let config_json = serde_json::to_string_pretty(config)?;
    let mut config_section = ReportSection::new("Configuration");
    config_section.add_content(html! {
        div class="code-container" {
            pre { code { (config_json) } }
        }
    });
    report.add_section(config_section);

    Ok(report)
}
