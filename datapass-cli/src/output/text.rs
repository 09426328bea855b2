//! Text output formatting with progress bars and colors.

use datapass_carriers::CarrierDescriptor;
use datapass_core::{FetchOutcome, UsageReading};
use datapass_store::TrackedInstance;
use datapass_widget::{Severity, UpdateReport};

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const BLUE: &str = "\x1b[34m";

// Progress bar characters
const BAR_FULL: char = '█';
const BAR_EMPTY: char = '░';

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
    bar_width: usize,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self {
            use_colors,
            bar_width: 20,
        }
    }

    /// Set the progress bar width.
    #[allow(dead_code)]
    pub fn with_bar_width(mut self, width: usize) -> Self {
        self.bar_width = width;
        self
    }

    /// Formats one fetch outcome.
    pub fn format_outcome(&self, carrier: &str, outcome: &FetchOutcome) -> String {
        let header = self.bold(carrier);
        match outcome {
            FetchOutcome::Success(reading) => {
                format!("{header}\n{}", self.format_reading(reading))
            }
            FetchOutcome::Wasted => format!(
                "{header}\n  {} {}",
                self.progress_bar(100),
                self.red("Data volume used up")
            ),
            FetchOutcome::Error => format!(
                "{header}: {} - the datapass page could not be read",
                self.red("Error")
            ),
            FetchOutcome::CarrierUnavailable => {
                format!("{header}: {}", self.yellow("Carrier not supported"))
            }
            FetchOutcome::CarrierNotSelected => {
                format!("{header}: {}", self.yellow("No carrier selected"))
            }
        }
    }

    /// Formats a successful reading.
    pub fn format_reading(&self, reading: &UsageReading) -> String {
        let percent = reading.wasted_percentage();
        let mut lines = vec![format!(
            "  {} {} used  {} {}",
            self.progress_bar(percent),
            self.color_for_percent(percent, &format!("{percent:>3}%")),
            reading.proportion_text(),
            reading.unit()
        )];

        let updated = reading.last_update_text();
        if !updated.is_empty() {
            lines.push(format!("  {}", self.dim(&format!("Carrier update: {updated}"))));
        }

        lines.join("\n")
    }

    /// Formats the result of a widget update.
    pub fn format_report(&self, report: &UpdateReport) -> String {
        let display = &report.display;
        let bar = self.severity_color(display.severity, &self.bar(display.percentage));

        let mut line = format!(
            "{:<4} {:<20} {} {:>3}%",
            report.instance_id,
            report.carrier,
            bar,
            display.percentage
        );
        if !display.proportion.is_empty() {
            line.push_str(&format!("  {} {}", display.proportion, display.unit));
        }
        if !display.hint.is_empty() {
            line.push_str(&format!("  {}", self.yellow(&display.hint)));
        }
        line.push_str(&format!(
            "  {}",
            self.dim(&format!("({}, {})", report.mode, report.outcome.label()))
        ));
        line
    }

    /// Formats carrier list header.
    pub fn format_carriers_header(&self) -> String {
        format!(
            "{:<12} {:<10} {:<12} {}",
            self.bold("Carrier"),
            self.bold("CLI"),
            self.bold("Operator"),
            self.bold("Imprint check")
        )
    }

    /// Formats a single carrier line.
    pub fn format_carrier_line(&self, desc: &CarrierDescriptor) -> String {
        let imprint = if desc.expects_provider_marker {
            self.green("✓")
        } else {
            self.dim("−")
        };

        format!(
            "{:<12} {:<10} {:<12} {}",
            desc.display_name, desc.cli_name, desc.operator_marker, imprint
        )
    }

    /// Formats the tracked widget list.
    pub fn format_instances(&self, instances: &[TrackedInstance]) -> String {
        if instances.is_empty() {
            return self.dim("No widgets tracked");
        }

        let mut lines = vec![format!("{:<6} {}", self.bold("Id"), self.bold("Carrier"))];
        for instance in instances {
            lines.push(format!("{:<6} {}", instance.id, instance.carrier));
        }
        lines.join("\n")
    }

    /// Formats an error message.
    pub fn format_error(&self, carrier: &str, error: &str) -> String {
        format!("{}: {} - {}", self.bold(carrier), self.red("Error"), error)
    }

    /// Renders a bar for `percent_used`, colored by how much is left.
    pub fn progress_bar(&self, percent_used: u8) -> String {
        let bar = self.bar(percent_used);
        self.color_for_percent(percent_used, &bar)
    }

    #[allow(clippy::cast_possible_truncation)]
    #[allow(clippy::cast_sign_loss)]
    #[allow(clippy::cast_precision_loss)]
    fn bar(&self, percent_used: u8) -> String {
        let percent = f64::from(percent_used.min(100));
        let filled = ((percent / 100.0) * self.bar_width as f64).round() as usize;
        let empty = self.bar_width.saturating_sub(filled);

        format!(
            "{}{}",
            BAR_FULL.to_string().repeat(filled),
            BAR_EMPTY.to_string().repeat(empty)
        )
    }

    // ========================================================================
    // Color/style helpers
    // ========================================================================

    fn color_for_percent(&self, percent_used: u8, text: &str) -> String {
        if !self.use_colors {
            return text.to_string();
        }

        if percent_used >= 80 {
            self.red(text)
        } else if percent_used >= 50 {
            self.yellow(text)
        } else {
            self.green(text)
        }
    }

    fn severity_color(&self, severity: Severity, text: &str) -> String {
        match severity {
            Severity::Normal => self.blue(text),
            Severity::Warning => self.yellow(text),
            Severity::Neutral => self.dim(text),
        }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.use_colors {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }

    fn blue(&self, text: &str) -> String {
        self.paint(BLUE, text)
    }
}
