//! Report rendering
//!
//! The organizer never prints; callers hand a [`MoveSink`] the finished
//! report and decide where it goes.

use crate::plan::PlannedMove;
use crate::process::RunReport;
use crossterm::style::Stylize;
use std::io::{self, Write};
use unicode_width::UnicodeWidthStr;

/// Something that can present a list of moves
pub trait MoveSink {
    fn render_moves(&mut self, title: &str, moves: &[PlannedMove]) -> io::Result<()>;
}

/// Box-drawn two column table (From / To) truncated to `limit` rows
pub struct TableRenderer<W: Write> {
    out: W,
    limit: usize,
    color: bool,
}

impl<W: Write> TableRenderer<W> {
    pub fn new(out: W, limit: usize) -> Self {
        Self {
            out,
            limit,
            color: false,
        }
    }

    /// Enable ANSI styling for the title and the summary row
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn border(&mut self, left: &str, mid: &str, right: &str, widths: [usize; 2]) -> io::Result<()> {
        writeln!(
            self.out,
            "{left}{}{mid}{}{right}",
            "─".repeat(widths[0] + 2),
            "─".repeat(widths[1] + 2)
        )
    }

    fn row(&mut self, cells: [&str; 2], widths: [usize; 2], dim: bool) -> io::Result<()> {
        let mut padded = [String::new(), String::new()];
        for (i, cell) in cells.iter().enumerate() {
            let fill = widths[i].saturating_sub(cell.width());
            padded[i] = format!("{cell}{}", " ".repeat(fill));
        }
        if dim && self.color {
            writeln!(self.out, "│ {} │ {} │", padded[0].as_str().dark_grey(), padded[1].as_str().dark_grey())
        } else {
            writeln!(self.out, "│ {} │ {} │", padded[0], padded[1])
        }
    }
}

impl<W: Write> MoveSink for TableRenderer<W> {
    fn render_moves(&mut self, title: &str, moves: &[PlannedMove]) -> io::Result<()> {
        let shown: Vec<(String, String)> = moves
            .iter()
            .take(self.limit)
            .map(|m| {
                (
                    m.source().display().to_string(),
                    m.destination().display().to_string(),
                )
            })
            .collect();
        let overflow = (moves.len() > self.limit).then(|| format!("({} total)", moves.len()));

        let mut widths = ["From".width(), "To".width()];
        for (from, to) in &shown {
            widths[0] = widths[0].max(from.width());
            widths[1] = widths[1].max(to.width());
        }
        if let Some(total) = &overflow {
            widths[0] = widths[0].max("...".width());
            widths[1] = widths[1].max(total.width());
        }

        if self.color {
            writeln!(self.out, "{}", title.bold())?;
        } else {
            writeln!(self.out, "{title}")?;
        }
        self.border("┌", "┬", "┐", widths)?;
        self.row(["From", "To"], widths, false)?;
        self.border("├", "┼", "┤", widths)?;
        for (from, to) in &shown {
            self.row([from.as_str(), to.as_str()], widths, false)?;
        }
        if let Some(total) = &overflow {
            self.row(["...", total.as_str()], widths, true)?;
        }
        self.border("└", "┴", "┘", widths)?;
        self.out.flush()
    }
}

/// Table title for a run
pub fn report_title(report: &RunReport) -> &'static str {
    if report.is_dry_run() {
        "Planned moves"
    } else {
        "Executed moves"
    }
}

/// Render a run report through `sink`
pub fn render_report(sink: &mut dyn MoveSink, report: &RunReport) -> io::Result<()> {
    sink.render_moves(report_title(report), report.plan.moves())
}

/// One-line outcome shown under the table
pub fn summary_line(report: &RunReport) -> String {
    if report.is_dry_run() {
        format!(
            "Dry run: {} move(s) planned, nothing changed. Re-run with --do-it to apply.",
            report.plan.len()
        )
    } else {
        format!("{} of {} move(s) applied.", report.applied, report.plan.len())
    }
}
