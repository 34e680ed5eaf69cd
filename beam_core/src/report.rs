//! Plain-text report of an analysis summary.

use std::fmt;

use crate::analysis::{AnalysisSummary, Peak, ReactionKind};
use crate::units::UnitSystem;

/// Render a textual summary with unit labels.
#[must_use]
pub fn render(summary: &AnalysisSummary, units: UnitSystem) -> String {
    Report { summary, units }.to_string()
}

/// Display adapter over a summary
pub struct Report<'a> {
    pub summary: &'a AnalysisSummary,
    pub units: UnitSystem,
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.summary;
        let u = self.units;

        let title = if s.label.is_empty() { "Beam" } else { s.label.as_str() };
        writeln!(f, "{} ({}, L = {} {})", title, s.configuration, s.length, u.length_unit())?;

        writeln!(f, "Reactions:")?;
        for reaction in &s.reactions {
            let unit = match reaction.kind {
                ReactionKind::FixedMoment => u.moment_unit(),
                _ => u.force_unit(),
            };
            writeln!(
                f,
                "  {:<18} x = {:<8} {:+.4} {}  [{}]",
                reaction.kind.display_name(),
                reaction.location,
                reaction.value,
                unit,
                reaction.exact
            )?;
        }

        writeln!(f, "Peaks (max |value|):")?;
        write_peak(f, "Axial", &s.axial_peak, u.force_unit(), u)?;
        write_peak(f, "Shear", &s.shear_peak, u.force_unit(), u)?;
        write_peak(f, "Moment", &s.moment_peak, u.moment_unit(), u)?;
        write_peak(f, "Load", &s.load_peak, u.distributed_unit(), u)?;

        if s.balanced {
            writeln!(f, "Equilibrium: satisfied exactly")
        } else {
            writeln!(f, "Equilibrium: NOT satisfied")
        }
    }
}

fn write_peak(f: &mut fmt::Formatter<'_>, name: &str, peak: &Peak, unit: &str, units: UnitSystem) -> fmt::Result {
    writeln!(
        f,
        "  {:<7} {:+.4} {} at x = {:.4} {}",
        name,
        peak.value,
        unit,
        peak.position,
        units.length_unit()
    )
}
