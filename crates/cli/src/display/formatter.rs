use implgen_core::{Diagnostic, GeneratedUnit, GenerationReport};

use crate::commands::inspect::TypeInspection;
use crate::sink::DirectorySink;

/// One line per diagnostic, frames innermost first
pub fn format_diagnostic(diagnostic: &Diagnostic) -> String {
    if diagnostic.trace.is_empty() {
        diagnostic.to_string()
    } else {
        format!("{} ({})", diagnostic, diagnostic.trace.join(" ← "))
    }
}

/// Status marker for a unit in listings
pub fn unit_status(unit: &GeneratedUnit) -> &'static str {
    if unit.is_success() {
        "✅"
    } else if unit.is_degenerate() {
        "❌"
    } else {
        "⚠️"
    }
}

pub fn print_report(report: &GenerationReport, sink: Option<&DirectorySink>) {
    for unit in &report.units {
        println!("{} {}", unit_status(unit), unit.identifier);
        for diagnostic in &unit.diagnostics {
            println!("   • {}", format_diagnostic(diagnostic));
        }
    }
    for (identifier, error) in &report.emission.sink_failures {
        println!("❌ {identifier}: {error}");
    }

    println!(
        "\n📦 {} units from {} candidates ({} cached, {} dropped)",
        report.units.len(),
        report.candidates,
        report.cache_hits,
        report.dropped
    );
    if let Some(sink) = sink {
        println!(
            "   • {} written, {} unchanged in {}",
            sink.written().len(),
            sink.unchanged().len(),
            sink.root().display()
        );
    }
    if report.cancelled {
        println!("   • cancelled before all candidates were processed");
    }
}

/// Units as they would be written, separated by a header line
pub fn print_units(units: &[GeneratedUnit]) {
    for (i, unit) in units.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("// ---- {} ----", unit.identifier);
        print!("{}", unit.text);
    }
}

pub fn print_inspection(inspections: &[TypeInspection]) {
    if inspections.is_empty() {
        println!("No marked types found");
        return;
    }

    for inspection in inspections {
        println!("🔍 {} → {}", inspection.type_name, inspection.identifier);
        if inspection.interfaces.is_empty() {
            println!("   (no target interfaces)");
        }
        for interface in &inspection.interfaces {
            println!("   {}", interface.interface);
            for member in &interface.members {
                println!("      {member}");
            }
            for diagnostic in &interface.diagnostics {
                println!("      ⚠️ {diagnostic}");
            }
        }
    }
}
