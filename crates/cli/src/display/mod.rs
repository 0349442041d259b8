pub mod formatter;

pub use formatter::{format_diagnostic, print_inspection, print_report, print_units, unit_status};
