//! Display formatting for field values.

pub const DEFAULT_PRECISION: usize = 6;
pub const DEFAULT_INTEGER_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormatOptions {
    /// Decimal places kept for non-integral values.
    pub precision: usize,
    /// Values this close to an integer are shown as that integer.
    pub integer_tolerance: f64,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            integer_tolerance: DEFAULT_INTEGER_TOLERANCE,
        }
    }
}

impl FormatOptions {
    pub fn format(&self, value: Option<f64>) -> String {
        let Some(v) = value else {
            return String::new();
        };
        let rounded = v.round();
        if (v - rounded).abs() < self.integer_tolerance {
            return format_fixed(rounded, 0);
        }
        format_fixed(v, self.precision)
    }
}

/// Format with the default options.
pub fn format_value(value: Option<f64>) -> String {
    FormatOptions::default().format(value)
}

fn format_fixed(v: f64, precision: usize) -> String {
    let text = format!("{v:.precision$}");
    let text = if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    };
    if text == "-0" { "0".to_string() } else { text }
}
