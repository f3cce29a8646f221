use querychart_common::value::CellValue;

/// Escape HTML special characters
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Escape string cells; other cells are returned unchanged
pub fn escape_value(value: &CellValue) -> CellValue {
    match value {
        CellValue::String(s) => CellValue::String(escape_html(s)),
        other => other.clone(),
    }
}
