use itertools::Itertools;

/// Renders a result row as tab-separated values that
/// [`split_line`](crate::facts::split_line) reads back unchanged.
pub fn join_line<S: AsRef<str>>(values: &[S]) -> String {
    values.iter().map(|value| escape(value.as_ref())).join("\t")
}

fn escape(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    if escaped.is_empty() || escaped.contains(char::is_whitespace) {
        format!("\"{}\"", escaped)
    } else {
        escaped
    }
}
