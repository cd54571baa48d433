use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => render_table(&serde_json::to_value(value)?),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

fn options() -> table::TableOptions {
    let prefs = ui::prefs();
    table::TableOptions {
        max_width: prefs.term_width,
        color: prefs.table_color,
    }
}

/// Arrays of objects become one row per item; an object becomes key/value rows.
fn render_table(value: &Value) -> anyhow::Result<String> {
    match value {
        Value::Array(items) if items.is_empty() => Ok(String::from("(no rows)")),
        Value::Array(items) if items.iter().all(Value::is_object) => {
            let mut headers = Vec::<&str>::new();
            for key in items.iter().filter_map(Value::as_object).flat_map(|m| m.keys()) {
                if !headers.contains(&key.as_str()) {
                    headers.push(key);
                }
            }
            let rows: Vec<Vec<String>> = items
                .iter()
                .filter_map(Value::as_object)
                .map(|map| {
                    headers
                        .iter()
                        .map(|header| map.get(*header).map_or_else(|| String::from("-"), cell))
                        .collect()
                })
                .collect();
            Ok(table::render_table(&headers, &rows, options()))
        }
        Value::Array(items) => {
            let rows: Vec<Vec<String>> = items.iter().map(|item| vec![cell(item)]).collect();
            Ok(table::render_table(&["value"], &rows, options()))
        }
        Value::Object(map) => {
            let rows: Vec<Vec<String>> = map
                .iter()
                .map(|(key, value)| vec![key.clone(), cell(value)])
                .collect();
            Ok(table::render_table(&["key", "value"], &rows, options()))
        }
        scalar => Ok(cell(scalar)),
    }
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::String(text) => text.clone(),
        Value::Array(items) if items.iter().all(Value::is_string) => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde::Serialize;

    use super::render;
    use crate::cli::OutputFormat;

    #[derive(Serialize)]
    struct Row {
        layer: &'static str,
        features: u32,
        propagate: Vec<&'static str>,
    }

    fn row() -> Row {
        Row {
            layer: "mod_cur",
            features: 7,
            propagate: vec!["mod_cur", "mo_cu_fldC"],
        }
    }

    #[test]
    fn json_render_is_valid_json() {
        let out = render(&row(), OutputFormat::Json).expect("json render should work");
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("json should parse");
        assert_eq!(parsed["layer"], "mod_cur");
        assert_eq!(parsed["features"], 7);
    }

    #[test]
    fn raw_render_is_single_line_json() {
        let out = render(&row(), OutputFormat::Raw).expect("raw render should work");
        assert!(!out.contains('\n'));
    }

    #[test]
    fn table_render_for_object_is_key_value() {
        let out = render(&row(), OutputFormat::Table).expect("table render should work");
        assert!(out.lines().next().is_some_and(|line| line.starts_with("key")));
        assert!(out.contains("mod_cur,mo_cu_fldC"));
    }

    #[test]
    fn table_render_for_array_has_one_row_per_item() {
        let out = render(&vec![row(), row()], OutputFormat::Table).expect("table render should work");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("features"));
    }

    #[test]
    fn empty_array_renders_placeholder() {
        let out = render(&Vec::<u8>::new(), OutputFormat::Table).unwrap();
        assert_eq!(out, "(no rows)");
    }
}
