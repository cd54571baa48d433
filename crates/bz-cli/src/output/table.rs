/// Layout options for terminal tables.
#[derive(Clone, Copy, Debug)]
pub struct TableOptions {
    pub max_width: Option<usize>,
    pub color: bool,
}

const MIN_WIDTH: usize = 4;
const GAP: &str = "  ";

/// Render an aligned table; numeric cells are right-aligned.
#[must_use]
pub fn render_table(headers: &[&str], rows: &[Vec<String>], options: TableOptions) -> String {
    let mut widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            rows.iter()
                .filter_map(|row| row.get(index))
                .map(|cell| display_width(cell.as_str()))
                .chain([display_width(header), MIN_WIDTH])
                .max()
                .unwrap_or(MIN_WIDTH)
        })
        .collect();
    shrink_to(&mut widths, options.max_width);

    let header_line = join_line(headers.iter().zip(&widths).map(|(header, width)| {
        let text = truncate(header, *width);
        align(&text, display_width(&text), *width, false)
    }));
    let divider = "-".repeat(display_width(&header_line));

    let mut lines = vec![header_line, divider];
    for row in rows {
        lines.push(join_line(widths.iter().enumerate().map(|(index, width)| {
            let cell = truncate(row.get(index).map_or("-", String::as_str), *width);
            let shown = if options.color { colorize(&cell) } else { cell.clone() };
            align(&shown, display_width(&cell), *width, is_numeric(&cell))
        })));
    }
    lines.join("\n")
}

fn join_line(cells: impl Iterator<Item = String>) -> String {
    cells.collect::<Vec<_>>().join(GAP).trim_end().to_string()
}

/// Narrow the widest columns one character at a time until the row fits.
fn shrink_to(widths: &mut [usize], max_width: Option<usize>) {
    let Some(max_width) = max_width else {
        return;
    };
    let gaps = widths.len().saturating_sub(1) * GAP.len();
    while widths.iter().sum::<usize>() + gaps > max_width {
        let Some(widest) = widths
            .iter_mut()
            .filter(|width| **width > MIN_WIDTH)
            .max_by_key(|width| **width)
        else {
            break;
        };
        *widest -= 1;
    }
}

fn display_width(value: &str) -> usize {
    value.chars().count()
}

fn truncate(value: &str, width: usize) -> String {
    if display_width(value) <= width {
        return value.to_string();
    }
    let mut out: String = value.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Pad `value` to `width`; `visible` excludes ANSI escapes.
fn align(value: &str, visible: usize, width: usize, right: bool) -> String {
    let fill = " ".repeat(width.saturating_sub(visible));
    if right {
        format!("{fill}{value}")
    } else {
        format!("{value}{fill}")
    }
}

fn is_numeric(value: &str) -> bool {
    !value.is_empty() && value.parse::<f64>().is_ok()
}

fn colorize(value: &str) -> String {
    let code = match value {
        "ok" | "true" => "32",
        "failed" | "false" | "missing" => "31",
        _ => return value.to_string(),
    };
    format!("\u{1b}[{code}m{value}\u{1b}[0m")
}
