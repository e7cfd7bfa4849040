//! Plain-text rendering of table views.

use pagewise_paging::{NavControl, TableView};

/// Fill character for skeleton cells.
const SKELETON: char = '░';

/// Render `view` as an aligned text table followed by its controls and footer.
pub fn render_table(
    title: &str,
    view: &TableView,
    controls: &[NavControl],
    footer: &str,
) -> String {
    let widths = column_widths(view);
    let mut lines = vec![title.to_owned()];

    let labels: Vec<&str> = view.headers.iter().map(|header| header.label.as_str()).collect();
    lines.push(row_line(&labels, &widths));
    lines.push(
        widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join("-+-"),
    );

    for row in &view.rows {
        let cells: Vec<&str> = row.cells.iter().map(|(_, value)| value.as_str()).collect();
        lines.push(row_line(&cells, &widths));
    }

    for placeholder in &view.placeholder_rows {
        let cells: Vec<String> = placeholder
            .widths
            .iter()
            .map(|width| SKELETON.to_string().repeat(*width))
            .collect();
        let cells: Vec<&str> = cells.iter().map(String::as_str).collect();
        lines.push(row_line(&cells, &widths));
    }

    if let Some(label) = &view.empty_state_label {
        lines.push(label.clone());
    }
    if let Some(notice) = &view.error_notice {
        lines.push(notice.clone());
    }

    let buttons = render_controls(controls);
    if !buttons.is_empty() {
        lines.push(buttons);
    }
    if !footer.is_empty() {
        lines.push(footer.to_owned());
    }

    lines.join("\n")
}

/// `[label]` for enabled controls, `(label)` for disabled ones, with a
/// trailing `…` while busy.
pub fn render_controls(controls: &[NavControl]) -> String {
    controls
        .iter()
        .map(|control| {
            let busy = if control.busy { "…" } else { "" };
            if control.enabled {
                format!("[{}{busy}]", control.action.label())
            } else {
                format!("({}{busy})", control.action.label())
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn column_widths(view: &TableView) -> Vec<usize> {
    view.headers
        .iter()
        .enumerate()
        .map(|(column, header)| {
            let cells = view
                .rows
                .iter()
                .filter_map(|row| row.cells.get(column))
                .map(|(_, value)| value.chars().count());
            let skeletons = view
                .placeholder_rows
                .iter()
                .filter_map(|placeholder| placeholder.widths.get(column).copied());

            cells
                .chain(skeletons)
                .fold(header.label.chars().count(), usize::max)
        })
        .collect()
}

fn row_line(cells: &[&str], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join(" | ")
        .trim_end()
        .to_owned()
}
