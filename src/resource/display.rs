//! Table rendering for `--output table`

use super::fetcher::Resource;

/// Column definition
struct ColumnDef {
    header: &'static str,
    width: usize,
    value: fn(&Resource) -> String,
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef {
        header: "ID",
        width: 12,
        value: cell_id,
    },
    ColumnDef {
        header: "PARENT",
        width: 12,
        value: cell_parent,
    },
    ColumnDef {
        header: "PATH",
        width: 40,
        value: cell_path,
    },
    ColumnDef {
        header: "METHODS",
        width: 0,
        value: format_methods,
    },
];

fn cell_id(resource: &Resource) -> String {
    resource.id.clone()
}

fn cell_parent(resource: &Resource) -> String {
    resource.parent_id.clone().unwrap_or_else(|| "-".to_string())
}

fn cell_path(resource: &Resource) -> String {
    resource.path.clone()
}

fn format_methods(resource: &Resource) -> String {
    match &resource.resource_methods {
        Some(methods) if !methods.is_empty() => methods
            .keys()
            .map(|m| m.to_uppercase())
            .collect::<Vec<_>>()
            .join(","),
        _ => "-".to_string(),
    }
}

/// Truncate to `width` characters, marking the cut with `~`
fn fit(value: &str, width: usize) -> String {
    if width == 0 || value.chars().count() <= width {
        return value.to_string();
    }
    let mut cut: String = value.chars().take(width.saturating_sub(1)).collect();
    cut.push('~');
    cut
}

/// Render resources as a fixed-width table, sorted by path
pub fn render_table(resources: &[Resource]) -> String {
    let mut sorted: Vec<&Resource> = resources.iter().collect();
    sorted.sort_by(|a, b| a.path.cmp(&b.path));

    let mut lines = Vec::with_capacity(sorted.len() + 1);
    lines.push(render_row(COLUMNS.iter().map(|c| c.header.to_string())));

    for resource in sorted {
        lines.push(render_row(COLUMNS.iter().map(|c| (c.value)(resource))));
    }

    lines.join("\n")
}

fn render_row(cells: impl Iterator<Item = String>) -> String {
    let row: Vec<String> = COLUMNS
        .iter()
        .zip(cells)
        .map(|(column, cell)| {
            let cell = fit(&cell, column.width);
            if column.width == 0 {
                cell
            } else {
                format!("{:<width$}", cell, width = column.width)
            }
        })
        .collect();

    row.join("  ").trim_end().to_string()
}
