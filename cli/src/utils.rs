//! File loading and table rendering.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use gymdesk_shared::{DraftOrganization, LogoFile};

/// MIME type guessed from the file extension.
pub fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// Reads a logo file into memory.
pub fn read_logo(path: &Path) -> Result<LogoFile> {
    let bytes = fs::read(path).with_context(|| format!("failed to read logo {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "logo".to_string());
    Ok(LogoFile::new(file_name, content_type_for(path), bytes))
}

/// Reads a JSON draft file.
pub fn read_draft(path: &Path) -> Result<DraftOrganization> {
    let raw = fs::read_to_string(path).with_context(|| format!("failed to read draft {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid draft JSON in {}", path.display()))
}

/// Left-aligned plain-text table.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (idx, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(idx) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let render_row = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}", width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(render_row(headers.to_vec()));
    lines.push(
        widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in rows {
        lines.push(render_row(row.iter().map(String::as_str).collect()));
    }
    lines.join("\n")
}

/// `—` stands in for missing values in tables.
pub fn or_dash(value: Option<&str>) -> String {
    match value {
        Some(value) if !value.trim().is_empty() => value.to_string(),
        _ => "—".to_string(),
    }
}
