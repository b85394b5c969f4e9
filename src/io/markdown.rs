use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::io::delimited::split_record;
use crate::io::params::ParamRecord;

/// Renders CSV text as a grid-style Markdown table.
pub fn csv_to_markdown(content: &str) -> Result<String> {
    let mut rows: Vec<Vec<String>> = content
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| split_record(l.trim_end_matches('\r')))
        .collect();
    if rows.is_empty() {
        bail!("CSV has no header row");
    }
    let n_cols = rows.iter().map(Vec::len).max().unwrap_or(0);
    for row in rows.iter_mut() {
        row.resize(n_cols, String::new());
    }

    let widths: Vec<usize> = (0..n_cols)
        .map(|c| rows.iter().map(|r| r[c].chars().count()).max().unwrap_or(0))
        .collect();
    let numeric: Vec<bool> = (0..n_cols)
        .map(|c| {
            let mut cells = rows[1..].iter().map(|r| r[c].trim()).filter(|s| !s.is_empty());
            let mut any = false;
            let all = cells.all(|s| {
                any = true;
                s.parse::<f64>().is_ok()
            });
            any && all
        })
        .collect();

    let rule = |fill: char| -> String {
        let mut line = String::from("+");
        for w in &widths {
            line.push_str(&fill.to_string().repeat(w + 2));
            line.push('+');
        }
        line
    };
    let render_row = |row: &[String]| -> String {
        let mut line = String::from("|");
        for (c, cell) in row.iter().enumerate() {
            let pad = widths[c] - cell.chars().count();
            if numeric[c] {
                line.push_str(&format!(" {}{} |", " ".repeat(pad), cell));
            } else {
                line.push_str(&format!(" {}{} |", cell, " ".repeat(pad)));
            }
        }
        line
    };

    let mut out = String::new();
    out.push_str(&rule('-'));
    out.push('\n');
    out.push_str(&render_row(&rows[0]));
    out.push('\n');
    out.push_str(&rule('='));
    out.push('\n');
    for row in &rows[1..] {
        out.push_str(&render_row(row));
        out.push('\n');
        out.push_str(&rule('-'));
        out.push('\n');
    }
    Ok(out)
}

pub fn params_to_markdown(record: &ParamRecord) -> String {
    let mut out = String::from("This run used the following parameters:\n\n");
    for (name, value) in record.iter() {
        out.push_str(&format!("{} = {}\n", name, value));
    }
    out
}

pub fn write_markdown(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}
