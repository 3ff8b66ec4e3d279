//! Standalone insertions: dividers, headings, timestamps, links, tables and
//! uploaded attachments.

use chrono::{Datelike, Timelike};

use super::{Context, Insertion};
use crate::upload::UploadEntry;

const DIVIDER: &str = "\n------------\n\n";

/// Full-width (ideographic) space used for paragraph indentation.
pub const INDENT: &str = "\u{3000}";

const WEEKDAYS: [&str; 7] = [
    "星期日", "星期一", "星期二", "星期三", "星期四", "星期五", "星期六",
];

pub const DEFAULT_LINK_TITLE: &str = "Test";
pub const DEFAULT_LINK_URL: &str = "http://";
pub const DEFAULT_TABLE_DIMENSION: usize = 3;
pub const MAX_TABLE_DIMENSION: usize = 100;

fn newline_if(mid_line: bool) -> &'static str {
    if mid_line {
        "\n"
    } else {
        ""
    }
}

fn paragraph_if(mid_line: bool) -> &'static str {
    if mid_line {
        "\n\n"
    } else {
        ""
    }
}

pub fn divider(ctx: &Context<'_>) -> Insertion {
    Insertion::new(format!("{}{DIVIDER}", newline_if(ctx.mid_line())))
}

/// `field` is the literal heading prefix, e.g. `"## "`.
pub fn heading(title: &str, field: &str, ctx: &Context<'_>) -> Insertion {
    Insertion::new(format!("{}{field}{title}", paragraph_if(ctx.mid_line())))
}

/// `YYYY/MM/DD HH:MM:SS 星期X` followed by a newline.
pub fn timestamp<T: Datelike + Timelike>(now: &T, ctx: &Context<'_>) -> Insertion {
    let weekday = WEEKDAYS[now.weekday().num_days_from_sunday() as usize];
    Insertion::new(format!(
        "{}{:04}/{:02}/{:02} {:02}:{:02}:{:02} {weekday}\n",
        newline_if(ctx.mid_line()),
        now.year(),
        now.month(),
        now.day(),
        now.hour(),
        now.minute(),
        now.second(),
    ))
}

pub fn indent() -> Insertion {
    Insertion::new(INDENT)
}

/// Title and target of a link or image, with blank fields defaulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSpec {
    pub title: String,
    pub url: String,
}

impl LinkSpec {
    pub fn new(title: &str, url: &str) -> Self {
        let pick = |value: &str, default: &str| {
            let value = value.trim();
            if value.is_empty() {
                default.to_string()
            } else {
                value.to_string()
            }
        };
        Self {
            title: pick(title, DEFAULT_LINK_TITLE),
            url: pick(url, DEFAULT_LINK_URL),
        }
    }
}

pub fn link(spec: &LinkSpec) -> Insertion {
    Insertion::new(format!(" [{}]({}) ", spec.title, spec.url))
}

pub fn image(spec: &LinkSpec) -> Insertion {
    Insertion::new(format!(" ![{}]({}) ", spec.title, spec.url))
}

/// Table dimensions: `columns` cells per line, `rows` body lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSize {
    pub rows: usize,
    pub columns: usize,
}

impl Default for TableSize {
    fn default() -> Self {
        Self {
            rows: DEFAULT_TABLE_DIMENSION,
            columns: DEFAULT_TABLE_DIMENSION,
        }
    }
}

impl TableSize {
    /// Parses user input; blank, non-numeric, zero and values above
    /// [`MAX_TABLE_DIMENSION`] fall back to 3.
    pub fn parse(rows: &str, columns: &str) -> Self {
        let dimension = |value: &str| match value.trim().parse::<usize>() {
            Ok(n) if (1..=MAX_TABLE_DIMENSION).contains(&n) => n,
            _ => DEFAULT_TABLE_DIMENSION,
        };
        Self {
            rows: dimension(rows),
            columns: dimension(columns),
        }
    }
}

pub fn table(size: TableSize, ctx: &Context<'_>) -> Insertion {
    let line = |cell: &str| format!("{}|\n", cell.repeat(size.columns));

    let mut text = String::from(paragraph_if(ctx.mid_line()));
    text.push_str(&line("| 表头 "));
    text.push_str(&line("| :--: "));
    for _ in 0..size.rows {
        text.push_str(&line("| 表格 "));
    }
    text.push('\n');
    Insertion::new(text)
}

/// One markdown line per uploaded file, in upload order.
pub fn attachments(entries: &[UploadEntry], ctx: &Context<'_>) -> Insertion {
    let mut text = String::from(newline_if(ctx.mid_line()));
    for entry in entries {
        text.push_str(&entry.markdown());
        text.push('\n');
    }
    Insertion::new(text)
}
