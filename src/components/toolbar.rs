//! Menu bar row and dropdown overlay.
//!
//! Geometry is computed by the same functions the editor uses for mouse
//! hit-testing, so what is drawn is what gets clicked.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::menu::{MenuBar, MenuEntry, MenuLeaf};
use crate::theme;

fn entry_label(entry: &MenuEntry) -> String {
    let arrow = if entry.is_dropdown() { " ▾" } else { "" };
    if entry.icon.is_empty() {
        format!(" {}{arrow} ", entry.title)
    } else {
        format!(" {} {}{arrow} ", entry.icon, entry.title)
    }
}

fn child_label(child: &MenuLeaf) -> String {
    if child.icon.is_empty() {
        format!(" {} ", child.title)
    } else {
        format!(" {} {} ", child.icon, child.title)
    }
}

fn text_width(text: &str) -> u16 {
    Span::raw(text).width() as u16
}

/// One rect per top-level entry, laid out left to right and clipped to
/// `area`. Entries that do not fit get a zero-width rect.
pub fn entry_areas(menu: &MenuBar, area: Rect) -> Vec<Rect> {
    let right = area.x + area.width;
    let mut x = area.x;
    menu.entries()
        .iter()
        .map(|entry| {
            let width = text_width(&entry_label(entry)).min(right.saturating_sub(x));
            let rect = Rect::new(x, area.y, width, area.height.min(1));
            x += width;
            rect
        })
        .collect()
}

/// Where the dropdown of `entry` opens: under its entry, shifted left if it
/// would overflow `bounds`.
pub fn dropdown_area(entry: &MenuEntry, entry_area: Rect, bounds: Rect) -> Rect {
    let children = entry.children();
    let inner_width = children
        .iter()
        .map(|c| text_width(&child_label(c)))
        .max()
        .unwrap_or(0);
    let width = (inner_width + 2).min(bounds.width);
    let height = (children.len() as u16 + 2).min(bounds.height.saturating_sub(1));
    let max_x = (bounds.x + bounds.width).saturating_sub(width);
    let x = entry_area.x.min(max_x).max(bounds.x);
    Rect::new(x, entry_area.y + 1, width, height)
}

/// Index of the dropdown child drawn at terminal row `row`.
pub fn child_at(dropdown: Rect, row: u16, count: usize) -> Option<usize> {
    if row <= dropdown.y || row >= dropdown.y + dropdown.height.saturating_sub(1) {
        return None;
    }
    let index = (row - dropdown.y - 1) as usize;
    (index < count).then_some(index)
}

pub fn render(frame: &mut Frame, area: Rect, menu: &MenuBar) -> Vec<Rect> {
    let bg = Paragraph::new("").style(theme::toolbar_style());
    frame.render_widget(bg, area);

    let areas = entry_areas(menu, area);
    let cursor = menu.cursor();
    for (index, (entry, rect)) in menu.entries().iter().zip(&areas).enumerate() {
        if rect.width == 0 {
            continue;
        }
        let active = menu.expanded() == Some(index)
            || cursor.is_some_and(|c| c.entry == index && c.child.is_none());
        let label = Paragraph::new(Line::from(Span::styled(
            entry_label(entry),
            theme::menu_item_style(active),
        )));
        frame.render_widget(label, *rect);
    }
    areas
}

/// Draws the open dropdown, if any, and returns its area.
pub fn render_dropdown(
    frame: &mut Frame,
    menu: &MenuBar,
    entry_areas: &[Rect],
    bounds: Rect,
) -> Option<(usize, Rect)> {
    let index = menu.expanded()?;
    let entry = menu.entries().get(index)?;
    let entry_area = *entry_areas.get(index)?;
    let area = dropdown_area(entry, entry_area, bounds);
    if area.width < 3 || area.height < 3 {
        return None;
    }

    let highlighted = menu
        .cursor()
        .filter(|c| c.entry == index)
        .and_then(|c| c.child);
    let lines: Vec<Line> = entry
        .children()
        .iter()
        .enumerate()
        .map(|(i, child)| {
            let label = child_label(child);
            let pad = (area.width - 2).saturating_sub(text_width(&label)) as usize;
            Line::from(Span::styled(
                format!("{label}{}", " ".repeat(pad)),
                theme::dropdown_item_style(highlighted == Some(i)),
            ))
        })
        .collect();

    frame.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::BORDER))
        .style(theme::dropdown_style());
    frame.render_widget(Paragraph::new(lines).block(block), area);
    Some((index, area))
}
