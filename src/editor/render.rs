//! UI rendering: container placement, toolbar, text area, status bar and
//! the dropdown and dialog overlays.

use super::*;

impl<'a> Editor<'a> {
    /// Runs one frame of the main loop: draw + tick.
    pub fn render_frame<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut ratatui::Terminal<B>,
    ) -> std::io::Result<()> {
        terminal.draw(|frame| self.render(frame))?;
        self.tick();
        Ok(())
    }

    /// Area the editor occupies inside `frame_area`: the target region sized
    /// by width/height, or all of it when fullscreen.
    pub fn container_area(&self, frame_area: Rect) -> Option<Rect> {
        let region = match self.target? {
            Target::Frame => frame_area,
            Target::Area(area) => area.intersection(frame_area),
        };
        if self.screen == ScreenMode::Fullscreen {
            return Some(frame_area);
        }
        Some(Rect::new(
            region.x,
            region.y,
            self.width.resolve(region.width, Axis::Horizontal),
            self.height.resolve(region.height, Axis::Vertical),
        ))
    }

    // ─── Rendering ───────────────────────────────────────────────────────

    pub fn render(&mut self, frame: &mut Frame) {
        let Some(container) = self.container_area(frame.area()) else {
            return;
        };
        if container.width == 0 || container.height == 0 {
            return;
        }

        let bg = Paragraph::new("").style(theme::editor_style());
        frame.render_widget(bg, container);

        let chunks = Layout::vertical([
            Constraint::Length(1), // Toolbar
            Constraint::Length(1), // Divider
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Divider
            Constraint::Length(1), // Status
        ])
        .split(container);

        self.hit.container = container;
        self.hit.content = chunks[2];
        self.hit.toolbar = toolbar::render(frame, chunks[0], &self.menu);

        // Thin dividers between bars and content
        let divider_style = Style::default().fg(theme::BORDER);
        for divider in [chunks[1], chunks[3]] {
            let line =
                Paragraph::new("\u{2500}".repeat(divider.width as usize)).style(divider_style);
            frame.render_widget(line, divider);
        }

        self.render_editor(frame, chunks[2]);

        let (line, col) = self.surface.textarea().cursor();
        status::render(
            frame,
            chunks[4],
            status::StatusInfo {
                line: line + 1,
                col,
                message: &self.status_message,
                char_count: self.char_count(),
                fullscreen: self.screen == ScreenMode::Fullscreen,
                uploading: self.is_uploading(),
            },
        );

        // Overlays go last so they sit on top of everything
        self.hit.dropdown =
            toolbar::render_dropdown(frame, &self.menu, &self.hit.toolbar, container);
        self.hit.dialog = self
            .modal
            .current()
            .map(|open| dialog::render(frame, container, open));
    }

    /// Renders the tui-textarea widget plus tilde markers for lines past the
    /// end of the document.
    fn render_editor(&mut self, frame: &mut Frame, area: Rect) {
        let focused = self.surface.is_focused() && !self.modal.is_open() && !self.menu.has_focus();
        textarea::set_focused(self.surface.textarea_mut(), focused);
        frame.render_widget(self.surface.textarea(), area);

        // Track scroll position (mirrors tui-textarea's internal viewport logic)
        // so we can translate mouse coordinates -> buffer positions correctly.
        let cursor_row = self.surface.textarea().cursor().0 as u16;
        if cursor_row < self.editor_scroll_top {
            self.editor_scroll_top = cursor_row;
        } else if self.editor_scroll_top + area.height <= cursor_row {
            self.editor_scroll_top = cursor_row + 1 - area.height;
        }

        // Render vim-style tilde markers for lines beyond the document
        let total_lines = self.surface.textarea().lines().len();
        let gutter_width = textarea::gutter_width(self.surface.textarea()).saturating_sub(1);
        let visible_content_lines = (total_lines as u16).saturating_sub(self.editor_scroll_top);
        for row in visible_content_lines..area.height {
            let tilde_area = Rect::new(area.x, area.y + row, area.width, 1);
            let tilde = Paragraph::new(Line::from(vec![
                Span::raw(" ".repeat(gutter_width as usize)),
                Span::styled("~", Style::default().fg(theme::TILDE)),
            ]));
            frame.render_widget(tilde, tilde_area);
        }
    }
}
