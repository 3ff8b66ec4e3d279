//! Unit tests for the Editor: document API, toolbar dispatch, dialogs,
//! fullscreen, downloads and uploads.

use super::*;
use crate::menu::default_items;
use crate::surface::Selection;
use crate::upload::local_dir_uploader;
use ratatui::backend::TestBackend;
use ratatui::Terminal;

// ─── Helpers ─────────────────────────────────────────────────────

fn editor_with(doc: &str) -> Editor<'static> {
    Editor::new(EditorOptions {
        doc: doc.to_string(),
        ..EditorOptions::default()
    })
    .unwrap()
}

fn key_event(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn ctrl_key(ch: char) -> Event {
    Event::Key(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL))
}

fn type_str(editor: &mut Editor, text: &str) {
    for ch in text.chars() {
        editor.handle_event(key_event(KeyCode::Char(ch)));
    }
}

fn click(editor: &mut Editor, column: u16, row: u16) {
    editor.handle_event(Event::Mouse(MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }));
    editor.handle_event(Event::Mouse(MouseEvent {
        kind: MouseEventKind::Up(MouseButton::Left),
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }));
}

fn draw(editor: &mut Editor, terminal: &mut Terminal<TestBackend>) {
    terminal.draw(|frame| editor.render(frame)).unwrap();
}

fn terminal() -> Terminal<TestBackend> {
    Terminal::new(TestBackend::new(80, 24)).unwrap()
}

fn entry_index(editor: &Editor, title: &str) -> usize {
    editor
        .menu()
        .entries()
        .iter()
        .position(|e| e.title == title)
        .unwrap()
}

/// Center column of a toolbar entry after a render.
fn entry_column(editor: &Editor, index: usize) -> u16 {
    let area = editor.hit.toolbar[index];
    area.x + area.width / 2
}

// ─── Document API ────────────────────────────────────────────────

#[test]
fn api_reads_and_writes_through_the_surface() {
    let mut editor = editor_with("hello\nworld");
    assert_eq!(editor.get_doc(), "hello\nworld");
    editor.set_cursor(8);
    assert_eq!(editor.get_cursor(), 8);
    assert_eq!(editor.get_line_ch(), 2);

    editor.replace_selection("__");
    assert_eq!(editor.get_doc(), "hello\nwo__rld");
    assert_eq!(editor.get_cursor(), 10);
    assert_eq!(editor.get_selection_text(), "");
}

#[test]
fn bold_on_empty_document() {
    let mut editor = editor_with("");
    editor.dispatch(&Action::Bold);
    assert_eq!(editor.get_doc(), " **加粗** ");
    assert_eq!(editor.get_cursor(), 5);
    assert!(editor.surface().is_focused());
}

#[test]
fn transforms_apply_to_the_selection() {
    let mut editor = editor_with("a\nb\n\nc");
    editor.surface_mut().textarea_mut().select_all();
    assert_eq!(editor.surface().selection(), Selection::new(0, 6));
    editor.dispatch(&Action::UnorderedList);
    assert_eq!(editor.get_doc(), "- a\n- b\n\n- c");
}

#[test]
fn ctrl_z_reverts_a_selection_transform_in_one_step() {
    let mut editor = editor_with("a\nb\n\nc");
    editor.handle_event(ctrl_key('a'));
    editor.dispatch(&Action::UnorderedList);
    assert_eq!(editor.get_doc(), "- a\n- b\n\n- c");

    editor.handle_event(ctrl_key('z'));
    assert_eq!(editor.get_doc(), "a\nb\n\nc");
    editor.handle_event(ctrl_key('y'));
    assert_eq!(editor.get_doc(), "- a\n- b\n\n- c");
}

#[test]
fn ctrl_z_after_bold_over_a_word() {
    let mut editor = editor_with("say hi");
    let textarea = editor.surface_mut().textarea_mut();
    textarea.move_cursor(CursorMove::Jump(0, 4));
    textarea.start_selection();
    textarea.move_cursor(CursorMove::Jump(0, 6));
    editor.handle_event(ctrl_key('b'));
    assert_eq!(editor.get_doc(), "say  **hi** ");

    editor.handle_event(ctrl_key('z'));
    assert_eq!(editor.get_doc(), "say hi");
}

#[test]
fn clean_twice_leaves_empty_document() {
    let mut editor = editor_with("some text");
    editor.dispatch(&Action::Clean);
    editor.dispatch(&Action::Clean);
    assert_eq!(editor.get_doc(), "");
}

#[test]
fn ctrl_z_undoes_a_transform() {
    let mut editor = editor_with("x");
    editor.set_cursor(1);
    editor.dispatch(&Action::Divider);
    assert_ne!(editor.get_doc(), "x");
    editor.handle_event(ctrl_key('z'));
    assert_eq!(editor.get_doc(), "x");
    editor.handle_event(ctrl_key('y'));
    assert_eq!(editor.get_doc(), "x\n\n------------\n\n");
}

#[test]
fn typing_goes_to_the_text_area() {
    let mut editor = editor_with("");
    type_str(&mut editor, "hi");
    editor.handle_event(key_event(KeyCode::Enter));
    type_str(&mut editor, "x");
    assert_eq!(editor.get_doc(), "hi\nx");
}

#[test]
fn ctrl_q_quits() {
    let mut editor = editor_with("");
    editor.handle_event(ctrl_key('q'));
    assert!(editor.should_quit);
}

// ─── Detached editor ─────────────────────────────────────────────

#[test]
fn detached_editor_ignores_ui_but_keeps_api() {
    let mut editor = Editor::new(EditorOptions {
        target: None,
        doc: "abc".into(),
        ..EditorOptions::default()
    })
    .unwrap();
    assert!(!editor.is_attached());

    type_str(&mut editor, "zz");
    assert_eq!(editor.get_doc(), "abc");

    let mut terminal = terminal();
    draw(&mut editor, &mut terminal);
    assert!(editor.hit.toolbar.is_empty());

    editor.set_cursor(3);
    editor.dispatch(&Action::Indent);
    assert_eq!(editor.get_doc(), "abc\u{3000}");
}

#[test]
fn unknown_menu_type_fails_construction() {
    let mut menus = default_items();
    menus.push(crate::menu::MenuItem::leaf("sparkles", "?", "?"));
    let result = Editor::new(EditorOptions {
        menus,
        ..EditorOptions::default()
    });
    assert!(matches!(result, Err(Error::UnknownAction(_))));
}

// ─── Toolbar ─────────────────────────────────────────────────────

#[test]
fn clicking_dropdown_child_applies_transform() {
    let mut editor = editor_with("");
    let mut terminal = terminal();
    draw(&mut editor, &mut terminal);

    let style = entry_index(&editor, "样式");
    let column = entry_column(&editor, style);
    click(&mut editor, column, 0);
    assert_eq!(editor.menu().expanded(), Some(style));

    draw(&mut editor, &mut terminal);
    let (entry, area) = editor.hit.dropdown.unwrap();
    assert_eq!(entry, style);
    // rows: border, 倾斜, 加粗
    click(&mut editor, area.x + 2, area.y + 2);
    assert_eq!(editor.menu().expanded(), None);
    assert_eq!(editor.get_doc(), " **加粗** ");
}

#[test]
fn expanding_one_dropdown_collapses_the_other() {
    let mut editor = editor_with("");
    let mut terminal = terminal();
    draw(&mut editor, &mut terminal);

    let title = entry_column(&editor, entry_index(&editor, "标题"));
    let insert = entry_index(&editor, "插入");
    let insert_column = entry_column(&editor, insert);
    click(&mut editor, title, 0);
    click(&mut editor, insert_column, 0);
    assert_eq!(editor.menu().expanded(), Some(insert));
}

#[test]
fn clicking_outside_collapses_dropdown() {
    let mut editor = editor_with("text");
    let mut terminal = terminal();
    draw(&mut editor, &mut terminal);

    let tools = entry_column(&editor, entry_index(&editor, "工具"));
    click(&mut editor, tools, 0);
    draw(&mut editor, &mut terminal);
    click(&mut editor, 70, 15);
    assert_eq!(editor.menu().expanded(), None);
    assert_eq!(editor.get_doc(), "text");
}

#[test]
fn top_level_click_runs_undo() {
    let mut editor = editor_with("");
    editor.dispatch(&Action::Timestamp);
    assert!(!editor.get_doc().is_empty());

    let mut terminal = terminal();
    draw(&mut editor, &mut terminal);
    let undo = entry_column(&editor, 0);
    click(&mut editor, undo, 0);
    assert_eq!(editor.get_doc(), "");
}

#[test]
fn f10_keyboard_menu() {
    let mut editor = editor_with("");
    editor.handle_event(key_event(KeyCode::F(10)));
    assert!(editor.menu().has_focus());
    assert!(!editor.surface().is_focused());

    // 撤销 → 重做 → 样式, open, 倾斜
    editor.handle_event(key_event(KeyCode::Right));
    editor.handle_event(key_event(KeyCode::Right));
    editor.handle_event(key_event(KeyCode::Down));
    editor.handle_event(key_event(KeyCode::Enter));
    assert_eq!(editor.get_doc(), " *倾斜* ");
    assert_eq!(editor.get_cursor(), 4);
    assert!(!editor.menu().has_focus());
    assert!(editor.surface().is_focused());
}

#[test]
fn esc_closes_keyboard_menu() {
    let mut editor = editor_with("");
    editor.handle_event(key_event(KeyCode::F(10)));
    editor.handle_event(key_event(KeyCode::Esc));
    assert!(!editor.menu().has_focus());
    assert!(editor.surface().is_focused());
    type_str(&mut editor, "a");
    assert_eq!(editor.get_doc(), "a");
}

// ─── Fullscreen and scroll lock ──────────────────────────────────

#[test]
fn fullscreen_toggle_and_scroll_lock() {
    let mut editor = editor_with("");
    assert!(!editor.scroll_locked());

    editor.dispatch(&Action::FullScreen);
    assert_eq!(editor.screen_mode(), ScreenMode::Fullscreen);
    assert!(editor.scroll_locked());

    // closing a dialog keeps the lock while fullscreen
    editor.dispatch(&Action::Link);
    editor.handle_event(key_event(KeyCode::Esc));
    assert!(!editor.modal().is_open());
    assert!(editor.scroll_locked());

    editor.handle_event(key_event(KeyCode::F(11)));
    assert_eq!(editor.screen_mode(), ScreenMode::Normal);
    assert!(!editor.scroll_locked());
}

#[test]
fn container_follows_dimensions_and_fullscreen() {
    let mut editor = Editor::new(EditorOptions {
        width: Dimension::Percent(50),
        height: Dimension::Cells(10),
        target: Some(Target::Area(Rect::new(4, 2, 60, 20))),
        ..EditorOptions::default()
    })
    .unwrap();
    let frame = Rect::new(0, 0, 80, 24);
    assert_eq!(editor.container_area(frame), Some(Rect::new(4, 2, 30, 10)));

    editor.toggle_fullscreen();
    assert_eq!(editor.container_area(frame), Some(frame));
}

// ─── Dialogs ─────────────────────────────────────────────────────

#[test]
fn link_dialog_inserts_on_enter() {
    let mut editor = editor_with("");
    editor.dispatch(&Action::Link);
    assert!(editor.modal().is_open());
    assert!(editor.scroll_locked());
    assert_eq!(editor.modal().current().unwrap().title, "超链接");

    type_str(&mut editor, "docs");
    editor.handle_event(key_event(KeyCode::Tab));
    type_str(&mut editor, "https://d.rs");
    editor.handle_event(key_event(KeyCode::Enter));

    assert!(!editor.modal().is_open());
    assert!(!editor.scroll_locked());
    assert_eq!(editor.get_doc(), " [docs](https://d.rs) ");
    assert!(editor.surface().is_focused());
}

#[test]
fn keys_do_not_reach_document_while_dialog_open() {
    let mut editor = editor_with("doc");
    editor.dispatch(&Action::Image);
    type_str(&mut editor, "q");
    editor.handle_event(key_event(KeyCode::Esc));
    assert_eq!(editor.get_doc(), "doc");
}

#[test]
fn table_dialog_with_defaults() {
    let mut editor = editor_with("");
    editor.dispatch(&Action::Table);
    editor.handle_event(key_event(KeyCode::Enter));
    let doc = editor.get_doc();
    assert!(doc.starts_with("| 表头 | 表头 | 表头 |\n| :--: | :--: | :--: |\n"));
    assert_eq!(doc.matches("| 表格 | 表格 | 表格 |\n").count(), 3);
}

#[test]
fn dialog_buttons_are_clickable() {
    let mut editor = editor_with("");
    let mut terminal = terminal();

    editor.dispatch(&Action::Link);
    draw(&mut editor, &mut terminal);
    let layout = editor.hit.dialog.clone().unwrap();
    let cancel = layout.cancel.unwrap();
    click(&mut editor, cancel.x + 1, cancel.y);
    assert!(!editor.modal().is_open());
    assert_eq!(editor.get_doc(), "");

    editor.dispatch(&Action::Link);
    draw(&mut editor, &mut terminal);
    let layout = editor.hit.dialog.clone().unwrap();
    let confirm = layout.confirm.unwrap();
    click(&mut editor, confirm.x + 1, confirm.y);
    assert_eq!(editor.get_doc(), " [Test](http://) ");
}

#[test]
fn close_button_cancels() {
    let mut editor = editor_with("");
    let mut terminal = terminal();
    editor.dispatch(&Action::Table);
    draw(&mut editor, &mut terminal);
    let close = editor.hit.dialog.clone().unwrap().close;
    click(&mut editor, close.x + 1, close.y);
    assert!(!editor.modal().is_open());
    assert_eq!(editor.get_doc(), "");
}

#[test]
fn clicking_a_field_moves_focus() {
    let mut editor = editor_with("");
    let mut terminal = terminal();
    editor.dispatch(&Action::Link);
    draw(&mut editor, &mut terminal);
    let url_row = editor.hit.dialog.clone().unwrap().fields[1];
    click(&mut editor, url_row.x + 12, url_row.y);
    type_str(&mut editor, "u");
    editor.handle_event(key_event(KeyCode::Enter));
    assert_eq!(editor.get_doc(), " [Test](u) ");
}

// ─── Download ────────────────────────────────────────────────────

#[test]
fn download_writes_raw_document() {
    let dir = tempfile::TempDir::new().unwrap();
    let mut editor = Editor::new(EditorOptions {
        doc: "# 标题\n\nbody".into(),
        download_dir: dir.path().join("out"),
        ..EditorOptions::default()
    })
    .unwrap();
    editor.set_cursor(2);

    let path = editor.download().unwrap();
    assert_eq!(path, dir.path().join("out").join(DOWNLOAD_FILE_NAME));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "# 标题\n\nbody");
    assert_eq!(editor.get_doc(), "# 标题\n\nbody");
    assert_eq!(editor.get_cursor(), 2);
    assert!(editor.status_message.contains("Downloaded"));

    // a second download replaces the first
    editor.dispatch(&Action::Clean);
    editor.dispatch(&Action::Download);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
}

#[test]
fn download_failure_is_reported() {
    let dir = tempfile::TempDir::new().unwrap();
    let blocker = dir.path().join("file");
    std::fs::write(&blocker, "x").unwrap();
    let mut editor = Editor::new(EditorOptions {
        download_dir: blocker.join("sub"),
        ..EditorOptions::default()
    })
    .unwrap();
    assert!(matches!(editor.download(), Err(Error::Download { .. })));
    assert!(editor.status_message.starts_with("Error downloading"));
}

// ─── Uploads ─────────────────────────────────────────────────────

fn wait_for_uploads(editor: &mut Editor) {
    for _ in 0..400 {
        editor.tick();
        if !editor.is_uploading() {
            return;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    panic!("uploads did not finish");
}

#[test]
fn dropped_files_are_uploaded_and_inserted() {
    let src = tempfile::TempDir::new().unwrap();
    let store = tempfile::TempDir::new().unwrap();
    let a = src.path().join("a.md");
    let b = src.path().join("b.txt");
    std::fs::write(&a, "# a").unwrap();
    std::fs::write(&b, "b").unwrap();

    let mut editor = Editor::new(EditorOptions {
        doc: "intro".into(),
        upload_file: Some(local_dir_uploader(store.path().to_path_buf())),
        ..EditorOptions::default()
    })
    .unwrap();
    editor.set_cursor(5);
    editor.dispatch(&Action::Upload);

    editor.handle_event(Event::Paste(format!("{} {}", a.display(), b.display())));
    assert!(editor.is_uploading());
    wait_for_uploads(&mut editor);

    let pending = &editor.modal().current().unwrap().body.upload().unwrap().pending;
    assert_eq!(pending.len(), 2);
    assert_eq!(pending[0].name, "a.md");

    editor.handle_event(key_event(KeyCode::Enter));
    let stored_a = store.path().join("a.md");
    let stored_b = store.path().join("b.txt");
    assert_eq!(
        editor.get_doc(),
        format!(
            "intro\n[a.md]({})\n[b.txt]({})\n",
            stored_a.display(),
            stored_b.display()
        )
    );
}

#[test]
fn upload_without_uploader_reports_status() {
    let src = tempfile::TempDir::new().unwrap();
    let a = src.path().join("a.txt");
    std::fs::write(&a, "a").unwrap();

    let mut editor = editor_with("");
    editor.dispatch(&Action::Upload);
    assert!(!editor.modal().current().unwrap().body.upload().unwrap().enabled);
    editor.handle_event(Event::Paste(a.display().to_string()));
    assert!(!editor.is_uploading());
    assert!(editor.status_message.starts_with("Upload unavailable"));

    // confirming an empty list inserts nothing
    editor.handle_event(key_event(KeyCode::Enter));
    assert_eq!(editor.get_doc(), "");
}

#[test]
fn uploads_for_a_closed_dialog_are_discarded() {
    let src = tempfile::TempDir::new().unwrap();
    let store = tempfile::TempDir::new().unwrap();
    let a = src.path().join("a.txt");
    std::fs::write(&a, "a").unwrap();

    let mut editor = Editor::new(EditorOptions {
        upload_file: Some(local_dir_uploader(store.path().to_path_buf())),
        ..EditorOptions::default()
    })
    .unwrap();
    editor.dispatch(&Action::Upload);
    editor.handle_event(Event::Paste(a.display().to_string()));
    editor.handle_event(key_event(KeyCode::Esc));
    editor.dispatch(&Action::Upload);
    wait_for_uploads(&mut editor);

    let panel = editor.modal().current().unwrap().body.upload().unwrap();
    assert!(panel.pending.is_empty());
    assert!(!panel.uploading);
}

// ─── Mouse in the text area ──────────────────────────────────────

#[test]
fn click_positions_cursor() {
    let mut editor = editor_with("first\nsecond");
    let mut terminal = terminal();
    draw(&mut editor, &mut terminal);

    let content = editor.hit.content;
    let gutter = textarea::gutter_width(editor.surface().textarea());
    click(&mut editor, content.x + gutter + 3, content.y + 1);
    assert_eq!(editor.surface().textarea().cursor(), (1, 3));
    assert_eq!(editor.get_cursor(), 9);
}

#[test]
fn click_after_wide_glyphs_lands_on_the_right_char() {
    let mut editor = editor_with(" **加粗** x");
    let mut terminal = terminal();
    draw(&mut editor, &mut terminal);

    let content = editor.hit.content;
    let gutter = textarea::gutter_width(editor.surface().textarea());
    // 加 and 粗 take two cells each, so `x` is drawn at cell 10
    click(&mut editor, content.x + gutter + 10, content.y);
    assert_eq!(editor.surface().textarea().cursor(), (0, 8));

    // right half of 粗
    click(&mut editor, content.x + gutter + 6, content.y);
    assert_eq!(editor.surface().textarea().cursor(), (0, 4));
}

#[test]
fn scroll_is_ignored_while_dialog_open() {
    let lines: Vec<String> = (0..100).map(|i| i.to_string()).collect();
    let mut editor = editor_with(&lines.join("\n"));
    editor.dispatch(&Action::Link);
    editor.handle_event(Event::Mouse(MouseEvent {
        kind: MouseEventKind::ScrollDown,
        column: 5,
        row: 5,
        modifiers: KeyModifiers::NONE,
    }));
    assert_eq!(editor.editor_scroll_top, 0);
}

#[test]
fn render_shows_toolbar_and_dialog() {
    let mut editor = editor_with("");
    let mut terminal = terminal();
    editor.dispatch(&Action::Table);
    draw(&mut editor, &mut terminal);

    let buffer = terminal.backend().buffer().clone();
    let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
    assert!(text.contains("撤"));
    assert!(text.contains("表"));
    assert!(text.contains("确"));
}
