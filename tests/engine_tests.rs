//! Integration tests for the minimal vi engine
//!
//! Tests key notation decoding, mode changes, the `:`/`/` line flows,
//! the engine-internal commands, and the forwarding contract.

use std::fs;

use tempfile::TempDir;

use kawauso::{Document, EngineEvent, ExCommand, MinimalVim, VimEngine};

#[test]
fn test_insert_mode_typing() {
    let mut engine = MinimalVim::new();
    let mut doc = Document::new();

    engine.handle_keys(&mut doc, "ihello<Esc>");

    assert_eq!(doc.content, vec!["hello"]);
}

#[test]
fn test_append_enters_insert_after_cursor() {
    let mut engine = MinimalVim::new();
    let mut doc = Document::from_string("ab");
    doc.cursor_pos = (0, 0);

    engine.handle_keys(&mut doc, "aX<Esc>");

    assert_eq!(doc.content, vec!["aXb"]);
}

#[test]
fn test_movement_keys() {
    let mut engine = MinimalVim::new();
    let mut doc = Document::from_string("abc\ndef");

    engine.handle_keys(&mut doc, "jll");
    assert_eq!(doc.cursor_pos, (1, 2));

    engine.handle_keys(&mut doc, "0");
    assert_eq!(doc.cursor_pos, (1, 0));

    engine.handle_keys(&mut doc, "$");
    assert_eq!(doc.cursor_pos, (1, 3));

    engine.handle_keys(&mut doc, "k<Left><Left>");
    assert_eq!(doc.cursor_pos, (0, 1));
}

#[test]
fn test_x_deletes_under_cursor() {
    let mut engine = MinimalVim::new();
    let mut doc = Document::from_string("abc");

    engine.handle_keys(&mut doc, "x");

    assert_eq!(doc.content, vec!["bc"]);
}

#[test]
fn test_lt_notation_inserts_literal_angle_bracket() {
    let mut engine = MinimalVim::new();
    let mut doc = Document::new();

    engine.handle_keys(&mut doc, "i<LT>tag><Esc>");

    assert_eq!(doc.content, vec!["<tag>"]);
}

#[test]
fn test_status_data_reports_position() {
    let mut engine = MinimalVim::new();
    let mut doc = Document::from_string("abc\ndef");

    let events = engine.handle_keys(&mut doc, "jl");
    let last_data = events
        .iter()
        .rev()
        .find_map(|e| match e {
            EngineEvent::StatusDataChanged(data) => Some(data.clone()),
            _ => None,
        })
        .unwrap();

    assert_eq!(last_data, "2,2");
}

#[test]
fn test_insert_mode_is_announced() {
    let mut engine = MinimalVim::new();
    let mut doc = Document::new();

    let events = engine.handle_keys(&mut doc, "i");

    assert!(events.iter().any(|e| matches!(
        e,
        EngineEvent::StatusDataChanged(data) if data.starts_with("-- INSERT --")
    )));
}

#[test]
fn test_command_line_accumulates_with_caret() {
    let mut engine = MinimalVim::new();
    let mut doc = Document::new();

    let events = engine.handle_keys(&mut doc, ":w");
    let last = events.last().unwrap();

    assert_eq!(
        *last,
        EngineEvent::CommandBufferChanged {
            contents: ":w".to_string(),
            caret: Some(2),
        }
    );
}

#[test]
fn test_command_line_backspace_pops() {
    let mut engine = MinimalVim::new();
    let mut doc = Document::new();

    let events = engine.handle_keys(&mut doc, ":wq<BS>");
    let last = events.last().unwrap();

    assert_eq!(
        *last,
        EngineEvent::CommandBufferChanged {
            contents: ":w".to_string(),
            caret: Some(2),
        }
    );
}

#[test]
fn test_backspacing_past_prompt_leaves_command_mode() {
    let mut engine = MinimalVim::new();
    let mut doc = Document::new();

    let events = engine.handle_keys(&mut doc, ":<BS>");

    assert!(events.contains(&EngineEvent::CommandBufferChanged {
        contents: String::new(),
        caret: None,
    }));

    // Back in normal mode: 'i' enters insert instead of accumulating
    engine.handle_keys(&mut doc, "iy<Esc>");
    assert_eq!(doc.content, vec!["y"]);
}

#[test]
fn test_escape_cancels_command_line() {
    let mut engine = MinimalVim::new();
    let mut doc = Document::new();

    let events = engine.handle_keys(&mut doc, ":wq<Esc>");

    assert!(events.contains(&EngineEvent::CommandBufferChanged {
        contents: String::new(),
        caret: None,
    }));
    assert!(!events
        .iter()
        .any(|e| matches!(e, EngineEvent::ExCommandRequest(_))));
}

#[test]
fn test_unrecognized_command_is_forwarded() {
    let mut engine = MinimalVim::new();
    let mut doc = Document::new();

    let events = engine.handle_keys(&mut doc, ":foo! bar baz<CR>");

    let expected = ExCommand::new("foo").with_bang(true).with_args("bar baz");
    assert!(events.contains(&EngineEvent::ExCommandRequest(expected)));
    // The pending line is cleared before the command fires
    assert!(events.contains(&EngineEvent::CommandBufferChanged {
        contents: String::new(),
        caret: None,
    }));
}

#[test]
fn test_save_and_quit_commands_are_forwarded() {
    let mut engine = MinimalVim::new();
    let mut doc = Document::new();

    for (line, name, bang) in [(":wq<CR>", "wq", false), (":q!<CR>", "q", true)] {
        let events = engine.handle_keys(&mut doc, line);
        assert!(events.iter().any(|e| matches!(
            e,
            EngineEvent::ExCommandRequest(cmd) if cmd.name == name && cmd.has_bang == bang
        )));
    }
}

#[test]
fn test_search_line_emits_highlight_request() {
    let mut engine = MinimalVim::new();
    let mut doc = Document::from_string("abc abc");

    let events = engine.handle_keys(&mut doc, "/abc<CR>");

    assert!(events.contains(&EngineEvent::HighlightMatches {
        pattern: "abc".to_string(),
    }));
}

#[test]
fn test_nohlsearch_clears_highlighting() {
    let mut engine = MinimalVim::new();
    let mut doc = Document::new();

    let events = engine.handle_keys(&mut doc, ":noh<CR>");

    assert!(events.contains(&EngineEvent::HighlightMatches {
        pattern: String::new(),
    }));
}

#[test]
fn test_read_command_inserts_file_below_cursor() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("in.txt");
    fs::write(&file_path, "one\ntwo\n").unwrap();

    let mut engine = MinimalVim::new();
    let mut doc = Document::new();
    engine.handle_keys(&mut doc, &format!(":r {}<CR>", file_path.display()));

    assert_eq!(doc.content, vec!["", "one", "two"]);
    assert_eq!(doc.cursor_pos, (1, 0));
}

#[test]
fn test_read_missing_file_reports_error() {
    let mut engine = MinimalVim::new();
    let mut doc = Document::new();

    let events = engine.handle_keys(&mut doc, ":r /no/such/file<CR>");

    assert!(events.iter().any(|e| matches!(
        e,
        EngineEvent::ExtraInformation(text) if text.starts_with("Cannot open file \"/no/such/file\"")
    )));
    assert!(doc.is_empty());
}

#[test]
fn test_set_expandtab_expands_tabs_to_tabstop() {
    let mut engine = MinimalVim::new();
    let mut doc = Document::new();

    engine.handle_command(&mut doc, "set expandtab tabstop=4");
    engine.handle_keys(&mut doc, "ia<Tab>b<Esc>");

    // Tab at column 1 fills to the next multiple of 4
    assert_eq!(doc.content, vec!["a   b"]);
}

#[test]
fn test_tab_is_literal_without_expandtab() {
    let mut engine = MinimalVim::new();
    let mut doc = Document::new();

    engine.handle_keys(&mut doc, "i<Tab>x<Esc>");

    assert_eq!(doc.content, vec!["\tx"]);
}

#[test]
fn test_autoindent_copies_leading_whitespace() {
    let mut engine = MinimalVim::new();
    let mut doc = Document::new();

    engine.handle_command(&mut doc, "set autoindent");
    engine.handle_keys(&mut doc, "i  one<CR>two<Esc>");

    assert_eq!(doc.content, vec!["  one", "  two"]);
}

#[test]
fn test_source_runs_commands_and_skips_comments() {
    let temp_dir = TempDir::new().unwrap();
    let rc_path = temp_dir.path().join("rc");
    fs::write(&rc_path, "\" a comment\n\nset expandtab tabstop=2\n").unwrap();

    let mut engine = MinimalVim::new();
    let mut doc = Document::new();
    engine.handle_command(&mut doc, &format!("source {}", rc_path.display()));
    engine.handle_keys(&mut doc, "i<Tab>x<Esc>");

    assert_eq!(doc.content, vec!["  x"]);
}

#[test]
fn test_source_missing_file_is_silent() {
    let mut engine = MinimalVim::new();
    let mut doc = Document::new();

    let events = engine.handle_command(&mut doc, "source /no/such/rc");

    assert!(events.is_empty());
}

#[test]
fn test_block_selection_toggle() {
    let mut engine = MinimalVim::new();
    let mut doc = Document::from_string("abc\ndef");

    let events = engine.handle_keys(&mut doc, "<C-v>");
    assert!(engine.has_block_selection());
    assert_eq!(doc.anchor, Some((0, 0)));
    assert!(events.contains(&EngineEvent::SetBlockSelection(true)));

    let events = engine.handle_keys(&mut doc, "<Esc>");
    assert!(!engine.has_block_selection());
    assert_eq!(doc.anchor, None);
    assert!(events.contains(&EngineEvent::SetBlockSelection(false)));
}

#[test]
fn test_block_selection_reemits_on_movement() {
    let mut engine = MinimalVim::new();
    let mut doc = Document::from_string("abc\ndef");

    engine.handle_keys(&mut doc, "<C-v>");
    let events = engine.handle_keys(&mut doc, "jl");

    // Geometry follows the cursor, so every movement re-announces the block
    let count = events
        .iter()
        .filter(|e| matches!(e, EngineEvent::SetBlockSelection(true)))
        .count();
    assert_eq!(count, 2);
    assert_eq!(doc.anchor, Some((0, 0)));
    assert_eq!(doc.cursor_pos, (1, 1));
}

#[test]
fn test_block_selection_announced_in_status() {
    let mut engine = MinimalVim::new();
    let mut doc = Document::from_string("abc");

    let events = engine.handle_keys(&mut doc, "<C-v>");

    assert!(events.iter().any(|e| matches!(
        e,
        EngineEvent::StatusDataChanged(data) if data.starts_with("-- VISUAL BLOCK --")
    )));
}

#[test]
fn test_entering_insert_drops_block_selection() {
    let mut engine = MinimalVim::new();
    let mut doc = Document::from_string("abc");

    engine.handle_keys(&mut doc, "<C-v>");
    let events = engine.handle_keys(&mut doc, "i");

    assert!(!engine.has_block_selection());
    assert!(events.contains(&EngineEvent::SetBlockSelection(false)));
}

#[test]
fn test_unhandled_command_fallback_reports_without_reforwarding() {
    let mut engine = MinimalVim::new();
    let mut doc = Document::new();

    let cmd = ExCommand::new("frobnicate");
    let events = engine.on_unhandled_command(&mut doc, &cmd);

    assert_eq!(
        events,
        vec![EngineEvent::ExtraInformation(
            "Not an editor command: frobnicate".to_string()
        )]
    );
}

#[test]
fn test_ex_command_alias_matching() {
    let cmd = ExCommand::new("write");
    assert!(cmd.matches("w", "write"));
    assert!(!cmd.matches("q", "quit"));
}
