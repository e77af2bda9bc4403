//! Load/save sessions against real files.

mod common;

use common::{run_script, session_with};
use core_state::{EdError, Session};

#[test]
fn edit_then_write_round_trips_the_file() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, "first\nsecond\n")?;
    let cmd = format!("e {}", path.display());

    let mut s = Session::new();
    let (out, _) = run_script(&mut s, &[&cmd, "a", "third", ".", "w"]);
    assert_eq!(out, vec!["13", "19"]);
    assert_eq!(std::fs::read_to_string(&path)?, "first\nsecond\nthird\n");
    assert!(!s.modified);
    Ok(())
}

#[test]
fn write_without_trailing_newline_preserves_the_bytes() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("raw.txt");
    std::fs::write(&path, "no newline at end")?;
    let cmd = format!("e {}", path.display());

    let mut s = Session::new();
    run_script(&mut s, &[&cmd, "s/no/some/", "u", "w"]);
    assert_eq!(std::fs::read_to_string(&path)?, "no newline at end");
    Ok(())
}

#[test]
fn write_and_quit_ends_the_session() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("out.txt");
    let cmd = format!("e {}", path.display());

    let mut s = Session::new();
    let (out, quit) = run_script(&mut s, &[&cmd, "a", "x", ".", "wq", "p"]);
    assert!(quit, "wq should end the session before the trailing p");
    assert!(out.last().is_some_and(|line| line == "2"));
    assert_eq!(std::fs::read_to_string(&path)?, "x\n");
    Ok(())
}

#[test]
fn write_with_a_name_sets_the_filename() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("named.txt");
    let cmd = format!("w {}", path.display());

    let mut s = session_with("data\n");
    s.modified = true;
    let (out, _) = run_script(&mut s, &[&cmd]);
    assert_eq!(out, vec!["5"]);
    assert_eq!(s.filename.as_deref(), Some(dir.path().join("named.txt").as_path()));
    assert!(!s.modified);
    Ok(())
}

#[test]
fn opening_a_missing_file_starts_a_fresh_buffer() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("new.txt");
    let cmd = format!("e {}", path.display());

    let mut s = Session::new();
    let (out, _) = run_script(&mut s, &[&cmd]);
    assert_eq!(out.len(), 1);
    assert!(out[0].ends_with(": No such file or directory"));
    assert_eq!(s.last_line(), 0);
    assert_eq!(s.filename.as_deref(), Some(path.as_path()));
}

#[test]
fn loading_over_a_modified_buffer_needs_repetition() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("other.txt");
    std::fs::write(&path, "replacement\n")?;
    let cmd = format!("e {}", path.display());

    let mut s = session_with("unsaved\n");
    s.modified = true;
    let (out, _) = run_script(&mut s, &[&cmd]);
    assert_eq!(out, vec!["?"]);
    assert_eq!(s.last_error, Some(EdError::ModifiedBuffer));
    assert_eq!(s.buffer.to_text(), "unsaved\n");

    // The repeated command goes through.
    let (out, _) = run_script(&mut s, &[&cmd]);
    assert_eq!(out, vec!["12"]);
    assert_eq!(s.buffer.to_text(), "replacement\n");
    Ok(())
}

#[test]
fn write_without_any_filename_is_an_error() {
    let mut s = session_with("a\n");
    let (out, _) = run_script(&mut s, &["w", "h"]);
    assert_eq!(out, vec!["?", "no current filename"]);
}

#[test]
fn quit_after_write_skips_the_modified_guard() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("clean.txt");
    let cmd = format!("w {}", path.display());

    let mut s = session_with("a\n");
    s.modified = true;
    let (_, quit) = run_script(&mut s, &[&cmd, "q"]);
    assert!(quit);
    Ok(())
}
