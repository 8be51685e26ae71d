// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Spanlabel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Spanlabel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Spanlabel CLI entrypoint.
//!
//! Loads one document folder and reads labeling commands from stdin, one per line. Clicks,
//! span edits and form submissions go through the same library calls a graphical front end
//! would make.

use std::error::Error;
use std::io::{self, BufRead, Write};

use spanlabel::model::{EntityKind, Label, LabelingSession, OccurrenceId, SegmentId};
use spanlabel::ops::{apply_span_op, save_editor, ApplyResult, NewEntity, SpanOp};
use spanlabel::query::{hover_targets, occurrence_search, OccurrenceSearchMode};
use spanlabel::render::{render_relation_lines, render_segment_text, render_span_editor};
use spanlabel::select::{click, select_tool, ClickOutcome};
use spanlabel::span::{MarkerEnd, SpanEditor};
use spanlabel::store::{DocumentFolder, WriteDurability};

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [<document-dir>] [--order-check] [--durable-writes]\n  {program} [--document <dir>] [--order-check] [--durable-writes]\n  {program} --demo [--order-check]\n  {program} --schema\n\nReads commands from stdin; type `help` for the command list.\n\nIf document-dir/--document is omitted, the current working directory is used.\n--demo uses a built-in demo document and cannot be combined with document-dir/--document.\n--order-check only completes same-kind relations in their declared order.\n--schema prints the JSON schema of document.json and exits.\n\n--durable-writes opts into slower, best-effort durable persistence (fsync/sync where supported)."
    );
}

const COMMAND_HELP: &str = "\
tool <YE|NO|DK|SK|NS>                  select the label applied by pair clicks
click <occurrence>                     arm an occurrence or complete a pair
relations                              list relations and their labels
segment [<segment>]                    show a segment (all segments when omitted)
hover <occurrence>                     token indices highlighted for an occurrence
find <text> | find /<regex>/           search occurrences by alias
edit <occurrence>                      open the span editor on an occurrence
new <segment> <token> <kind> <key>     open the span editor for a new occurrence
move <start|end> <slot>                drag a boundary marker to an entry slot
preview                                show the span the markers currently select
save                                   persist the edited span
cancel                                 close the span editor
delete <occurrence>                    delete an occurrence
submit                                 write labels.json
quit";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    demo: bool,
    schema: bool,
    document_dir: Option<String>,
    order_check: bool,
    durable_writes: bool,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--demo" => {
                if options.demo {
                    return Err(());
                }
                options.demo = true;
            }
            "--schema" => {
                if options.schema {
                    return Err(());
                }
                options.schema = true;
            }
            "--document" => {
                if options.document_dir.is_some() {
                    return Err(());
                }
                let dir = args.next().ok_or(())?;
                options.document_dir = Some(dir);
            }
            "--order-check" => {
                if options.order_check {
                    return Err(());
                }
                options.order_check = true;
            }
            "--durable-writes" => {
                if options.durable_writes {
                    return Err(());
                }
                options.durable_writes = true;
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.document_dir.is_some() {
                    return Err(());
                }
                options.document_dir = Some(arg);
            }
        }
    }

    if options.demo && options.document_dir.is_some() {
        return Err(());
    }

    if options.schema
        && (options.demo
            || options.document_dir.is_some()
            || options.order_check
            || options.durable_writes)
    {
        return Err(());
    }

    Ok(options)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Tool(Label),
    Click(OccurrenceId),
    Relations,
    Segment(Option<SegmentId>),
    Hover(OccurrenceId),
    Find {
        needle: String,
        mode: OccurrenceSearchMode,
    },
    Edit(OccurrenceId),
    New {
        segment_id: SegmentId,
        token_index: usize,
        entity: NewEntity,
    },
    Move {
        which: MarkerEnd,
        slot: usize,
    },
    Preview,
    Save,
    Cancel,
    Delete(OccurrenceId),
    Submit,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };
    let args = rest.split_whitespace().collect::<Vec<_>>();

    let id_arg = |what: &str| -> Result<String, String> {
        match args.as_slice() {
            [value] => Ok((*value).to_owned()),
            _ => Err(format!("usage: {name} <{what}>")),
        }
    };
    let occurrence_arg =
        || OccurrenceId::new(id_arg("occurrence")?).map_err(|err| err.to_string());

    let command = match name {
        "" => return Ok(None),
        "tool" => Command::Tool(
            id_arg("label")?
                .parse::<Label>()
                .map_err(|err| err.to_string())?,
        ),
        "click" => Command::Click(occurrence_arg()?),
        "relations" => Command::Relations,
        "segment" => match args.as_slice() {
            [] => Command::Segment(None),
            _ => Command::Segment(Some(
                SegmentId::new(id_arg("segment")?).map_err(|err| err.to_string())?,
            )),
        },
        "hover" => Command::Hover(occurrence_arg()?),
        "find" => {
            if rest.is_empty() {
                return Err("usage: find <text> | find /<regex>/".to_owned());
            }
            match rest
                .strip_prefix('/')
                .and_then(|inner| inner.strip_suffix('/'))
            {
                Some(pattern) => Command::Find {
                    needle: pattern.to_owned(),
                    mode: OccurrenceSearchMode::Regex,
                },
                None => Command::Find {
                    needle: rest.to_owned(),
                    mode: OccurrenceSearchMode::Substring,
                },
            }
        }
        "edit" => Command::Edit(occurrence_arg()?),
        "new" => {
            let usage = || "usage: new <segment> <token-index> <kind> <key>".to_owned();
            let [segment, token, kind, _, ..] = args.as_slice() else {
                return Err(usage());
            };
            Command::New {
                segment_id: SegmentId::new(*segment).map_err(|err| err.to_string())?,
                token_index: token.parse().map_err(|_| usage())?,
                entity: NewEntity {
                    key: skip_words(rest, 3).to_owned(),
                    kind: EntityKind::new(*kind),
                },
            }
        }
        "move" => {
            let usage = || "usage: move <start|end> <slot>".to_owned();
            let [which, slot] = args.as_slice() else {
                return Err(usage());
            };
            let which = match *which {
                "start" => MarkerEnd::Start,
                "end" => MarkerEnd::End,
                _ => return Err(usage()),
            };
            Command::Move {
                which,
                slot: slot.parse().map_err(|_| usage())?,
            }
        }
        "preview" => Command::Preview,
        "save" => Command::Save,
        "cancel" => Command::Cancel,
        "delete" => Command::Delete(occurrence_arg()?),
        "submit" => Command::Submit,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command {other:?} (try `help`)")),
    };
    Ok(Some(command))
}

/// `text` without its first `count` whitespace-separated words.
fn skip_words(text: &str, count: usize) -> &str {
    let mut rest = text.trim_start();
    for _ in 0..count {
        rest = match rest.split_once(char::is_whitespace) {
            Some((_, tail)) => tail.trim_start(),
            None => "",
        };
    }
    rest.trim_end()
}

/// Open span-editing dialog, with the entity for a new occurrence when creating.
struct OpenEditor {
    editor: SpanEditor,
    entity: Option<NewEntity>,
}

struct Driver {
    session: LabelingSession,
    folder: DocumentFolder,
    editor: Option<OpenEditor>,
}

impl Driver {
    fn new(session: LabelingSession, folder: DocumentFolder) -> Self {
        Self {
            session,
            folder,
            editor: None,
        }
    }

    /// Runs one command. Returns `false` once the labeler quits.
    fn execute(&mut self, command: Command, out: &mut impl Write) -> Result<bool, Box<dyn Error>> {
        match command {
            Command::Tool(label) => {
                select_tool(&mut self.session, label);
                writeln!(out, "tool: {label} ({})", label.description())?;
            }
            Command::Click(occurrence_id) => {
                let outcome = click(&mut self.session, &occurrence_id);
                write_click_outcome(out, &outcome)?;
            }
            Command::Relations => writeln!(out, "{}", render_relation_lines(&self.session))?,
            Command::Segment(Some(segment_id)) => {
                writeln!(out, "{}", render_segment_text(&self.session, &segment_id)?)?;
            }
            Command::Segment(None) => {
                for segment_id in self.session.segments().keys() {
                    let line = render_segment_text(&self.session, segment_id)?;
                    writeln!(out, "{segment_id}: {line}")?;
                }
            }
            Command::Hover(occurrence_id) => {
                let Some(segment) = self.session.segment_of(&occurrence_id) else {
                    writeln!(out, "no segment contains {occurrence_id}")?;
                    return Ok(true);
                };
                let targets = hover_targets(&self.session, segment.segment_id(), &occurrence_id);
                writeln!(out, "{}: {}", segment.segment_id(), join_display(&targets))?;
            }
            Command::Find { needle, mode } => {
                let hits = occurrence_search(&self.session, &needle, mode, true)?;
                if hits.is_empty() {
                    writeln!(out, "no matches")?;
                }
                for (occurrence_id, occurrence) in hits {
                    writeln!(
                        out,
                        "{occurrence_id} [{}, {}) {}",
                        occurrence.offset(),
                        occurrence.offset_end(),
                        occurrence.alias()
                    )?;
                }
            }
            Command::Edit(occurrence_id) => {
                let editor = SpanEditor::for_occurrence(&self.session, &occurrence_id)?;
                writeln!(out, "{}", render_span_editor(&editor))?;
                self.editor = Some(OpenEditor {
                    editor,
                    entity: None,
                });
            }
            Command::New {
                segment_id,
                token_index,
                entity,
            } => {
                let Some(segment) = self.session.segment(&segment_id) else {
                    writeln!(out, "segment not found (id={segment_id})")?;
                    return Ok(true);
                };
                let editor = SpanEditor::for_new(segment, token_index)?;
                writeln!(out, "{}", render_span_editor(&editor))?;
                self.editor = Some(OpenEditor {
                    editor,
                    entity: Some(entity),
                });
            }
            Command::Move { which, slot } => {
                let open = self.open_editor()?;
                open.editor.move_marker(which, slot)?;
                writeln!(out, "{}", render_span_editor(&open.editor))?;
            }
            Command::Preview => {
                let preview = self.open_editor()?.editor.preview();
                if preview.span.is_empty() {
                    writeln!(out, "empty span; move the end marker past a token")?;
                } else {
                    writeln!(
                        out,
                        "[{}, {}) {}",
                        preview.span.offset, preview.span.offset_end, preview.text
                    )?;
                }
            }
            Command::Save => {
                let open = self.editor.as_ref().ok_or("no span editor is open")?;
                let result = save_editor(
                    &mut self.session,
                    &mut self.folder,
                    &open.editor,
                    open.entity.clone(),
                )?;
                self.editor = None;
                write_apply_result(out, &result)?;
            }
            Command::Cancel => {
                if self.editor.take().is_none() {
                    writeln!(out, "no span editor is open")?;
                }
            }
            Command::Delete(occurrence_id) => {
                let result = apply_span_op(
                    &mut self.session,
                    &mut self.folder,
                    &SpanOp::DeleteOccurrence { occurrence_id },
                )?;
                write_apply_result(out, &result)?;
            }
            Command::Submit => {
                self.folder.save_labels(&self.session)?;
                let set = self.session.forms().values().filter(|v| v.is_some()).count();
                writeln!(
                    out,
                    "submitted {} forms ({set} labeled)",
                    self.session.forms().len()
                )?;
            }
            Command::Help => writeln!(out, "{COMMAND_HELP}")?,
            Command::Quit => return Ok(false),
        }
        Ok(true)
    }

    fn open_editor(&mut self) -> Result<&mut OpenEditor, Box<dyn Error>> {
        self.editor
            .as_mut()
            .ok_or_else(|| "no span editor is open".into())
    }

    /// Reads commands until EOF or `quit`; command errors are reported and the loop goes on.
    fn run(&mut self, input: impl BufRead, out: &mut impl Write) -> Result<(), Box<dyn Error>> {
        for line in input.lines() {
            let line = line?;
            let command = match parse_command(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(message) => {
                    writeln!(out, "error: {message}")?;
                    continue;
                }
            };
            match self.execute(command, out) {
                Ok(true) => {}
                Ok(false) => break,
                Err(err) => writeln!(out, "error: {err}")?,
            }
        }
        Ok(())
    }
}

fn join_display<T: std::fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

fn write_click_outcome(out: &mut impl Write, outcome: &ClickOutcome) -> io::Result<()> {
    match outcome {
        ClickOutcome::Ignored => writeln!(out, "ignored"),
        ClickOutcome::Armed {
            occurrence_id,
            eligible,
        } => writeln!(
            out,
            "armed {occurrence_id}; eligible: {}",
            join_display(eligible)
        ),
        ClickOutcome::Deselected { occurrence_id } => writeln!(out, "deselected {occurrence_id}"),
        ClickOutcome::Paired {
            armed,
            clicked,
            toggled,
        } => {
            if toggled.is_empty() {
                return writeln!(out, "no relation completes {armed} -> {clicked}");
            }
            for view in toggled {
                let label = view.label.map_or("--", |label| label.code());
                writeln!(
                    out,
                    "{} {} {} -> {label}",
                    view.form_id, view.occurrence_a, view.occurrence_b
                )?;
            }
            Ok(())
        }
    }
}

fn write_apply_result(out: &mut impl Write, result: &ApplyResult) -> io::Result<()> {
    let delta = &result.delta;
    writeln!(
        out,
        "saved (rev {}): added [{}] removed [{}] updated [{}]",
        result.new_rev,
        join_display(&delta.added),
        join_display(&delta.removed),
        join_display(&delta.updated)
    )
}

fn open_folder(dir: impl Into<std::path::PathBuf>, durable_writes: bool) -> DocumentFolder {
    if durable_writes {
        DocumentFolder::new(dir).with_durability(WriteDurability::Durable)
    } else {
        DocumentFolder::new(dir)
    }
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "spanlabel".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        if options.schema {
            let schema = spanlabel::store::document_json_schema();
            println!("{}", serde_json::to_string_pretty(&schema)?);
            return Ok(());
        }

        let (mut session, folder) = if options.demo {
            // The demo still persists through a real folder so span edits behave as usual.
            let now_millis = std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or(0);
            let demo_dir = std::env::temp_dir().join(format!(
                "spanlabel-demo-document-{}-{now_millis}",
                std::process::id()
            ));
            let folder = open_folder(demo_dir, options.durable_writes);
            let session = spanlabel::model::demo_session();
            folder.save_session(&session)?;
            eprintln!("spanlabel: demo document at {}", folder.root().display());
            (session, folder)
        } else {
            let dir = options.document_dir.unwrap_or_else(|| ".".to_owned());
            let folder = open_folder(dir, options.durable_writes);
            let session = folder.load_session()?;
            (session, folder)
        };

        if options.order_check {
            session.set_order_check(true);
        }

        let mut driver = Driver::new(session, folder);
        let stdin = io::stdin();
        let stdout = io::stdout();
        driver.run(stdin.lock(), &mut stdout.lock())?;
        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("spanlabel: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_command, parse_options, CliOptions, Command, Driver};
    use spanlabel::model::{demo_session, EntityKind, Label, OccurrenceId};
    use spanlabel::ops::NewEntity;
    use spanlabel::query::OccurrenceSearchMode;
    use spanlabel::span::MarkerEnd;
    use spanlabel::store::DocumentFolder;

    fn demo_driver(name: &str) -> (Driver, std::path::PathBuf) {
        let dir = std::env::temp_dir().join(format!(
            "spanlabel-cli-{name}-{}-{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ));
        let folder = DocumentFolder::new(&dir);
        folder.save_session(&demo_session()).unwrap();
        (Driver::new(demo_session(), folder), dir)
    }

    fn run_script(driver: &mut Driver, script: &str) -> String {
        let mut out = Vec::new();
        driver.run(script.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn parses_empty_args() {
        let options = parse_options(std::iter::empty()).expect("parse options");
        assert_eq!(options, CliOptions::default());
    }

    #[test]
    fn parses_demo_with_order_check() {
        let options = parse_options(["--demo".to_owned(), "--order-check".to_owned()].into_iter())
            .expect("parse options");
        assert!(options.demo);
        assert!(options.order_check);
        assert!(options.document_dir.is_none());
    }

    #[test]
    fn parses_document_dir_in_both_forms() {
        let options = parse_options(["--document".to_owned(), "some/dir".to_owned()].into_iter())
            .expect("parse options");
        assert_eq!(options.document_dir.as_deref(), Some("some/dir"));

        let options = parse_options(["some/dir".to_owned(), "--durable-writes".to_owned()].into_iter())
            .expect("parse options");
        assert_eq!(options.document_dir.as_deref(), Some("some/dir"));
        assert!(options.durable_writes);
    }

    #[test]
    fn rejects_conflicting_or_duplicate_flags() {
        parse_options(["--demo".to_owned(), "--document".to_owned(), ".".to_owned()].into_iter())
            .unwrap_err();
        parse_options(["--schema".to_owned(), "--demo".to_owned()].into_iter()).unwrap_err();
        parse_options(["--demo".to_owned(), "--demo".to_owned()].into_iter()).unwrap_err();
        parse_options(["one".to_owned(), "two".to_owned()].into_iter()).unwrap_err();
        parse_options(["--document".to_owned()].into_iter()).unwrap_err();
        parse_options(["--nope".to_owned()].into_iter()).unwrap_err();
    }

    #[test]
    fn parses_commands() {
        assert_eq!(parse_command("  "), Ok(None));
        assert_eq!(parse_command("tool dk"), Ok(Some(Command::Tool(Label::DontKnow))));
        assert_eq!(
            parse_command("click eo:ada"),
            Ok(Some(Command::Click(OccurrenceId::new("eo:ada").unwrap())))
        );
        assert_eq!(
            parse_command("find /^lon/"),
            Ok(Some(Command::Find {
                needle: "^lon".to_owned(),
                mode: OccurrenceSearchMode::Regex
            }))
        );
        assert_eq!(
            parse_command("move end 4"),
            Ok(Some(Command::Move {
                which: MarkerEnd::End,
                slot: 4
            }))
        );
        assert!(parse_command("move middle 4").is_err());
        assert!(parse_command("click").is_err());
        assert!(parse_command("frobnicate").is_err());
    }

    #[test]
    fn new_command_keeps_spaces_in_the_entity_key() {
        let Ok(Some(Command::New {
            token_index,
            entity,
            ..
        })) = parse_command("new s:1 2 WORK the letter")
        else {
            panic!("expected new command");
        };
        assert_eq!(token_index, 2);
        assert_eq!(
            entity,
            NewEntity {
                key: "the letter".to_owned(),
                kind: EntityKind::new("WORK"),
            }
        );
    }

    #[test]
    fn script_labels_a_pair_and_submits() {
        let (mut driver, dir) = demo_driver("pair");
        let out = run_script(
            &mut driver,
            "tool NO\nclick eo:ada\nclick eo:london\nrelations\nsubmit\nquit\nclick eo:ada\n",
        );

        assert!(out.contains("armed eo:ada; eligible: eo:charles eo:london"), "{out}");
        assert!(out.contains("f:ada-london eo:ada eo:london -> NO"), "{out}");
        assert!(out.contains("submitted 2 forms (1 labeled)"), "{out}");
        assert_eq!(driver.session.selected_id(), None);

        let labels = std::fs::read_to_string(dir.join("labels.json")).unwrap();
        assert!(labels.contains("\"NO\""));
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn script_edits_a_span_and_reports_errors_inline() {
        let (mut driver, dir) = demo_driver("edit");
        let out = run_script(
            &mut driver,
            "save\nedit eo:charles\nmove start 2\npreview\nsave\nsegment s:1\n",
        );

        assert!(out.starts_with("error: no span editor is open"), "{out}");
        assert!(out.contains("[2, 6) wrote to Charles Babbage"), "{out}");
        assert!(out.contains("saved (rev 1): added [] removed [] updated [eo:charles]"), "{out}");
        assert!(out.contains("[wrote to Charles Babbage](eo:charles)"), "{out}");
        let _ = std::fs::remove_dir_all(dir);
    }
}
