//! Integration tests for the editor crate
//!
//! Covers the pagination properties (page invariant, idempotence, orphan and
//! continuation rules) and the editing scenarios end to end through the
//! pipeline.

use slugline_editor::dual_dialogue::toggle_dual_dialogue;
use slugline_editor::{
    paginate, ASTDocument, AutocompleteIndex, Caret, Document, EditorSession, ElementKind, Line,
    LineBudget, LinePos, Mutation, Page, Pipeline, PrintLayout, Selection, Settings,
};
use std::collections::HashSet;

fn page(lines: &[(ElementKind, &str)]) -> Page {
    Page::from_lines(lines.iter().map(|(kind, text)| Line::new(*kind, *text)).collect())
}

fn texts(doc: &ASTDocument) -> Vec<Vec<String>> {
    doc.pages()
        .iter()
        .map(|p| p.iter().map(|l| l.text.clone()).collect())
        .collect()
}

fn capacity(max: usize) -> impl Fn(&Page) -> bool {
    move |page: &Page| page.len() > max
}

fn assert_page_invariant(doc: &ASTDocument) {
    let mut seen = HashSet::new();
    for line in doc.lines() {
        assert!(seen.insert(line.id), "line {:?} appears twice", line.id);
    }
    for (index, page) in doc.pages().iter().enumerate().skip(1) {
        assert!(!page.is_empty(), "page {} is empty", index);
    }
}

fn long_script() -> ASTDocument {
    let mut lines = Vec::new();
    for scene in 0..6 {
        lines.push(Line::new(ElementKind::SceneHeading, format!("INT. ROOM {} - DAY", scene)));
        lines.push(Line::new(ElementKind::Action, "The door creaks open and a draft pulls at the curtains."));
        for speaker in ["BOB", "ALICE"] {
            lines.push(Line::new(ElementKind::Character, speaker));
            lines.push(Line::new(ElementKind::Parenthetical, "(tired)"));
            lines.push(Line::new(ElementKind::Dialogue, "We should have left an hour ago."));
            lines.push(Line::new(ElementKind::Dialogue, "Nobody listens."));
        }
        lines.push(Line::new(ElementKind::Transition, "CUT TO:"));
    }
    ASTDocument::from_pages(vec![Page::from_lines(lines)])
}

#[test]
fn test_page_invariant_after_pagination() {
    let mut doc = long_script();
    let before = doc.line_count();
    paginate(&mut doc, &capacity(7), &Settings::default());

    assert_page_invariant(&doc);
    assert!(doc.page_count() > 1);
    // Only continuation headers are added
    let headers = doc.lines().filter(|l| l.text.ends_with("(CONT'D)")).count();
    assert_eq!(doc.line_count(), before + headers);
}

#[test]
fn test_pagination_is_idempotent() {
    for max in [3, 5, 7, 11] {
        let mut doc = long_script();
        paginate(&mut doc, &capacity(max), &Settings::default());
        let first = texts(&doc);

        let report = paginate(&mut doc, &capacity(max), &Settings::default());
        assert!(!report.changed(), "second pass changed capacity {}", max);
        assert_eq!(texts(&doc), first);
    }
}

#[test]
fn test_line_budget_pagination_is_idempotent() {
    let mut doc = long_script();
    let budget = LineBudget::new(12);
    paginate(&mut doc, &budget, &Settings::default());
    assert!(!paginate(&mut doc, &budget, &Settings::default()).changed());
    assert_page_invariant(&doc);
}

#[test]
fn test_orphan_rule_moves_cue_with_dialogue() {
    let mut doc = ASTDocument::from_pages(vec![page(&[
        (ElementKind::Action, "Bob storms in."),
        (ElementKind::Character, "BOB"),
        (ElementKind::Parenthetical, "(annoyed)"),
        (ElementKind::Dialogue, "Get out."),
    ])]);
    let report = paginate(&mut doc, &capacity(3), &Settings::default());

    assert_eq!(report.moved_lines, 3);
    assert_eq!(report.continuations, 0);
    assert_eq!(
        texts(&doc),
        vec![vec!["Bob storms in."], vec!["BOB", "(annoyed)", "Get out."]]
    );
}

#[test]
fn test_split_dialogue_gets_continuation_header() {
    let mut doc = ASTDocument::from_pages(vec![page(&[
        (ElementKind::Character, "BOB (CONT'D)"),
        (ElementKind::Dialogue, "One."),
        (ElementKind::Dialogue, "Two."),
    ])]);
    let report = paginate(&mut doc, &capacity(2), &Settings::default());

    assert_eq!(report.continuations, 1);
    assert_eq!(
        texts(&doc),
        vec![vec!["BOB (CONT'D)", "One."], vec!["BOB (CONT'D)", "Two."]]
    );
    assert_eq!(doc.line(LinePos::new(1, 0)).unwrap().kind, ElementKind::Character);
}

#[test]
fn test_whole_page_block_is_accepted_overflow() {
    let mut doc = ASTDocument::from_pages(vec![page(&[
        (ElementKind::Character, "BOB"),
        (ElementKind::Parenthetical, "(annoyed)"),
        (ElementKind::Dialogue, "Get out."),
    ])]);
    let report = paginate(&mut doc, &capacity(2), &Settings::default());

    assert_eq!(report.moved_lines, 0);
    assert_eq!(report.continuations, 0);
    assert_eq!(report.accepted_overflow, vec![0]);
    assert_eq!(doc.page_count(), 1);
}

#[test]
fn test_single_line_larger_than_page() {
    let mut doc = ASTDocument::from_pages(vec![page(&[(ElementKind::Action, "x")])]);
    let report = paginate(&mut doc, &|_: &Page| true, &Settings::default());
    assert_eq!(report.accepted_overflow, vec![0]);
    assert_eq!(doc.page_count(), 1);
}

#[test]
fn test_dual_dialogue_toggle_is_reversible() {
    let mut doc = ASTDocument::from_pages(vec![page(&[
        (ElementKind::Character, "BOB"),
        (ElementKind::Dialogue, "Now!"),
        (ElementKind::Character, "ALICE"),
        (ElementKind::Dialogue, "Later!"),
    ])]);
    let original = doc.clone();
    let id = doc.line(LinePos::new(0, 1)).unwrap().id;
    let caret = Selection::collapsed(Caret::new(id, 0));

    assert!(toggle_dual_dialogue(&mut doc, &caret).changed());
    assert!(doc.lines().all(|l| l.dual.is_some()));

    assert!(toggle_dual_dialogue(&mut doc, &caret).changed());
    let tags: Vec<_> = doc.lines().map(|l| l.dual).collect();
    let original_tags: Vec<_> = original.lines().map(|l| l.dual).collect();
    assert_eq!(tags, original_tags);
}

#[test]
fn test_autocomplete_never_exceeds_cap() {
    let lines = (0..40)
        .flat_map(|i| {
            [
                Line::new(ElementKind::Character, format!("AGENT {}", i)),
                Line::new(ElementKind::SceneHeading, format!("INT. AIRPORT GATE {} - NIGHT", i)),
            ]
        })
        .collect();
    let index = AutocompleteIndex::rebuild(&ASTDocument::from_pages(vec![Page::from_lines(lines)]));

    for (kind, query) in [
        (ElementKind::Character, "A"),
        (ElementKind::Character, "AGENT 1"),
        (ElementKind::SceneHeading, ""),
        (ElementKind::SceneHeading, "INT. A"),
    ] {
        assert!(index.suggest(kind, query).len() <= 5);
    }
}

fn session_with(lines: &[(ElementKind, &str)]) -> EditorSession {
    let doc = Document::new("scene.slug", ASTDocument::from_pages(vec![page(lines)]), Default::default());
    EditorSession::new("it", doc, Settings::default())
}

fn caret_at(pipeline: &Pipeline<LineBudget>, index: usize, offset: usize) -> Mutation {
    let id = pipeline.session().ast().line(LinePos::new(0, index)).unwrap().id;
    Mutation::MoveCaret {
        caret: Caret::new(id, offset),
    }
}

#[test]
fn test_enter_scenarios() {
    let mut pipeline = Pipeline::new(
        session_with(&[(ElementKind::Character, "BOB")]),
        LineBudget::default(),
    );
    pipeline.apply(caret_at(&pipeline, 0, 3), 0).unwrap();

    let result = pipeline.apply(Mutation::Enter, 10).unwrap();
    assert_eq!(result.active_kind, ElementKind::Dialogue);

    // Blank dialogue line: Enter falls back to action
    let result = pipeline.apply(Mutation::Enter, 20).unwrap();
    assert_eq!(result.active_kind, ElementKind::Action);

    let kinds: Vec<_> = pipeline.session().ast().lines().map(|l| l.kind).collect();
    assert_eq!(
        kinds,
        vec![ElementKind::Character, ElementKind::Dialogue, ElementKind::Action]
    );
}

#[test]
fn test_typing_a_scene() {
    let mut pipeline = Pipeline::new(
        session_with(&[(ElementKind::SceneHeading, "")]),
        LineBudget::default(),
    );
    let steps = [
        Mutation::InsertText { text: "int. diner - night".into() },
        Mutation::Enter,
        Mutation::InsertText { text: "Rain on the windows.".into() },
        Mutation::Enter,
        Mutation::SetElement { kind: ElementKind::Character },
        Mutation::InsertText { text: "mona".into() },
        Mutation::Enter,
        Mutation::InsertText { text: "Coffee.".into() },
        Mutation::Enter,
    ];
    for (i, step) in steps.into_iter().enumerate() {
        pipeline.apply(step, i as u64 * 1_000).unwrap();
    }

    let lines: Vec<(ElementKind, String)> = pipeline
        .session()
        .ast()
        .lines()
        .map(|l| (l.kind, l.text.clone()))
        .collect();
    assert_eq!(
        lines,
        vec![
            (ElementKind::SceneHeading, "INT. DINER - NIGHT".to_string()),
            (ElementKind::Action, "Rain on the windows.".to_string()),
            (ElementKind::Character, "MONA".to_string()),
            (ElementKind::Dialogue, "Coffee.".to_string()),
            (ElementKind::Character, "MONA".to_string()),
        ]
    );

    // The continued name is selected, so typing replaces it
    let selection = pipeline.session().selection().unwrap();
    assert_eq!((selection.anchor.offset, selection.focus.offset), (0, 4));
}

#[test]
fn test_typing_reflows_pages() {
    let mut pipeline = Pipeline::new(
        session_with(&[(ElementKind::Action, "")]),
        LineBudget::new(4),
    );
    for i in 0..10 {
        pipeline
            .apply(Mutation::InsertText { text: format!("Beat {}.\n", i) }, i * 1_000)
            .unwrap();
    }

    let doc = pipeline.session().ast();
    assert_page_invariant(doc);
    assert_eq!(doc.line_count(), 11);
    assert_eq!(doc.page_count(), 3);
    assert_eq!(doc.page(0).unwrap().number_label(), "");
    assert_eq!(doc.page(2).unwrap().number_label(), "3.");

    // Caret follows its line onto the new page
    let caret = pipeline.session().caret().unwrap();
    assert_eq!(doc.locate(caret.line), Some(LinePos::new(2, 2)));
}

#[test]
fn test_import_and_print() {
    let doc = Document::from_source(
        "kitchen.txt",
        "INT. KITCHEN - DAY\n\nJOHN\n(quietly)\nIs anyone home?\n\nCUT TO:",
    )
    .unwrap();
    let kinds: Vec<_> = doc.ast().lines().map(|l| l.kind).collect();
    assert_eq!(kinds[0], ElementKind::SceneHeading);
    assert!(kinds.contains(&ElementKind::Character));
    assert!(kinds.contains(&ElementKind::Parenthetical));

    let layout = PrintLayout::build(doc.ast(), &doc.metadata, &Settings::default());
    let text = layout.render_text();
    assert!(text.contains("INT. KITCHEN - DAY"));
    assert!(text.contains("JOHN"));
}
