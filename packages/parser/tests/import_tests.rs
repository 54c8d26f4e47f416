use slugline_parser::{
    classify, parse_plain_text, parse_script, serialize_script, ElementKind, ParseError, ScriptData,
    TitlePage,
};

#[test]
fn test_import_scenario_lines() {
    assert_eq!(classify("INT. KITCHEN - DAY"), ElementKind::SceneHeading);
    assert_eq!(classify("(quietly)"), ElementKind::Parenthetical);
    assert_eq!(classify("JOHN"), ElementKind::Character);
}

#[test]
fn test_classification_is_deterministic() {
    let samples = [
        "EXT. ROOFTOP - NIGHT",
        "int/ext. car - moving",
        "> FADE OUT.",
        "SMASH CUT TO:",
        "()",
        "A VERY LONG SHOUTED LINE THAT CANNOT BE A CUE",
        "Mara laughs.",
        "",
    ];
    for sample in samples {
        assert_eq!(classify(sample), classify(sample), "{:?}", sample);
    }
    assert_eq!(classify("A VERY LONG SHOUTED LINE THAT CANNOT BE A CUE"), ElementKind::Action);
    assert_eq!(classify("SMASH CUT TO:"), ElementKind::Transition);
}

#[test]
fn test_full_import_lands_on_one_page() {
    let source = "FADE IN:\n\nEXT. HARBOR - DAWN\n\nGulls wheel over the water.\n\nNORA\n(to herself)\nToo early.\n";
    let doc = parse_plain_text(source).unwrap();

    assert_eq!(doc.page_count(), 1);
    assert_eq!(doc.line_count(), source.split('\n').count());
    let kinds: Vec<ElementKind> = doc.lines().filter(|l| !l.is_blank()).map(|l| l.kind).collect();
    assert_eq!(kinds[1], ElementKind::SceneHeading);
    assert_eq!(kinds[3], ElementKind::Character);
    assert_eq!(kinds[4], ElementKind::Parenthetical);
}

#[test]
fn test_binary_input_is_rejected_whole() {
    assert!(parse_plain_text("INT. LAB - DAY\n\0\u{1}").is_err());
}

#[test]
fn test_script_json_round_trip_keeps_pages_and_metadata() -> Result<(), ParseError> {
    let doc = parse_plain_text("INT. BARN - NIGHT\n\ncora\nWho's there?")?;
    let metadata = TitlePage {
        title: "Hayloft".to_string(),
        author: "R. Vance".to_string(),
        ..TitlePage::default()
    };

    let json = serialize_script(&ScriptData::from_document(&doc, metadata))?;
    let loaded = parse_script(&json)?;

    assert_eq!(loaded.metadata.title, "Hayloft");
    assert_eq!(loaded.content.len(), 1);
    let restored = loaded.into_document();
    assert_eq!(restored.line_count(), doc.line_count());
    Ok(())
}

#[test]
fn test_malformed_json_is_rejected() {
    assert!(parse_script("not json").is_err());
    assert!(parse_script(r#"{"content": [{"lines": "nope"}]}"#).is_err());
}
