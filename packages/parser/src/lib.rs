pub mod ast;
pub mod classifier;
pub mod error;
pub mod parser;
pub mod serializer;

pub use ast::{
    Document, DualGroupId, DualSide, DualTag, ElementKind, Line, LineId, LinePos, Page,
    Placement, TitlePage,
};
pub use classifier::classify;
pub use error::{ParseError, ParseResult};
pub use parser::parse_plain_text;
pub use serializer::{parse_script, serialize_script, ScriptData};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_scenario() {
        let doc = parse_plain_text("INT. KITCHEN - DAY\n(quietly)\nJOHN").unwrap();
        let kinds: Vec<ElementKind> = doc.lines().map(|l| l.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ElementKind::SceneHeading,
                ElementKind::Parenthetical,
                ElementKind::Character
            ]
        );
    }
}
