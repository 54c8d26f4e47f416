use serde::Serialize;
use slugline_editor::{
    paginate, AutocompleteIndex, Document, DocumentStats, EditorError, EditorSession, ElementKind,
    LineBudget, Mutation, Pipeline, PrintLayout, Settings,
};
use slugline_parser::{classify, parse_script, serialize_script, ScriptData};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn to_js(error: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&error.to_string())
}

/// Empty input means default settings
fn settings_from(json: &str) -> Result<Settings, EditorError> {
    if json.trim().is_empty() {
        Ok(Settings::default())
    } else {
        Ok(Settings::from_json(json)?)
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, EditorError> {
    Ok(serde_json::to_string(value)?)
}

fn load(name: &str, source: &str) -> Result<Document, EditorError> {
    Document::from_source(name, source)
}

fn import_plain_text(text: &str, settings_json: &str, lines_per_page: usize) -> Result<String, EditorError> {
    let settings = settings_from(settings_json)?;
    let mut doc = load("import.txt", text)?;
    paginate(doc.ast_mut(), &LineBudget::from_settings(&settings, lines_per_page), &settings);
    doc.to_json()
}

fn paginate_script(script: &str, settings_json: &str, lines_per_page: usize) -> Result<String, EditorError> {
    let settings = settings_from(settings_json)?;
    let mut data = parse_script(script)?;
    let metadata = std::mem::take(&mut data.metadata);
    let mut doc = data.into_document();
    paginate(&mut doc, &LineBudget::from_settings(&settings, lines_per_page), &settings);
    Ok(serialize_script(&ScriptData::from_document(&doc, metadata))?)
}

fn suggest_for(script: &str, kind: &str, query: &str) -> Result<String, EditorError> {
    let kind: ElementKind = kind.parse()?;
    let doc = load("script.slug", script)?;
    to_json(&AutocompleteIndex::rebuild(doc.ast()).suggest(kind, query))
}

/// Classify one line of plain text, returning its kind name
#[wasm_bindgen(js_name = classify)]
pub fn classify_js(text: &str) -> String {
    classify(text).as_str().to_string()
}

/// Import plain text and lay it out, returning script JSON
#[wasm_bindgen(js_name = importPlainText)]
pub fn import_plain_text_js(text: &str, settings: &str, lines_per_page: usize) -> Result<String, JsValue> {
    import_plain_text(text, settings, lines_per_page).map_err(to_js)
}

/// Re-flow script JSON with the line budget oracle
#[wasm_bindgen(js_name = paginate)]
pub fn paginate_js(script: &str, settings: &str, lines_per_page: usize) -> Result<String, JsValue> {
    paginate_script(script, settings, lines_per_page).map_err(to_js)
}

/// Autocomplete suggestions as a JSON array
#[wasm_bindgen(js_name = suggest)]
pub fn suggest_js(script: &str, kind: &str, query: &str) -> Result<String, JsValue> {
    suggest_for(script, kind, query).map_err(to_js)
}

#[wasm_bindgen(js_name = stats)]
pub fn stats_js(script: &str) -> Result<String, JsValue> {
    let doc = load("script.slug", script).map_err(to_js)?;
    to_json(&DocumentStats::collect(doc.ast())).map_err(to_js)
}

#[wasm_bindgen(js_name = printLayout)]
pub fn print_layout_js(script: &str, settings: &str) -> Result<String, JsValue> {
    let settings = settings_from(settings).map_err(to_js)?;
    let doc = load("script.slug", script).map_err(to_js)?;
    to_json(&PrintLayout::build(doc.ast(), &doc.metadata, &settings)).map_err(to_js)
}

/// A live editing session driven by the host's input events
#[wasm_bindgen]
pub struct Editor {
    pipeline: Pipeline<LineBudget>,
}

impl Editor {
    fn open(script: &str, settings_json: &str, lines_per_page: usize) -> Result<Self, EditorError> {
        let settings = settings_from(settings_json)?;
        let budget = LineBudget::from_settings(&settings, lines_per_page);
        let doc = load("script.slug", script)?;
        let session = EditorSession::new("wasm", doc, settings);
        Ok(Self {
            pipeline: Pipeline::new(session, budget),
        })
    }

    fn apply_json(&mut self, mutation: &str, now_ms: u64) -> Result<String, EditorError> {
        let mutation: Mutation = serde_json::from_str(mutation)?;
        let result = self.pipeline.apply(mutation, now_ms)?;
        to_json(&result)
    }
}

#[wasm_bindgen]
impl Editor {
    #[wasm_bindgen(constructor)]
    pub fn new(script: &str, settings: &str, lines_per_page: usize) -> Result<Editor, JsValue> {
        Self::open(script, settings, lines_per_page).map_err(to_js)
    }

    /// Apply a JSON-encoded mutation; `now_ms` is the host's monotonic clock
    pub fn apply(&mut self, mutation: &str, now_ms: f64) -> Result<String, JsValue> {
        self.apply_json(mutation, now_ms as u64).map_err(to_js)
    }

    pub fn undo(&mut self, now_ms: f64) -> Option<String> {
        let result = self.pipeline.undo(now_ms as u64)?;
        to_json(&result).ok()
    }

    pub fn redo(&mut self, now_ms: f64) -> Option<String> {
        let result = self.pipeline.redo(now_ms as u64)?;
        to_json(&result).ok()
    }

    /// Run due debounced work; true when the autocomplete index was rebuilt
    pub fn tick(&mut self, now_ms: f64) -> bool {
        self.pipeline.tick(now_ms as u64)
    }

    pub fn suggestions(&self) -> String {
        to_json(&self.pipeline.session().suggestions()).unwrap_or_else(|_| "[]".to_string())
    }

    #[wasm_bindgen(getter, js_name = activeKind)]
    pub fn active_kind(&self) -> String {
        self.pipeline.session().active_kind.as_str().to_string()
    }

    #[wasm_bindgen(js_name = toJson)]
    pub fn to_json(&self) -> Result<String, JsValue> {
        self.pipeline.session().document.to_json().map_err(to_js)
    }
}
