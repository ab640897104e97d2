//! Prompts sent to the vision provider.

use once_cell::sync::Lazy;

use crate::domain::check::CheckField;

/// Text-only prompt used to verify the provider is reachable.
pub const PROBE_PROMPT: &str = r#"Return exactly this JSON: {"test": "success"}"#;

static EXTRACTION_PROMPT: Lazy<String> = Lazy::new(build_extraction_prompt);

/// The structured extraction prompt.
///
/// Lists every [`CheckField`] key with a hint, asking for `null` when a value
/// cannot be read.
pub fn extraction_prompt() -> &'static str {
    &EXTRACTION_PROMPT
}

fn build_extraction_prompt() -> String {
    let fields = CheckField::ALL
        .into_iter()
        .map(|field| format!("  \"{}\": \"{}\"", field.key(), field.prompt_hint()))
        .collect::<Vec<_>>()
        .join(",\n");

    format!(
        "Analyze this check image and extract information. Return ONLY a valid JSON object:\n\n\
         {{\n{fields}\n}}\n\nReturn ONLY the JSON object, no additional text."
    )
}
