//! JSON request templates.
//!
//! Resource definitions that the structured client cannot express are kept as
//! JSON files containing bracketed placeholder tokens such as
//! `[SynonymMapName]`. A template is rendered from a typed parameter map:
//!
//! 1. every known placeholder token found in the template must have a value;
//! 2. tokens are replaced literally (case-sensitive, whole token);
//! 3. the result must parse as JSON.
//!
//! Only the tokens of [`Placeholder`] are recognized. Any other bracketed text,
//! such as the character class of a pattern tokenizer (`"[A-Z]+"`), is part
//! of the resource definition and is submitted unchanged.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use crate::errors::ManagementError;

/// Placeholder tokens understood by the provisioner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Placeholder {
    SynonymMapName,
    IndexName,
    IndexerName,
    DataSourceName,
    SkillsetName,
    CognitiveServicesAccount,
    CognitiveServicesKey,
    CustomSkillUri,
    CustomSkillApiKey,
}

impl Placeholder {
    pub const ALL: [Placeholder; 9] = [
        Placeholder::SynonymMapName,
        Placeholder::IndexName,
        Placeholder::IndexerName,
        Placeholder::DataSourceName,
        Placeholder::SkillsetName,
        Placeholder::CognitiveServicesAccount,
        Placeholder::CognitiveServicesKey,
        Placeholder::CustomSkillUri,
        Placeholder::CustomSkillApiKey,
    ];

    /// The literal token as it appears in template files.
    pub fn token(&self) -> &'static str {
        match self {
            Placeholder::SynonymMapName => "[SynonymMapName]",
            Placeholder::IndexName => "[IndexName]",
            Placeholder::IndexerName => "[IndexerName]",
            Placeholder::DataSourceName => "[DataSourceName]",
            Placeholder::SkillsetName => "[SkillSetName]",
            Placeholder::CognitiveServicesAccount => "[CognitiveServicesAccount]",
            Placeholder::CognitiveServicesKey => "[CognitiveServicesKey]",
            Placeholder::CustomSkillUri => "[CustomSpoMetadataSkillUri]",
            Placeholder::CustomSkillApiKey => "[SPOMetadataMapper-Api-Key]",
        }
    }
}

impl std::fmt::Display for Placeholder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// Values for the placeholders of one template.
#[derive(Debug, Clone, Default)]
pub struct TemplateParameters {
    values: BTreeMap<Placeholder, String>,
}

impl TemplateParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value, replacing any previous value for the same placeholder.
    pub fn with(mut self, placeholder: Placeholder, value: impl Into<String>) -> Self {
        self.values.insert(placeholder, value.into());
        self
    }

    /// Add a value only when one is given.
    pub fn with_optional(self, placeholder: Placeholder, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.with(placeholder, value),
            None => self,
        }
    }

    fn value(&self, placeholder: Placeholder) -> Option<&str> {
        self.values.get(&placeholder).map(String::as_str)
    }
}

/// The placeholder whose token starts at byte `start`, if any.
///
/// Tokens end with `]` and never contain one, so at most one can match.
fn placeholder_at(text: &str, start: usize) -> Option<Placeholder> {
    let rest = text.get(start..)?;
    if !rest.starts_with('[') {
        return None;
    }
    Placeholder::ALL
        .into_iter()
        .find(|placeholder| rest.starts_with(placeholder.token()))
}

/// Find every distinct placeholder in `text`, in order of first appearance.
pub fn placeholders(text: &str) -> Vec<Placeholder> {
    let mut found: Vec<Placeholder> = Vec::new();
    let mut i = 0;

    while let Some(offset) = text[i..].find('[') {
        let start = i + offset;
        match placeholder_at(text, start) {
            Some(placeholder) => {
                if !found.contains(&placeholder) {
                    found.push(placeholder);
                }
                i = start + placeholder.token().len();
            }
            None => i = start + 1,
        }
    }

    found
}

/// Replace every token in a single pass, so substituted values are never rescanned.
fn substitute(template: &str, parameters: &TemplateParameters) -> String {
    let mut rendered = String::with_capacity(template.len());
    let mut copied_until = 0;
    let mut i = 0;

    while let Some(offset) = template[i..].find('[') {
        let start = i + offset;
        match placeholder_at(template, start) {
            Some(placeholder) => {
                let end = start + placeholder.token().len();
                if let Some(value) = parameters.value(placeholder) {
                    rendered.push_str(&template[copied_until..start]);
                    rendered.push_str(value);
                    copied_until = end;
                }
                i = end;
            }
            None => i = start + 1,
        }
    }

    rendered.push_str(&template[copied_until..]);
    rendered
}

/// Render a template already held in memory.
///
/// `source` names the template in error messages (usually its path).
///
/// # Returns
///
/// * `Ok(String)` - The rendered JSON body
/// * `Err(ManagementError::TemplateMalformed)` - If a placeholder has no value or
///   the rendered text is not valid JSON
pub fn render(
    source: &str,
    template: &str,
    parameters: &TemplateParameters,
) -> Result<String, ManagementError> {
    let found = placeholders(template);

    let unresolved: Vec<&str> = found
        .iter()
        .filter(|placeholder| parameters.value(**placeholder).is_none())
        .map(|placeholder| placeholder.token())
        .collect();
    if !unresolved.is_empty() {
        return Err(ManagementError::template_malformed(
            source,
            format!("no value for placeholders {}", unresolved.join(", ")),
        ));
    }

    let rendered = substitute(template, parameters);

    serde_json::from_str::<serde_json::Value>(&rendered).map_err(|e| {
        ManagementError::template_malformed(source, format!("rendered body is not valid JSON: {}", e))
    })?;

    debug!(
        template = %source,
        placeholders = found.len(),
        "Template rendered"
    );

    Ok(rendered)
}

/// Read a template file.
///
/// # Returns
///
/// * `Ok(String)` - The full file content
/// * `Err(ManagementError::TemplateMissing)` - If the file is absent or unreadable
pub async fn load(path: &Path) -> Result<String, ManagementError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ManagementError::template_missing(path.display().to_string(), e.to_string()))
}

/// Read and render a template file.
pub async fn render_file(
    path: &Path,
    parameters: &TemplateParameters,
) -> Result<String, ManagementError> {
    let template = load(path).await?;
    render(&path.display().to_string(), &template, parameters)
}
