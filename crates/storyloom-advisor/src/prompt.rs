//! Prompt template compilation and rendering via `minijinja`.
//!
//! Templates come from the story configuration and reference `{{ title }}`,
//! `{{ attribute_labels }}`, `{{ attributes }}` and `{{ scene }}`. The
//! fallback template takes `{{ error }}`. Substituted values are never
//! re-rendered, so a scene that mentions `{{ title }}` is shown as written.

use minijinja::{Environment, context};
use serde::Serialize;

use crate::error::{AdviceError, TemplateError};

/// Template name of the message shown when a guidance request fails.
const FALLBACK_TEMPLATE: &str = "fallback";

/// Which flavor of guidance the player asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GuidanceKind {
    /// General advice on how to play, keyed to the attribute set.
    Mentor,
    /// A hint for the current scene.
    Hint,
    /// Creative output for a scene's special action.
    CustomAction,
}

impl GuidanceKind {
    fn template_name(self) -> &'static str {
        match self {
            Self::Mentor => "mentor",
            Self::Hint => "hint",
            Self::CustomAction => "custom_action",
        }
    }
}

/// Everything a template may reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuidanceContext {
    /// Story title.
    pub title: String,
    /// `(label, current value)` for each attribute, in display order.
    pub attributes: Vec<(String, i32)>,
    /// Narrative text of the current scene.
    pub scene_text: String,
}

impl GuidanceContext {
    fn attribute_labels(&self) -> String {
        self.attributes
            .iter()
            .map(|(label, _)| label.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn attribute_values(&self) -> String {
        self.attributes
            .iter()
            .map(|(label, value)| format!("{label}: {value}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Compiled guidance and fallback templates.
///
/// A template that fails to compile is left out of the environment and
/// logged; rendering it later yields a [`TemplateError`], which callers treat
/// like any other failed guidance request.
pub struct PromptEngine {
    env: Environment<'static>,
}

impl std::fmt::Debug for PromptEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptEngine").finish_non_exhaustive()
    }
}

impl Default for PromptEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptEngine {
    /// Creates an engine with no templates.
    #[must_use]
    pub fn new() -> Self {
        Self {
            env: Environment::new(),
        }
    }

    /// Compiles the template used for `kind`.
    pub fn add_guidance_template(&mut self, kind: GuidanceKind, source: String) {
        self.add(kind.template_name(), source);
    }

    /// Compiles the fallback message template.
    pub fn add_fallback_template(&mut self, source: String) {
        self.add(FALLBACK_TEMPLATE, source);
    }

    fn add(&mut self, name: &'static str, source: String) {
        if let Err(error) = self.env.add_template_owned(name, source) {
            tracing::warn!(template = name, %error, "failed to compile prompt template");
        }
    }

    /// Renders the prompt for `kind` against `context`.
    ///
    /// # Errors
    ///
    /// Returns `TemplateError` if the template is missing, failed to compile,
    /// or fails to render.
    pub fn render_prompt(
        &self,
        kind: GuidanceKind,
        context: &GuidanceContext,
    ) -> Result<String, TemplateError> {
        let name = kind.template_name();
        self.env
            .get_template(name)
            .map_err(|e| TemplateError(format!("missing {name} template: {e}")))?
            .render(context! {
                title => context.title.as_str(),
                attribute_labels => context.attribute_labels(),
                attributes => context.attribute_values(),
                scene => context.scene_text.as_str(),
            })
            .map_err(|e| TemplateError(format!("{name} render failed: {e}")))
    }

    /// Renders the message shown when a guidance request fails. Falls back to
    /// the bare error text if the fallback template itself cannot render.
    #[must_use]
    pub fn render_fallback(&self, error: &AdviceError) -> String {
        self.env
            .get_template(FALLBACK_TEMPLATE)
            .and_then(|template| template.render(context! { error => error.to_string() }))
            .unwrap_or_else(|render_error| {
                tracing::warn!(%render_error, "fallback template failed; using error text");
                error.to_string()
            })
    }
}
