//! Default collaborator wiring for the describe and title seams.
//!
//! The real vision/LLM clients that compose descriptions and titles are
//! deployment-specific and injected at startup; these template-based
//! implementations keep the pipeline runnable without them. Both read a
//! format template from the environment so operators can tune the text
//! without a rebuild.

use async_trait::async_trait;
use stylecast_pipeline::{ReferenceDescriber, TitleWriter};

/// Describer that renders a fixed template instead of calling a vision
/// model. `{ref}` in the template is replaced with the reference URL.
pub struct TemplateDescriber {
    template: String,
}

impl TemplateDescriber {
    pub fn new(template: String) -> Self {
        Self { template }
    }

    /// Template from `DESCRIBE_TEMPLATE`, with a generic default.
    pub fn from_env() -> Self {
        let template = std::env::var("DESCRIBE_TEMPLATE")
            .unwrap_or_else(|_| "Match the outfit and pose shown in {ref}.".into());
        Self::new(template)
    }
}

#[async_trait]
impl ReferenceDescriber for TemplateDescriber {
    async fn describe(&self, image_ref: &str) -> anyhow::Result<String> {
        Ok(self.template.replace("{ref}", image_ref))
    }
}

/// Title writer that renders `{character}` into a fixed template.
pub struct TemplateTitles {
    template: String,
}

impl TemplateTitles {
    pub fn new(template: String) -> Self {
        Self { template }
    }

    /// Template from `TITLE_TEMPLATE`, with a generic default.
    pub fn from_env() -> Self {
        let template =
            std::env::var("TITLE_TEMPLATE").unwrap_or_else(|_| "{character}'s look".into());
        Self::new(template)
    }
}

#[async_trait]
impl TitleWriter for TemplateTitles {
    async fn title(&self, character: &str, _description: &str) -> anyhow::Result<String> {
        Ok(self.template.replace("{character}", character))
    }
}
