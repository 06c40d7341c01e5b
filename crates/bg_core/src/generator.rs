use std::fmt;

use async_trait::async_trait;

use crate::types::Prompt;
use crate::Result;

#[async_trait]
pub trait TextGenerator: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Produce raw article text for a prompt.
    ///
    /// May return an empty string when the backend answered without content.
    async fn generate(&self, prompt: &Prompt) -> Result<String>;
}
