use std::fmt;

use bg_core::{Prompt, Result, TextGenerator};

/// Offline generator that writes a small markdown article from the prompt's
/// keyword line. Useful for local runs without an API key.
pub struct DummyModel;

impl fmt::Debug for DummyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyModel").finish()
    }
}

impl DummyModel {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DummyModel {
    fn default() -> Self {
        Self::new()
    }
}

fn prompt_field<'a>(prompt: &'a Prompt, name: &str) -> Option<&'a str> {
    prompt.user.lines().find_map(|line| {
        line.strip_prefix(name)
            .map(|rest| rest.trim().trim_end_matches('.').trim())
    })
}

#[async_trait::async_trait]
impl TextGenerator for DummyModel {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn generate(&self, prompt: &Prompt) -> Result<String> {
        let keywords = prompt_field(prompt, "Keywords:")
            .filter(|k| !k.is_empty())
            .unwrap_or("writing");
        let tone = prompt_field(prompt, "Tone:").unwrap_or("neutral");

        let mut text = format!(
            "# A Guide to {keywords}\n\
             Everything you need to know about {keywords}, written in a {tone} tone.\n"
        );
        for keyword in keywords.split(", ") {
            text.push_str(&format!(
                "## Why {keyword} matters\nTeams that understand {keyword} ship better work. \
                 Start small, measure results, and keep improving.\n"
            ));
        }
        text.push_str("## Conclusion\nPick one idea from this post and try it today.");
        Ok(text)
    }
}
