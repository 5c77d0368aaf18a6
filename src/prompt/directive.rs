//! Directive builders - render templates with rule thresholds, product and feedback

use crate::domain::{ProductInput, Verdict};
use crate::validation::PreFilterRules;

use super::templates::{AD_GENERATION_PROMPT, CRITIC_PROMPT, REGENERATION_NOTE};

/// Substitute `{{key}}` placeholders. Unknown placeholders are left as-is.
pub fn render(template: &str, context: &[(&str, String)]) -> String {
    let mut rendered = template.to_string();
    for (key, value) in context {
        rendered = rendered.replace(&format!("{{{{{}}}}}", key), value);
    }
    rendered
}

fn rule_context(rules: &PreFilterRules) -> [(&'static str, String); 2] {
    [
        ("max_words", rules.max_words.to_string()),
        ("required_emojis", rules.required_emojis.to_string()),
    ]
}

/// Directive for one generation call.
///
/// Always carries the product. When `feedback` is a rejection its text is
/// appended verbatim; an accepted verdict adds nothing.
pub fn generation_directive(product: &ProductInput, feedback: Option<&Verdict>, rules: &PreFilterRules) -> String {
    let mut directive = render(AD_GENERATION_PROMPT, &rule_context(rules));
    directive.push_str(&product.to_string());

    if let Some(verdict) = feedback.filter(|v| v.is_rejection()) {
        directive.push_str("\n\n");
        directive.push_str(REGENERATION_NOTE);
        directive.push_str(&verdict.feedback);
    }

    directive
}

/// Directive for one evaluation call on `text`.
pub fn critic_directive(text: &str, rules: &PreFilterRules) -> String {
    let mut directive = render(CRITIC_PROMPT, &rule_context(rules));
    directive.push_str("Generated content: ");
    directive.push_str(text);
    directive
}
