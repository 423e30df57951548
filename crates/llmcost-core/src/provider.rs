//! Provider label inference
//!
//! Catalog ids carry the vendor as a namespace prefix (`openai/gpt-4o`).
//! The prefix is matched case-insensitively against an ordered rule table.
//! Ids with an unknown prefix get the prefix itself, capitalized; ids with
//! no prefix at all are labelled [`OTHER_PROVIDER`].

/// Label for ids that carry no namespace prefix
pub const OTHER_PROVIDER: &str = "Other";

/// A single prefix rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderRule {
    /// Lowercase namespace prefix, without the trailing `/`
    pub prefix: &'static str,
    /// Human-readable vendor label
    pub label: &'static str,
}

const fn rule(prefix: &'static str, label: &'static str) -> ProviderRule {
    ProviderRule { prefix, label }
}

/// Known vendor prefixes, checked in order
pub const PROVIDER_RULES: &[ProviderRule] = &[
    rule("openai", "OpenAI"),
    rule("anthropic", "Anthropic"),
    rule("google", "Google"),
    rule("meta-llama", "Meta"),
    rule("mistralai", "Mistral"),
    rule("deepseek", "DeepSeek"),
    rule("x-ai", "xAI"),
    rule("cohere", "Cohere"),
    rule("qwen", "Qwen"),
    rule("amazon", "Amazon"),
    rule("microsoft", "Microsoft"),
    rule("nvidia", "NVIDIA"),
    rule("perplexity", "Perplexity"),
    rule("moonshotai", "Moonshot AI"),
    rule("z-ai", "Z.ai"),
    rule("01-ai", "01.AI"),
    rule("ai21", "AI21"),
    rule("inflection", "Inflection"),
    rule("nousresearch", "Nous Research"),
];

/// Infer the provider label for a catalog id
///
/// Total and deterministic: every input maps to a non-empty label.
///
/// # Examples
/// ```
/// use llmcost_core::provider::infer_provider;
///
/// assert_eq!(infer_provider("OpenAI/gpt-4o"), "OpenAI");
/// assert_eq!(infer_provider("liquid/lfm-40b"), "Liquid");
/// assert_eq!(infer_provider("gpt-4o"), "Other");
/// ```
pub fn infer_provider(id: &str) -> String {
    infer_provider_with(PROVIDER_RULES, id)
}

/// Same as [`infer_provider`] with a caller-supplied rule table
pub fn infer_provider_with(rules: &[ProviderRule], id: &str) -> String {
    let Some((prefix, _)) = id.split_once('/') else {
        return OTHER_PROVIDER.to_string();
    };

    let prefix = prefix.trim();
    if let Some(rule) = rules
        .iter()
        .find(|rule| rule.prefix.eq_ignore_ascii_case(prefix))
    {
        return rule.label.to_string();
    }

    capitalize(prefix).unwrap_or_else(|| OTHER_PROVIDER.to_string())
}

fn capitalize(word: &str) -> Option<String> {
    let mut chars = word.chars();
    let first = chars.next()?;
    Some(first.to_uppercase().chain(chars).collect())
}
