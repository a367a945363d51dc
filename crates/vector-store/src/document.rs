use std::collections::HashSet;
use toolscope_protocol::{Capability, ToolDefinition};

/// Text embedded for a tool: `"{name}: {description}. Keywords: {k1, k2}"`.
///
/// Keywords keep their definition order; repeats are written once, matching
/// the keyword set the fingerprint covers.
#[must_use]
pub fn render_tool_document<C: Capability>(definition: &ToolDefinition<C>) -> String {
    let mut seen = HashSet::new();
    let keywords: Vec<&str> = definition
        .keywords
        .iter()
        .map(String::as_str)
        .filter(|keyword| seen.insert(*keyword))
        .collect();
    format!(
        "{}: {}. Keywords: {}",
        definition.name,
        definition.description(),
        keywords.join(", ")
    )
    .trim()
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolscope_protocol::ToolSpec;

    #[test]
    fn renders_keywords_in_order() {
        let def = ToolDefinition::new("getNews", ToolSpec::new("Latest headlines"))
            .with_keywords(["news", "headlines"]);
        assert_eq!(
            render_tool_document(&def),
            "getNews: Latest headlines. Keywords: news, headlines"
        );
    }

    #[test]
    fn repeated_keywords_render_once() {
        let def = ToolDefinition::new("getNews", ToolSpec::new("Latest headlines"))
            .with_keywords(["news", "headlines", "news"]);
        let single = ToolDefinition::new("getNews", ToolSpec::new("Latest headlines"))
            .with_keywords(["news", "headlines"]);
        assert_eq!(render_tool_document(&def), render_tool_document(&single));
    }

    #[test]
    fn trims_when_keywords_are_absent() {
        let def = ToolDefinition::new("ping", ToolSpec::new("Health check"));
        assert_eq!(render_tool_document(&def), "ping: Health check. Keywords:");
    }
}
