//! Prompt template for review summaries

/// Placeholder replaced by the joined review text
pub const REVIEWS_PLACEHOLDER: &str = "{{reviews}}";

/// Default instruction sent with every summary request
pub const SUMMARY_TEMPLATE: &str = "\
Summarize the following customer reviews into a short paragraph that
highlights the key themes, both positive and negative. Mention recurring
praise and recurring complaints. Do not invent details that are not in the
reviews and do not address the reader.

Reviews:
{{reviews}}

Summary:";

/// Substitute the review text into a template
pub fn render_prompt(template: &str, reviews: &str) -> String {
    template.replace(REVIEWS_PLACEHOLDER, reviews)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_default_template() {
        let prompt = render_prompt(SUMMARY_TEMPLATE, "Great battery.\n\nToo heavy.");
        assert!(prompt.contains("Great battery.\n\nToo heavy."));
        assert!(!prompt.contains(REVIEWS_PLACEHOLDER));
    }

    #[test]
    fn test_template_without_placeholder_is_unchanged() {
        assert_eq!(render_prompt("static", "ignored"), "static");
    }
}
