//! Prompt templates for the three nodes.

use scribeloop_core::ApprovalMode;

/// Opening line of every critic prompt.
pub const CRITIC_PERSONA: &str = "You are a senior editor and SEO specialist.";

/// Opening line of every writer prompt.
pub const WRITER_PERSONA: &str = "You are a professional blog post writer.";

/// The web query the researcher issues for a topic.
pub fn research_query(topic: &str) -> String {
    format!("latest information and facts about {topic}")
}

pub fn writer_prompt(topic: &str, research_data: &str, critique: &str) -> String {
    format!(
        "{WRITER_PERSONA}
Topic: {topic}
Research Data: {research_data}

Previous Critique (if any): {critique}

Write a comprehensive, engaging markdown blog post about the topic.
Ensure it incorporates the research data accurately.
If a previous critique is given, address every point it raises.
Structure it with a catchy title, introduction, body paragraphs, and conclusion."
    )
}

pub fn critic_prompt(draft: &str, mode: ApprovalMode) -> String {
    let decision = match mode {
        ApprovalMode::Legacy => {
            "If the post is good and needs no major changes, reply with \"APPROVE\".
If it needs changes, provide specific feedback and recommendations."
        }
        ApprovalMode::Structured => {
            "Begin your reply with exactly one verdict line:
VERDICT: APPROVED        (the post is good and needs no major changes)
VERDICT: NEEDS_REVISION  (the post needs changes)
After the verdict line, provide specific feedback and recommendations."
        }
    };

    format!(
        "{CRITIC_PERSONA}
Review the following blog post draft:

{draft}

Check for:
1. Factual accuracy based on general knowledge.
2. SEO best practices (keywords, structure).
3. Engagement and tone.

{decision}"
    )
}
