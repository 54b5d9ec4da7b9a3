use tracing::debug;

use super::ImpactAssessment;

pub const MAX_ASSESSMENTS: usize = 4;

const PLACEHOLDER_FACTOR: &str = "Unparsed market factor";
const UNKNOWN: &str = "Unknown";
const REVIEW_RECOMMENDATION: &str = "Review the generated analysis manually";

/// Extract up to four assessments from generated text.
///
/// Balanced `{...}` fragments are decoded as JSON; a fragment that fails to decode still
/// yields a placeholder carrying its raw text. Without any fragment, bullet and numbered
/// lines become one assessment each.
pub fn parse_assessments(text: &str) -> Vec<ImpactAssessment> {
    let fragments = json_fragments(text);
    if fragments.is_empty() {
        return bullet_assessments(text);
    }

    fragments
        .into_iter()
        .take(MAX_ASSESSMENTS)
        .map(|fragment| {
            serde_json::from_str::<ImpactAssessment>(fragment).unwrap_or_else(|error| {
                debug!(%error, "malformed assessment fragment");
                placeholder(fragment)
            })
        })
        .collect()
}

/// Outermost balanced brace spans, in order of appearance.
fn json_fragments(text: &str) -> Vec<&str> {
    let mut fragments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;

    for (index, ch) in text.char_indices() {
        match ch {
            '{' => {
                if depth == 0 {
                    start = index;
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    fragments.push(&text[start..=index]);
                }
            }
            _ => {}
        }
    }

    fragments
}

fn placeholder(fragment: &str) -> ImpactAssessment {
    ImpactAssessment {
        factor: PLACEHOLDER_FACTOR.to_string(),
        trend: UNKNOWN.to_string(),
        impact: fragment.trim().to_string(),
        recommendation: REVIEW_RECOMMENDATION.to_string(),
    }
}

fn bullet_assessments(text: &str) -> Vec<ImpactAssessment> {
    text.lines()
        .filter_map(bullet_body)
        .take(MAX_ASSESSMENTS)
        .map(|body| {
            let (factor, detail) = match body.split_once(':') {
                Some((factor, detail)) => (factor.trim(), detail.trim()),
                None => (body, body),
            };
            ImpactAssessment {
                factor: factor.to_string(),
                trend: UNKNOWN.to_string(),
                impact: detail.to_string(),
                recommendation: REVIEW_RECOMMENDATION.to_string(),
            }
        })
        .collect()
}

fn bullet_body(line: &str) -> Option<&str> {
    let line = line.trim();
    let body = if let Some(rest) = line
        .strip_prefix('-')
        .or_else(|| line.strip_prefix('*'))
        .or_else(|| line.strip_prefix('•'))
    {
        rest
    } else {
        let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        if digits == 0 {
            return None;
        }
        line[digits..].strip_prefix('.')?
    };

    let body = body.trim();
    (!body.is_empty()).then_some(body)
}
