use crate::portfolio::{Project, ProjectId};

/// Phrases that usually precede a project name, in priority order.
const NAME_KEYWORDS: [&str; 3] = ["project", "status of", "update on"];
const MAX_WINDOW_WORDS: usize = 3;
const MIN_CANDIDATE_CHARS: usize = 3;

/// Informal name variant mapped to the canonical project name it stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectAlias {
    pub alias: &'static str,
    pub canonical: &'static str,
}

const fn alias(alias: &'static str, canonical: &'static str) -> ProjectAlias {
    ProjectAlias { alias, canonical }
}

/// Checked in order; longer variants come first so they win over their fragments.
pub const PROJECT_ALIASES: &[ProjectAlias] = &[
    alias("cloud migration", "Cloud Migration"),
    alias("cloud", "Cloud Migration"),
    alias("migration", "Cloud Migration"),
    alias("crm implementation", "CRM Implementation"),
    alias("crm", "CRM Implementation"),
    alias("e-commerce platform", "E-Commerce Platform"),
    alias("ecommerce platform", "E-Commerce Platform"),
    alias("e commerce platform", "E-Commerce Platform"),
    alias("e-commerce", "E-Commerce Platform"),
    alias("ecommerce", "E-Commerce Platform"),
    alias("e commerce", "E-Commerce Platform"),
];

/// Resolve the project a status question is about.
///
/// A full project name anywhere in the text wins outright. Otherwise word windows after
/// each keyword are tried shortest first; a window counts once it is longer than two
/// characters and lines up with whole words of a tracked project name. The alias table
/// is the last resort.
pub fn extract_project(text: &str, projects: &[Project]) -> Option<ProjectId> {
    let lowered = text.to_lowercase();

    if let Some(project) = named_in_full(&lowered, projects) {
        return Some(project.id.clone());
    }

    for keyword in NAME_KEYWORDS {
        let Some(index) = lowered.find(keyword) else {
            continue;
        };
        let remainder = &lowered[index + keyword.len()..];
        for candidate in word_windows(remainder) {
            if let Some(project) = resolve_candidate(&candidate, projects) {
                return Some(project.id.clone());
            }
        }
    }

    aliased_project(&lowered, projects)
}

/// Project named in the text by its full name or by an alias.
pub fn mentioned_project(text: &str, projects: &[Project]) -> Option<ProjectId> {
    let lowered = text.to_lowercase();
    named_in_full(&lowered, projects)
        .map(|project| project.id.clone())
        .or_else(|| aliased_project(&lowered, projects))
}

fn named_in_full<'a>(lowered: &str, projects: &'a [Project]) -> Option<&'a Project> {
    projects
        .iter()
        .find(|project| lowered.contains(&project.name.to_lowercase()))
}

fn aliased_project(lowered: &str, projects: &[Project]) -> Option<ProjectId> {
    PROJECT_ALIASES
        .iter()
        .filter(|entry| lowered.contains(entry.alias))
        .find_map(|entry| {
            projects
                .iter()
                .find(|project| project.name.eq_ignore_ascii_case(entry.canonical))
        })
        .map(|project| project.id.clone())
}

/// Candidate names of one to three words following a keyword, shortest first.
pub(crate) fn word_windows(remainder: &str) -> Vec<String> {
    let words: Vec<&str> = remainder
        .split_whitespace()
        .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric() && c != '-'))
        .filter(|word| !word.is_empty())
        .take(MAX_WINDOW_WORDS)
        .collect();

    (1..=words.len())
        .map(|size| words[..size].join(" "))
        .filter(|candidate| candidate.chars().count() >= MIN_CANDIDATE_CHARS)
        .collect()
}

fn resolve_candidate<'a>(candidate: &str, projects: &'a [Project]) -> Option<&'a Project> {
    let candidate_words: Vec<&str> = candidate.split_whitespace().collect();
    projects.iter().find(|project| {
        let name = project.name.to_lowercase();
        let name_words: Vec<&str> = name.split_whitespace().collect();
        contains_run(&name_words, &candidate_words) || contains_run(&candidate_words, &name_words)
    })
}

/// Whether `needle` appears as consecutive whole words inside `haystack`.
fn contains_run(haystack: &[&str], needle: &[&str]) -> bool {
    !needle.is_empty()
        && haystack
            .windows(needle.len())
            .any(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::seed::demo_projects;

    fn id(raw: &str) -> Option<ProjectId> {
        Some(ProjectId(raw.to_string()))
    }

    #[test]
    fn windows_skip_short_fragments_and_punctuation() {
        assert_eq!(
            word_windows(" on crm? please"),
            vec!["on crm".to_string(), "on crm please".to_string()]
        );
        assert_eq!(word_windows("?"), Vec::<String>::new());
    }

    #[test]
    fn filler_words_do_not_stop_the_scan() {
        let projects = demo_projects();
        assert_eq!(
            extract_project("What's the status of the Cloud Migration project?", &projects),
            id("p1")
        );
    }

    #[test]
    fn name_after_project_keyword_resolves() {
        let projects = demo_projects();
        assert_eq!(
            extract_project("give me a project update for crm", &projects),
            id("p2")
        );
        assert_eq!(
            extract_project("project e-commerce status", &projects),
            id("p3")
        );
    }

    #[test]
    fn alias_table_is_the_fallback() {
        let projects = demo_projects();
        assert_eq!(
            extract_project("how is the ecommerce build doing, project status?", &projects),
            id("p3")
        );
        assert_eq!(
            extract_project("project status for the migration", &projects),
            id("p1")
        );
    }

    #[test]
    fn unknown_names_yield_nothing() {
        let projects = demo_projects();
        assert_eq!(extract_project("project status please", &projects), None);
        assert_eq!(extract_project("project status", &[]), None);
    }

    #[test]
    fn aliases_only_resolve_tracked_projects() {
        let projects: Vec<_> = demo_projects()
            .into_iter()
            .filter(|project| project.name != "CRM Implementation")
            .collect();
        assert_eq!(mentioned_project("crm budget", &projects), None);
    }

    #[test]
    fn full_names_of_new_projects_are_recognized() {
        let mut projects = demo_projects();
        projects[0].name = "Data Lake".to_string();
        assert_eq!(mentioned_project("Data Lake timeline", &projects), id("p1"));
    }

    fn with_project(name: &str) -> Vec<Project> {
        let mut projects = demo_projects();
        let mut extra = projects[1].clone();
        extra.id = ProjectId("p4".to_string());
        extra.name = name.to_string();
        projects.insert(0, extra);
        projects
    }

    #[test]
    fn full_names_win_over_filler_words_inside_other_names() {
        let projects = with_project("Authentication Revamp");
        assert_eq!(
            extract_project("What's the status of the Cloud Migration project?", &projects),
            id("p1")
        );
    }

    #[test]
    fn windows_match_whole_words_only() {
        let projects = with_project("Resource Planning");
        assert_eq!(extract_project("status of our CRM project", &projects), id("p2"));
        assert_eq!(extract_project("status of resource please", &projects), id("p4"));
        assert!(!contains_run(&["resource", "planning"], &["our"]));
        assert!(contains_run(&["resource", "planning"], &["planning"]));
    }
}
