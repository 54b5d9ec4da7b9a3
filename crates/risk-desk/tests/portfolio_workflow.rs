use std::sync::Arc;

use chrono::NaiveDate;
use risk_desk::assistant::IntentResponder;
use risk_desk::portfolio::seed::demo_indicators;
use risk_desk::portfolio::{
    InMemoryProjectRepository, PortfolioError, PortfolioService, ProjectDraft, ProjectId,
    ProjectStatus, ProjectUpdate, RiskDraft, RiskId, RiskLevel, RiskStatus, ScorePolicy,
};
use risk_desk::reports::write_risk_register;

fn service(policy: ScorePolicy) -> PortfolioService<InMemoryProjectRepository> {
    PortfolioService::new(
        Arc::new(InMemoryProjectRepository::seeded()),
        demo_indicators(),
        policy,
    )
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

fn data_platform_draft() -> ProjectDraft {
    ProjectDraft {
        name: "Data Platform".to_string(),
        description: "Consolidate reporting into a shared warehouse".to_string(),
        start_date: date(2024, 1, 8),
        end_date: date(2024, 11, 29),
        status: ProjectStatus::OnTrack,
        budget: 420_000.0,
        spent: 60_000.0,
        progress: 15,
        risks: vec![
            RiskDraft::new(
                "Vendor lock-in",
                "Warehouse pricing changes after year one",
                RiskLevel::Medium,
                "Commercial",
            ),
            RiskDraft::new(
                "Data quality",
                "Source systems disagree on customer ids",
                RiskLevel::High,
                "Technical",
            ),
        ],
    }
}

#[test]
fn created_project_is_scored_and_visible_to_the_assistant() {
    let service = service(ScorePolicy::Preserve);
    let project = service.create(data_platform_draft()).expect("project created");

    assert_eq!(project.risk_score, 63);
    assert!(project.id.0.starts_with("prj-"));
    assert_eq!(project.risks[0].id, RiskId(format!("{}-r1", project.id)));
    assert_eq!(project.risks[1].project_id, project.id);
    assert_eq!(project.risks[0].mitigation, "To be defined");
    assert_eq!(project.risks[0].status, RiskStatus::Open);

    let snapshot = service.snapshot().expect("snapshot");
    assert_eq!(snapshot.metrics.total_projects, 4);

    let text = IntentResponder::new().respond("project status of data platform", &snapshot);
    assert!(text.starts_with("Project \"Data Platform\" is currently on track with a risk score of 63/100."));
}

#[test]
fn project_without_risks_gets_the_baseline_score() {
    let service = service(ScorePolicy::Preserve);
    let mut draft = data_platform_draft();
    draft.risks.clear();
    let project = service.create(draft).expect("project created");
    assert_eq!(project.risk_score, 10);
}

#[test]
fn preserve_policy_keeps_stale_scores_until_recomputed() {
    let service = service(ScorePolicy::Preserve);
    let ecommerce = ProjectId("p3".to_string());

    let edited = service
        .edit(
            &ecommerce,
            ProjectUpdate {
                progress: Some(72),
                ..ProjectUpdate::default()
            },
        )
        .expect("edit applies");
    assert_eq!(edited.progress, 72);
    assert_eq!(edited.risk_score, 80);
    assert_eq!(edited.risks.len(), 2);

    let trimmed = service
        .remove_risk(&ecommerce, &RiskId("r4".to_string()))
        .expect("risk removed");
    assert_eq!(trimmed.risk_score, 80);

    let recomputed = service.recompute_score(&ecommerce).expect("recomputed");
    assert_eq!(recomputed.risk_score, 75);
}

#[test]
fn recompute_policy_tracks_the_live_risk_list() {
    let service = service(ScorePolicy::Recompute);
    let crm = ProjectId("p2".to_string());

    let project = service
        .add_risk(
            &crm,
            RiskDraft::new(
                "Licence overrun",
                "Seat count exceeds the negotiated tier",
                RiskLevel::Critical,
                "Commercial",
            ),
        )
        .expect("risk added");

    assert_eq!(project.risks.len(), 2);
    assert_eq!(project.risks[1].id, RiskId("p2-r2".to_string()));
    assert_eq!(project.risk_score, 75);

    let edited = service
        .edit(
            &crm,
            ProjectUpdate {
                name: Some("CRM Rollout".to_string()),
                ..ProjectUpdate::default()
            },
        )
        .expect("edit applies");
    assert_eq!(edited.risk_score, 75);
}

#[test]
fn invalid_edits_collect_every_field_error() {
    let service = service(ScorePolicy::Preserve);
    let error = service
        .edit(
            &ProjectId("p1".to_string()),
            ProjectUpdate {
                name: Some("   ".to_string()),
                budget: Some(0.0),
                spent: Some(-5.0),
                ..ProjectUpdate::default()
            },
        )
        .expect_err("edit rejected");

    match error {
        PortfolioError::Validation(errors) => {
            let fields: Vec<&str> = errors.fields().collect();
            assert_eq!(fields, vec!["name", "budget", "spent"]);
        }
        other => panic!("unexpected error {other:?}"),
    }

    let unchanged = service
        .get(&ProjectId("p1".to_string()))
        .expect("project still stored");
    assert_eq!(unchanged.name, "Cloud Migration");
}

#[test]
fn unknown_identifiers_are_reported() {
    let service = service(ScorePolicy::Preserve);
    assert!(matches!(
        service.get(&ProjectId("p404".to_string())),
        Err(PortfolioError::ProjectNotFound(_))
    ));
    assert!(matches!(
        service.remove_risk(&ProjectId("p1".to_string()), &RiskId("r9".to_string())),
        Err(PortfolioError::RiskNotFound { .. })
    ));
}

#[test]
fn register_export_reflects_store_mutations() {
    let service = service(ScorePolicy::Preserve);
    service
        .remove_risk(&ProjectId("p1".to_string()), &RiskId("r2".to_string()))
        .expect("risk removed");

    let mut buffer = Vec::new();
    let rows = write_risk_register(&service.list().expect("list"), &mut buffer)
        .expect("register written");
    let text = String::from_utf8(buffer).expect("utf8");

    assert_eq!(rows, 4);
    assert!(!text.contains("System Downtime"));
}
