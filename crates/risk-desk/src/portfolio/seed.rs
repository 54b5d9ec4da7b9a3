//! Demo portfolio used when the store starts seeded.

use chrono::NaiveDate;

use super::domain::{
    MarketImpact, MarketIndicator, Project, ProjectId, ProjectStatus, Risk, RiskId, RiskLevel,
    RiskStatus, Trend,
};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

struct RiskSeed {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    level: RiskLevel,
    probability: u8,
    impact: u8,
    category: &'static str,
    mitigation: &'static str,
    status: RiskStatus,
    identified: NaiveDate,
}

impl RiskSeed {
    fn into_risk(self, project_id: &ProjectId) -> Risk {
        Risk {
            id: RiskId(self.id.to_string()),
            name: self.name.to_string(),
            description: self.description.to_string(),
            level: self.level,
            probability: self.probability,
            impact: self.impact,
            category: self.category.to_string(),
            mitigation: self.mitigation.to_string(),
            status: self.status,
            date_identified: self.identified,
            project_id: project_id.clone(),
        }
    }
}

pub fn demo_projects() -> Vec<Project> {
    let cloud = ProjectId("p1".to_string());
    let crm = ProjectId("p2".to_string());
    let ecommerce = ProjectId("p3".to_string());

    vec![
        Project {
            id: cloud.clone(),
            name: "Cloud Migration".to_string(),
            description: "Migrate on-premise systems to cloud infrastructure".to_string(),
            start_date: date(2023, 6, 1),
            end_date: date(2023, 12, 31),
            status: ProjectStatus::AtRisk,
            budget: 500_000.0,
            spent: 275_000.0,
            progress: 45,
            risk_score: 65,
            risks: vec![
                RiskSeed {
                    id: "r1",
                    name: "Data Security Breach",
                    description: "Potential security vulnerabilities during migration",
                    level: RiskLevel::High,
                    probability: 40,
                    impact: 90,
                    category: "Security",
                    mitigation: "Implement advanced encryption and security protocols",
                    status: RiskStatus::Open,
                    identified: date(2023, 7, 15),
                }
                .into_risk(&cloud),
                RiskSeed {
                    id: "r2",
                    name: "System Downtime",
                    description: "Extended downtime during migration",
                    level: RiskLevel::Medium,
                    probability: 60,
                    impact: 70,
                    category: "Operational",
                    mitigation: "Create detailed migration plan with minimal downtime windows",
                    status: RiskStatus::Mitigated,
                    identified: date(2023, 7, 10),
                }
                .into_risk(&cloud),
            ],
        },
        Project {
            id: crm.clone(),
            name: "CRM Implementation".to_string(),
            description: "Implement new CRM system for sales team".to_string(),
            start_date: date(2023, 4, 1),
            end_date: date(2023, 10, 31),
            status: ProjectStatus::OnTrack,
            budget: 300_000.0,
            spent: 150_000.0,
            progress: 60,
            risk_score: 25,
            risks: vec![RiskSeed {
                id: "r3",
                name: "User Adoption Issues",
                description: "Sales team resistance to new CRM",
                level: RiskLevel::Medium,
                probability: 50,
                impact: 60,
                category: "People",
                mitigation: "Comprehensive training and change management program",
                status: RiskStatus::Open,
                identified: date(2023, 5, 20),
            }
            .into_risk(&crm)],
        },
        Project {
            id: ecommerce.clone(),
            name: "E-Commerce Platform".to_string(),
            description: "Build new e-commerce platform".to_string(),
            start_date: date(2023, 1, 15),
            end_date: date(2023, 9, 30),
            status: ProjectStatus::Delayed,
            budget: 750_000.0,
            spent: 600_000.0,
            progress: 70,
            risk_score: 80,
            risks: vec![
                RiskSeed {
                    id: "r4",
                    name: "Payment Gateway Integration Failure",
                    description: "Issues with payment gateway API integration",
                    level: RiskLevel::Critical,
                    probability: 75,
                    impact: 95,
                    category: "Technical",
                    mitigation: "Engage payment gateway vendor support team",
                    status: RiskStatus::Open,
                    identified: date(2023, 6, 5),
                }
                .into_risk(&ecommerce),
                RiskSeed {
                    id: "r5",
                    name: "Performance Under Load",
                    description: "System performance degrades under high user load",
                    level: RiskLevel::High,
                    probability: 65,
                    impact: 85,
                    category: "Technical",
                    mitigation: "Load testing and infrastructure scaling",
                    status: RiskStatus::Open,
                    identified: date(2023, 6, 10),
                }
                .into_risk(&ecommerce),
            ],
        },
    ]
}

pub fn demo_indicators() -> Vec<MarketIndicator> {
    let indicator = |name: &str, value: f64, trend: Trend, impact: MarketImpact| MarketIndicator {
        name: name.to_string(),
        value,
        trend,
        impact,
    };

    vec![
        indicator(
            "Technology Sector Volatility",
            27.0,
            Trend::Up,
            MarketImpact::Negative,
        ),
        indicator(
            "IT Hardware Supply Chain",
            65.0,
            Trend::Down,
            MarketImpact::Negative,
        ),
        indicator(
            "Cloud Services Demand",
            82.0,
            Trend::Up,
            MarketImpact::Positive,
        ),
        indicator(
            "IT Talent Availability",
            35.0,
            Trend::Down,
            MarketImpact::Negative,
        ),
        indicator(
            "Cybersecurity Threats",
            78.0,
            Trend::Up,
            MarketImpact::Negative,
        ),
    ]
}
