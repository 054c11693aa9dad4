use super::questions::{AnswerOption, AssessmentQuestion};
use std::collections::BTreeMap;

struct QuestionTemplate {
    id: &'static str,
    question: &'static str,
    options: [(&'static str, &'static str, u32); 4],
}

const STANDARD_QUESTIONS: [QuestionTemplate; 10] = [
    QuestionTemplate {
        id: "erp_system",
        question: "Which ERP platform runs accounts payable?",
        options: [
            ("sap", "SAP S/4HANA or ECC", 3),
            ("oracle", "Oracle E-Business Suite or Fusion", 3),
            ("netsuite", "NetSuite or Dynamics", 2),
            ("other", "Spreadsheets or a homegrown system", 0),
        ],
    },
    QuestionTemplate {
        id: "data_access",
        question: "Can we extract ledger and vendor master data directly?",
        options: [
            ("full", "Full read access to production extracts", 3),
            ("partial", "Scheduled extracts with some tables missing", 2),
            ("manual", "Manual exports on request", 1),
            ("none", "No access during diligence", 0),
        ],
    },
    QuestionTemplate {
        id: "annual_spend",
        question: "What is the annual third-party spend under review?",
        options: [
            ("over_500m", "More than $500M", 3),
            ("100m_500m", "$100M to $500M", 2),
            ("25m_100m", "$25M to $100M", 1),
            ("under_25m", "Less than $25M", 0),
        ],
    },
    QuestionTemplate {
        id: "vendor_count",
        question: "How many active vendors are in the master file?",
        options: [
            ("over_5000", "More than 5,000", 3),
            ("1000_5000", "1,000 to 5,000", 2),
            ("200_1000", "200 to 1,000", 1),
            ("under_200", "Fewer than 200", 0),
        ],
    },
    QuestionTemplate {
        id: "history_months",
        question: "How much transaction history is available?",
        options: [
            ("36_plus", "36 months or more", 3),
            ("24_36", "24 to 36 months", 2),
            ("12_24", "12 to 24 months", 1),
            ("under_12", "Less than 12 months", 0),
        ],
    },
    QuestionTemplate {
        id: "entity_count",
        question: "How many legal entities post to the ledger?",
        options: [
            ("over_20", "More than 20", 3),
            ("6_20", "6 to 20", 2),
            ("2_5", "2 to 5", 1),
            ("single", "A single entity", 0),
        ],
    },
    QuestionTemplate {
        id: "prior_audit",
        question: "Has a recovery audit been performed in the last three years?",
        options: [
            ("never", "Never", 3),
            ("over_3_years", "More than three years ago", 2),
            ("internal_only", "Internal review only", 1),
            ("recent", "External audit within three years", 0),
        ],
    },
    QuestionTemplate {
        id: "executive_sponsor",
        question: "Is there an executive sponsor for the engagement?",
        options: [
            ("yes", "Named sponsor with budget authority", 3),
            ("informal", "Informal support from finance leadership", 2),
            ("pending", "Sponsor being identified", 1),
            ("no", "No sponsor", 0),
        ],
    },
    QuestionTemplate {
        id: "payment_controls",
        question: "How mature are duplicate payment controls today?",
        options: [
            ("none", "No automated controls", 3),
            ("basic", "Exact-match checks only", 2),
            ("moderate", "Fuzzy matching on invoice data", 1),
            ("advanced", "Continuous monitoring in place", 0),
        ],
    },
    QuestionTemplate {
        id: "timeline",
        question: "When does the diligence window close?",
        options: [
            ("over_90_days", "More than 90 days out", 3),
            ("60_90_days", "60 to 90 days", 2),
            ("30_60_days", "30 to 60 days", 1),
            ("under_30_days", "Less than 30 days", 0),
        ],
    },
];

/// The ten-question engagement readiness assessment.
pub fn standard() -> Vec<AssessmentQuestion> {
    STANDARD_QUESTIONS
        .iter()
        .map(|template| AssessmentQuestion {
            id: template.id.to_string(),
            question: template.question.to_string(),
            options: template
                .options
                .iter()
                .map(|(value, label, score)| AnswerOption {
                    value: value.to_string(),
                    label: label.to_string(),
                    score: *score,
                })
                .collect(),
        })
        .collect()
}

/// Answers the standard assessment requires regardless of score.
pub fn standard_required_answers() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("data_access".to_string(), "full".to_string()),
        ("executive_sponsor".to_string(), "yes".to_string()),
    ])
}
