use crate::datasets::{self, ActionItem, ControlRecord, KpiRecord, KpiUnit};
use crate::infra::{load_controls_csv, parse_answer, render_grid, restore_filters, save_filters};
use chrono::Local;
use clap::Args;
use roi_dashboard::assessment::{
    session, AssessmentOutcome, AssessmentResponses, EligibilityDecision, EligibilityScorer,
};
use roi_dashboard::config::AppConfig;
use roi_dashboard::error::AppError;
use roi_dashboard::filters::{FilterComposer, FilterState};
use roi_dashboard::kpi::{resolve_match, CanonicalRecord};
use roi_dashboard::presentation::cells::format_currency;
use roi_dashboard::presentation::{
    present, render, Align, BadgeConfig, ColumnDescriptor, ColumnTypeTag, RenderConfig,
    RenderedCell, StatusKind, TableGrid, TableOptions, TextSource, TextStyle,
};
use roi_dashboard::storage::{assessment_key, InMemoryStore, KeyValueStore};
use serde_json::json;
use std::path::PathBuf;
use tracing::{info, warn};

const CONTROLS_VIEW: &str = "controls";
const ACTIONS_VIEW: &str = "actions";

#[derive(Args, Debug, Default)]
pub(crate) struct ControlsArgs {
    /// Free-text search across name, description, owner and id
    #[arg(long)]
    pub(crate) search: Option<String>,
    /// Only controls with this compliance status
    #[arg(long)]
    pub(crate) status: Option<String>,
    #[arg(long)]
    pub(crate) owner: Option<String>,
    /// Risk level: High, Medium or Low
    #[arg(long)]
    pub(crate) risk: Option<String>,
    #[arg(long)]
    pub(crate) category: Option<String>,
    /// Load controls from a CSV export instead of the mock dataset
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
    /// Start from the filters saved for this view
    #[arg(long)]
    pub(crate) restore: bool,
    /// Save the resulting filters for the next run
    #[arg(long)]
    pub(crate) save: bool,
    #[arg(long)]
    pub(crate) compact: bool,
    /// Print the presented table as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ActionsArgs {
    /// Free-text search across title, description, owner and id
    #[arg(long)]
    pub(crate) search: Option<String>,
    #[arg(long)]
    pub(crate) status: Option<String>,
    #[arg(long)]
    pub(crate) owner: Option<String>,
    #[arg(long)]
    pub(crate) priority: Option<String>,
    /// Start from the filters saved for this view
    #[arg(long)]
    pub(crate) restore: bool,
    /// Save the resulting filters for the next run
    #[arg(long)]
    pub(crate) save: bool,
    #[arg(long)]
    pub(crate) compact: bool,
    /// Print the presented table as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct KpiArgs {
    /// Route slug, e.g. duplicate-payment-detection. Lists every KPI when omitted.
    pub(crate) slug: Option<String>,
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    /// Organisation the answers belong to
    #[arg(long, default_value = "default")]
    pub(crate) subject: String,
    /// Answer as QUESTION=VALUE; repeat for several questions
    #[arg(long = "answer", value_parser = parse_answer)]
    pub(crate) answers: Vec<(String, String)>,
    /// Discard saved answers before applying new ones
    #[arg(long)]
    pub(crate) reset: bool,
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_controls(args: ControlsArgs, store: &dyn KeyValueStore) -> Result<(), AppError> {
    let controls = match &args.csv {
        Some(path) => load_controls_csv(path).map_err(AppError::dataset)?,
        None => datasets::controls(),
    };

    let mut state = control_filter_state();
    if args.restore {
        restore_filters(store, CONTROLS_VIEW, &mut state);
    }
    apply_selections(
        &mut state,
        args.search.as_deref(),
        &[
            ("status", args.status.as_deref()),
            ("owner", args.owner.as_deref()),
            ("risk", args.risk.as_deref()),
            ("category", args.category.as_deref()),
        ],
    )?;

    show_controls(&controls, &state, args.compact, args.json)?;

    if args.save {
        save_filters(store, CONTROLS_VIEW, &state)?;
        info!(view = CONTROLS_VIEW, active = state.active_filters_count(), "filters saved");
    }
    Ok(())
}

pub(crate) fn run_actions(args: ActionsArgs, store: &dyn KeyValueStore) -> Result<(), AppError> {
    let items = datasets::action_items();

    let mut state = action_filter_state();
    if args.restore {
        restore_filters(store, ACTIONS_VIEW, &mut state);
    }
    apply_selections(
        &mut state,
        args.search.as_deref(),
        &[
            ("status", args.status.as_deref()),
            ("owner", args.owner.as_deref()),
            ("priority", args.priority.as_deref()),
        ],
    )?;

    show_actions(&items, &state, args.compact, args.json)?;

    if args.save {
        save_filters(store, ACTIONS_VIEW, &state)?;
        info!(view = ACTIONS_VIEW, active = state.active_filters_count(), "filters saved");
    }
    Ok(())
}

pub(crate) fn run_kpi(args: KpiArgs) -> Result<(), AppError> {
    let kpis = datasets::kpis();
    match args.slug.as_deref() {
        Some(slug) => show_kpi(&kpis, slug, args.json),
        None => show_kpi_list(&kpis, args.json),
    }
}

pub(crate) fn run_assessment(
    args: AssessArgs,
    store: &dyn KeyValueStore,
    config: &AppConfig,
) -> Result<(), AppError> {
    let scorer = EligibilityScorer::standard(config.assessment.threshold_percent);

    if args.reset {
        store.remove(&assessment_key(&args.subject))?;
        info!(subject = %args.subject, "saved answers cleared");
    }

    let mut responses = session::load_responses(store, &args.subject);
    if !args.answers.is_empty() {
        for (question_id, value) in args.answers {
            record_answer(&scorer, &mut responses, question_id, value);
        }
        session::save_responses(store, &args.subject, &responses)?;
    }

    let outcome = scorer.evaluate(&responses);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_assessment(&args.subject, &scorer, &responses, &outcome);
    }
    Ok(())
}

/// Walks every view against mock data with an in-memory store, leaving
/// the configured store untouched.
pub(crate) fn run_demo(config: &AppConfig) -> Result<(), AppError> {
    let store = InMemoryStore::new();
    println!(
        "ROI dashboard demo ({})\n",
        Local::now().date_naive().format("%b %-d, %Y")
    );

    let mut control_state = control_filter_state();
    control_state.set("risk", "High")?;
    show_controls(&datasets::controls(), &control_state, false, false)?;
    save_filters(&store, CONTROLS_VIEW, &control_state)?;

    let mut restored = control_filter_state();
    restore_filters(&store, CONTROLS_VIEW, &mut restored);
    println!(
        "Restored {} saved control filter(s) from the session store.\n",
        restored.active_filters_count()
    );

    let mut action_state = action_filter_state();
    action_state.set_search("vendor");
    show_actions(&datasets::action_items(), &action_state, true, false)?;

    let kpis = datasets::kpis();
    show_kpi_list(&kpis, false)?;
    show_kpi(&kpis, "duplicate-payment-detection", false)?;
    show_kpi(&kpis, "working-capital", false)?;

    let scorer = EligibilityScorer::standard(config.assessment.threshold_percent);
    let subject = "northwind";
    let mut responses = AssessmentResponses::new();
    for (question_id, value) in [
        ("erp_system", "sap"),
        ("data_access", "full"),
        ("annual_spend", "100m_500m"),
        ("vendor_count", "1000_5000"),
        ("history_months", "36_plus"),
        ("entity_count", "6_20"),
        ("prior_audit", "over_3_years"),
        ("executive_sponsor", "yes"),
        ("payment_controls", "basic"),
        ("timeline", "30_60_days"),
    ] {
        record_answer(&scorer, &mut responses, question_id.to_string(), value.to_string());
    }
    session::save_responses(&store, subject, &responses)?;

    let restored = session::load_responses(&store, subject);
    let outcome = scorer.evaluate(&restored);
    print_assessment(subject, &scorer, &restored, &outcome);
    Ok(())
}

fn control_filter_state() -> FilterState {
    FilterState::new(["status", "owner", "risk", "category"])
}

fn action_filter_state() -> FilterState {
    FilterState::new(["status", "owner", "priority"])
}

fn apply_selections(
    state: &mut FilterState,
    search: Option<&str>,
    selections: &[(&str, Option<&str>)],
) -> Result<(), AppError> {
    if let Some(term) = search {
        state.set_search(term);
    }
    for (field, value) in selections {
        if let Some(value) = value {
            state.set(field, *value)?;
        }
    }
    Ok(())
}

fn status_matches(actual: &str, selected: &str) -> bool {
    match (actual.parse::<StatusKind>(), selected.parse::<StatusKind>()) {
        (Ok(actual), Ok(selected)) => actual == selected,
        _ => actual.eq_ignore_ascii_case(selected),
    }
}

fn risk_badge() -> BadgeConfig {
    BadgeConfig::default()
        .with_color("High", "#dc2626")
        .with_color("Medium", "#d97706")
        .with_color("Low", "#16a34a")
}

fn control_columns() -> Vec<ColumnDescriptor<ControlRecord>> {
    vec![
        ColumnDescriptor::new("id", "ID", ColumnTypeTag::Text).width("80px"),
        ColumnDescriptor::new("name", "Control", ColumnTypeTag::Text)
            .sticky()
            .width("220px"),
        ColumnDescriptor::new("owner", "Owner", ColumnTypeTag::Text),
        ColumnDescriptor::new("status", "Status", ColumnTypeTag::Status),
        ColumnDescriptor::new("risk", "Risk", ColumnTypeTag::Badge).badge_config(risk_badge()),
        ColumnDescriptor::new("annual_savings", "Annual Savings", ColumnTypeTag::Currency)
            .align(Align::Right),
        ColumnDescriptor::new("last_tested", "Last Tested", ColumnTypeTag::Date),
    ]
    .into_iter()
    .map(ColumnDescriptor::rendered)
    .collect()
}

fn control_filters() -> FilterComposer<ControlRecord> {
    FilterComposer::new()
        .search_fields(["name", "description", "owner", "id"])
        .matcher("status", |row: &ControlRecord, value| {
            status_matches(&row.status, value)
        })
}

fn action_columns() -> Vec<ColumnDescriptor<ActionItem>> {
    vec![
        ColumnDescriptor::new("id", "ID", ColumnTypeTag::Text),
        ColumnDescriptor::new("title", "Action", ColumnTypeTag::TextWithLink)
            .sticky()
            .text_style(TextStyle::Short),
        ColumnDescriptor::new("owner", "Owner", ColumnTypeTag::Text),
        ColumnDescriptor::new("status", "Status", ColumnTypeTag::Status),
        ColumnDescriptor::new("priority", "Priority", ColumnTypeTag::Badge)
            .badge_config(risk_badge()),
        ColumnDescriptor::new("due_date", "Due", ColumnTypeTag::Date).align(Align::Right),
    ]
    .into_iter()
    .map(ColumnDescriptor::rendered)
    .collect()
}

fn action_filters() -> FilterComposer<ActionItem> {
    FilterComposer::new()
        .search_fields(["title", "description", "owner", "id"])
        .matcher("status", |row: &ActionItem, value| {
            status_matches(&row.status, value)
        })
}

fn measure_column(key: &str, header: &str) -> ColumnDescriptor<KpiRecord> {
    let measure = key.to_string();
    ColumnDescriptor::new(key, header, ColumnTypeTag::Number)
        .align(Align::Right)
        .accessor(move |kpi: &KpiRecord| {
            let value = if measure == "target" {
                kpi.target
            } else {
                kpi.current
            };
            RenderedCell::Number {
                text: format_measure(value, kpi.unit),
            }
        })
}

fn kpi_columns() -> Vec<ColumnDescriptor<KpiRecord>> {
    vec![
        ColumnDescriptor::new("id", "Route", ColumnTypeTag::TextWithLink).rendered(),
        ColumnDescriptor::new("name", "KPI", ColumnTypeTag::Text)
            .sticky()
            .rendered(),
        ColumnDescriptor::new("category", "Category", ColumnTypeTag::Text).rendered(),
        ColumnDescriptor::new("status", "Status", ColumnTypeTag::Status).rendered(),
        measure_column("current", "Current"),
        measure_column("target", "Target"),
    ]
}

fn show_kpi_list(kpis: &[KpiRecord], as_json: bool) -> Result<(), AppError> {
    let options = TableOptions::new()
        .title("KPIs")
        .subtitle(TextSource::computed(|rows: &[KpiRecord]| {
            let at_risk = rows
                .iter()
                .filter(|kpi| !status_matches(&kpi.status, "on-track"))
                .count();
            format!("{} tracked | {at_risk} need attention", rows.len())
        }))
        .empty_message("No KPIs configured");
    let view = present(&kpi_columns(), kpis, &options);
    emit(view.grid(), as_json)
}

fn show_controls(
    controls: &[ControlRecord],
    state: &FilterState,
    compact: bool,
    as_json: bool,
) -> Result<(), AppError> {
    let composer = control_filters();
    let filtered: Vec<ControlRecord> = composer
        .apply(controls, state)
        .into_iter()
        .cloned()
        .collect();

    let total = controls.len();
    let active = state.active_filters_count();
    let options = TableOptions::new()
        .title("Controls")
        .subtitle(TextSource::computed(move |rows: &[ControlRecord]| {
            let savings: f64 = rows.iter().map(|row| row.annual_savings).sum();
            format!(
                "{} of {total} controls | {active} active filter(s) | {} annual savings",
                rows.len(),
                format_currency(savings)
            )
        }))
        .empty_message("No controls match your filters")
        .empty_description("Clear the filters to see every control")
        .compact(compact);

    let view = present(&control_columns(), &filtered, &options);
    emit(view.grid(), as_json)?;
    if !as_json {
        println!(
            "Owners: {}\n",
            composer.options_for("owner", controls).join(", ")
        );
    }
    Ok(())
}

fn show_actions(
    items: &[ActionItem],
    state: &FilterState,
    compact: bool,
    as_json: bool,
) -> Result<(), AppError> {
    let filtered: Vec<ActionItem> = action_filters()
        .apply(items, state)
        .into_iter()
        .cloned()
        .collect();

    let options = TableOptions::new()
        .title("Action Items")
        .subtitle(TextSource::computed(|rows: &[ActionItem]| {
            let overdue = rows
                .iter()
                .filter(|row| status_matches(&row.status, "overdue"))
                .count();
            format!("{} items | {overdue} overdue", rows.len())
        }))
        .empty_message(TextSource::computed(|_: &[ActionItem]| {
            "No action items match your filters".to_string()
        }))
        .compact(compact);

    let view = present(&action_columns(), &filtered, &options);
    emit(view.grid(), as_json)
}

fn show_kpi(kpis: &[KpiRecord], slug: &str, as_json: bool) -> Result<(), AppError> {
    let Some(resolved) = resolve_match(slug, kpis) else {
        warn!(slug, "no KPI matches route slug");
        if as_json {
            println!("{}", serde_json::to_string_pretty(&json!({ "found": false, "slug": slug }))?);
        } else {
            println!("KPI not found: '{slug}'");
            let known: Vec<&str> = kpis.iter().map(CanonicalRecord::id).collect();
            println!("  Known KPIs: {}\n", known.join(", "));
        }
        return Ok(());
    };

    let kpi = resolved.record;
    info!(slug, kpi = %kpi.id, rule = resolved.rule.label(), "resolved KPI");

    let related: Vec<ActionItem> = datasets::action_items()
        .into_iter()
        .filter(|item| item.kpi_id == kpi.id)
        .collect();
    let options = TableOptions::new()
        .title("Related action items")
        .empty_message("No action items reference this KPI")
        .compact(true);
    let view = present(&action_columns(), &related, &options);

    if as_json {
        let payload = json!({
            "found": true,
            "slug": slug,
            "rule": resolved.rule,
            "kpi": kpi,
            "actions": view.grid(),
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!("{} ({})", kpi.name, kpi.id);
    println!("  Matched '{slug}' by {}", resolved.rule.label());
    println!("  {}", kpi.description);
    println!(
        "  Category {} | current {} | target {}",
        kpi.category,
        format_measure(kpi.current, kpi.unit),
        format_measure(kpi.target, kpi.unit)
    );
    let status = render(&json!(kpi.status), ColumnTypeTag::Status, &RenderConfig::default());
    println!("  Status {}\n", status.text());
    print!("{}", render_grid(view.grid()));
    println!();
    Ok(())
}

fn format_measure(value: f64, unit: KpiUnit) -> String {
    let tag = match unit {
        KpiUnit::Percent => ColumnTypeTag::Percentage,
        KpiUnit::Currency => ColumnTypeTag::Currency,
        KpiUnit::Count | KpiUnit::Days => ColumnTypeTag::Number,
    };
    let cell = render(&json!(value), tag, &RenderConfig::default());
    match unit {
        KpiUnit::Days => format!("{} days", cell.text()),
        _ => cell.text().to_string(),
    }
}

fn record_answer(
    scorer: &EligibilityScorer,
    responses: &mut AssessmentResponses,
    question_id: String,
    value: String,
) {
    match scorer.questions().iter().find(|question| question.id == question_id) {
        Some(question) if question.option(&value).is_none() => {
            warn!(question = %question_id, %value, "answer is not one of the options; it scores zero");
        }
        None => warn!(question = %question_id, "unknown assessment question"),
        Some(_) => {}
    }
    responses.answer(question_id, value);
}

fn print_assessment(
    subject: &str,
    scorer: &EligibilityScorer,
    responses: &AssessmentResponses,
    outcome: &AssessmentOutcome,
) {
    println!("Readiness assessment for {subject}");
    for question in scorer.questions() {
        let answer = responses.get(&question.id);
        let (label, points) = match answer.and_then(|value| question.option(value)) {
            Some(option) => (option.label.as_str(), option.score),
            None => (answer.unwrap_or("(unanswered)"), 0),
        };
        println!(
            "  - {}: {} [{}/{}]",
            question.question,
            label,
            points,
            question.max_score()
        );
    }
    println!(
        "Answered {}/{} | score {}/{} ({:.1}%)",
        outcome.answered,
        outcome.question_count,
        outcome.score.total_score,
        outcome.score.max_score,
        outcome.score.percentage
    );
    match &outcome.decision {
        EligibilityDecision::Eligible => println!("Decision: {}", outcome.decision.summary()),
        EligibilityDecision::NotEligible { reasons } => {
            println!("Decision: not eligible");
            for reason in reasons {
                println!("  - {}", reason.summary());
            }
        }
    }
}

fn emit(grid: &TableGrid, as_json: bool) -> Result<(), AppError> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(grid)?);
    } else {
        println!("{}", render_grid(grid));
    }
    Ok(())
}
