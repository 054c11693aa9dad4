use roi_dashboard::kpi::CanonicalRecord;
use roi_dashboard::presentation::TableRow;
use serde::{Deserialize, Serialize};
use serde_json::Value;

fn serialized_field<T: Serialize>(row: &T, key: &str) -> Option<Value> {
    match serde_json::to_value(row) {
        Ok(Value::Object(mut fields)) => fields.remove(key),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum KpiUnit {
    Percent,
    Currency,
    Count,
    Days,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct KpiRecord {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) category: String,
    pub(crate) unit: KpiUnit,
    pub(crate) current: f64,
    pub(crate) target: f64,
    pub(crate) status: String,
    pub(crate) description: String,
}

impl CanonicalRecord for KpiRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TableRow for KpiRecord {
    fn field(&self, key: &str) -> Option<Value> {
        serialized_field(self, key)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct ControlRecord {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) owner: String,
    pub(crate) category: String,
    pub(crate) status: String,
    pub(crate) risk: String,
    pub(crate) annual_savings: f64,
    pub(crate) last_tested: String,
}

impl TableRow for ControlRecord {
    fn field(&self, key: &str) -> Option<Value> {
        serialized_field(self, key)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct ActionItem {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) owner: String,
    pub(crate) status: String,
    pub(crate) priority: String,
    pub(crate) due_date: String,
    pub(crate) kpi_id: String,
}

impl TableRow for ActionItem {
    fn field(&self, key: &str) -> Option<Value> {
        serialized_field(self, key)
    }
}

struct KpiSeed(&'static str, &'static str, &'static str, KpiUnit, f64, f64, &'static str, &'static str);

const KPI_SEEDS: [KpiSeed; 6] = [
    KpiSeed("duplicate-payment", "Duplicate Payment Prevention", "Accounts Payable", KpiUnit::Percent, 97.2, 99.5, "at-risk", "Share of duplicate invoices stopped before payment release."),
    KpiSeed("vendor-master", "Vendor Master Data Accuracy", "Master Data", KpiUnit::Percent, 88.4, 95.0, "in-progress", "Vendor records with validated tax id, bank details and address."),
    KpiSeed("early-pay-discount", "Early Payment Discount Capture", "Working Capital", KpiUnit::Currency, 412_000.0, 650_000.0, "on-track", "Discounts taken against terms offered by suppliers."),
    KpiSeed("fraud", "Fraud Detection Coverage", "Risk", KpiUnit::Percent, 76.0, 90.0, "at-risk", "Payment volume screened by anomaly rules."),
    KpiSeed("dpo", "Days Payable Outstanding", "Working Capital", KpiUnit::Days, 41.0, 45.0, "on-track", "Average days between invoice receipt and payment."),
    KpiSeed("sod", "Segregation of Duties Compliance", "Access", KpiUnit::Count, 14.0, 0.0, "non-compliant", "Users holding conflicting create-vendor and release-payment roles."),
];

pub(crate) fn kpis() -> Vec<KpiRecord> {
    KPI_SEEDS
        .iter()
        .map(
            |KpiSeed(id, name, category, unit, current, target, status, description)| KpiRecord {
                id: id.to_string(),
                name: name.to_string(),
                category: category.to_string(),
                unit: *unit,
                current: *current,
                target: *target,
                status: status.to_string(),
                description: description.to_string(),
            },
        )
        .collect()
}

pub(crate) fn controls() -> Vec<ControlRecord> {
    let control = |id: &str,
                   name: &str,
                   description: &str,
                   owner: &str,
                   category: &str,
                   status: &str,
                   risk: &str,
                   annual_savings: f64,
                   last_tested: &str| ControlRecord {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        owner: owner.to_string(),
        category: category.to_string(),
        status: status.to_string(),
        risk: risk.to_string(),
        annual_savings,
        last_tested: last_tested.to_string(),
    };

    vec![
        control("CTL-001", "Duplicate invoice screening", "Flags invoices sharing vendor, amount and date before the payment run is released", "AP Operations", "Payments", "compliant", "High", 184_000.0, "2025-08-14"),
        control("CTL-002", "Vendor bank change callback", "Independent callback on every remittance detail change", "Treasury", "Vendor Management", "non-compliant", "High", 92_500.0, "2025-07-02"),
        control("CTL-003", "Quarterly access review", "ERP role recertification", "IT Security", "Access", "in-progress", "Medium", 0.0, "2025-06-30"),
        control("CTL-004", "Three-way match tolerance", "Blocks payment when purchase order, receipt and invoice disagree beyond tolerance", "AP Operations", "Payments", "partially-compliant", "Medium", 41_250.0, "2025-08-01"),
        control("CTL-005", "Payment terms enforcement", "Rejects invoices paid ahead of negotiated terms", "Procurement", "Working Capital", "compliant", "Low", 63_800.0, "2025-05-19"),
        control("CTL-006", "Inactive vendor purge", "Blocks vendors without activity for 18 months", "Master Data", "Vendor Management", "not-started", "Low", 12_000.0, "2024-12-11"),
    ]
}

pub(crate) fn action_items() -> Vec<ActionItem> {
    let item = |id: &str,
                title: &str,
                description: &str,
                owner: &str,
                status: &str,
                priority: &str,
                due_date: &str,
                kpi_id: &str| ActionItem {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        owner: owner.to_string(),
        status: status.to_string(),
        priority: priority.to_string(),
        due_date: due_date.to_string(),
        kpi_id: kpi_id.to_string(),
    };

    vec![
        item("AI-101", "Enable fuzzy duplicate matching", "Extend screening to near-match invoice numbers", "Dana Whitfield", "in-progress", "High", "2025-10-15", "duplicate-payment"),
        item("AI-102", "Cleanse vendor tax ids", "Validate 1,240 vendor tax ids against registry data", "Priya Raman", "pending", "Medium", "2025-11-01", "vendor-master"),
        item("AI-103", "Remove conflicting roles", "Split create-vendor and release-payment roles for 14 users", "Marcus Lee", "overdue", "High", "2025-09-20", "sod"),
        item("AI-104", "Renegotiate early pay terms", "Target top 40 suppliers for 2/10 net 30 terms", "Dana Whitfield", "not-started", "Low", "2025-12-05", "early-pay-discount"),
        item("AI-105", "Deploy anomaly rules to wires", "Extend fraud screening to wire and ACH payments", "Marcus Lee", "completed", "High", "2025-08-30", "fraud"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn mock_identifiers_are_unique() {
        let kpi_ids: HashSet<_> = kpis().into_iter().map(|kpi| kpi.id).collect();
        assert_eq!(kpi_ids.len(), KPI_SEEDS.len());

        let control_ids: HashSet<_> = controls().into_iter().map(|control| control.id).collect();
        assert_eq!(control_ids.len(), controls().len());
    }

    #[test]
    fn action_items_reference_known_kpis() {
        let kpi_ids: HashSet<_> = kpis().into_iter().map(|kpi| kpi.id).collect();
        assert!(action_items()
            .iter()
            .all(|item| kpi_ids.contains(&item.kpi_id)));
    }

    #[test]
    fn rows_expose_serialized_fields() {
        let control = &controls()[0];
        assert_eq!(control.field("owner"), Some(Value::from("AP Operations")));
        assert_eq!(control.row_key().as_deref(), Some("CTL-001"));
        assert_eq!(control.field("missing"), None);
    }
}
