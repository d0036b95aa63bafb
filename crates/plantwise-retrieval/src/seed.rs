// SPDX-FileCopyrightText: 2026 Plantwise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in industrial knowledge corpus used for demos and tests.

use chrono::NaiveDate;
use plantwise_core::{Category, KnowledgeDocument};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

/// Six documents covering safety, maintenance, procedures and HR.
pub fn seed_documents() -> Vec<KnowledgeDocument> {
    vec![
        KnowledgeDocument::new(
            "doc-001",
            "Safety Protocol 7B",
            Category::Safety,
            "In case of a chemical spill: 1. Trigger the alarm. 2. Put on the gas mask. \
             3. Evacuate the contamination zone. 4. Notify your supervisor.",
            date(2023, 11, 15),
        ),
        KnowledgeDocument::new(
            "doc-002",
            "Hydraulics Maintenance - Press P-500",
            Category::Maintenance,
            "Check the oil level every 48h. Replace the filters every 500 cycles. Working \
             pressure must not exceed 250 bar. On overheating, stop the press immediately.",
            date(2024, 1, 10),
        ),
        KnowledgeDocument::new(
            "doc-003",
            "Hardening Furnace Failure - Diagnostics",
            Category::Maintenance,
            "Error code E-404: temperature sensor T2 damaged. Code E-500: low shielding gas \
             pressure. Code E-505: cooling fan failure.",
            date(2023, 12, 5),
        ),
        KnowledgeDocument::new(
            "doc-004",
            "SAP System Login Procedure",
            Category::Procedures,
            "Use the YubiKey hardware token. The password must be changed every 30 days. \
             Access to the MM module requires shift manager approval.",
            date(2024, 2, 1),
        ),
        KnowledgeDocument::new(
            "doc-005",
            "Leave Policy 2024",
            Category::Hr,
            "Leave requests are filed in the HR-Portal 14 days in advance. On-demand leave: \
             at most 4 days per year. Additional days are granted for seniority.",
            date(2024, 1, 2),
        ),
        KnowledgeDocument::new(
            "doc-006",
            "Forklift Operating Manual (Linde)",
            Category::Procedures,
            "Before the shift: check the brakes, battery charge and fork condition. Driving \
             with a raised load is forbidden. The charging zone requires safety glasses.",
            date(2023, 10, 20),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn seed_titles_and_ids_are_unique() {
        let docs = seed_documents();
        assert_eq!(docs.len(), 6);
        let titles: HashSet<_> = docs.iter().map(|d| d.title.to_lowercase()).collect();
        let ids: HashSet<_> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(titles.len(), 6);
        assert_eq!(ids.len(), 6);
    }
}
