//! Built-in checklist catalogs.
//!
//! Deployments normally supply their own definitions (see
//! [`Checklist::from_json`]); these are the reference perioperative
//! checklists and a sensible default.

use vitalwatch_types::ChecklistItem;

use crate::checklist::Checklist;

/// Composite score threshold for discharge with the reference
/// post-anesthesia catalog.
pub const DEFAULT_DISCHARGE_THRESHOLD: u32 = 9;

/// Pre-anesthesia safety checklist. No sub-scores; gated on critical items.
pub fn pre_anesthesia() -> Checklist {
    const VERIFICATION: &str = "Patient Verification";
    const ASSESSMENT: &str = "Pre-op Assessment";
    const EQUIPMENT: &str = "Equipment";
    const MEDICATIONS: &str = "Medications";
    const FINAL: &str = "Final Verification";

    Checklist::from_catalog(vec![
        ChecklistItem::new("patient-id", VERIFICATION, "Confirm patient identity (name, DOB, MRN)").critical(),
        ChecklistItem::new("consent", VERIFICATION, "Verify informed consent is signed").critical(),
        ChecklistItem::new("allergies", VERIFICATION, "Review allergies and sensitivities").critical(),
        ChecklistItem::new("npo-status", VERIFICATION, "Confirm NPO status").critical(),
        ChecklistItem::new("medical-history", ASSESSMENT, "Review medical history"),
        ChecklistItem::new("medication-review", ASSESSMENT, "Medication reconciliation").critical(),
        ChecklistItem::new("airway-assessment", ASSESSMENT, "Airway assessment").critical(),
        ChecklistItem::new("asa-classification", ASSESSMENT, "ASA physical status classification"),
        ChecklistItem::new("vital-signs", ASSESSMENT, "Baseline vital signs recorded").critical(),
        ChecklistItem::new("anesthesia-machine", EQUIPMENT, "Anesthesia machine checkout complete").critical(),
        ChecklistItem::new("breathing-circuit", EQUIPMENT, "Breathing circuit integrity confirmed").critical(),
        ChecklistItem::new("suction", EQUIPMENT, "Suction functioning").critical(),
        ChecklistItem::new("difficult-airway", EQUIPMENT, "Difficult airway equipment available").critical(),
        ChecklistItem::new(
            "monitoring-equipment",
            EQUIPMENT,
            "Monitoring equipment functioning (ECG, BP, SpO₂, ETCO₂)",
        )
        .critical(),
        ChecklistItem::new("emergency-drugs", MEDICATIONS, "Emergency drugs available").critical(),
        ChecklistItem::new("induction-agents", MEDICATIONS, "Induction agents prepared"),
        ChecklistItem::new("muscle-relaxants", MEDICATIONS, "Muscle relaxants prepared if needed"),
        ChecklistItem::new("reversal-agents", MEDICATIONS, "Reversal agents available").critical(),
        ChecklistItem::new("antiemetics", MEDICATIONS, "Antiemetics available"),
        ChecklistItem::new("site-verification", FINAL, "Surgical site verification complete").critical(),
        ChecklistItem::new("team-briefing", FINAL, "Team briefing/time-out completed").critical(),
        ChecklistItem::new("positioning", FINAL, "Patient positioning checked"),
        ChecklistItem::new("iv-access", FINAL, "IV access secure and functional").critical(),
    ])
}

/// Post-anesthesia recovery checklist with Aldrete-style sub-scores.
pub fn post_anesthesia() -> Checklist {
    const INITIAL: &str = "Initial Assessment";
    const RECOVERY: &str = "Recovery Progress";
    const FLUIDS: &str = "Fluid & Medication Management";
    const DISCHARGE: &str = "Discharge Planning";

    Checklist::from_catalog(vec![
        ChecklistItem::new("airway-assessment", INITIAL, "Airway patency and respiratory function")
            .critical()
            .score("Respiratory effort", 2)
            .score("SpO₂ maintenance", 2),
        ChecklistItem::new("consciousness", INITIAL, "Level of consciousness")
            .critical()
            .score("Consciousness", 2),
        ChecklistItem::new("vital-signs", INITIAL, "Vital signs stable").critical(),
        ChecklistItem::new("pain-assessment", INITIAL, "Pain assessment")
            .critical()
            .score("Pain score", 3),
        ChecklistItem::new("orientation", RECOVERY, "Orientation to person, place, time"),
        ChecklistItem::new("motor-function", RECOVERY, "Motor function assessment").score("Motor activity", 2),
        ChecklistItem::new("nausea-vomiting", RECOVERY, "Nausea/Vomiting assessment").score("Nausea", 2),
        ChecklistItem::new("surgical-site", RECOVERY, "Surgical site assessment").critical(),
        ChecklistItem::new("iv-assessment", FLUIDS, "IV access assessment"),
        ChecklistItem::new("fluid-balance", FLUIDS, "Fluid balance assessment"),
        ChecklistItem::new("medication-admin", FLUIDS, "Post-op medications administered").critical(),
        ChecklistItem::new("discharge-criteria", DISCHARGE, "Discharge criteria met")
            .critical()
            .score("Activity", 2)
            .score("Respiration", 2)
            .score("Circulation", 2)
            .score("Consciousness", 2)
            .score("Oxygen saturation", 2),
        ChecklistItem::new("instructions", DISCHARGE, "Post-op instructions provided").critical(),
        ChecklistItem::new("followup", DISCHARGE, "Follow-up appointment scheduled"),
    ])
}
