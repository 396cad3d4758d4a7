//! Checklist model and its mutation commands.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;
use vitalwatch_types::ChecklistItem;

use crate::error::ChecklistError;
use crate::readiness::ReadinessEvaluator;

/// Filter for [`Checklist::items_in`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ItemFilter {
    /// Only return items that are not yet completed.
    pub incomplete_only: bool,
}

impl ItemFilter {
    pub fn all() -> Self {
        Self {
            incomplete_only: false,
        }
    }

    pub fn incomplete() -> Self {
        Self {
            incomplete_only: true,
        }
    }
}

/// An ordered set of checklist items with unique identifiers.
///
/// Items are never replaced wholesale; all changes go through the named
/// commands so item identity and order survive every mutation. A command
/// naming an unknown id leaves the checklist untouched and reports
/// [`ChecklistError::UnknownItemId`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ChecklistItem>", into = "Vec<ChecklistItem>")]
pub struct Checklist {
    items: Vec<ChecklistItem>,
}

impl Checklist {
    /// Build a checklist, rejecting duplicate ids and out-of-range
    /// sub-score values.
    pub fn new(items: Vec<ChecklistItem>) -> Result<Self, ChecklistError> {
        validate_items(&items)?;
        Ok(Self { items })
    }

    /// Wrap built-in definitions that are known to be valid.
    pub(crate) fn from_catalog(items: Vec<ChecklistItem>) -> Self {
        Self { items }
    }

    /// Parse item definitions from a JSON array.
    pub fn from_json(json: &str) -> Result<Self, ChecklistError> {
        let items: Vec<ChecklistItem> = serde_json::from_str(json)?;
        Self::new(items)
    }

    /// All items in definition order.
    pub fn items(&self) -> &[ChecklistItem] {
        &self.items
    }

    /// Look up an item by id.
    pub fn get(&self, id: &str) -> Option<&ChecklistItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn item_mut(&mut self, id: &str) -> Result<&mut ChecklistItem, ChecklistError> {
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) => Ok(item),
            None => {
                debug!("ignoring command for unknown checklist item {}", id);
                Err(ChecklistError::UnknownItemId(id.to_string()))
            }
        }
    }

    /// Flip the completion flag of an item. Returns the new state.
    pub fn toggle_completion(&mut self, id: &str) -> Result<bool, ChecklistError> {
        let item = self.item_mut(id)?;
        item.completed = !item.completed;
        Ok(item.completed)
    }

    /// Set the completion flag of an item explicitly.
    pub fn set_completed(&mut self, id: &str, completed: bool) -> Result<(), ChecklistError> {
        self.item_mut(id)?.completed = completed;
        Ok(())
    }

    /// Replace an item's notes verbatim.
    pub fn update_notes(&mut self, id: &str, text: impl Into<String>) -> Result<(), ChecklistError> {
        self.item_mut(id)?.notes = text.into();
        Ok(())
    }

    /// Set a named sub-score of an item.
    ///
    /// Values above the sub-score's maximum are rejected, never clamped,
    /// and the previous value is kept.
    pub fn update_sub_score(&mut self, id: &str, score_name: &str, value: u32) -> Result<(), ChecklistError> {
        let item = self.item_mut(id)?;
        let item_id = item.id.clone();
        let score = item
            .scores
            .iter_mut()
            .find(|s| s.name == score_name)
            .ok_or_else(|| ChecklistError::UnknownSubScore {
                item: item_id.clone(),
                score: score_name.to_string(),
            })?;

        if !score.accepts(value) {
            return Err(ChecklistError::InvalidScoreValue {
                item: item_id,
                score: score.name.clone(),
                value,
                max: score.max,
            });
        }

        score.value = value;
        Ok(())
    }

    /// Categories in order of first appearance, without duplicates.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.items
            .iter()
            .map(|item| item.category.as_str())
            .filter(|category| seen.insert(*category))
            .collect()
    }

    /// Items of one category, in definition order.
    pub fn items_in(&self, category: &str, filter: ItemFilter) -> Vec<&ChecklistItem> {
        self.items
            .iter()
            .filter(|item| item.category == category)
            .filter(|item| !filter.incomplete_only || !item.completed)
            .collect()
    }

    /// Hand the checklist over for submission if the evaluator's gate is
    /// open.
    pub fn submit(&self, evaluator: &ReadinessEvaluator) -> Result<&[ChecklistItem], ChecklistError> {
        let state = evaluator.state(self);
        if state.is_open() {
            Ok(&self.items)
        } else {
            Err(ChecklistError::GateClosed(state))
        }
    }
}

fn validate_items(items: &[ChecklistItem]) -> Result<(), ChecklistError> {
    let mut seen = HashSet::new();
    for item in items {
        if !seen.insert(item.id.as_str()) {
            return Err(ChecklistError::DuplicateItemId(item.id.clone()));
        }
        if let Some(score) = item.scores.iter().find(|s| !s.accepts(s.value)) {
            return Err(ChecklistError::InvalidScoreValue {
                item: item.id.clone(),
                score: score.name.clone(),
                value: score.value,
                max: score.max,
            });
        }
    }
    Ok(())
}

impl TryFrom<Vec<ChecklistItem>> for Checklist {
    type Error = ChecklistError;

    fn try_from(items: Vec<ChecklistItem>) -> Result<Self, Self::Error> {
        Self::new(items)
    }
}

impl From<Checklist> for Vec<ChecklistItem> {
    fn from(checklist: Checklist) -> Self {
        checklist.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::readiness::{GateState, PreProcedureState};

    fn sample() -> Checklist {
        Checklist::new(vec![
            ChecklistItem::new("patient-id", "Verification", "Confirm identity").critical(),
            ChecklistItem::new("history", "Assessment", "Review history"),
            ChecklistItem::new("consent", "Verification", "Consent signed").critical(),
            ChecklistItem::new("pain", "Assessment", "Pain assessment").score("Pain score", 3),
        ])
        .unwrap()
    }

    #[test]
    fn test_toggle_completion_flips() {
        let mut checklist = sample();
        assert_eq!(checklist.toggle_completion("consent"), Ok(true));
        assert!(checklist.get("consent").unwrap().completed);
        assert_eq!(checklist.toggle_completion("consent"), Ok(false));
        assert!(!checklist.get("consent").unwrap().completed);
    }

    #[test]
    fn test_unknown_id_is_a_no_op() {
        let mut checklist = sample();
        let before = checklist.clone();

        assert_eq!(
            checklist.toggle_completion("nope"),
            Err(ChecklistError::UnknownItemId("nope".to_string()))
        );
        assert!(checklist.update_notes("nope", "text").is_err());
        assert!(checklist.update_sub_score("nope", "Pain score", 1).is_err());
        assert_eq!(checklist, before);
    }

    #[test]
    fn test_update_notes_verbatim() {
        let mut checklist = sample();
        let long = "  ".to_string() + &"x".repeat(10_000) + "\n";
        checklist.update_notes("history", long.clone()).unwrap();
        assert_eq!(checklist.get("history").unwrap().notes, long);
    }

    #[test]
    fn test_update_sub_score_within_range() {
        let mut checklist = sample();
        checklist.update_sub_score("pain", "Pain score", 3).unwrap();
        assert_eq!(checklist.get("pain").unwrap().sub_score("Pain score").unwrap().value, 3);
        checklist.update_sub_score("pain", "Pain score", 0).unwrap();
        assert_eq!(checklist.get("pain").unwrap().sub_score("Pain score").unwrap().value, 0);
    }

    #[test]
    fn test_update_sub_score_above_max_is_rejected() {
        let mut checklist = sample();
        checklist.update_sub_score("pain", "Pain score", 2).unwrap();

        let err = checklist.update_sub_score("pain", "Pain score", 4).unwrap_err();
        assert_eq!(
            err,
            ChecklistError::InvalidScoreValue {
                item: "pain".to_string(),
                score: "Pain score".to_string(),
                value: 4,
                max: 3,
            }
        );
        assert_eq!(checklist.get("pain").unwrap().sub_score("Pain score").unwrap().value, 2);
    }

    #[test]
    fn test_update_unknown_sub_score() {
        let mut checklist = sample();
        assert!(matches!(
            checklist.update_sub_score("pain", "Nausea", 1),
            Err(ChecklistError::UnknownSubScore { .. })
        ));
        assert!(matches!(
            checklist.update_sub_score("history", "Pain score", 1),
            Err(ChecklistError::UnknownSubScore { .. })
        ));
    }

    #[test]
    fn test_categories_first_seen_order() {
        let checklist = sample();
        assert_eq!(checklist.categories(), vec!["Verification", "Assessment"]);
    }

    #[test]
    fn test_items_in_category_with_filter() {
        let mut checklist = sample();
        checklist.toggle_completion("patient-id").unwrap();

        let all: Vec<&str> = checklist
            .items_in("Verification", ItemFilter::all())
            .iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(all, vec!["patient-id", "consent"]);

        let incomplete: Vec<&str> = checklist
            .items_in("Verification", ItemFilter::incomplete())
            .iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(incomplete, vec!["consent"]);

        assert!(checklist.items_in("Equipment", ItemFilter::all()).is_empty());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = Checklist::new(vec![
            ChecklistItem::new("a", "Cat", "First"),
            ChecklistItem::new("a", "Cat", "Second"),
        ]);
        assert_eq!(result, Err(ChecklistError::DuplicateItemId("a".to_string())));
    }

    #[test]
    fn test_out_of_range_definition_rejected() {
        let mut item = ChecklistItem::new("pain", "Assessment", "Pain").score("Pain score", 3);
        item.scores[0].value = 5;
        assert!(matches!(
            Checklist::new(vec![item]),
            Err(ChecklistError::InvalidScoreValue { value: 5, max: 3, .. })
        ));
    }

    #[test]
    fn test_from_json() {
        let json = r#"[
            { "id": "suction", "category": "Equipment", "task": "Suction functioning", "critical": true },
            { "id": "nausea", "category": "Recovery", "task": "Nausea assessment",
              "scores": [ { "name": "Nausea", "max": 2 } ] }
        ]"#;

        let checklist = Checklist::from_json(json).unwrap();
        assert_eq!(checklist.len(), 2);
        assert!(checklist.get("suction").unwrap().critical);
        assert_eq!(checklist.get("nausea").unwrap().score_max(), 2);

        assert!(matches!(Checklist::from_json("not json"), Err(ChecklistError::Parse(_))));
        let dup = r#"[{"id":"a","category":"c","task":"t"},{"id":"a","category":"c","task":"t"}]"#;
        assert!(matches!(Checklist::from_json(dup), Err(ChecklistError::DuplicateItemId(_))));
    }

    #[test]
    fn test_submit_requires_open_gate() {
        let mut checklist = sample();
        let evaluator = ReadinessEvaluator::simple();

        assert_eq!(
            checklist.submit(&evaluator),
            Err(ChecklistError::GateClosed(GateState::PreProcedure(PreProcedureState::Incomplete)))
        );

        checklist.toggle_completion("patient-id").unwrap();
        checklist.toggle_completion("consent").unwrap();
        let submitted = checklist.submit(&evaluator).unwrap();
        assert_eq!(submitted.len(), 4);
    }
}
