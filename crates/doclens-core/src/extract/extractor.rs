//! Pattern-driven entity extractor.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use tracing::{debug, trace};

use super::pattern::{EntityPattern, PostProcessor};
use super::rules::{default_patterns, score_entity};
use crate::error::PatternError;
use crate::models::config::{AnalyzerConfig, ConfidencePolicy};
use crate::models::entity::{EntityKind, ExtractedEntity};
use crate::text::TextNormalizer;

/// Applies an ordered pattern set to text and scores the matches.
///
/// The pattern list is an immutable snapshot shared between clones.
/// Registering a pattern copies the list only if another clone still
/// holds the old snapshot, so in-flight extractions never see a partial
/// update.
#[derive(Debug, Clone)]
pub struct EntityExtractor {
    normalizer: TextNormalizer,
    patterns: Arc<Vec<EntityPattern>>,
    policy: ConfidencePolicy,
}

impl EntityExtractor {
    /// Create an extractor with the built-in patterns and default policy.
    pub fn new() -> Self {
        Self::from_config(&AnalyzerConfig::default())
    }

    /// Create an extractor with the built-in patterns for a configuration.
    pub fn from_config(config: &AnalyzerConfig) -> Self {
        Self {
            normalizer: TextNormalizer::new(),
            patterns: Arc::new(default_patterns(&config.dates)),
            policy: config.confidence.clone(),
        }
    }

    /// Create an extractor with no patterns at all.
    pub fn empty() -> Self {
        Self {
            normalizer: TextNormalizer::new(),
            patterns: Arc::new(Vec::new()),
            policy: ConfidencePolicy::default(),
        }
    }

    /// Set the confidence policy.
    pub fn with_policy(mut self, policy: ConfidencePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Append a pattern, returning the extended extractor.
    pub fn with_pattern(mut self, pattern: EntityPattern) -> Self {
        self.add_pattern(pattern);
        self
    }

    /// Append a compiled pattern.
    pub fn add_pattern(&mut self, pattern: EntityPattern) {
        debug!(
            "Registering {} pattern: {}",
            pattern.kind(),
            pattern.regex().as_str()
        );
        Arc::make_mut(&mut self.patterns).push(pattern);
    }

    /// Compile a pattern, returning the extended extractor.
    pub fn with_entity_pattern(
        mut self,
        kind: impl Into<EntityKind>,
        pattern: &str,
        post_process: Option<PostProcessor>,
    ) -> Result<Self, PatternError> {
        self.add_entity_pattern(kind, pattern, post_process)?;
        Ok(self)
    }

    /// Compile and append a pattern.
    pub fn add_entity_pattern(
        &mut self,
        kind: impl Into<EntityKind>,
        pattern: &str,
        post_process: Option<PostProcessor>,
    ) -> Result<(), PatternError> {
        let pattern = EntityPattern::new(kind, pattern)?.with_post_processor(post_process);
        self.add_pattern(pattern);
        Ok(())
    }

    /// Registered patterns in extraction order.
    pub fn patterns(&self) -> &[EntityPattern] {
        &self.patterns
    }

    pub fn policy(&self) -> &ConfidencePolicy {
        &self.policy
    }

    /// Extract all entities, unique by kind and value.
    ///
    /// Input is normalized first. Patterns run in registration order; for
    /// each non-overlapping match the post-processor is applied and the
    /// entity is kept unless the same kind and value was already seen.
    pub fn extract_entities(&self, text: &str) -> Vec<ExtractedEntity> {
        let normalized = self.normalizer.normalize(text);
        let mut seen: HashSet<(EntityKind, String)> = HashSet::new();
        let mut entities = Vec::new();

        for pattern in self.patterns.iter() {
            let before = entities.len();

            for m in pattern.regex().find_iter(&normalized) {
                let value = pattern.canonicalize(m.as_str());
                if !seen.insert((pattern.kind().clone(), value.clone())) {
                    continue;
                }

                let confidence =
                    score_entity(pattern.kind(), &value, &self.policy, pattern.confidence());

                entities.push(
                    ExtractedEntity::new(pattern.kind().clone(), value, confidence)
                        .with_raw(m.as_str())
                        .with_position(m.start(), m.end()),
                );
            }

            trace!(
                "Pattern {} produced {} new entities",
                pattern.kind(),
                entities.len() - before
            );
        }

        debug!(
            "Extracted {} entities using {} patterns",
            entities.len(),
            self.patterns.len()
        );

        entities
    }

    /// Extract entities grouped by kind.
    pub fn extract_entities_by_type(&self, text: &str) -> BTreeMap<EntityKind, Vec<ExtractedEntity>> {
        group_by_type(&self.extract_entities(text))
    }

    /// Extract entities of a single kind.
    pub fn extract_entities_of_type(&self, text: &str, kind: &EntityKind) -> Vec<ExtractedEntity> {
        self.extract_entities(text)
            .into_iter()
            .filter(|e| &e.kind == kind)
            .collect()
    }
}

impl Default for EntityExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Group entities by kind, preserving extraction order within each group.
pub fn group_by_type(entities: &[ExtractedEntity]) -> BTreeMap<EntityKind, Vec<ExtractedEntity>> {
    let mut grouped: BTreeMap<EntityKind, Vec<ExtractedEntity>> = BTreeMap::new();
    for entity in entities {
        grouped
            .entry(entity.kind.clone())
            .or_default()
            .push(entity.clone());
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn values_of(entities: &[ExtractedEntity], kind: &EntityKind) -> Vec<String> {
        entities
            .iter()
            .filter(|e| &e.kind == kind)
            .map(|e| e.value.clone())
            .collect()
    }

    #[test]
    fn test_extract_dates() {
        let extractor = EntityExtractor::new();
        let entities = extractor.extract_entities("Signed 12/31/2023, renewed on Jan 15, 2024.");

        let dates: Vec<_> = entities.iter().filter(|e| e.kind == EntityKind::Date).collect();
        assert_eq!(dates.len(), 2);
        assert_eq!(dates[0].value, "2023-12-31");
        assert_eq!(dates[0].raw, "12/31/2023");
        assert_eq!(dates[0].confidence, 0.95);
        assert_eq!(dates[1].value, "Jan 15, 2024");
        assert_eq!(dates[1].confidence, 0.95);
    }

    #[test]
    fn test_sept_abbreviation_is_a_valid_date() {
        let extractor = EntityExtractor::new();
        let dates = extractor.extract_entities_of_type("Signed Sept 3, 2021", &EntityKind::Date);

        assert_eq!(dates.len(), 1);
        assert_eq!(dates[0].value, "Sept 3, 2021");
        assert_eq!(dates[0].confidence, 0.95);
    }

    #[test]
    fn test_invalid_date_keeps_lower_confidence() {
        let extractor = EntityExtractor::new();
        let entities = extractor.extract_entities_of_type("Due 13/13/2023", &EntityKind::Date);
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].value, "2023-13-13");
        assert_eq!(entities[0].confidence, 0.7);
    }

    #[test]
    fn test_extract_email_fixed_confidence() {
        let extractor = EntityExtractor::new();
        let entities = extractor.extract_entities_of_type(
            "Write to jane.doe@example.com or ops+alerts@corp.example.org",
            &EntityKind::Email,
        );
        assert_eq!(
            values_of(&entities, &EntityKind::Email),
            vec!["jane.doe@example.com", "ops+alerts@corp.example.org"]
        );
        assert!(entities.iter().all(|e| e.confidence == 0.98));
    }

    #[test]
    fn test_extract_phones() {
        let extractor = EntityExtractor::new();
        let entities = extractor.extract_entities_of_type(
            "Call 1234567890 or +1 555-123-4567 today",
            &EntityKind::Phone,
        );
        assert_eq!(
            values_of(&entities, &EntityKind::Phone),
            vec!["(123) 456-7890", "+1 (555) 123-4567"]
        );
        assert!(entities.iter().all(|e| e.confidence == 0.95));
    }

    #[test]
    fn test_long_digit_runs_are_not_phones() {
        let extractor = EntityExtractor::new();

        assert!(
            extractor
                .extract_entities_of_type("Account 98765432101234 closed", &EntityKind::Phone)
                .is_empty()
        );

        let entities = extractor.extract_entities_of_type(
            "Dial 11234567890 or (555) 123-4567",
            &EntityKind::Phone,
        );
        assert_eq!(
            values_of(&entities, &EntityKind::Phone),
            vec!["+1 (123) 456-7890", "(555) 123-4567"]
        );
    }

    #[test]
    fn test_extract_currency() {
        let extractor = EntityExtractor::new();
        let entities = extractor.extract_entities_of_type(
            "Budget of $1,250.00 plus $3.5 billion and 200 EUR.",
            &EntityKind::Currency,
        );
        assert_eq!(
            values_of(&entities, &EntityKind::Currency),
            vec!["$1,250.00", "$3.5 billion", "200 EUR"]
        );
        assert!(entities.iter().all(|e| e.confidence == 0.8));
    }

    #[test]
    fn test_extract_person_and_organization() {
        let extractor = EntityExtractor::new();
        let entities = extractor.extract_entities("meeting with Jane Smith at Acme Corp.");

        assert_eq!(values_of(&entities, &EntityKind::Person), vec!["Jane Smith", "Acme Corp"]);
        assert!(
            entities
                .iter()
                .filter(|e| e.kind == EntityKind::Person)
                .all(|e| e.confidence == 0.75)
        );
        assert_eq!(
            values_of(&entities, &EntityKind::Organization),
            vec!["Jane", "Smith", "Acme Corp."]
        );
    }

    #[test]
    fn test_duplicates_keep_first_occurrence() {
        let extractor = EntityExtractor::new();
        let entities = extractor.extract_entities(
            "Email a@b.io, then a@b.io again. Dates 12/31/2023 and 31/12/2023.",
        );

        assert_eq!(values_of(&entities, &EntityKind::Email), vec!["a@b.io"]);

        let dates: Vec<_> = entities.iter().filter(|e| e.kind == EntityKind::Date).collect();
        assert_eq!(dates.len(), 1);
        assert_eq!(dates[0].raw, "12/31/2023");

        let mut keys = HashSet::new();
        assert!(entities.iter().all(|e| keys.insert(e.key())));
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let extractor = EntityExtractor::new();
        let text = "Acme Inc. paid John Doe $5k on 03/04/2023; call 555.123.4567 or mail x@y.co";
        assert_eq!(extractor.extract_entities(text), extractor.extract_entities(text));
    }

    #[test]
    fn test_input_is_normalized() {
        let extractor = EntityExtractor::new();
        let entities = extractor.extract_entities("Jane\n\n   Smith");
        assert_eq!(values_of(&entities, &EntityKind::Person), vec!["Jane Smith"]);
        assert_eq!(entities[0].start, 0);
        assert_eq!(entities[0].end, "Jane Smith".len());
    }

    #[test]
    fn test_pathological_input() {
        let extractor = EntityExtractor::new();
        assert!(extractor.extract_entities("").is_empty());
        assert!(extractor.extract_entities(r"[](){}.*+?^$|\\").is_empty());
    }

    #[test]
    fn test_custom_pattern_is_observed() {
        let mut extractor = EntityExtractor::empty();
        assert!(extractor.extract_entities("see PRJ-1042").is_empty());

        extractor
            .add_entity_pattern(
                "project_id",
                r"\bPRJ-\d+\b",
                Some(Arc::new(|s: &str| s.to_lowercase())),
            )
            .unwrap();

        let entities = extractor.extract_entities("see PRJ-1042 and PRJ-7");
        let kind = EntityKind::Custom("project_id".into());
        assert_eq!(values_of(&entities, &kind), vec!["prj-1042", "prj-7"]);
        assert!(entities.iter().all(|e| e.confidence == 0.8));
    }

    #[test]
    fn test_custom_pattern_confidence_override() {
        let pattern = EntityPattern::new("contract", r"\bC\d{4}\b")
            .unwrap()
            .with_confidence(0.6);
        let extractor = EntityExtractor::empty().with_pattern(pattern);

        let entities = extractor.extract_entities("contract C1234");
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].confidence, 0.6);
    }

    #[test]
    fn test_invalid_custom_pattern_rejected_at_registration() {
        let mut extractor = EntityExtractor::new();
        let before = extractor.patterns().len();
        assert!(extractor.add_entity_pattern("broken", "(unclosed", None).is_err());
        assert_eq!(extractor.patterns().len(), before);
    }

    #[test]
    fn test_builder_registration() {
        let extractor = EntityExtractor::empty()
            .with_entity_pattern("invoice_no", r"\bINV/\d{4}\b", None)
            .unwrap();
        assert_eq!(extractor.patterns().len(), 1);

        let err = EntityExtractor::empty()
            .with_entity_pattern("invoice_no", "", None)
            .unwrap_err();
        assert!(matches!(err, PatternError::EmptyPattern { .. }));
    }

    #[test]
    fn test_clones_keep_their_snapshot() {
        let base = EntityExtractor::new();
        let extended = base
            .clone()
            .with_pattern(EntityPattern::new("ticket", r"\bT-\d+\b").unwrap());

        assert_eq!(extended.patterns().len(), base.patterns().len() + 1);
        assert!(
            base.extract_entities_of_type("T-9", &EntityKind::Custom("ticket".into()))
                .is_empty()
        );
        assert_eq!(
            extended
                .extract_entities_of_type("T-9", &EntityKind::Custom("ticket".into()))
                .len(),
            1
        );
    }

    #[test]
    fn test_extract_by_type_groups() {
        let extractor = EntityExtractor::new();
        let grouped = extractor.extract_entities_by_type("mail a@b.io or c@d.io on 12/31/2023");

        assert_eq!(grouped[&EntityKind::Email].len(), 2);
        assert_eq!(grouped[&EntityKind::Date].len(), 1);
        assert!(!grouped.contains_key(&EntityKind::Phone));
    }

    #[test]
    fn test_policy_is_applied() {
        let policy = ConfidencePolicy {
            email: 0.5,
            ..ConfidencePolicy::default()
        };
        let extractor = EntityExtractor::new().with_policy(policy);
        let entities = extractor.extract_entities_of_type("a@b.io", &EntityKind::Email);
        assert_eq!(entities[0].confidence, 0.5);
    }
}
