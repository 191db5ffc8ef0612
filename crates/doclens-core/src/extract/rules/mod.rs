//! Built-in extraction rules: patterns, canonicalization, and scoring.

pub mod dates;
pub mod patterns;
pub mod phones;

pub use dates::{canonicalize_date, canonicalize_date_with, is_calendar_date};
pub use phones::{canonicalize_phone, digit_count};

use super::pattern::EntityPattern;
use crate::models::config::{ConfidencePolicy, DateConfig};
use crate::models::entity::EntityKind;
use patterns::{CURRENCY, DATE_MONTH_NAME, DATE_NUMERIC, EMAIL, ORGANIZATION, PERSON, PHONE};

/// The built-in pattern set, in extraction order.
pub fn default_patterns(dates: &DateConfig) -> Vec<EntityPattern> {
    let dates = dates.clone();

    vec![
        EntityPattern::built_in(EntityKind::Date, DATE_NUMERIC.clone())
            .with_post_process(move |raw| canonicalize_date_with(raw, &dates)),
        EntityPattern::built_in(EntityKind::Date, DATE_MONTH_NAME.clone()),
        EntityPattern::built_in(EntityKind::Email, EMAIL.clone()),
        EntityPattern::built_in(EntityKind::Phone, PHONE.clone())
            .with_post_process(canonicalize_phone),
        EntityPattern::built_in(EntityKind::Currency, CURRENCY.clone()),
        EntityPattern::built_in(EntityKind::Person, PERSON.clone()),
        EntityPattern::built_in(EntityKind::Organization, ORGANIZATION.clone()),
    ]
}

/// Heuristic confidence for a canonicalized entity value.
///
/// `override_score` applies to custom kinds only; built-in kinds always use
/// the policy. The result is clamped to [0, 1].
pub fn score_entity(
    kind: &EntityKind,
    value: &str,
    policy: &ConfidencePolicy,
    override_score: Option<f32>,
) -> f32 {
    let score = match kind {
        EntityKind::Date if is_calendar_date(value) => policy.date_valid,
        EntityKind::Date => policy.date_invalid,
        EntityKind::Email => policy.email,
        EntityKind::Phone if digit_count(value) >= policy.phone_min_digits => {
            policy.phone_complete
        }
        EntityKind::Phone => policy.phone_partial,
        EntityKind::Person => policy.person,
        EntityKind::Currency | EntityKind::Organization => policy.base,
        EntityKind::Custom(_) => override_score.unwrap_or(policy.base),
    };

    if score.is_nan() { 0.0 } else { score.clamp(0.0, 1.0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_scores() {
        let policy = ConfidencePolicy::default();
        assert_eq!(score_entity(&EntityKind::Date, "2023-12-31", &policy, None), 0.95);
        assert_eq!(score_entity(&EntityKind::Date, "not-a-date/1/1", &policy, None), 0.7);
        assert_eq!(score_entity(&EntityKind::Date, "Jan 15, 2024", &policy, None), 0.95);
    }

    #[test]
    fn test_phone_scores() {
        let policy = ConfidencePolicy::default();
        assert_eq!(score_entity(&EntityKind::Phone, "(123) 456-7890", &policy, None), 0.95);
        assert_eq!(score_entity(&EntityKind::Phone, "12345", &policy, None), 0.75);
    }

    #[test]
    fn test_fixed_scores() {
        let policy = ConfidencePolicy::default();
        assert_eq!(score_entity(&EntityKind::Email, "a@b.io", &policy, None), 0.98);
        assert_eq!(score_entity(&EntityKind::Person, "Jane Doe", &policy, None), 0.75);
        assert_eq!(score_entity(&EntityKind::Currency, "$5", &policy, None), 0.8);
        assert_eq!(score_entity(&EntityKind::Organization, "Acme Inc", &policy, None), 0.8);
    }

    #[test]
    fn test_override_applies_to_custom_kinds_only() {
        let policy = ConfidencePolicy::default();
        let custom = EntityKind::Custom("ticket".into());
        assert_eq!(score_entity(&custom, "T-1", &policy, Some(0.6)), 0.6);
        assert_eq!(score_entity(&custom, "T-1", &policy, None), 0.8);
        assert_eq!(score_entity(&EntityKind::Email, "a@b.io", &policy, Some(0.1)), 0.98);
    }

    #[test]
    fn test_scores_are_clamped() {
        let policy = ConfidencePolicy {
            email: 1.7,
            person: -0.2,
            ..ConfidencePolicy::default()
        };
        assert_eq!(score_entity(&EntityKind::Email, "a@b.io", &policy, None), 1.0);
        assert_eq!(score_entity(&EntityKind::Person, "Jane Doe", &policy, None), 0.0);
        let custom = EntityKind::Custom("x".into());
        assert_eq!(score_entity(&custom, "x", &policy, Some(f32::NAN)), 0.0);
    }

    #[test]
    fn test_default_pattern_order() {
        let kinds: Vec<EntityKind> = default_patterns(&DateConfig::default())
            .iter()
            .map(|p| p.kind().clone())
            .collect();
        assert_eq!(
            kinds,
            vec![
                EntityKind::Date,
                EntityKind::Date,
                EntityKind::Email,
                EntityKind::Phone,
                EntityKind::Currency,
                EntityKind::Person,
                EntityKind::Organization,
            ]
        );
    }
}
