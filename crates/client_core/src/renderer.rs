//! Display model for a classification result and the probability bar
//! animation.

use std::time::{Duration, Instant};

use shared::{domain::Badge, protocol::ClassificationResult};

/// A new bar width is applied after this delay so the change is visible.
pub const BAR_APPLY_DELAY: Duration = Duration::from_millis(50);
pub const BAR_TRANSITION: Duration = Duration::from_millis(400);

#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub label: String,
    pub percent: u8,
    pub badge: Badge,
    pub badge_text: &'static str,
    pub subject: Option<String>,
    pub votes: Vec<(String, u64)>,
    pub raw_json: String,
}

pub fn render(result: &ClassificationResult) -> ResultView {
    let badge = Badge::for_label(&result.label);
    ResultView {
        label: result.label.clone(),
        percent: result.percent(),
        badge,
        badge_text: badge.text(),
        subject: result.subject.clone(),
        votes: result
            .votes
            .iter()
            .map(|(class, count)| (class.clone(), *count))
            .collect(),
        raw_json: result.raw.pretty(),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProbabilityBar {
    from: f32,
    to: f32,
    scheduled_at: Option<Instant>,
}

impl ProbabilityBar {
    pub fn animate_to(&mut self, fraction: f64, now: Instant) {
        self.from = self.width_at(now);
        self.to = fraction.clamp(0.0, 1.0) as f32;
        self.scheduled_at = Some(now);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn target(&self) -> f32 {
        self.to
    }

    pub fn width_at(&self, now: Instant) -> f32 {
        let Some(scheduled_at) = self.scheduled_at else {
            return self.to;
        };
        let elapsed = now.saturating_duration_since(scheduled_at);
        if elapsed < BAR_APPLY_DELAY {
            return self.from;
        }
        let t = (elapsed - BAR_APPLY_DELAY).as_secs_f32() / BAR_TRANSITION.as_secs_f32();
        if t >= 1.0 {
            self.to
        } else {
            self.from + (self.to - self.from) * t
        }
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        self.scheduled_at.is_some_and(|scheduled_at| {
            now.saturating_duration_since(scheduled_at) < BAR_APPLY_DELAY + BAR_TRANSITION
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use shared::protocol::{ClassificationOutcome, RawResponsePayload};

    use super::*;

    fn result_from(value: serde_json::Value) -> ClassificationResult {
        let map = value.as_object().cloned().expect("object");
        match RawResponsePayload(map).normalize() {
            ClassificationOutcome::Success(result) => result,
            ClassificationOutcome::Failure { message } => panic!("unexpected failure: {message}"),
        }
    }

    #[test]
    fn positive_label_renders_condition_badge() {
        let view = render(&result_from(json!({"label": "MDD", "prob": 0.73})));
        assert_eq!(view.badge, Badge::ConditionDetected);
        assert_eq!(view.badge_text, "⚠ Major Depressive Disorder");
        assert_eq!(view.percent, 73);
    }

    #[test]
    fn any_other_label_renders_healthy_badge() {
        for body in [json!({"label": "HC"}), json!({}), json!({"label": "Mdd"})] {
            let view = render(&result_from(body));
            assert_eq!(view.badge, Badge::HealthyControl);
        }
    }

    #[test]
    fn raw_payload_is_pretty_printed() {
        let view = render(&result_from(json!({"label": "HC", "prob": 0.1})));
        assert!(view.raw_json.contains("\n"));
        assert!(view.raw_json.contains("\"label\": \"HC\""));
    }

    #[test]
    fn bar_defers_then_eases_to_target() {
        let start = Instant::now();
        let mut bar = ProbabilityBar::default();
        bar.animate_to(0.8, start);

        assert_eq!(bar.width_at(start), 0.0);
        assert_eq!(bar.width_at(start + Duration::from_millis(49)), 0.0);

        let midway = bar.width_at(start + BAR_APPLY_DELAY + BAR_TRANSITION / 2);
        assert!(midway > 0.3 && midway < 0.5, "midway width was {midway}");

        assert!(bar.is_animating(start + BAR_APPLY_DELAY));
        let done = start + BAR_APPLY_DELAY + BAR_TRANSITION;
        assert_eq!(bar.width_at(done), 0.8);
        assert!(!bar.is_animating(done));
    }

    #[test]
    fn bar_reset_snaps_to_zero() {
        let start = Instant::now();
        let mut bar = ProbabilityBar::default();
        bar.animate_to(0.5, start);
        bar.reset();
        assert_eq!(bar.width_at(start + Duration::from_secs(1)), 0.0);
        assert_eq!(bar.target(), 0.0);
    }
}
