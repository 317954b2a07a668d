//! Event classification
//!
//! Turns one [`ActivityEvent`] into a [`Decision`] by walking an ordered
//! rule list. Classification has no side effects; dispatch belongs to
//! [`crate::alerting::EventHandler`].

mod rules;

pub use rules::{default_rules, events, Rule, ROOT_IDENTITY};

use tracing::debug;

use crate::config::ClassifierConfig;
use crate::models::{ActivityEvent, Decision};

/// Priority-ordered cost-risk classifier
#[derive(Debug, Clone)]
pub struct Classifier {
    config: ClassifierConfig,
    rules: Vec<Rule>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(ClassifierConfig::default())
    }
}

impl Classifier {
    /// Create a classifier with the standard rule list
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            config,
            rules: default_rules(),
        }
    }

    /// Classifier settings
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify an event
    pub fn classify(&self, event: &ActivityEvent) -> Decision {
        self.evaluate(event).1
    }

    /// Classify an event and report which rule, if any, decided it
    pub fn evaluate(&self, event: &ActivityEvent) -> (Option<&'static str>, Decision) {
        for rule in &self.rules {
            if (rule.matches)(event) {
                let decision = (rule.decide)(event, &self.config);
                debug!(
                    rule = rule.name,
                    event_name = %event.event_name,
                    decision = ?decision,
                    "Rule matched"
                );
                return (Some(rule.name), decision);
            }
        }

        debug!(event_name = %event.event_name, "No rule matched");
        (None, Decision::ignored())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IgnoreReason, Severity};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;
    use serde_json::{json, Value};

    fn event(value: Value) -> ActivityEvent {
        ActivityEvent::from_value(value).unwrap()
    }

    fn iam_event(name: &str, params: Value) -> ActivityEvent {
        event(json!({
            "eventName": name,
            "eventSource": "ec2.amazonaws.com",
            "userIdentity": {"type": "IAMUser", "arn": "arn:aws:iam::123456789012:user/x"},
            "sourceIPAddress": "1.2.3.4",
            "requestParameters": params
        }))
    }

    #[rstest]
    #[case("CreateNatGateway", "NAT Gateway created (hourly billing starts immediately)")]
    #[case("CreateLoadBalancer", "Load balancer created (hourly cost applies)")]
    #[case("CreateDBInstance", "RDS database created or modified (likely outside Free Tier)")]
    #[case("ModifyDBInstance", "RDS database created or modified (likely outside Free Tier)")]
    fn test_always_critical_events(#[case] name: &str, #[case] reason: &str) {
        let classifier = Classifier::default();
        assert_eq!(
            classifier.classify(&iam_event(name, json!({}))),
            Decision::alert(Severity::Critical, reason)
        );
    }

    #[rstest]
    #[case("t2.micro")]
    #[case("t3.micro")]
    fn test_free_tier_instance_is_ignored(#[case] instance_type: &str) {
        let classifier = Classifier::default();
        let decision =
            classifier.classify(&iam_event("RunInstances", json!({"instanceType": instance_type})));
        assert_eq!(decision, Decision::ignored_because(IgnoreReason::FreeTierEc2));
    }

    #[rstest]
    #[case("m5.large")]
    #[case("t3.small")]
    #[case("T2.MICRO")]
    #[case("")]
    fn test_paid_instance_alerts(#[case] instance_type: &str) {
        let classifier = Classifier::default();
        let decision =
            classifier.classify(&iam_event("RunInstances", json!({"instanceType": instance_type})));
        assert_eq!(
            decision,
            Decision::alert(
                Severity::Critical,
                format!("EC2 instance type {instance_type} is not Free Tier eligible")
            )
        );
    }

    #[test]
    fn test_missing_instance_type_alerts() {
        let classifier = Classifier::default();
        let decision = classifier.classify(&iam_event("RunInstances", json!({})));
        assert_eq!(
            decision,
            Decision::alert(Severity::Critical, "EC2 instance type  is not Free Tier eligible")
        );
    }

    #[rstest]
    #[case(json!({"size": 8}))]
    #[case(json!({"size": 30}))]
    #[case(json!({"size": 30.0}))]
    #[case(json!({"size": "12"}))]
    #[case(json!({}))]
    fn test_small_volume_is_ignored(#[case] params: Value) {
        let classifier = Classifier::default();
        assert_eq!(
            classifier.classify(&iam_event("CreateVolume", params)),
            Decision::ignored_because(IgnoreReason::FreeTierEbs)
        );
    }

    #[test]
    fn test_large_volume_alerts_high() {
        let classifier = Classifier::default();
        assert_eq!(
            classifier.classify(&iam_event("CreateVolume", json!({"size": 31}))),
            Decision::alert(Severity::High, "EBS volume size 31GB exceeds Free Tier limit")
        );
    }

    #[rstest]
    #[case(json!(30.5), "EBS volume size 30.5GB exceeds Free Tier limit")]
    #[case(json!("64"), "EBS volume size 64GB exceeds Free Tier limit")]
    #[case(
        json!(18446744073709551615u64),
        "EBS volume size 18446744073709551615GB exceeds Free Tier limit"
    )]
    fn test_oversized_volume_keeps_json_size(#[case] size: Value, #[case] reason: &str) {
        let classifier = Classifier::default();
        assert_eq!(
            classifier.classify(&iam_event("CreateVolume", json!({"size": size}))),
            Decision::alert(Severity::High, reason)
        );
    }

    #[rstest]
    #[case("DescribeInstances")]
    #[case("createnatgateway")]
    #[case("CreateBucket")]
    #[case("")]
    fn test_unhandled_events_are_ignored(#[case] name: &str) {
        let classifier = Classifier::default();
        let (rule, decision) = classifier.evaluate(&iam_event(name, json!({})));
        assert_eq!(rule, None);
        assert_eq!(decision, Decision::ignored());
    }

    #[test]
    fn test_root_takes_priority_over_volume_rule() {
        let classifier = Classifier::default();
        let root_volume = event(json!({
            "eventName": "CreateVolume",
            "userIdentity": {"type": "Root", "arn": "arn:aws:iam::123456789012:root"},
            "requestParameters": {"size": 50}
        }));

        let (rule, decision) = classifier.evaluate(&root_volume);

        assert_eq!(rule, Some("root_activity"));
        assert_eq!(
            decision,
            Decision::alert(Severity::Critical, "Root account activity detected")
        );
    }

    #[test]
    fn test_nat_gateway_example() {
        let classifier = Classifier::default();
        let decision = classifier.classify(&event(json!({
            "eventName": "CreateNatGateway",
            "eventSource": "ec2.amazonaws.com",
            "userIdentity": {"type": "IAMUser", "arn": "arn:aws:iam::123456789012:user/x"},
            "sourceIPAddress": "1.2.3.4"
        })));
        assert_eq!(
            decision,
            Decision::alert(
                Severity::Critical,
                "NAT Gateway created (hourly billing starts immediately)"
            )
        );
    }

    proptest! {
        #[test]
        fn prop_root_always_alerts(
            name in "[A-Za-z]{0,24}",
            instance_type in "[a-z0-9.]{0,12}",
            size in any::<i64>(),
        ) {
            let classifier = Classifier::default();
            let root_event = event(json!({
                "eventName": name,
                "userIdentity": {"type": "Root"},
                "requestParameters": {"instanceType": instance_type, "size": size}
            }));

            prop_assert_eq!(
                classifier.classify(&root_event),
                Decision::alert(Severity::Critical, "Root account activity detected")
            );
        }

        #[test]
        fn prop_volume_threshold(size in -1_000i64..10_000) {
            let classifier = Classifier::default();
            let decision = classifier.classify(&iam_event("CreateVolume", json!({"size": size})));

            if size > 30 {
                prop_assert_eq!(
                    decision,
                    Decision::alert(
                        Severity::High,
                        format!("EBS volume size {size}GB exceeds Free Tier limit")
                    )
                );
            } else {
                prop_assert_eq!(decision, Decision::ignored_because(IgnoreReason::FreeTierEbs));
            }
        }

        #[test]
        fn prop_unhandled_names_are_ignored(name in "[A-Z][a-zA-Z]{0,20}") {
            let handled = [
                events::CREATE_NAT_GATEWAY,
                events::CREATE_LOAD_BALANCER,
                events::CREATE_DB_INSTANCE,
                events::MODIFY_DB_INSTANCE,
                events::RUN_INSTANCES,
                events::CREATE_VOLUME,
            ];
            prop_assume!(!handled.contains(&name.as_str()));

            let classifier = Classifier::default();
            prop_assert_eq!(
                classifier.classify(&iam_event(&name, json!({}))),
                Decision::ignored()
            );
        }
    }
}
