//! The cost-risk rule list
//!
//! Rules run in the order [`default_rules`] returns them and the first match
//! decides. A root-account rule therefore shadows every event-specific rule.

use crate::config::ClassifierConfig;
use crate::models::{number_exceeds, ActivityEvent, Decision, IgnoreReason, Severity};

/// Identity kind of the account root user
pub const ROOT_IDENTITY: &str = "Root";

/// Event names the rule list reacts to
pub mod events {
    /// VPC NAT gateway creation
    pub const CREATE_NAT_GATEWAY: &str = "CreateNatGateway";
    /// ELB creation (classic or v2)
    pub const CREATE_LOAD_BALANCER: &str = "CreateLoadBalancer";
    /// RDS instance creation
    pub const CREATE_DB_INSTANCE: &str = "CreateDBInstance";
    /// RDS instance modification
    pub const MODIFY_DB_INSTANCE: &str = "ModifyDBInstance";
    /// EC2 instance launch
    pub const RUN_INSTANCES: &str = "RunInstances";
    /// EBS volume creation
    pub const CREATE_VOLUME: &str = "CreateVolume";
}

/// A predicate and the decision it produces when it holds
#[derive(Clone, Copy)]
pub struct Rule {
    /// Short identifier used in logs
    pub name: &'static str,
    /// Whether this rule applies to the event
    pub matches: fn(&ActivityEvent) -> bool,
    /// Decision for an event this rule applies to
    pub decide: fn(&ActivityEvent, &ClassifierConfig) -> Decision,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish()
    }
}

/// Rules in priority order
pub fn default_rules() -> Vec<Rule> {
    vec![
        Rule {
            name: "root_activity",
            matches: |event| event.user_identity.kind == ROOT_IDENTITY,
            decide: |_, _| Decision::alert(Severity::Critical, "Root account activity detected"),
        },
        Rule {
            name: "nat_gateway",
            matches: |event| event.event_name == events::CREATE_NAT_GATEWAY,
            decide: |_, _| {
                Decision::alert(
                    Severity::Critical,
                    "NAT Gateway created (hourly billing starts immediately)",
                )
            },
        },
        Rule {
            name: "load_balancer",
            matches: |event| event.event_name == events::CREATE_LOAD_BALANCER,
            decide: |_, _| {
                Decision::alert(Severity::Critical, "Load balancer created (hourly cost applies)")
            },
        },
        Rule {
            name: "rds_instance",
            matches: |event| {
                event.event_name == events::CREATE_DB_INSTANCE
                    || event.event_name == events::MODIFY_DB_INSTANCE
            },
            decide: |_, _| {
                Decision::alert(
                    Severity::Critical,
                    "RDS database created or modified (likely outside Free Tier)",
                )
            },
        },
        Rule {
            name: "ec2_instance_type",
            matches: |event| event.event_name == events::RUN_INSTANCES,
            decide: decide_instance_type,
        },
        Rule {
            name: "ebs_volume_size",
            matches: |event| event.event_name == events::CREATE_VOLUME,
            decide: decide_volume_size,
        },
    ]
}

fn decide_instance_type(event: &ActivityEvent, config: &ClassifierConfig) -> Decision {
    let instance_type = event.parameter_str("instanceType");

    if config
        .free_tier_instance_types
        .iter()
        .any(|allowed| *allowed == instance_type)
    {
        Decision::ignored_because(IgnoreReason::FreeTierEc2)
    } else {
        Decision::alert(
            Severity::Critical,
            format!("EC2 instance type {instance_type} is not Free Tier eligible"),
        )
    }
}

fn decide_volume_size(event: &ActivityEvent, config: &ClassifierConfig) -> Decision {
    let size = event.parameter_number("size");

    if number_exceeds(&size, config.ebs_free_tier_gb) {
        Decision::alert(
            Severity::High,
            format!("EBS volume size {size}GB exceeds Free Tier limit"),
        )
    } else {
        Decision::ignored_because(IgnoreReason::FreeTierEbs)
    }
}
