//! Route matching engine.
//!
//! A [`Matcher`] is bound to one [`NotificationRoute`] and decides, per
//! event, whether the channel behind that route should receive it. Four
//! independent dimensions are evaluated (event type, event group,
//! application, environment) and the event matches only if every dimension
//! passes. All four dimensions share one include/exclude evaluator, so the
//! absent-value bypass below is a single code path.

use convoy_model::Event;

use crate::config::NotificationRoute;

/// Include/exclude filter for one routing dimension.
#[derive(Debug, Clone, Default)]
struct Filter {
    allow: Vec<String>,
    deny: Vec<String>,
}

impl Filter {
    fn new(allow: &[String], deny: &[String]) -> Self {
        Self {
            allow: allow.to_vec(),
            deny: deny.to_vec(),
        }
    }

    /// Evaluates a value that may be spelled several equivalent ways.
    ///
    /// An empty allow list admits every value. A deny match always wins,
    /// even when the allow list also names the value.
    fn matches_any(&self, values: &[&str]) -> bool {
        if !self.allow.is_empty()
            && !values
                .iter()
                .any(|value| self.allow.iter().any(|token| token == value))
        {
            return false;
        }
        !values
            .iter()
            .any(|value| self.deny.iter().any(|token| token == value))
    }

    fn matches(&self, value: &str) -> bool {
        self.matches_any(&[value])
    }

    /// An absent value passes unconditionally, whatever the lists contain:
    /// filters that only make sense for deployment-scoped events must not
    /// block agent-level events.
    fn matches_opt(&self, value: Option<&str>) -> bool {
        match value {
            Some(value) => self.matches(value),
            None => true,
        }
    }
}

/// Stateless predicate deciding event-to-channel delivery for one route.
///
/// A matcher holds no mutable state and is safe to share across tasks for
/// an unbounded number of events. When the route set changes, build a fresh
/// matcher set and swap it in wholesale instead of mutating in place.
#[derive(Debug, Clone)]
pub struct Matcher {
    events: Filter,
    groups: Filter,
    apps: Filter,
    envs: Filter,
}

impl Matcher {
    /// Binds a matcher to the given route.
    pub fn new(route: &NotificationRoute) -> Self {
        Self {
            events: Filter::new(&route.events, &route.ignore_events),
            groups: Filter::new(&route.groups, &route.ignore_groups),
            apps: Filter::new(&route.apps, &route.ignore_apps),
            envs: Filter::new(&route.envs, &route.ignore_envs),
        }
    }

    /// Returns true if `event` should be delivered through this route.
    ///
    /// Event tokens match spelled as either the action part (`TRIGGERED`)
    /// or the full type string (`DEPLOYMENT_TRIGGERED`). Events that carry
    /// no application or environment identifier pass those two dimensions
    /// unconditionally.
    pub fn matches(&self, event: &Event) -> bool {
        let kind = event.kind();
        if !self.events.matches_any(&[kind.action(), kind.as_str()]) {
            return false;
        }
        if !self.groups.matches(kind.group()) {
            return false;
        }
        if !self.apps.matches_opt(event.application_id()) {
            return false;
        }
        self.envs.matches_opt(event.environment_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use convoy_model::{ApplicationRef, DeploymentRef};

    fn tokens(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn deployment_triggered(app: &str, env: &str) -> Event {
        Event::DeploymentTriggered {
            deployment: DeploymentRef {
                id: "deploy-1".to_string(),
                application_id: app.to_string(),
                environment_id: env.to_string(),
            },
        }
    }

    fn rolling_back(app: &str, env: &str) -> Event {
        Event::DeploymentRollingBack {
            deployment: DeploymentRef {
                id: "deploy-2".to_string(),
                application_id: app.to_string(),
                environment_id: env.to_string(),
            },
        }
    }

    fn application_synced() -> Event {
        Event::ApplicationSynced {
            application: ApplicationRef {
                id: "app-1".to_string(),
                name: "frontend".to_string(),
                environment_id: "staging".to_string(),
            },
        }
    }

    fn agent_started() -> Event {
        Event::AgentStarted {
            version: "v0.1.0".to_string(),
        }
    }

    #[test]
    fn empty_route_matches_every_event() {
        let matcher = Matcher::new(&NotificationRoute::default());

        assert!(matcher.matches(&deployment_triggered("canary", "prod")));
        assert!(matcher.matches(&rolling_back("", "")));
        assert!(matcher.matches(&application_synced()));
        assert!(matcher.matches(&agent_started()));
    }

    #[test]
    fn filter_by_event() {
        let matcher = Matcher::new(&NotificationRoute {
            events: tokens(&["TRIGGERED"]),
            ignore_events: tokens(&["ROLLING_BACK"]),
            ..Default::default()
        });

        assert!(matcher.matches(&deployment_triggered("canary", "prod")));
        assert!(!matcher.matches(&rolling_back("canary", "prod")));
        assert!(!matcher.matches(&application_synced()));
    }

    #[test]
    fn event_tokens_match_full_type_string_too() {
        let matcher = Matcher::new(&NotificationRoute {
            events: tokens(&["DEPLOYMENT_TRIGGERED"]),
            ..Default::default()
        });
        assert!(matcher.matches(&deployment_triggered("canary", "prod")));
        assert!(!matcher.matches(&rolling_back("canary", "prod")));

        let matcher = Matcher::new(&NotificationRoute {
            ignore_events: tokens(&["DEPLOYMENT_ROLLING_BACK"]),
            ..Default::default()
        });
        assert!(!matcher.matches(&rolling_back("canary", "prod")));
        assert!(matcher.matches(&deployment_triggered("canary", "prod")));
    }

    #[test]
    fn filter_by_group() {
        let matcher = Matcher::new(&NotificationRoute {
            groups: tokens(&["DEPLOYMENT"]),
            ignore_groups: tokens(&["APPLICATION"]),
            ..Default::default()
        });

        assert!(matcher.matches(&deployment_triggered("canary", "prod")));
        assert!(!matcher.matches(&application_synced()));
        assert!(!matcher.matches(&agent_started()));
    }

    #[test]
    fn filter_by_app() {
        let matcher = Matcher::new(&NotificationRoute {
            apps: tokens(&["canary"]),
            ignore_apps: tokens(&["bluegreen"]),
            ..Default::default()
        });

        assert!(matcher.matches(&deployment_triggered("canary", "prod")));
        assert!(!matcher.matches(&deployment_triggered("bluegreen", "prod")));
        assert!(!matcher.matches(&deployment_triggered("not-specified", "prod")));
        // No application identifier at all: the dimension passes.
        assert!(matcher.matches(&agent_started()));
    }

    #[test]
    fn filter_by_env() {
        let matcher = Matcher::new(&NotificationRoute {
            envs: tokens(&["prod"]),
            ignore_envs: tokens(&["dev"]),
            ..Default::default()
        });

        assert!(matcher.matches(&deployment_triggered("canary", "prod")));
        assert!(!matcher.matches(&deployment_triggered("canary", "dev")));
        assert!(!matcher.matches(&deployment_triggered("canary", "not-specified")));
        assert!(matcher.matches(&agent_started()));
    }

    #[test]
    fn deny_wins_over_allow() {
        let matcher = Matcher::new(&NotificationRoute {
            apps: tokens(&["canary"]),
            ignore_apps: tokens(&["canary"]),
            ..Default::default()
        });
        assert!(!matcher.matches(&deployment_triggered("canary", "prod")));

        let matcher = Matcher::new(&NotificationRoute {
            events: tokens(&["TRIGGERED"]),
            ignore_events: tokens(&["DEPLOYMENT_TRIGGERED"]),
            ..Default::default()
        });
        assert!(!matcher.matches(&deployment_triggered("canary", "prod")));
    }

    #[test]
    fn growing_allow_list_never_turns_true_to_false() {
        let narrow = Matcher::new(&NotificationRoute {
            apps: tokens(&["canary"]),
            ..Default::default()
        });
        let wide = Matcher::new(&NotificationRoute {
            apps: tokens(&["canary", "bluegreen"]),
            ..Default::default()
        });

        let canary = deployment_triggered("canary", "prod");
        let bluegreen = deployment_triggered("bluegreen", "prod");

        assert!(narrow.matches(&canary));
        assert!(!narrow.matches(&bluegreen));
        // Previously-true stays true, previously-false may become true.
        assert!(wide.matches(&canary));
        assert!(wide.matches(&bluegreen));
    }

    #[test]
    fn growing_deny_list_never_turns_false_to_true() {
        let narrow = Matcher::new(&NotificationRoute {
            ignore_apps: tokens(&["bluegreen"]),
            ..Default::default()
        });
        let wide = Matcher::new(&NotificationRoute {
            ignore_apps: tokens(&["bluegreen", "canary"]),
            ..Default::default()
        });

        let canary = deployment_triggered("canary", "prod");
        let bluegreen = deployment_triggered("bluegreen", "prod");

        assert!(narrow.matches(&canary));
        assert!(!narrow.matches(&bluegreen));
        assert!(!wide.matches(&canary));
        assert!(!wide.matches(&bluegreen));
    }

    #[test]
    fn same_kind_events_agree_on_type_and_group_dimensions() {
        let matcher = Matcher::new(&NotificationRoute {
            events: tokens(&["TRIGGERED"]),
            groups: tokens(&["DEPLOYMENT"]),
            ..Default::default()
        });

        // App and env payloads differ; only the kind feeds these dimensions.
        assert_eq!(
            matcher.matches(&deployment_triggered("canary", "prod")),
            matcher.matches(&deployment_triggered("bluegreen", "dev"))
        );
        assert_eq!(
            matcher.matches(&rolling_back("canary", "prod")),
            matcher.matches(&rolling_back("bluegreen", "dev"))
        );
    }

    #[test]
    fn agent_events_bypass_app_and_env_filters() {
        // Flagged behavior: a non-empty allow list is silently bypassed for
        // events that carry no application or environment identifier.
        let matcher = Matcher::new(&NotificationRoute {
            apps: tokens(&["canary"]),
            ignore_apps: tokens(&["bluegreen"]),
            envs: tokens(&["prod"]),
            ignore_envs: tokens(&["dev"]),
            ..Default::default()
        });

        assert!(matcher.matches(&agent_started()));
        assert!(matcher.matches(&Event::AgentStopped {
            version: "v0.1.0".to_string(),
        }));
    }

    #[test]
    fn agent_events_still_subject_to_event_and_group_filters() {
        let matcher = Matcher::new(&NotificationRoute {
            ignore_groups: tokens(&["AGENT"]),
            ..Default::default()
        });
        assert!(!matcher.matches(&agent_started()));

        let matcher = Matcher::new(&NotificationRoute {
            ignore_events: tokens(&["STARTED"]),
            ..Default::default()
        });
        assert!(!matcher.matches(&agent_started()));
    }

    #[test]
    fn empty_identifier_is_matched_not_bypassed() {
        let matcher = Matcher::new(&NotificationRoute {
            apps: tokens(&["canary"]),
            ..Default::default()
        });
        // Present-but-empty is an ordinary value that fails the allow list.
        assert!(!matcher.matches(&deployment_triggered("", "prod")));
    }

    #[test]
    fn unknown_tokens_never_match_anything() {
        let matcher = Matcher::new(&NotificationRoute {
            events: tokens(&["DEPLOYMENT_EXPLODED"]),
            ..Default::default()
        });

        assert!(!matcher.matches(&deployment_triggered("canary", "prod")));
        assert!(!matcher.matches(&application_synced()));
        assert!(!matcher.matches(&agent_started()));
    }

    #[test]
    fn tokens_are_case_sensitive() {
        let matcher = Matcher::new(&NotificationRoute {
            events: tokens(&["triggered"]),
            ..Default::default()
        });
        assert!(!matcher.matches(&deployment_triggered("canary", "prod")));

        let matcher = Matcher::new(&NotificationRoute {
            apps: tokens(&["Canary"]),
            ..Default::default()
        });
        assert!(!matcher.matches(&deployment_triggered("canary", "prod")));
    }

    #[test]
    fn duplicate_tokens_are_harmless() {
        let matcher = Matcher::new(&NotificationRoute {
            apps: tokens(&["canary", "canary"]),
            ..Default::default()
        });
        assert!(matcher.matches(&deployment_triggered("canary", "prod")));
    }
}
