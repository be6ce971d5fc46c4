use crate::config::SelectionConfig;
use crate::error::{SecondOpinionError, SecondOpinionResult};
use crate::selection::policy::{PolicyFactory, PolicyKind, SelectionPolicy};
use crate::selection::state::SelectorState;
use std::collections::HashMap;

/// Per-request information a policy may use
#[derive(Debug, Clone, Default)]
pub struct SelectionContext {
    pub user_id: Option<String>,
}

impl SelectionContext {
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
        }
    }
}

/// Picks the provider that should produce the second opinion.
///
/// The policy is fixed at construction. Weights and round-robin cursors live
/// for as long as the selector does and are safe to touch from many threads.
pub struct ProviderSelector {
    policy: Box<dyn SelectionPolicy>,
    state: SelectorState,
    feedback_step: f64,
}

impl ProviderSelector {
    pub fn new(config: &SelectionConfig) -> SecondOpinionResult<Self> {
        config.validate()?;

        let kind = PolicyKind::from_name_or_default(&config.policy);
        Ok(Self {
            policy: PolicyFactory::create(kind, config),
            state: SelectorState::new(),
            feedback_step: config.feedback_step,
        })
    }

    /// Build a selector around a custom policy
    pub fn with_policy(policy: Box<dyn SelectionPolicy>, feedback_step: f64) -> Self {
        Self {
            policy,
            state: SelectorState::new(),
            feedback_step,
        }
    }

    pub fn policy(&self) -> PolicyKind {
        self.policy.kind()
    }

    /// Choose an alternate from `available`, never returning `exclude`.
    pub fn select<S: AsRef<str>>(
        &self,
        available: &[S],
        exclude: Option<&str>,
        context: &SelectionContext,
    ) -> SecondOpinionResult<String> {
        let candidates: Vec<&str> = available
            .iter()
            .map(|p| p.as_ref())
            .filter(|p| Some(*p) != exclude)
            .collect();

        let chosen = match candidates.as_slice() {
            [] => {
                return Err(SecondOpinionError::NoAlternatives {
                    excluded: exclude.map(str::to_string),
                })
            }
            [only] => *only,
            _ => self.policy.choose(&candidates, context, &self.state),
        };

        tracing::debug!(
            policy = %self.policy.kind(),
            candidates = candidates.len(),
            provider = chosen,
            "Selected alternate provider"
        );

        Ok(chosen.to_string())
    }

    /// Adjust a provider's weight after the caller judged its answer.
    /// Returns the new weight, always within [0.1, 10.0].
    ///
    /// Only the magnitude of `step` is used; `helpful` picks the direction.
    /// Non-finite steps leave the weight untouched.
    pub fn update_weight(&self, provider: &str, helpful: bool, step: f64) -> f64 {
        if !step.is_finite() {
            tracing::warn!(provider, step, "Ignoring non-finite feedback step");
            return self.state.weight(provider);
        }

        let step = step.abs();
        let delta = if helpful { step } else { -step };
        let weight = self.state.adjust_weight(provider, delta);
        tracing::debug!(provider, helpful, weight, "Updated provider weight");
        weight
    }

    /// `update_weight` with the configured feedback step
    pub fn record_feedback(&self, provider: &str, helpful: bool) -> f64 {
        self.update_weight(provider, helpful, self.feedback_step)
    }

    /// Snapshot of every weight that has moved from the default
    pub fn weights(&self) -> HashMap<String, f64> {
        self.state.weights()
    }

    pub fn weight(&self, provider: &str) -> f64 {
        self.state.weight(provider)
    }

    pub fn reset_weights(&self) {
        self.state.reset_weights();
    }

    /// Forget every user's round-robin position
    pub fn clear_history(&self) {
        self.state.clear_cursors();
    }
}

impl std::fmt::Debug for ProviderSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSelector")
            .field("policy", &self.policy.kind())
            .field("state", &self.state)
            .field("feedback_step", &self.feedback_step)
            .finish()
    }
}
