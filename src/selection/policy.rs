use crate::config::{CostTable, SelectionConfig};
use crate::selection::selector::SelectionContext;
use crate::selection::state::{SelectorState, DEFAULT_USER_KEY};
use rand::Rng;

/// Strategy for picking one alternate out of two or more candidates.
///
/// Implementations may assume `candidates` is non-empty; the selector handles
/// empty and single-element pools before dispatching.
pub trait SelectionPolicy: Send + Sync {
    fn kind(&self) -> PolicyKind;

    fn choose<'a>(
        &self,
        candidates: &[&'a str],
        context: &SelectionContext,
        state: &SelectorState,
    ) -> &'a str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyKind {
    Priority,
    Cost,
    Performance,
    RoundRobin,
    Random,
}

impl PolicyKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "priority" => Some(Self::Priority),
            "cost" => Some(Self::Cost),
            "performance" => Some(Self::Performance),
            "round-robin" | "round_robin" | "roundrobin" => Some(Self::RoundRobin),
            "random" => Some(Self::Random),
            _ => None,
        }
    }

    /// Resolve a configured name, falling back to priority for anything unknown
    pub fn from_name_or_default(name: &str) -> Self {
        Self::from_name(name).unwrap_or_else(|| {
            tracing::warn!(
                "Unknown selection policy '{}', falling back to priority",
                name
            );
            Self::Priority
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Priority => "priority",
            Self::Cost => "cost",
            Self::Performance => "performance",
            Self::RoundRobin => "round-robin",
            Self::Random => "random",
        }
    }
}

impl std::fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Factory for building the policy a selector dispatches to
pub struct PolicyFactory;

impl PolicyFactory {
    pub fn create(kind: PolicyKind, config: &SelectionConfig) -> Box<dyn SelectionPolicy> {
        match kind {
            PolicyKind::Priority => Box::new(PriorityPolicy::new(config.priority.clone())),
            PolicyKind::Cost => Box::new(CostPolicy::new(config.costs.clone())),
            PolicyKind::Performance => Box::new(PerformancePolicy),
            PolicyKind::RoundRobin => Box::new(RoundRobinPolicy),
            PolicyKind::Random => Box::new(RandomPolicy),
        }
    }
}

pub(crate) struct PriorityPolicy {
    order: Vec<String>,
}

impl PriorityPolicy {
    pub(crate) fn new(order: Vec<String>) -> Self {
        Self { order }
    }
}

impl SelectionPolicy for PriorityPolicy {
    fn kind(&self) -> PolicyKind {
        PolicyKind::Priority
    }

    fn choose<'a>(
        &self,
        candidates: &[&'a str],
        _context: &SelectionContext,
        _state: &SelectorState,
    ) -> &'a str {
        self.order
            .iter()
            .find_map(|preferred| candidates.iter().find(|c| **c == preferred.as_str()))
            .copied()
            .unwrap_or(candidates[0])
    }
}

pub(crate) struct CostPolicy {
    costs: CostTable,
}

impl CostPolicy {
    pub(crate) fn new(costs: CostTable) -> Self {
        Self { costs }
    }

    /// Mean blended per-token cost across every known model of `provider`.
    /// Providers missing from the table cost nothing.
    pub(crate) fn average_cost(&self, provider: &str) -> f64 {
        average_cost(&self.costs, provider)
    }
}

pub fn average_cost(costs: &CostTable, provider: &str) -> f64 {
    match costs.get(provider) {
        Some(models) if !models.is_empty() => {
            models.values().map(|m| m.blended()).sum::<f64>() / models.len() as f64
        }
        _ => 0.0,
    }
}

impl SelectionPolicy for CostPolicy {
    fn kind(&self) -> PolicyKind {
        PolicyKind::Cost
    }

    fn choose<'a>(
        &self,
        candidates: &[&'a str],
        _context: &SelectionContext,
        _state: &SelectorState,
    ) -> &'a str {
        let mut best = candidates[0];
        let mut best_cost = self.average_cost(best);

        for candidate in &candidates[1..] {
            let cost = self.average_cost(candidate);
            if cost < best_cost {
                best = *candidate;
                best_cost = cost;
            }
        }

        best
    }
}

pub(crate) struct PerformancePolicy;

impl SelectionPolicy for PerformancePolicy {
    fn kind(&self) -> PolicyKind {
        PolicyKind::Performance
    }

    fn choose<'a>(
        &self,
        candidates: &[&'a str],
        _context: &SelectionContext,
        state: &SelectorState,
    ) -> &'a str {
        let mut best = candidates[0];
        let mut best_weight = state.weight(best);

        for candidate in &candidates[1..] {
            let weight = state.weight(candidate);
            if weight > best_weight {
                best = *candidate;
                best_weight = weight;
            }
        }

        best
    }
}

pub(crate) struct RoundRobinPolicy;

impl SelectionPolicy for RoundRobinPolicy {
    fn kind(&self) -> PolicyKind {
        PolicyKind::RoundRobin
    }

    fn choose<'a>(
        &self,
        candidates: &[&'a str],
        context: &SelectionContext,
        state: &SelectorState,
    ) -> &'a str {
        let key = context.user_id.as_deref().unwrap_or(DEFAULT_USER_KEY);
        candidates[state.advance_cursor(key, candidates.len())]
    }
}

pub(crate) struct RandomPolicy;

impl SelectionPolicy for RandomPolicy {
    fn kind(&self) -> PolicyKind {
        PolicyKind::Random
    }

    fn choose<'a>(
        &self,
        candidates: &[&'a str],
        _context: &SelectionContext,
        _state: &SelectorState,
    ) -> &'a str {
        let index = rand::thread_rng().gen_range(0..candidates.len());
        candidates[index]
    }
}
