//! Activation sequence editing.
//!
//! Offerings and services carry an ordered list of human-readable activation
//! steps. The picker toggles steps from a fixed catalogue and keeps catalogue
//! order; the free editor reorders and removes arbitrary entries.

/// Canonical step catalogue, in execution order.
pub const ACTIVATION_STEPS: [&str; 8] = [
    "Allocate hardware",
    "Configure devices",
    "Install on site",
    "Ship & install",
    "Commission network",
    "Activate license",
    "Register support",
    "Go live",
];

/// Toggle `step` in `selected`.
///
/// Removing keeps the remaining entries as they are. Adding re-derives the
/// list from the catalogue, so the result is in catalogue order and entries
/// outside the catalogue are dropped.
pub fn toggle_step(selected: &[String], step: &str) -> Vec<String> {
    if selected.iter().any(|s| s == step) {
        return selected.iter().filter(|s| *s != step).cloned().collect();
    }
    ACTIVATION_STEPS
        .iter()
        .filter(|s| **s == step || selected.iter().any(|x| x == *s))
        .map(|s| s.to_string())
        .collect()
}

/// Move the entry at `from` to position `to`. Out-of-range indices are a no-op.
pub fn move_step(steps: &mut Vec<String>, from: usize, to: usize) {
    if from >= steps.len() || to >= steps.len() || from == to {
        return;
    }
    let step = steps.remove(from);
    steps.insert(to, step);
}

pub fn remove_step(steps: &mut Vec<String>, index: usize) -> Option<String> {
    (index < steps.len()).then(|| steps.remove(index))
}
