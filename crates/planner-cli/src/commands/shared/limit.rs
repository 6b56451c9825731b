/// Largest page any list command returns.
pub const MAX_LIST_LIMIT: u32 = 1_000;

/// Row cap for a list command.
///
/// The subcommand's own `--limit` beats the global one, which beats
/// `fallback`. A zero counts as unset. The result never exceeds
/// [`MAX_LIST_LIMIT`].
#[must_use]
pub fn effective_limit(command: Option<u32>, global: Option<u32>, fallback: u32) -> u32 {
    let given = |n: &u32| *n > 0;
    command
        .filter(given)
        .or_else(|| global.filter(given))
        .unwrap_or(fallback)
        .min(MAX_LIST_LIMIT)
}
