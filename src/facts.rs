//! Fun-fact table

use rand::seq::SliceRandom;

/// Facts shown under the telemetry block when `fun_facts` is enabled
const FACTS: &[&str] = &[
    "Tux has been the Linux mascot since 1996.",
    "International Linux Day is celebrated on August 25th.",
    "The Linux kernel was created by Linus Torvalds in 1991.",
    "KDE was announced on October 14, 1996, as the K Desktop Environment.",
    "GNOME started as an open-source alternative to CDE and early KDE.",
    "Most popular desktop distros trace their lineage back to Debian.",
    "ferrofetch ships under the MIT license.",
    "ferrofetch was inspired by Neofetch.",
    "Plugins extend ferrofetch without recompiling it - drop a script in the plugins directory.",
    "Both macOS and the BSDs descend from Unix; Linux merely rhymes with it.",
];

/// Pick a random fun fact
#[must_use]
pub fn random_fact() -> &'static str {
    FACTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(FACTS[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fact_comes_from_the_table() {
        let fact = random_fact();
        assert!(FACTS.contains(&fact));
    }
}
