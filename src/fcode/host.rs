/// Which host ruleset is resolving numeric/special friendly-code rules
/// (spec §4.1 `isNumeric`). PHost version gating is modeled as a proper
/// ordered tuple comparison over `(major, minor, patch)`, since spec prose
/// alone leaves boundary behavior ("PHost >= 4.0.8") ambiguous about
/// inclusivity — `>=` is inclusive here, matching
/// `original_source/game/data/friendlycode.cpp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostVersion {
    Host(u8, u8),
    PHost(u8, u8, u8),
    NuHost,
    SuperHost,
    /// Host not yet known (code generated before a turn file is loaded).
    /// Friendly-code rules fall back to the most permissive reading that
    /// still rejects codes every known host would reject ("Pessimistic"
    /// mode in `original_source/test/game/spec/friendlycodelisttest.cpp`).
    Unknown,
}

impl HostVersion {
    pub const PHOST_4_0_8: (u8, u8, u8) = (4, 0, 8);

    pub fn is_phost(&self) -> bool {
        matches!(self, HostVersion::PHost(..))
    }

    pub fn is_phost_at_least(&self, version: (u8, u8, u8)) -> bool {
        matches!(self, HostVersion::PHost(a, b, c) if (*a, *b, *c) >= version)
    }

    pub fn is_tim_host(&self) -> bool {
        matches!(self, HostVersion::Host(..))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phost_version_gate_is_inclusive() {
        assert!(HostVersion::PHost(4, 0, 8).is_phost_at_least(HostVersion::PHOST_4_0_8));
        assert!(HostVersion::PHost(4, 0, 9).is_phost_at_least(HostVersion::PHOST_4_0_8));
        assert!(!HostVersion::PHost(4, 0, 7).is_phost_at_least(HostVersion::PHOST_4_0_8));
    }
}
