use crate::fcode::code::{FriendlyCode, FriendlyCodeFlags, FriendlyCodeStr, ParameterKind, RaceMask, compare_codes};
use crate::fcode::host::HostVersion;
use rand::RngCore;
use std::io::BufRead;

const DISALLOWED_RANDOM_CHARS: &[char] = &['?', '#'];
const RANDOM_CHARSET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Ship,
    Planet,
    Base,
}

/// Origin type + owner + flags used to build a sub-list (spec §4.1 "Sub-list
/// construction") and to evaluate `is_accepted_friendly_code`.
#[derive(Debug, Clone, Copy)]
pub struct Filter {
    pub kind: ObjectKind,
    pub owner: u8,
    pub is_allied: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RegistrationKey {
    pub registered: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultPolicy {
    Available,
    Unavailable,
    Registered,
}

/// The master friendly-code list plus extension prefix-blocklist entries
/// loaded from a separate file (spec §3.3/§4.1).
#[derive(Debug, Clone, Default)]
pub struct FriendlyCodeList {
    master: Vec<FriendlyCode>,
    extras: Vec<String>,
}

impl FriendlyCodeList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.master.len()
    }

    pub fn is_empty(&self) -> bool {
        self.master.is_empty()
    }

    pub fn add(&mut self, code: FriendlyCode) {
        self.master.push(code);
    }

    pub fn sort(&mut self) {
        self.master.sort_by(|a, b| compare_codes(&a.code, &b.code));
    }

    pub fn find_exact(&self, code: &str) -> Option<&FriendlyCode> {
        self.master.iter().find(|fc| fc.matches_exact(code, false))
    }

    /// Parses the master list: `code,flags,description` per line, `;`
    /// comments and blank lines ignored. Loader errors are logged and
    /// skipped (spec §4.1 "Failure semantics"); no exceptions propagate.
    pub fn load(&mut self, reader: impl BufRead) {
        for (lineno, line) in reader.lines().enumerate() {
            let Ok(line) = line else { continue };
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with(';') {
                continue;
            }
            let mut parts = trimmed.splitn(3, ',');
            let Some(code_field) = parts.next() else { continue };
            let flags_field = parts.next().unwrap_or("");
            let description = parts.next().unwrap_or("").to_string();

            let mut code = code_field.trim().to_string();
            if code.len() > 3 {
                log::warn!("fcode list line {}: code '{}' truncated to 3 characters", lineno + 1, code);
                code.truncate(3);
            }
            if code.is_empty() {
                log::warn!("fcode list line {}: empty code, skipped", lineno + 1);
                continue;
            }

            let (flags, race_mask, parameter) = parse_flags(flags_field);
            self.master.push(FriendlyCode { code, flags, race_mask, description, parameter });
        }
        self.sort();
    }

    /// Reads a whitespace-delimited list of prefix-blocklist entries. Unlike
    /// the master list's codes, extras are **not** truncated to 3 characters
    /// (`original_source/test/game/spec/friendlycodelisttest.cpp:242` loads a
    /// 4-char extra and asserts it still isn't matched by a 3-char code).
    pub fn load_extra_codes(&mut self, reader: impl BufRead) {
        for line in reader.lines() {
            let Ok(line) = line else { continue };
            for token in line.split_whitespace() {
                if !token.is_empty() {
                    self.extras.push(token.to_string());
                }
            }
        }
    }

    /// `isNumeric`: host-dependent decision of whether `code` is a
    /// numeric code (spec §4.1).
    pub fn is_numeric(code: &str, host: HostVersion) -> bool {
        if is_plain_three_digits(code) {
            return true;
        }
        match host {
            HostVersion::Host(..) | HostVersion::NuHost | HostVersion::SuperHost => false,
            HostVersion::PHost(..) => is_phost_numeric(code, host),
            HostVersion::Unknown => is_phost_numeric(code, HostVersion::PHost(4, 0, 8)),
        }
    }

    /// `getNumericValue`: the integer `code` maps to, or 1000 when none.
    pub fn get_numeric_value(code: &str, host: HostVersion) -> i32 {
        if !Self::is_numeric(code, host) {
            return 1000;
        }
        code.trim().parse::<i32>().unwrap_or(1000)
    }

    /// `isSpecial`: true iff `code` exact-matches a master-list entry, or
    /// prefix-matches an extra-code entry, both under the same `case_blind`
    /// rule.
    pub fn is_special(&self, code: &str, case_blind: bool) -> bool {
        self.master.iter().any(|fc| fc.matches_exact(code, case_blind))
            || self.extras.iter().any(|extra| extra_matches(extra, code, case_blind))
    }

    /// `isUniversalMinefieldFCode`: detects the `mfX` family. With
    /// `tolerant = false` the match is always case-insensitive (the safe
    /// default `isAllowedRandomCode` uses); with `tolerant = true` the
    /// match follows the host's own case rule (PHost case-sensitive,
    /// Host/NuHost/SuperHost case-blind).
    pub fn is_universal_minefield_fcode(code: &str, tolerant: bool, host: HostVersion) -> bool {
        if code.len() != 3 {
            return false;
        }
        let prefix = &code[0..2];
        let case_blind = if tolerant { !host.is_phost() } else { true };
        if case_blind { prefix.eq_ignore_ascii_case("mf") } else { prefix == "mf" }
    }

    /// `isAllowedRandomCode`: spec §4.1, all six conditions.
    pub fn is_allowed_random_code(&self, code: &str, host: HostVersion) -> bool {
        if code.chars().count() != 3 {
            return false;
        }
        if !code.chars().all(|c| c.is_ascii_graphic() || c == ' ') {
            return false;
        }
        if code.chars().any(|c| DISALLOWED_RANDOM_CHARS.contains(&c)) {
            return false;
        }
        let chars: Vec<char> = code.chars().collect();
        if chars[0] == chars[1] || chars[1] == chars[2] || chars[0] == chars[2] {
            return false;
        }
        if Self::is_numeric(code, host) {
            return false;
        }
        if chars[0].eq_ignore_ascii_case(&'x') {
            return false;
        }
        if self.is_special(code, true) {
            return false;
        }
        if Self::is_universal_minefield_fcode(code, false, host) {
            return false;
        }
        true
    }

    /// `generateRandomCode`: emit a three-character code passing
    /// `is_allowed_random_code`. Random attempts first; when enough
    /// rejections pile up, falls back to a deterministic scan over the
    /// full candidate space so termination is guaranteed.
    pub fn generate_random_code(&self, rng: &mut impl RngCore, host: HostVersion) -> FriendlyCodeStr {
        let charset: Vec<char> = RANDOM_CHARSET.chars().collect();
        for _ in 0..2000 {
            let a = charset[(rng.next_u32() as usize) % charset.len()];
            let b = charset[(rng.next_u32() as usize) % charset.len()];
            let c = charset[(rng.next_u32() as usize) % charset.len()];
            let code: String = [a, b, c].iter().collect();
            if self.is_allowed_random_code(&code, host) {
                return code;
            }
        }
        for &a in &charset {
            for &b in &charset {
                for &c in &charset {
                    if a == b || b == c || a == c {
                        continue;
                    }
                    let code: String = [a, b, c].iter().collect();
                    if self.is_allowed_random_code(&code, host) {
                        return code;
                    }
                }
            }
        }
        unreachable!("some 3-distinct-alphanumeric code is always allowed")
    }

    /// `isAcceptedFriendlyCode`: the authoritative "can the player set this
    /// code on this object" predicate.
    pub fn is_accepted_friendly_code(
        &self,
        code: &str,
        filter: &Filter,
        key: &RegistrationKey,
        default_policy: DefaultPolicy,
    ) -> bool {
        match self.find_exact(code) {
            None => match default_policy {
                DefaultPolicy::Available => true,
                DefaultPolicy::Unavailable => false,
                DefaultPolicy::Registered => key.registered,
            },
            Some(fc) => {
                if fc.flags.prefix {
                    return false;
                }
                if fc.flags.registered && !key.registered {
                    return false;
                }
                if !fc.race_mask.allows(filter.owner) {
                    return false;
                }
                if fc.flags.allied && !filter.is_allied {
                    return false;
                }
                if fc.flags.unspecial {
                    return true;
                }
                match filter.kind {
                    ObjectKind::Ship => fc.flags.ship,
                    ObjectKind::Planet => fc.flags.planet,
                    ObjectKind::Base => fc.flags.base,
                }
            }
        }
    }

    /// Builds a sub-list containing every entry of `self` accepted under
    /// `filter`/`key` (equivalent to filtering by
    /// `is_accepted_friendly_code`).
    pub fn sublist(&self, filter: &Filter, key: &RegistrationKey) -> FriendlyCodeList {
        let master = self
            .master
            .iter()
            .filter(|fc| self.is_accepted_friendly_code(&fc.code, filter, key, DefaultPolicy::Unavailable))
            .cloned()
            .collect();
        FriendlyCodeList { master, extras: self.extras.clone() }
    }

    /// `pack`: flattens the list into presentation records, resolving
    /// `%N` placeholders against `players` (and escaping a literal `%` as
    /// `%%`, collapsing repeated substitution markers — supplemented from
    /// `original_source/server/play/friendlycodepacker.cpp`, see
    /// SPEC_FULL §7).
    pub fn pack(&self, players: &[(u8, String)]) -> Vec<PackedFriendlyCode> {
        self.master
            .iter()
            .map(|fc| PackedFriendlyCode {
                code: fc.code.clone(),
                flags: flags_to_string(&fc.flags, &fc.race_mask),
                race_mask: fc.race_mask,
                description: resolve_description(&fc.description, players),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedFriendlyCode {
    pub code: FriendlyCodeStr,
    pub flags: String,
    pub race_mask: RaceMask,
    pub description: String,
}

fn resolve_description(template: &str, players: &[(u8, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('%') => {
                chars.next();
                out.push('%');
            }
            Some(d) if d.is_ascii_digit() => {
                let mut digits = String::new();
                while let Some(d) = chars.peek().copied() {
                    if d.is_ascii_digit() {
                        digits.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let n: u8 = digits.parse().unwrap_or(0);
                match players.iter().find(|(id, _)| *id == n) {
                    Some((_, name)) => out.push_str(name),
                    None => {
                        out.push('%');
                        out.push_str(&digits);
                    }
                }
            }
            _ => out.push('%'),
        }
    }
    // collapse accidental doubled substitutions left by repeated markers
    while out.contains("  ") {
        out = out.replace("  ", " ");
    }
    out
}

fn flags_to_string(flags: &FriendlyCodeFlags, mask: &RaceMask) -> String {
    let mut s = String::new();
    if flags.ship {
        s.push('s');
    }
    if flags.planet {
        s.push('p');
    }
    if flags.base {
        s.push('b');
    }
    if flags.unspecial {
        s.push('u');
    }
    if flags.prefix {
        s.push('x');
    }
    if flags.registered {
        s.push('r');
    }
    if flags.allied {
        s.push('a');
    }
    if flags.capital_ship {
        s.push('c');
    }
    for player in 1..=11u8 {
        if mask.include & (1 << (player - 1)) != 0 {
            s.push_str(&format!("+{player}"));
        }
        if mask.exclude & (1 << (player - 1)) != 0 {
            s.push_str(&format!("-{player}"));
        }
    }
    s
}

fn parse_flags(field: &str) -> (FriendlyCodeFlags, RaceMask, Option<ParameterKind>) {
    let mut flags = FriendlyCodeFlags::default();
    let mut mask = RaceMask::default();
    let mut parameter = None;
    let mut chars = field.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            's' => flags.ship = true,
            'p' => flags.planet = true,
            'b' => flags.base = true,
            'u' => flags.unspecial = true,
            'x' => flags.prefix = true,
            'r' => flags.registered = true,
            'a' => flags.allied = true,
            'c' => flags.capital_ship = true,
            'i' => parameter = Some(ParameterKind::Intercept),
            't' => parameter = Some(ParameterKind::Tow),
            '+' | '-' => {
                let mut digits = String::new();
                while let Some(d) = chars.peek().copied() {
                    if d.is_ascii_digit() {
                        digits.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if let Ok(player) = digits.parse::<u8>() {
                    if c == '+' { mask.include(player) } else { mask.exclude(player) }
                }
            }
            c if c.is_whitespace() => {}
            _ => {}
        }
    }
    (flags, mask, parameter)
}

fn is_plain_three_digits(code: &str) -> bool {
    code.len() == 3 && code.chars().all(|c| c.is_ascii_digit())
}

fn is_phost_numeric(code: &str, host: HostVersion) -> bool {
    let at_least_408 = host.is_phost_at_least(HostVersion::PHOST_4_0_8);
    if let Some(core) = code.strip_prefix('-') {
        if !core.is_empty() && core.len() == code.len() - 1 && core.chars().all(|c| c.is_ascii_digit()) {
            if core.len() == 2 && code.len() == 3 {
                return true;
            }
            if at_least_408 && (1..=2).contains(&core.len()) {
                return true;
            }
        }
        return false;
    }
    let trimmed = code.trim();
    if at_least_408 && !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) && (1..=2).contains(&trimmed.len())
    {
        return true;
    }
    false
}

/// `code` matches `extra` as a blocked prefix only when `code` is at least as
/// long as `extra` — a short code must never match a longer extra just
/// because a symmetric shorter slice happens to agree.
fn extra_matches(extra: &str, code: &str, case_blind: bool) -> bool {
    if extra.is_empty() || code.len() < extra.len() {
        return false;
    }
    let candidate = &code[..extra.len()];
    if case_blind { extra.eq_ignore_ascii_case(candidate) } else { extra == candidate }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use std::io::Cursor;

    fn list_with_s1_fixture() -> FriendlyCodeList {
        let mut list = FriendlyCodeList::new();
        list.load_extra_codes(Cursor::new(b"E zot".as_slice()));
        list.add(FriendlyCode {
            code: "mkt".to_string(),
            flags: FriendlyCodeFlags { ship: true, ..Default::default() },
            race_mask: RaceMask::default(),
            description: "sc,make torps".to_string(),
            parameter: None,
        });
        list
    }

    #[test]
    fn s1_allowed_random_codes() {
        let list = list_with_s1_fixture();
        let phost_4_0_0 = HostVersion::PHost(4, 0, 0);
        assert!(list.is_allowed_random_code("abc", phost_4_0_0));
        assert!(!list.is_allowed_random_code("mkt", phost_4_0_0));
        assert!(!list.is_allowed_random_code("Elo", phost_4_0_0));
        assert!(!list.is_allowed_random_code("mf1", phost_4_0_0));
        assert!(!list.is_allowed_random_code("-19", phost_4_0_0));
        assert!(list.is_allowed_random_code("-19", HostVersion::Host(3, 2)));
    }

    #[test]
    fn s1_full_host_suite() {
        let list = list_with_s1_fixture();
        let host = HostVersion::PHost(4, 0, 0);
        assert!(list.is_allowed_random_code("01a", host));
        assert!(list.is_allowed_random_code("a01", host));
        assert!(list.is_allowed_random_code("0 1", host));
        assert!(list.is_allowed_random_code("zxy", host));
        assert!(list.is_allowed_random_code("0-1", host));
        assert!(!list.is_allowed_random_code("elo", host));
        assert!(!list.is_allowed_random_code("Zot", host));
        assert!(!list.is_allowed_random_code("zoT", host));
        assert!(list.is_allowed_random_code("zo ", host));
        assert!(!list.is_allowed_random_code("aab", host));
        assert!(!list.is_allowed_random_code("aba", host));
        assert!(!list.is_allowed_random_code("baa", host));
        assert!(!list.is_allowed_random_code("MFx", host));
        assert!(!list.is_allowed_random_code("xyz", host));
        assert!(!list.is_allowed_random_code("Xyz", host));
        assert!(!list.is_allowed_random_code("000", host));
        assert!(!list.is_allowed_random_code("012", host));
        assert!(!list.is_allowed_random_code("-19", host));
        assert!(!list.is_allowed_random_code("?xy", host));
        assert!(!list.is_allowed_random_code("#xy", host));
        assert!(!list.is_allowed_random_code("", host));
        assert!(!list.is_allowed_random_code("a", host));
        assert!(!list.is_allowed_random_code("abcd", host));
    }

    #[test]
    fn is_numeric_matches_original_source_matrix() {
        let default_host = HostVersion::Host(0, 0);
        assert!(FriendlyCodeList::is_numeric("000", default_host));
        assert!(!FriendlyCodeList::is_numeric("00x", default_host));
        assert!(!FriendlyCodeList::is_numeric("+00", default_host));

        let tim = HostVersion::Host(3, 22);
        assert!(!FriendlyCodeList::is_numeric("-11", tim));
        assert_eq!(FriendlyCodeList::get_numeric_value("-11", tim), 1000);

        let phost_400 = HostVersion::PHost(4, 0, 0);
        assert!(FriendlyCodeList::is_numeric("-11", phost_400));
        assert_eq!(FriendlyCodeList::get_numeric_value("-11", phost_400), -11);
        assert!(!FriendlyCodeList::is_numeric("1", phost_400));

        let phost_408 = HostVersion::PHost(4, 0, 8);
        assert!(FriendlyCodeList::is_numeric("1", phost_408));
        assert_eq!(FriendlyCodeList::get_numeric_value(" 1 ", phost_408), 1);
        assert!(!FriendlyCodeList::is_numeric("-  ", phost_408));
    }

    #[test]
    fn generated_codes_are_always_allowed_and_seed_dependent() {
        let list = list_with_s1_fixture();
        let host = HostVersion::PHost(4, 0, 0);
        let mut rng1 = SmallRng::seed_from_u64(1);
        let mut rng2 = SmallRng::seed_from_u64(2);
        let a = list.generate_random_code(&mut rng1, host);
        let b = list.generate_random_code(&mut rng2, host);
        assert!(list.is_allowed_random_code(&a, host));
        assert!(list.is_allowed_random_code(&b, host));
        assert_ne!(a, b);
    }

    #[test]
    fn extra_codes_are_not_truncated_to_three_characters() {
        let mut list = FriendlyCodeList::new();
        list.load_extra_codes(Cursor::new(b"ab\nz\npppp\ne f".as_slice()));

        assert!(list.is_special("ab", true));
        assert!(list.is_special("abc", true));
        assert!(list.is_special("z", true));
        assert!(!list.is_special("ZZ", false));
        assert!(list.is_special("ZZ", true));
        assert!(!list.is_special("ppp", true), "no truncation to 3 characters");
        assert!(list.is_special("pppp", true));
        assert!(list.is_special("e", true));
        assert!(list.is_special("e11", true));
        assert!(list.is_special("fff", true));
    }

    #[test]
    fn sublist_is_closed_under_accepted_predicate() {
        let list = list_with_s1_fixture();
        let filter = Filter { kind: ObjectKind::Ship, owner: 3, is_allied: false };
        let key = RegistrationKey::default();
        let sub = list.sublist(&filter, &key);
        for fc in &sub.master {
            assert!(sub.is_accepted_friendly_code(&fc.code, &filter, &key, DefaultPolicy::Unavailable));
        }
    }
}
