//! Pin set and the thumbprint trust decision.

use super::thumbprint::thumbprint;

/// Host prefix covering github.com and its subdomains.
const GITHUB: &str = "https://github";
/// Host prefix of the storage bucket GitHub serves release assets from.
const GITHUB_RELEASE_ASSETS: &str = "https://github-production-release-asset";

/// A single pinned thumbprint, valid only for request hosts that start with `host_prefix`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pin {
    /// Scheme + authority prefix, e.g. `https://github`. Stored lowercase.
    pub host_prefix: String,
    /// SHA-1 thumbprint of the DER certificate. Stored as uppercase hex.
    pub thumbprint: String,
}

impl Pin {
    pub fn new(host_prefix: impl AsRef<str>, thumbprint: impl AsRef<str>) -> Self {
        Self {
            host_prefix: host_prefix.as_ref().trim().to_ascii_lowercase(),
            thumbprint: thumbprint.as_ref().trim().to_ascii_uppercase(),
        }
    }

    fn applies_to(&self, request_host: &str) -> bool {
        request_host.starts_with(&self.host_prefix)
    }
}

/// Ordered, immutable set of pins. Several pins may share a host prefix
/// (primary and backup certificates during rotation).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PinSet {
    pins: Vec<Pin>,
}

impl PinSet {
    pub fn new(pins: impl IntoIterator<Item = Pin>) -> Self {
        Self {
            pins: pins.into_iter().collect(),
        }
    }

    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    pub fn len(&self) -> usize {
        self.pins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    /// True if at least one pin's prefix matches `request_host`.
    pub fn covers_host(&self, request_host: &str) -> bool {
        self.pins.iter().any(|p| p.applies_to(request_host))
    }

    /// True if `thumbprint` is pinned for `request_host`. Comparison ignores case.
    pub fn is_pinned(&self, thumbprint: &str, request_host: &str) -> bool {
        self.pins
            .iter()
            .filter(|p| p.applies_to(request_host))
            .any(|p| p.thumbprint.eq_ignore_ascii_case(thumbprint))
    }

    /// Decides whether a server certificate is trusted for `request_host`.
    ///
    /// Returns true only when the chain validated cleanly, a chain and
    /// certificate are present, the host is covered by the pin set, and the
    /// certificate's SHA-1 thumbprint is one of the pins for that host.
    /// Hosts without a matching prefix are rejected outright.
    pub fn validate(
        &self,
        certificate: Option<&[u8]>,
        chain_has_errors: bool,
        chain_present: bool,
        request_host: &str,
    ) -> bool {
        if chain_has_errors || !chain_present {
            return false;
        }
        let Some(der) = certificate else {
            return false;
        };
        if !self.covers_host(request_host) {
            tracing::warn!(host = request_host, "no pins configured for host, rejecting certificate");
            return false;
        }

        let presented = thumbprint(der);
        let pinned = self.is_pinned(&presented, request_host);
        if pinned {
            tracing::debug!(host = request_host, thumbprint = %presented, "certificate thumbprint pinned");
        } else {
            tracing::warn!(host = request_host, thumbprint = %presented, "certificate thumbprint not pinned");
        }
        pinned
    }
}

impl FromIterator<Pin> for PinSet {
    fn from_iter<I: IntoIterator<Item = Pin>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Compiled-in pins. Update these when the servers rotate their certificates.
///
/// Note that the release-asset prefix also starts with the GitHub prefix, so
/// asset hosts accept the GitHub pins as well as their own.
pub fn default_pins() -> PinSet {
    PinSet::new([
        // github.com primary, https://crt.sh/?id=455589305
        Pin::new(GITHUB, "CA06F56B258B7A0D4F2B05470939478651151984"),
        // github.com backup, https://crt.sh/?id=449619899
        Pin::new(GITHUB, "BC68654504238483E464AE83A989A8E466257671"),
        // *.s3.amazonaws.com primary, https://crt.sh/?id=949340748
        Pin::new(GITHUB_RELEASE_ASSETS, "17E0A93E58AF0A068D6C2DB6C180B3E7E352D48E"),
        // *.s3.amazonaws.com backup, https://crt.sh/?id=927633594
        Pin::new(GITHUB_RELEASE_ASSETS, "3070C15E74246B57D2ABB2A8435528322F5DCF74"),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    /// SHA-1 of the empty input.
    const EMPTY_SHA1: &str = "DA39A3EE5E6B4B0D3255BFEF95601890AFD80709";
    /// SHA-1 of b"abc".
    const ABC_SHA1: &str = "A9993E364706816ABA3E25717850C26C9CD0D89D";

    fn github_pins() -> PinSet {
        PinSet::new([
            Pin::new("https://github", EMPTY_SHA1),
            Pin::new("https://github", ABC_SHA1),
        ])
    }

    #[test]
    fn backup_pin_accepted_for_matching_host() {
        let pins = github_pins();
        assert!(pins.validate(Some(&b"abc"[..]), false, true, "https://github.com/x"));
        assert!(pins.validate(Some(&b""[..]), false, true, "https://github.com"));
    }

    #[test]
    fn same_certificate_rejected_for_other_host() {
        let pins = github_pins();
        assert!(!pins.validate(Some(&b"abc"[..]), false, true, "https://evil.com"));
    }

    #[test]
    fn each_negative_condition_flips_result() {
        let pins = github_pins();
        let host = "https://github.com";
        assert!(pins.validate(Some(&b"abc"[..]), false, true, host));

        assert!(!pins.validate(Some(&b"abc"[..]), true, true, host), "chain errors");
        assert!(!pins.validate(Some(&b"abc"[..]), false, false, host), "chain absent");
        assert!(!pins.validate(None, false, true, host), "certificate absent");
        assert!(!pins.validate(Some(&b"abc"[..]), false, true, "https://gitlab.com"), "host not pinned");
        assert!(!pins.validate(Some(&b"abcd"[..]), false, true, host), "thumbprint not pinned");
    }

    #[test]
    fn pins_are_host_scoped() {
        let pins = PinSet::new([
            Pin::new("https://github", ABC_SHA1),
            Pin::new("https://example.org", EMPTY_SHA1),
        ]);
        assert!(pins.validate(Some(&b""[..]), false, true, "https://example.org"));
        assert!(!pins.validate(Some(&b""[..]), false, true, "https://github.com"));
        assert!(!pins.validate(Some(&b"abc"[..]), false, true, "https://example.org"));
    }

    #[test]
    fn thumbprint_comparison_ignores_case() {
        let pins = PinSet::new([Pin::new("https://github", ABC_SHA1.to_lowercase())]);
        assert_eq!(pins.pins()[0].thumbprint, ABC_SHA1);
        assert!(pins.is_pinned(&ABC_SHA1.to_lowercase(), "https://github.com"));
    }

    #[test]
    fn scheme_is_part_of_prefix() {
        let pins = github_pins();
        assert!(!pins.validate(Some(&b"abc"[..]), false, true, "http://github.com"));
    }

    #[test]
    fn empty_pin_set_trusts_nothing() {
        let pins = PinSet::default();
        assert!(pins.is_empty());
        assert!(!pins.validate(Some(&b"abc"[..]), false, true, "https://github.com"));
    }

    #[test]
    fn default_pins_cover_github_and_release_assets() {
        let pins = default_pins();
        assert_eq!(pins.len(), 4);
        assert!(pins.covers_host("https://github.com"));
        assert!(pins.covers_host("https://github-production-release-asset-2e65be.s3.amazonaws.com"));
        assert!(!pins.covers_host("https://s3.amazonaws.com"));
        assert!(pins.is_pinned("CA06F56B258B7A0D4F2B05470939478651151984", "https://github.com"));
        assert!(!pins.is_pinned("17E0A93E58AF0A068D6C2DB6C180B3E7E352D48E", "https://github.com"));
    }
}
