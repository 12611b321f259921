//! Coarse device fingerprinting from user-agent strings.

use std::fmt;

/// A coarse device fingerprint: OS family and browser family only.
///
/// Deliberately coarse so that browser upgrades and minor version
/// churn do not look like new devices.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceFingerprint {
    /// Operating system family, e.g. `Windows`.
    pub os_family: &'static str,
    /// Browser family, e.g. `Chrome`.
    pub browser_family: &'static str,
}

impl DeviceFingerprint {
    /// Derives a fingerprint from a raw user-agent string.
    pub fn from_user_agent(user_agent: &str) -> Self {
        Self {
            os_family: os_family(user_agent),
            browser_family: browser_family(user_agent),
        }
    }
}

impl fmt::Display for DeviceFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os_family, self.browser_family)
    }
}

/// Extracts the OS family.
///
/// iOS is checked before macOS because iPhone and iPad user agents
/// contain "like Mac OS X"; Android before Linux for the same reason.
fn os_family(user_agent: &str) -> &'static str {
    if user_agent.contains("Windows") {
        "Windows"
    } else if user_agent.contains("iPhone") || user_agent.contains("iPad") {
        "iOS"
    } else if user_agent.contains("Mac OS") || user_agent.contains("Macintosh") {
        "macOS"
    } else if user_agent.contains("Android") {
        "Android"
    } else if user_agent.contains("Linux") {
        "Linux"
    } else {
        "Other"
    }
}

/// Extracts the browser family.
///
/// Edge and Opera are checked before Chrome, and Chrome before
/// Safari, because Chromium-based browsers carry the upstream product
/// tokens in their user agents.
fn browser_family(user_agent: &str) -> &'static str {
    if user_agent.contains("Edg") {
        "Edge"
    } else if user_agent.contains("OPR") || user_agent.contains("Opera") {
        "Opera"
    } else if user_agent.contains("Firefox") {
        "Firefox"
    } else if user_agent.contains("Chrome") {
        "Chrome"
    } else if user_agent.contains("Safari") {
        "Safari"
    } else {
        "Other"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOWS_CHROME: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                                  (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";
    const MAC_SAFARI: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
                              AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15";
    const IPHONE_SAFARI: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) \
                                 AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 \
                                 Mobile/15E148 Safari/604.1";
    const WINDOWS_EDGE: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                                (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36 Edg/126.0.0.0";
    const ANDROID_FIREFOX: &str =
        "Mozilla/5.0 (Android 14; Mobile; rv:127.0) Gecko/127.0 Firefox/127.0";

    #[test]
    fn recognizes_common_user_agents() {
        assert_eq!(
            DeviceFingerprint::from_user_agent(WINDOWS_CHROME).to_string(),
            "Windows-Chrome"
        );
        assert_eq!(
            DeviceFingerprint::from_user_agent(MAC_SAFARI).to_string(),
            "macOS-Safari"
        );
        assert_eq!(
            DeviceFingerprint::from_user_agent(ANDROID_FIREFOX).to_string(),
            "Android-Firefox"
        );
    }

    #[test]
    fn iphone_is_ios_despite_mac_token() {
        assert_eq!(
            DeviceFingerprint::from_user_agent(IPHONE_SAFARI).to_string(),
            "iOS-Safari"
        );
    }

    #[test]
    fn edge_is_not_chrome() {
        assert_eq!(
            DeviceFingerprint::from_user_agent(WINDOWS_EDGE).to_string(),
            "Windows-Edge"
        );
    }

    #[test]
    fn unknown_agent_is_other() {
        assert_eq!(
            DeviceFingerprint::from_user_agent("curl/8.5.0").to_string(),
            "Other-Other"
        );
    }

    #[test]
    fn version_churn_keeps_the_same_fingerprint() {
        let upgraded = WINDOWS_CHROME.replace("126.0.0.0", "127.0.6533.88");
        assert_eq!(
            DeviceFingerprint::from_user_agent(WINDOWS_CHROME),
            DeviceFingerprint::from_user_agent(&upgraded)
        );
    }
}
