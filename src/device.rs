//! Best-effort device classification from the User-Agent header.
//!
//! The output is an untrusted hint used by the login policy, not a
//! security boundary. Family detection is ordered so Chromium-derived
//! browsers that ship their own token (Edge, Opera) are named before
//! the generic Chrome match.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::DeviceType;

static MOBILE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)mobile").expect("mobile regex is valid"));

/// Classification result; the caller supplies the IP separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    // ---
    pub browser: String,
    pub os: String,
    pub device_type: DeviceType,
}

/// Extract coarse browser/OS/device signals from a raw User-Agent string.
pub fn classify(user_agent: &str) -> Classification {
    // ---
    let device_type = if MOBILE_RE.is_match(user_agent) {
        DeviceType::Mobile
    } else {
        DeviceType::Desktop
    };

    Classification {
        browser: browser_family(user_agent).to_string(),
        os: os_family(user_agent).to_string(),
        device_type,
    }
}

fn browser_family(ua: &str) -> &'static str {
    // ---
    // Order matters: Edge and Opera UAs also contain "Chrome", and every
    // Chromium UA contains "Safari".
    if ua.contains("Edg/") || ua.contains("Edge/") {
        "Edge"
    } else if ua.contains("OPR/") || ua.contains("Opera") {
        "Opera"
    } else if ua.contains("Firefox/") {
        "Firefox"
    } else if ua.contains("Chrome/") || ua.contains("CriOS/") {
        "Chrome"
    } else if ua.contains("Safari/") {
        "Safari"
    } else {
        "Unknown"
    }
}

fn os_family(ua: &str) -> &'static str {
    // ---
    if ua.contains("Windows") {
        "Windows"
    } else if ua.contains("Android") {
        "Android"
    } else if ua.contains("iPhone") || ua.contains("iPad") {
        "iOS"
    } else if ua.contains("Mac OS X") {
        "macOS"
    } else if ua.contains("Linux") {
        "Linux"
    } else {
        "Unknown"
    }
}
