//! Client metadata recorded with each session

/// Longest user-agent string kept on a session
pub const MAX_DEVICE_INFO_LEN: usize = 200;

/// Device and address a refresh token was issued to
///
/// Both fields are informational only and never take part in token checks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientInfo {
    pub device_info: Option<String>,
    pub ip_address: Option<String>,
}

impl ClientInfo {
    /// Normalize raw client metadata
    ///
    /// Blank values become `None`; `device_info` is cut to
    /// `MAX_DEVICE_INFO_LEN` characters.
    pub fn new(device_info: Option<String>, ip_address: Option<String>) -> Self {
        Self {
            device_info: non_blank(device_info)
                .map(|d| d.chars().take(MAX_DEVICE_INFO_LEN).collect()),
            ip_address: non_blank(ip_address).map(|ip| ip.trim().to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.device_info.is_none() && self.ip_address.is_none()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
