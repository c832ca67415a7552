use std::net::IpAddr;

use crate::{db_types::Order, trust::Rejection};

/// A notification as it arrived at the notify endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationRequest {
    /// The raw, form-encoded request body
    pub raw_body: String,
    /// The client IP, taken from whichever request attribute the deployment trusts for it
    pub source_ip: Option<String>,
}

impl NotificationRequest {
    pub fn new<S: Into<String>>(raw_body: S, source_ip: Option<String>) -> Self {
        Self { raw_body: raw_body.into(), source_ip }
    }

    /// The source IP in canonical form, if it is an IP address at all
    pub fn canonical_ip(&self) -> Option<String> {
        self.source_ip.as_deref().and_then(|ip| ip.trim().parse::<IpAddr>().ok()).map(|ip| ip.to_string())
    }
}

/// What happened to a notification. In every case the order has already been updated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationOutcome {
    Accepted(Order),
    Rejected { order: Order, rejection: Rejection },
    /// The notification could not be confirmed right now. The gateway should send it again.
    Inconclusive { order: Order, rejection: Rejection },
}

impl NotificationOutcome {
    pub fn order(&self) -> &Order {
        match self {
            Self::Accepted(order) => order,
            Self::Rejected { order, .. } | Self::Inconclusive { order, .. } => order,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn canonical_ip() {
        let req = NotificationRequest::new("", Some(" 197.97.145.145 ".into()));
        assert_eq!(req.canonical_ip().as_deref(), Some("197.97.145.145"));
        let req = NotificationRequest::new("", Some("unknown".into()));
        assert_eq!(req.canonical_ip(), None);
        assert_eq!(NotificationRequest::default().canonical_ip(), None);
    }
}
