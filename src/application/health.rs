//! One-shot endpoint health reporting.

use crate::config::RunConfig;
use crate::port::{ProbeStatus, ServerClient};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Unhealthy(String),
}

#[derive(Debug, Clone)]
pub struct HealthCheck {
    name: String,
    url: String,
    critical: bool,
    status: HealthStatus,
}

impl HealthCheck {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn critical(&self) -> bool {
        self.critical
    }

    pub fn status(&self) -> &HealthStatus {
        &self.status
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self.status, HealthStatus::Healthy)
    }
}

#[derive(Debug, Clone)]
pub struct HealthReport {
    checks: Vec<HealthCheck>,
}

impl HealthReport {
    pub fn checks(&self) -> &[HealthCheck] {
        &self.checks
    }

    pub fn is_healthy(&self) -> bool {
        self.checks
            .iter()
            .filter(|check| check.critical())
            .all(HealthCheck::is_healthy)
    }
}

/// Probe the router and every worker target once.
///
/// The router only counts as critical on a prefill node.
pub async fn health_check(config: &RunConfig, client: &dyn ServerClient) -> HealthReport {
    let mut checks = Vec::new();

    let router = config.router.base_url();
    let status = client.probe_health(&router).await;
    checks.push(HealthCheck {
        name: "router".to_string(),
        critical: config.mode.is_prefill(),
        status: to_health(&status),
        url: router,
    });

    for address in config.worker_targets() {
        let url = address.base_url();
        let status = client.probe_health(&url).await;
        checks.push(HealthCheck {
            name: format!("{} {}", address.role(), address),
            critical: true,
            status: to_health(&status),
            url,
        });
    }

    HealthReport { checks }
}

fn to_health(status: &ProbeStatus) -> HealthStatus {
    if status.is_healthy() {
        HealthStatus::Healthy
    } else {
        HealthStatus::Unhealthy(format!("status {status}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::client::RecordingClient;
    use crate::testkit::config::run_config;

    #[test]
    fn health_check_struct_accessors() {
        let check = HealthCheck {
            name: "router".to_string(),
            url: "http://127.0.0.1:8000".to_string(),
            critical: true,
            status: HealthStatus::Healthy,
        };

        assert_eq!(check.name(), "router");
        assert_eq!(check.url(), "http://127.0.0.1:8000");
        assert!(check.critical());
        assert!(check.is_healthy());
    }

    #[test]
    fn health_report_ignores_non_critical_failures() {
        let report = HealthReport {
            checks: vec![
                HealthCheck {
                    name: "router".to_string(),
                    url: String::new(),
                    critical: false,
                    status: HealthStatus::Unhealthy("status 000".to_string()),
                },
                HealthCheck {
                    name: "decode 10.0.1.1:30000".to_string(),
                    url: String::new(),
                    critical: true,
                    status: HealthStatus::Healthy,
                },
            ],
        };

        assert!(report.is_healthy());
    }

    #[tokio::test]
    async fn router_is_critical_only_in_prefill_mode() {
        let client = RecordingClient::new().never_healthy("http://127.0.0.1:8000");

        let decode = run_config(&[("PROFILING_MODE", "decode")]);
        let report = health_check(&decode, &client).await;
        assert!(report.is_healthy());

        let prefill = run_config(&[
            ("PROFILING_MODE", "prefill"),
            ("PROFILE_ISL", "1"),
            ("PROFILE_OSL", "1"),
        ]);
        let report = health_check(&prefill, &client).await;
        assert!(!report.is_healthy());
    }

    #[tokio::test]
    async fn unhealthy_worker_fails_report() {
        let client = RecordingClient::new().healthy_after("http://10.0.0.2:30000", 1);
        let config = run_config(&[("PROFILE_PREFILL_IPS", "10.0.0.1,10.0.0.2")]);

        let report = health_check(&config, &client).await;

        let names: Vec<&str> = report.checks().iter().map(HealthCheck::name).collect();
        assert_eq!(
            names,
            vec!["router", "prefill 10.0.0.1:30000", "prefill 10.0.0.2:30000"]
        );
        assert!(!report.is_healthy());
        assert_eq!(
            report.checks()[2].status(),
            &HealthStatus::Unhealthy("status 503".to_string())
        );
    }
}
