//! Step-by-step terminal labs: each step is completed by one exact command.
//!
//! Commands compare case-insensitively after trimming. Steps must be done in
//! order; only the current step's command is accepted.

use serde::Serialize;

use super::{Lab, LabCore, LabKind};

#[derive(Debug)]
pub struct GuidedStep {
    pub key: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub command: &'static str,
    pub hint: &'static str,
    pub success: &'static str,
    pub points: u32,
}

const SYSTEM_HARDENING: &[GuidedStep] = &[
    GuidedStep {
        key: "system_info",
        title: "System Information Gathering",
        description: "Gather information about the system to understand what needs to be hardened.",
        command: "uname -a",
        hint: "Use 'uname -a' to display system information",
        success: "Great! You've gathered system information. This helps identify the OS version and architecture.",
        points: 20,
    },
    GuidedStep {
        key: "running_services",
        title: "Check Running Services",
        description: "Identify all running services to see what might be unnecessary or vulnerable.",
        command: "systemctl list-units --type=service --state=running",
        hint: "Use 'systemctl list-units --type=service --state=running' to see active services",
        success: "Excellent! You can see all running services. Unnecessary services should be disabled.",
        points: 25,
    },
    GuidedStep {
        key: "update_packages",
        title: "Update System Packages",
        description: "Keep the system updated with the latest security patches.",
        command: "sudo apt update && sudo apt upgrade -y",
        hint: "Use 'sudo apt update && sudo apt upgrade -y' to update all packages",
        success: "Perfect! System packages are now updated with latest security patches.",
        points: 30,
    },
    GuidedStep {
        key: "firewall",
        title: "Configure Firewall",
        description: "Enable and configure the firewall to control network traffic.",
        command: "sudo ufw enable",
        hint: "Use 'sudo ufw enable' to activate the firewall",
        success: "Great! Firewall is now active and protecting your system.",
        points: 25,
    },
    GuidedStep {
        key: "disable_services",
        title: "Disable Unnecessary Services",
        description: "Disable services that are not needed to reduce attack surface.",
        command: "sudo systemctl disable telnet",
        hint: "Use 'sudo systemctl disable telnet' to disable the insecure telnet service",
        success: "Excellent! You've disabled an insecure service, reducing the attack surface.",
        points: 30,
    },
    GuidedStep {
        key: "password_policy",
        title: "Set Strong Password Policy",
        description: "Configure password complexity requirements for better security.",
        command: "sudo nano /etc/pam.d/common-password",
        hint: "Use 'sudo nano /etc/pam.d/common-password' to edit password policy",
        success: "Perfect! Strong password policies help prevent brute force attacks.",
        points: 20,
    },
];

const WEB_APP_TESTING: &[GuidedStep] = &[
    GuidedStep {
        key: "reconnaissance",
        title: "Reconnaissance & Information Gathering",
        description: "Start by gathering information about the target web application.",
        command: "nmap -sV -p 80,443 target.webapp.local",
        hint: "Use 'nmap -sV -p 80,443 target.webapp.local' to scan web ports",
        success: "Great! You've identified open web services. Found Apache 2.4.41 on port 80.",
        points: 20,
    },
    GuidedStep {
        key: "directory_discovery",
        title: "Directory and File Discovery",
        description: "Discover hidden directories and files that might contain sensitive information.",
        command: "dirb http://target.webapp.local /usr/share/dirb/wordlists/common.txt",
        hint: "Use 'dirb http://target.webapp.local /usr/share/dirb/wordlists/common.txt' to find directories",
        success: "Excellent! Found several directories: /admin, /backup, /config. These need investigation.",
        points: 25,
    },
    GuidedStep {
        key: "tls_assessment",
        title: "SSL/TLS Security Assessment",
        description: "Test the SSL/TLS configuration for security weaknesses.",
        command: "sslscan target.webapp.local:443",
        hint: "Use 'sslscan target.webapp.local:443' to analyze SSL configuration",
        success: "Good! SSL scan reveals weak cipher suites and outdated TLS versions.",
        points: 25,
    },
    GuidedStep {
        key: "vulnerability_scan",
        title: "Web Application Vulnerability Scanning",
        description: "Use automated tools to identify common web vulnerabilities.",
        command: "nikto -h http://target.webapp.local",
        hint: "Use 'nikto -h http://target.webapp.local' to scan for web vulnerabilities",
        success: "Perfect! Nikto found multiple vulnerabilities including outdated software and misconfigurations.",
        points: 30,
    },
    GuidedStep {
        key: "sql_injection",
        title: "SQL Injection Testing",
        description: "Test input fields for SQL injection vulnerabilities.",
        command: "sqlmap -u 'http://target.webapp.local/login.php' --forms --batch",
        hint: "Use 'sqlmap -u 'http://target.webapp.local/login.php' --forms --batch' to test for SQL injection",
        success: "Critical finding! SQL injection vulnerability detected in login form.",
        points: 35,
    },
    GuidedStep {
        key: "xss",
        title: "Cross-Site Scripting (XSS) Testing",
        description: "Test for XSS vulnerabilities in user input fields.",
        command: "xsser -u 'http://target.webapp.local/search.php?q=test'",
        hint: "Use 'xsser -u 'http://target.webapp.local/search.php?q=test'' to test for XSS",
        success: "XSS vulnerability confirmed! The search parameter is vulnerable to script injection.",
        points: 35,
    },
];

const SYSTEM_HARDENING_SUMMARY: &[&str] = &[
    "You have successfully hardened the Linux system by:",
    "✓ Gathering system information",
    "✓ Updating system packages",
    "✓ Configuring firewall protection",
    "✓ Disabling unnecessary services",
    "✓ Setting strong password policies",
];

const WEB_APP_TESTING_SUMMARY: &[&str] = &[
    "📊 VULNERABILITY ASSESSMENT REPORT",
    "==================================",
    "Critical Vulnerabilities Found:",
    "• SQL Injection in login form",
    "• Cross-Site Scripting (XSS) in search",
    "• Weak SSL/TLS configuration",
    "• Exposed sensitive directories",
    "🚨 Immediate Actions Required:",
    "1. Patch SQL injection vulnerabilities",
    "2. Implement input validation and output encoding",
    "3. Update SSL/TLS configuration",
    "4. Secure exposed directories",
    "5. Update outdated software components",
];

fn total_points(steps: &[GuidedStep]) -> u32 {
    steps.iter().map(|s| s.points).sum()
}

pub(super) fn system_hardening_max_score() -> u32 {
    total_points(SYSTEM_HARDENING)
}

pub(super) fn web_app_testing_max_score() -> u32 {
    total_points(WEB_APP_TESTING)
}

/// A vulnerability recorded by a completed web-app-testing step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub step: usize,
    pub title: &'static str,
    pub severity: &'static str,
}

impl Finding {
    fn for_step(index: usize, step: &GuidedStep) -> Self {
        let severity = match index {
            i if i >= 4 => "Critical",
            i if i >= 2 => "High",
            _ => "Medium",
        };
        Self {
            step: index + 1,
            title: step.title,
            severity,
        }
    }
}

#[derive(Debug)]
pub struct GuidedLab {
    kind: LabKind,
    steps: &'static [GuidedStep],
    summary: &'static [&'static str],
    core: LabCore,
    current_step: usize,
    /// `Some` for labs that record findings.
    findings: Option<Vec<Finding>>,
}

impl GuidedLab {
    fn build(
        kind: LabKind,
        steps: &'static [GuidedStep],
        summary: &'static [&'static str],
        findings: Option<Vec<Finding>>,
    ) -> Self {
        let checkpoints: Vec<_> = steps.iter().map(|s| (s.key, s.title)).collect();
        Self {
            kind,
            steps,
            summary,
            core: LabCore::new(&checkpoints),
            current_step: 0,
            findings,
        }
    }

    pub fn system_hardening() -> Self {
        Self::build(
            LabKind::SystemHardening,
            SYSTEM_HARDENING,
            SYSTEM_HARDENING_SUMMARY,
            None,
        )
    }

    pub fn web_app_testing() -> Self {
        Self::build(
            LabKind::WebAppTesting,
            WEB_APP_TESTING,
            WEB_APP_TESTING_SUMMARY,
            Some(Vec::new()),
        )
    }

    pub fn steps(&self) -> &'static [GuidedStep] {
        self.steps
    }

    fn step_banner(&self, index: usize) -> [String; 2] {
        let step = &self.steps[index];
        [
            format!("Step {}/{}: {}", index + 1, self.steps.len(), step.title),
            step.description.to_string(),
        ]
    }

    fn complete_current(&mut self) -> Vec<String> {
        let index = self.current_step;
        let steps = self.steps;
        let step = &steps[index];
        let mut out = vec![
            format!("✅ {}", step.success),
            format!("🎯 Points earned: {}", step.points),
        ];

        self.core.check(step.key);
        self.core.score += step.points;
        if let Some(findings) = self.findings.as_mut() {
            findings.push(Finding::for_step(index, step));
        }

        if index + 1 < self.steps.len() {
            self.current_step += 1;
            out.extend(self.step_banner(self.current_step));
            self.core.info(step.success);
        } else {
            self.core.completed = true;
            out.push(format!("🎉 {} Lab Completed!", self.kind.title()));
            out.push(format!(
                "🏆 Final Score: {}/{} points",
                self.core.score,
                total_points(self.steps)
            ));
            out.extend(self.summary.iter().map(|l| l.to_string()));
            self.core
                .success(format!("{} lab completed!", self.kind.title()));
        }
        out
    }

    fn help(&self) -> Vec<String> {
        let mut out = vec![
            "Available commands:".to_string(),
            "• hint - Get a hint for the current step".into(),
            "• help - Show this help message".into(),
            "• clear - Clear the terminal".into(),
        ];
        if self.findings.is_some() {
            out.push("• report - Show current findings".into());
        }
        out
    }
}

impl Lab for GuidedLab {
    fn kind(&self) -> LabKind {
        self.kind
    }

    fn core(&self) -> &LabCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut LabCore {
        &mut self.core
    }

    fn boot_lines(&self) -> Vec<String> {
        self.step_banner(0).into()
    }

    fn handle(&mut self, input: &str) -> Vec<String> {
        let cmd = input.trim();
        let lower = cmd.to_lowercase();
        let expected = self.steps[self.current_step].command.to_lowercase();

        let output = if !self.core.completed && lower == expected {
            self.complete_current()
        } else {
            match lower.as_str() {
                "hint" => vec![format!("💡 Hint: {}", self.steps[self.current_step].hint)],
                "help" => self.help(),
                "clear" => {
                    self.core.log.clear();
                    return Vec::new();
                }
                "report" if self.findings.is_some() => {
                    let mut out = vec!["📋 Current Vulnerability Findings:".to_string()];
                    out.extend(self.findings.iter().flatten().enumerate().map(|(i, f)| {
                        format!("{}. {} - Severity: {}", i + 1, f.title, f.severity)
                    }));
                    out
                }
                _ => vec![
                    "❌ Incorrect command. Type 'hint' for help or 'help' for available commands."
                        .to_string(),
                ],
            }
        };

        self.core.append_log(format!("$ {cmd}"));
        self.core.log.extend(output.iter().cloned());
        output
    }

    fn details(&self) -> serde_json::Value {
        serde_json::json!({
            "current_step": self.current_step + 1,
            "total_steps": self.steps.len(),
            "findings": self.findings,
        })
    }
}
