//! The documentation page tree.
//!
//! Each section maps a folder under the templates directory to a section
//! page, and each `(file stem, title)` pair maps `<folder>/<stem>.md` to a
//! child page. Order is display order under the `children` macro.

/// One top-level section and its child pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    /// Folder name under the templates directory.
    pub key: &'static str,
    /// Section page title (without project prefix).
    pub title: &'static str,
    /// `(file stem, page title)` pairs in display order.
    pub pages: &'static [(&'static str, &'static str)],
}

impl Section {
    /// Whether the section passes an optional folder-name substring filter.
    #[must_use]
    pub fn matches(&self, filter: Option<&str>) -> bool {
        filter.is_none_or(|f| self.key.contains(f))
    }
}

/// Sections imported by default.
pub const PAGE_HIERARCHY: &[Section] = &[
    Section {
        key: "01-project-overview",
        title: "01 - Project Overview",
        pages: &[
            ("project-charter", "Project Charter"),
            ("stakeholders-raci", "Stakeholders & RACI Matrix"),
            ("project-glossary", "Project Glossary"),
        ],
    },
    Section {
        key: "02-solution-architecture",
        title: "02 - Solution Architecture",
        pages: &[
            ("architecture-overview-hld", "Architecture Overview (HLD)"),
            ("low-level-design", "Low-Level Design (LLD)"),
            ("data-architecture", "Data Architecture"),
            ("integration-architecture", "Integration Architecture"),
            ("adr-template", "Architecture Decision Records (ADRs)"),
        ],
    },
    Section {
        key: "03-security",
        title: "03 - Security",
        pages: &[
            ("threat-model", "Threat Model"),
            ("security-review-checklist", "Security Review Checklist"),
            ("data-classification", "Data Classification"),
        ],
    },
    Section {
        key: "04-approval-gates",
        title: "04 - Approval Gates",
        pages: &[
            ("gate-1-design-review", "Gate 1 - Design Review"),
            (
                "gate-2-architecture-review-board",
                "Gate 2 - Architecture Review Board (ARB)",
            ),
            ("gate-3-security-review", "Gate 3 - Security Review"),
            (
                "gate-4-change-advisory-board",
                "Gate 4 - Change Advisory Board (CAB)",
            ),
            ("gate-5-go-no-go-checklist", "Gate 5 - Go / No-Go Checklist"),
        ],
    },
    Section {
        key: "05-cicd-pipeline",
        title: "05 - CI/CD Pipeline",
        pages: &[
            ("github-actions-overview", "GitHub Actions Overview"),
            ("build-pipeline", "Build Pipeline"),
            ("release-pipeline", "Release Pipeline"),
            ("environment-strategy", "Environment Strategy"),
        ],
    },
    Section {
        key: "06-testing",
        title: "06 - Testing",
        pages: &[
            ("test-strategy", "Test Strategy"),
            ("unit-testing", "Unit Testing"),
            ("integration-testing", "Integration Testing"),
            ("performance-testing", "Performance Testing"),
            ("security-testing", "Security Testing (SAST / DAST)"),
            ("uat-signoff", "UAT Sign-Off"),
        ],
    },
    Section {
        key: "07-deployment-architecture",
        title: "07 - Deployment Architecture",
        pages: &[
            ("azure-infrastructure-overview", "Azure Infrastructure Overview"),
            (
                "environment-architecture",
                "Environment Architecture (Dev / Staging / Prod)",
            ),
            ("infrastructure-as-code", "Infrastructure as Code (IaC)"),
            ("networking-and-security", "Networking & Security"),
            ("disaster-recovery", "Disaster Recovery & Business Continuity"),
        ],
    },
    Section {
        key: "08-operations",
        title: "08 - Operations",
        pages: &[
            ("runbook", "Runbook"),
            ("monitoring-and-alerting", "Monitoring & Alerting"),
            ("incident-response-plan", "Incident Response Plan"),
            ("sla-slo-definitions", "SLA / SLO Definitions"),
        ],
    },
    Section {
        key: "09-release-management",
        title: "09 - Release Management",
        pages: &[
            ("release-notes-template", "Release Notes Template"),
            ("rollback-procedures", "Rollback Procedures"),
            ("post-deployment-verification", "Post-Deployment Verification"),
        ],
    },
];
