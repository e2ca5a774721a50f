//! Page content: the built-in portfolio and TOML content files.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::carousel::Keyed;

/// Errors that can occur while loading a content file
#[derive(Error, Debug)]
pub enum ContentError {
    /// Failed to read the content file
    #[error("Failed to read content file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Content file is not valid TOML or misses a required field
    #[error("Failed to parse content file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Everything the page shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Portfolio {
    pub name: String,
    /// Short mark shown in the nav bar
    pub initials: String,
    pub role: String,
    pub tagline: String,
    #[serde(default)]
    pub skills: Vec<SkillSet>,
    pub employment: Employment,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub certifications: Vec<Certification>,
    pub footer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillSet {
    pub category: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employment {
    pub title: String,
    #[serde(default)]
    pub clients: Vec<String>,
    pub experiences: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certification {
    pub title: String,
    pub year: String,
}

/// One carousel card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Experience {
    pub key: String,
    pub text: String,
}

impl Keyed for Experience {
    fn key(&self) -> &str {
        &self.key
    }
}

impl Employment {
    /// Experience lines as carousel items keyed by position.
    pub fn experience_items(&self) -> Vec<Experience> {
        self.experiences
            .iter()
            .enumerate()
            .map(|(i, text)| Experience {
                key: format!("exp-{i}"),
                text: text.trim().to_string(),
            })
            .collect()
    }
}

impl Portfolio {
    /// Parse a TOML content document.
    pub fn from_toml_str(content: &str) -> Result<Self, ContentError> {
        Ok(toml::from_str(content)?)
    }

    /// Load a TOML content file.
    #[instrument(level = "debug")]
    pub fn load(path: &Path) -> Result<Self, ContentError> {
        let content = fs::read_to_string(path).map_err(|source| ContentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let portfolio = Self::from_toml_str(&content)?;
        debug!(path = %path.display(), experiences = portfolio.employment.experiences.len(), "Loaded content file");
        Ok(portfolio)
    }

    /// The page as shipped.
    pub fn builtin() -> Self {
        Self {
            name: "Prathamesh Jadhav".into(),
            initials: "PJ".into(),
            role: "Cloud Security Engineer".into(),
            tagline: "passionate about 🔐 securing cloud environments, ⚙️ automating security processes, and 🚀 implementing DevSecOps best practices.".into(),
            skills: vec![
                skill_set("☁️ Cloud Security", &["AWS", "GCP", "Prisma Cloud", "CSPM", "CWPP 🏴"]),
                skill_set("🛠 DevSecOps & Automation", &["Jenkins", "Terraform", "SonarQube", "OWASP ZAP"]),
                skill_set("💳 Security Compliance", &["PCI DSS", "GDPR", "HIPAA", "ISO 27001"]),
                skill_set("📊 SIEM & Monitoring", &["Splunk", "Elastic", "Kibana"]),
                skill_set("💻 Programming & Scripting", &["Python", "Bash", "JavaScript"]),
            ],
            employment: Employment {
                title: "Cloud Security Analyst | Essen Vision (Aug 2023 - Present)".into(),
                clients: [
                    "HDFC",
                    "RBI",
                    "FYNDNA",
                    "Kotak Bank",
                    "Zepto",
                    "BMCL",
                    "Shoppers Stop",
                    "Kotak Security",
                ]
                .iter()
                .map(|c| c.to_string())
                .collect(),
                experiences: BUILTIN_EXPERIENCES.iter().map(|e| e.to_string()).collect(),
            },
            projects: vec![
                project("🔐 Custom Security Dashboard", "Developed a security analytics dashboard integrating Prisma Cloud, Netskope, and CrowdStrike with PostgreSQL and Apache Superset, providing real-time security insights."),
                project("📌 Vulnerability Tracker", "Built a cloud vulnerability management system that classifies vulnerabilities (open, closed, new), automates data extraction via APIs, and maintains a centralized tracking system in PostgreSQL."),
                project("🚀 DevSecOps Pipeline", "Implemented a CI/CD pipeline security enforcement with SonarQube and OWASP ZAP, ensuring only secure code is deployed."),
                project("📡 SIEM with Splunk", "Deployed Splunk on AWS, created custom SPL queries and dashboards to analyze security threats, detect anomalies, and respond in real time."),
                project("🔑 Just-In-Time (JIT) Access Management", "Designed an automated JIT access control system using Python, AWS CLI, RabbitMQ, and PostgreSQL, enforcing least privilege access dynamically."),
                project("📜 CloudTrail-Driven Adaptive Access Control", "Automated least privilege enforcement by analyzing CloudTrail logs, dynamically adjusting user permissions based on real usage patterns."),
            ],
            certifications: vec![
                Certification {
                    title: "Prisma Cloud Associate (PSE)".into(),
                    year: "2023".into(),
                },
                Certification {
                    title: "Bachelor of Science in Computer Science".into(),
                    year: "2023".into(),
                },
            ],
            footer: "© 2025 Prathamesh Jadhav. All rights reserved.".into(),
        }
    }
}

fn skill_set(category: &str, items: &[&str]) -> SkillSet {
    SkillSet {
        category: category.to_string(),
        items: items.iter().map(|i| i.to_string()).collect(),
    }
}

fn project(title: &str, description: &str) -> Project {
    Project {
        title: title.to_string(),
        description: description.to_string(),
    }
}

const BUILTIN_EXPERIENCES: [&str; 14] = [
    "⚠️ Resolved CSPM alerts by identifying risks in cloud services and providing actionable recommendations, including IAM role hardening, encryption enablement, and activity monitoring.",
    "🔍 Deployed Prisma Cloud Compute Edition in air-gapped environments, conducting vulnerability assessments and runtime security evaluations.",
    "🌐 Configured Prisma Cloud SaaS for GCP and AWS, enabling agentless vulnerability scanning and ensuring compliance.",
    "📑 Conducted compliance audits for PCI DSS, GDPR, HIPAA, and ISO 27001, ensuring adherence to regulatory standards.",
    "🔒 Developed CIS guidelines for container workloads, securing Kubernetes environments with best practices.",
    "⚙️ Automated Defender deployment and upgrades using scripts and Terraform for consistent security across dynamic environments.",
    "🛡 Addressed Kubernetes security challenges, implementing namespace isolation, network policies, and OWASP Top 10 vulnerability testing.",
    "📜 Designed tailored compliance frameworks with automated policy enforcement and regular audits.",
    "🔐 Secured sensitive data on S3 buckets using DSPM modules, encryption, strict access policies, and object versioning.",
    "🚀 Integrated DevSecOps practices, automating security checks in CI/CD pipelines and enabling secure deployments.",
    "🔍 Audited cloud environments to identify and remediate compliance gaps, preparing organizations for regulatory reviews.",
    "🛡 Leveraged AWS native security tools like GuardDuty, Config, Inspector, and Macie for threat detection, compliance, and data security.",
    "✅ Recommended automated compliance checks using policy-as-code frameworks for consistent cloud resource management.",
    "🌍 Promoted multi-cloud security best practices, including encryption, vulnerability patching, and MFA for critical resources.",
];
