use std::fmt;

#[cfg(feature = "colorized_output")]
use console::style;
use serde::Serialize;

/// Severity of a validation finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Reported, does not stop the pipeline
    Warning,
    /// Stops the pipeline before any calculator runs
    Error,
}

/// Stable identifier of a validation rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    /// (sample_id, compound_name) repeated in the quantitation export
    DuplicateMeasurement,
    /// sample_id repeated in the sample properties
    DuplicateSample,
    /// Compound repeated in the correspondence table
    DuplicateMapping,
    /// Analyte without an internal-standard mapping
    MissingMapping,
    /// Referenced standard without an amount
    MissingIsConcentration,
    /// Standard amount given more than once
    DuplicateIsConcentration,
    /// Compound repeated in the QC table
    DuplicateQcReference,
    /// Measured sample absent from the sample properties
    UnknownSample,
    /// QC sample without any measurement
    QcSampleWithoutMeasurements,
    /// Sample-type tag outside the recognized vocabulary
    UnknownSampleType,
    /// Negative or infinite numeric value
    NegativeValue,
    /// NaN or absent numeric value
    MissingValue,
    /// Spiked compound without a spike amount
    MissingSpikeAmount,
    /// Spike sample whose native counterpart is absent
    MissingNativeSample,
    /// QC entry for a compound that was never measured
    UnknownQcCompound,
    /// QC lower limit above upper limit
    InvalidQcLimits,
}

impl RuleId {
    /// Every rule, in the order they are evaluated
    pub const ALL: [RuleId; 16] = [
        RuleId::DuplicateMeasurement,
        RuleId::DuplicateSample,
        RuleId::DuplicateMapping,
        RuleId::MissingMapping,
        RuleId::MissingIsConcentration,
        RuleId::DuplicateIsConcentration,
        RuleId::DuplicateQcReference,
        RuleId::UnknownSample,
        RuleId::QcSampleWithoutMeasurements,
        RuleId::UnknownSampleType,
        RuleId::NegativeValue,
        RuleId::MissingValue,
        RuleId::MissingSpikeAmount,
        RuleId::MissingNativeSample,
        RuleId::UnknownQcCompound,
        RuleId::InvalidQcLimits,
    ];

    /// Rule id as written in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleId::DuplicateMeasurement => "duplicate_measurement",
            RuleId::DuplicateSample => "duplicate_sample",
            RuleId::DuplicateMapping => "duplicate_mapping",
            RuleId::MissingMapping => "missing_mapping",
            RuleId::MissingIsConcentration => "missing_is_concentration",
            RuleId::DuplicateIsConcentration => "duplicate_is_concentration",
            RuleId::DuplicateQcReference => "duplicate_qc_reference",
            RuleId::UnknownSample => "unknown_sample",
            RuleId::QcSampleWithoutMeasurements => "qc_sample_without_measurements",
            RuleId::UnknownSampleType => "unknown_sample_type",
            RuleId::NegativeValue => "negative_value",
            RuleId::MissingValue => "missing_value",
            RuleId::MissingSpikeAmount => "missing_spike_amount",
            RuleId::MissingNativeSample => "missing_native_sample",
            RuleId::UnknownQcCompound => "unknown_qc_compound",
            RuleId::InvalidQcLimits => "invalid_qc_limits",
        }
    }

    /// Severity attached to findings of this rule
    pub fn severity(&self) -> Severity {
        match self {
            RuleId::MissingValue | RuleId::MissingNativeSample | RuleId::UnknownQcCompound => {
                Severity::Warning
            }
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One violated rule
#[derive(Debug, Clone, Serialize)]
pub struct ValidationIssue {
    /// Rule that was violated
    pub rule: RuleId,
    /// Severity of the finding
    pub severity: Severity,
    /// Keys (sample ids, compound names, composite keys) the finding is about
    pub affected_keys: Vec<String>,
    /// Human-readable description
    pub message: String,
}

/// Complete validation report for one dataset
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    /// Label of the validated dataset
    pub dataset: String,
    /// Rules that were evaluated
    pub rules_checked: Vec<RuleId>,
    /// Every finding, in evaluation order
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Create an empty report
    pub fn new(dataset: impl Into<String>) -> Self {
        Self {
            dataset: dataset.into(),
            rules_checked: Vec::new(),
            issues: Vec::new(),
        }
    }

    /// Record that a rule was evaluated
    pub(crate) fn checked(&mut self, rule: RuleId) {
        if !self.rules_checked.contains(&rule) {
            self.rules_checked.push(rule);
        }
    }

    /// Record a finding; the severity follows the rule
    pub(crate) fn flag(
        &mut self,
        rule: RuleId,
        affected_keys: Vec<String>,
        message: impl Into<String>,
    ) {
        self.checked(rule);
        self.issues.push(ValidationIssue {
            rule,
            severity: rule.severity(),
            affected_keys,
            message: message.into(),
        });
    }

    /// Findings of one rule
    pub fn issues_for(&self, rule: RuleId) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(move |i| i.rule == rule)
    }

    /// Whether any rule reported an error
    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Error)
    }

    /// Whether any rule reported a warning
    pub fn has_warnings(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Warning)
    }

    /// Number of error findings
    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count()
    }

    /// Number of warning findings
    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .count()
    }

    /// Number of evaluated rules without findings
    pub fn passed_count(&self) -> usize {
        self.rules_checked
            .iter()
            .filter(|rule| self.issues_for(**rule).next().is_none())
            .count()
    }

    /// Format the report with colors (requires console feature)
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            use console::Emoji;

            static OK: Emoji<'_, '_> = Emoji("✓", "[OK]");
            static WARN: Emoji<'_, '_> = Emoji("⚠", "[WARN]");
            static FAIL: Emoji<'_, '_> = Emoji("✗", "[FAIL]");

            let mut output = String::new();

            output.push_str(&format!("{}\n", style("Quantifyer Validation Report").bold().cyan()));
            output.push_str(&format!("{}\n", style("============================").cyan()));
            output.push_str(&format!("{}: {}\n\n", style("Dataset").bold(), self.dataset));

            for rule in &self.rules_checked {
                let mut findings = self.issues_for(*rule).peekable();
                if findings.peek().is_none() {
                    output.push_str(&format!("[{}] {}\n", OK, style(rule.as_str()).green()));
                    continue;
                }
                for issue in findings {
                    let line = match issue.severity {
                        Severity::Warning => format!(
                            "[{}] {} - {}: {}\n",
                            WARN,
                            style(rule.as_str()).yellow(),
                            style("WARNING").yellow().bold(),
                            issue.message
                        ),
                        Severity::Error => format!(
                            "[{}] {} - {}: {}\n",
                            FAIL,
                            style(rule.as_str()).red(),
                            style("FAILED").red().bold(),
                            issue.message
                        ),
                    };
                    output.push_str(&line);
                }
            }

            output.push('\n');
            output.push_str(&format!(
                "{}: {} passed, {} warnings, {} errors\n",
                style("Summary").bold(),
                style(self.passed_count()).green(),
                style(self.warning_count()).yellow(),
                style(self.error_count()).red()
            ));

            output.push('\n');
            if self.has_errors() {
                output.push_str(&format!("{}\n", style("Validation FAILED").red().bold()));
            } else if self.has_warnings() {
                output.push_str(&format!(
                    "{}\n",
                    style("Validation PASSED with warnings").yellow().bold()
                ));
            } else {
                output.push_str(&format!("{}\n", style("Validation PASSED").green().bold()));
            }

            output
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            format!("{}", self)
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Quantifyer Validation Report")?;
        writeln!(f, "============================")?;
        writeln!(f, "Dataset: {}", self.dataset)?;
        writeln!(f)?;

        for rule in &self.rules_checked {
            let mut findings = self.issues_for(*rule).peekable();
            if findings.peek().is_none() {
                writeln!(f, "[✓] {}", rule)?;
                continue;
            }
            for issue in findings {
                match issue.severity {
                    Severity::Warning => writeln!(f, "[⚠] {} - WARNING: {}", rule, issue.message)?,
                    Severity::Error => writeln!(f, "[✗] {} - FAILED: {}", rule, issue.message)?,
                }
            }
        }

        writeln!(f)?;
        writeln!(
            f,
            "Summary: {} passed, {} warnings, {} errors",
            self.passed_count(),
            self.warning_count(),
            self.error_count()
        )?;

        writeln!(f)?;
        if self.has_errors() {
            writeln!(f, "Validation FAILED")?;
        } else if self.has_warnings() {
            writeln!(f, "Validation PASSED with warnings")?;
        } else {
            writeln!(f, "Validation PASSED")?;
        }

        Ok(())
    }
}
