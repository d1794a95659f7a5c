use crate::dataset::{tables, DatasetBundle};

use super::{RuleId, ValidationReport};

/// Classification of a numeric cell
enum Cell {
    Valid,
    Missing,
    Invalid,
}

fn classify(value: f64) -> Cell {
    if value.is_nan() {
        Cell::Missing
    } else if value.is_infinite() || value < 0.0 {
        Cell::Invalid
    } else {
        Cell::Valid
    }
}

/// Step 3: numeric sanity of every concentration, response and property column
///
/// Negative or infinite values are errors and collected into one finding.
/// NaN and absent values are flagged per row as warnings.
pub(crate) fn check_numeric_values(dataset: &DatasetBundle, report: &mut ValidationReport) {
    let mut invalid: Vec<String> = Vec::new();

    report.checked(RuleId::MissingValue);

    for m in dataset.measurements() {
        let key = m.key().to_string();
        if m.peak_area.is_none() && m.reported_concentration.is_none() {
            report.flag(
                RuleId::MissingValue,
                vec![key.clone()],
                format!("{}: no peak area or concentration for {}", tables::MEASUREMENTS, key),
            );
        }
        for (column, value) in [
            ("area", m.peak_area),
            ("concentration", m.reported_concentration),
            ("retention_time", m.retention_time),
        ] {
            let Some(value) = value else { continue };
            match classify(value) {
                Cell::Valid => {}
                Cell::Missing => report.flag(
                    RuleId::MissingValue,
                    vec![key.clone()],
                    format!("{}: {} of {} is NaN", tables::MEASUREMENTS, column, key),
                ),
                Cell::Invalid => invalid.push(format!("{} ({}={})", key, column, value)),
            }
        }
    }

    for compound in dataset.compounds() {
        let Some(amount) = compound.spike_amount else { continue };
        match classify(amount) {
            Cell::Valid => {}
            Cell::Missing => report.flag(
                RuleId::MissingValue,
                vec![compound.compound_name.clone()],
                format!(
                    "{}: spike amount of {} is NaN",
                    tables::CORRESPONDENCE,
                    compound.compound_name
                ),
            ),
            Cell::Invalid => invalid.push(format!(
                "{} (spike_amount={})",
                compound.compound_name, amount
            )),
        }
    }

    for sample in dataset.samples() {
        for (name, &value) in &sample.properties {
            match classify(value) {
                Cell::Valid => {}
                Cell::Missing => report.flag(
                    RuleId::MissingValue,
                    vec![sample.sample_id.clone()],
                    format!(
                        "{}: {} of {} is NaN",
                        tables::SAMPLE_PROPERTIES,
                        name,
                        sample.sample_id
                    ),
                ),
                Cell::Invalid => invalid.push(format!("{} ({}={})", sample.sample_id, name, value)),
            }
        }
    }

    if let Some(amounts) = dataset.standard_amounts() {
        for row in amounts {
            match classify(row.amount) {
                Cell::Valid => {}
                Cell::Missing => report.flag(
                    RuleId::MissingValue,
                    vec![row.standard_id.clone()],
                    format!(
                        "{}: amount of {} is NaN",
                        tables::IS_CONCENTRATION,
                        row.standard_id
                    ),
                ),
                Cell::Invalid => {
                    invalid.push(format!("{} (amount={})", row.standard_id, row.amount))
                }
            }
        }
    }

    if let Some(references) = dataset.qc_references() {
        for qc in references {
            let values = [
                ("concentration", Some(qc.expected_concentration)),
                ("lower_limit", qc.lower_limit),
                ("upper_limit", qc.upper_limit),
            ];
            for (column, value) in values {
                let Some(value) = value else { continue };
                match classify(value) {
                    Cell::Valid => {}
                    Cell::Missing => report.flag(
                        RuleId::MissingValue,
                        vec![qc.compound_name.clone()],
                        format!("{}: {} of {} is NaN", tables::QC, column, qc.compound_name),
                    ),
                    Cell::Invalid => {
                        invalid.push(format!("{} ({}={})", qc.compound_name, column, value))
                    }
                }
            }
        }
    }

    report.checked(RuleId::NegativeValue);
    if !invalid.is_empty() {
        report.flag(
            RuleId::NegativeValue,
            invalid.clone(),
            format!(
                "{} value(s) are negative or infinite: {}",
                invalid.len(),
                invalid.join(", ")
            ),
        );
    }
}

/// Step 4: spike amounts and QC limits are usable
pub(crate) fn check_policies(dataset: &DatasetBundle, report: &mut ValidationReport) {
    let unspecified: Vec<String> = dataset
        .compounds()
        .iter()
        .filter(|c| c.is_spiked && c.spike_amount.is_none())
        .map(|c| c.compound_name.clone())
        .collect();
    report.checked(RuleId::MissingSpikeAmount);
    if !unspecified.is_empty() {
        report.flag(
            RuleId::MissingSpikeAmount,
            unspecified.clone(),
            format!(
                "Spiked compound(s) without a spike amount: {}",
                unspecified.join(", ")
            ),
        );
    }

    if let Some(references) = dataset.qc_references() {
        let inverted: Vec<String> = references
            .iter()
            .filter(|qc| matches!((qc.lower_limit, qc.upper_limit), (Some(lo), Some(hi)) if lo > hi))
            .map(|qc| qc.compound_name.clone())
            .collect();
        report.checked(RuleId::InvalidQcLimits);
        if !inverted.is_empty() {
            report.flag(
                RuleId::InvalidQcLimits,
                inverted.clone(),
                format!(
                    "QC lower limit above upper limit for: {}",
                    inverted.join(", ")
                ),
            );
        }
    }
}
