//! Plain-text rendering of results and checks.

use std::fmt::Write;

use takeoff_core::validation::{CheckStatus, CountCheck, PostHeightStatus};
use takeoff_core::{Assessment, CalcError, CalculationResult, ValidationResult};

/// Text report of an assessment. The checks are always included; the
/// calculation error, if any, is handed back for the caller to report.
pub fn assessment_text(assessment: &Assessment) -> (String, Option<CalcError>) {
    match &assessment.result {
        Ok(result) => (
            result_text(result) + &validation_text(&assessment.validation),
            None,
        ),
        Err(err) => (validation_text(&assessment.validation), Some(err.clone())),
    }
}

pub fn result_text(result: &CalculationResult) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = write_result(&mut out, result);
    out
}

pub fn validation_text(validation: &ValidationResult) -> String {
    let mut out = String::new();
    let _ = write_validation(&mut out, validation);
    out
}

fn write_result(out: &mut String, result: &CalculationResult) -> std::fmt::Result {
    writeln!(
        out,
        "Spans        {} ({:.2} m)",
        result.span_total,
        result.span_length_total.meters()
    )?;
    writeln!(out, "Height       {:.2} m", result.total_height.meters())?;
    writeln!(out, "Jack bases   {}", result.base_positions)?;
    writeln!(out)?;

    writeln!(out, "{:<24} {:>6} {:>12} {:>12}", "Material", "Qty", "Unit", "Total")?;
    writeln!(out, "{}", "-".repeat(57))?;
    for item in &result.materials {
        writeln!(
            out,
            "{:<24} {:>6} {:>12} {:>12}",
            item.name,
            item.quantity,
            item.unit_weight.to_string(),
            item.total_weight.to_string()
        )?;
    }
    writeln!(out, "{}", "-".repeat(57))?;
    writeln!(out, "{:<24} {:>33}", "Total weight", result.total_weight.to_string())?;
    writeln!(out)?;

    writeln!(out, "Recommended  {}", result.recommended_summary())?;
    if result.manual_selection_required {
        writeln!(out, "Split        no automatic split fits, choose vehicles manually")?;
    } else {
        for (index, option) in result.split_options.iter().enumerate() {
            let loads: Vec<String> = option.loads.iter().map(|l| l.load.to_string()).collect();
            writeln!(out, "  {}. {:<28} [{}]", index + 1, option.label, loads.join(", "))?;
        }
    }
    writeln!(out)
}

fn write_validation(out: &mut String, validation: &ValidationResult) -> std::fmt::Result {
    writeln!(out, "Checks")?;
    write_check(out, "custom heights", &validation.custom_heights)?;
    write_check(out, "jack bases", &validation.jack_bases)?;
    if let Some(posts) = validation.post_height {
        let status = match posts.status {
            PostHeightStatus::Ok => "ok",
            PostHeightStatus::Mismatch => "MISMATCH",
        };
        writeln!(
            out,
            "  {:<16} {:<8} declared {}, required {}",
            "post height", status, posts.declared, posts.required
        )?;
    }
    Ok(())
}

fn write_check(out: &mut String, label: &str, check: &CountCheck) -> std::fmt::Result {
    let status = match check.status {
        CheckStatus::Ok => "ok".to_string(),
        CheckStatus::Under => format!("UNDER ({} short)", check.remaining),
        CheckStatus::Over => "OVER".to_string(),
    };
    writeln!(
        out,
        "  {:<16} {:<8} needed {}, provided {}",
        label, status, check.needed, check.provided
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use takeoff_core::config::{FrameWidth, HeightRow, LevelHeight, SpanLength};
    use takeoff_core::{assess, Configuration};

    #[test]
    fn test_report_lists_materials_and_checks() {
        let config = Configuration::default()
            .with_spans(SpanLength::L900, 4)
            .with_frame_columns(FrameWidth::W900, 2)
            .with_levels(3);
        let (text, err) = assessment_text(&assess(&config));
        assert!(err.is_none());
        assert!(text.contains("decking/anti-900"));
        assert!(text.contains("Height       5.10 m"));
        assert!(text.contains("Recommended  Unic 1 / Flatbed 0"));
        assert!(text.contains("Checks"));
    }

    #[test]
    fn test_failed_calculation_still_shows_checks() {
        // no spans or columns yet, and one height row short
        let config = Configuration::default()
            .with_levels(2)
            .with_custom_heights(vec![HeightRow::new(LevelHeight::H1700, 1)]);
        let (text, err) = assessment_text(&assess(&config));
        assert_eq!(err.map(|e| e.error_code()), Some("INVALID_CONFIGURATION"));
        assert!(text.contains("UNDER (1 short)"));
        assert!(!text.contains("Material"));
    }
}
