use std::fmt::Write;

use chrono::NaiveDate;

use crate::models::Prediction;
use crate::predict::MAX_SEMESTERS;

pub fn build_report(
    university: Option<&str>,
    major: Option<&str>,
    grades: &[f64],
    prediction: &Prediction,
    generated_on: NaiveDate,
) -> String {
    let mut output = String::new();

    let program_label = match (university, major) {
        (Some(university), Some(major)) => format!("{university} / {major}"),
        (Some(university), None) => university.to_string(),
        (None, Some(major)) => major.to_string(),
        (None, None) => "manual reference".to_string(),
    };

    let _ = writeln!(output, "# Admission Chance Report");
    let _ = writeln!(output, "Generated {} for {}", generated_on, program_label);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Report Card");

    if prediction.filled_semesters == 0 {
        let _ = writeln!(output, "No semester grades entered yet.");
    } else {
        for semester in 1..=MAX_SEMESTERS {
            match grades.get(semester - 1) {
                Some(grade) if *grade > 0.0 => {
                    let _ = writeln!(output, "- Semester {semester}: {grade:.2}");
                }
                _ => {
                    let _ = writeln!(output, "- Semester {semester}: not yet entered");
                }
            }
        }
        let _ = writeln!(
            output,
            "Average grade {:.2} across {} filled semesters",
            prediction.average, prediction.filled_semesters
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Admission Chances");

    match (&prediction.snbp, &prediction.snbt) {
        (Some(snbp), Some(snbt)) => {
            let _ = writeln!(
                output,
                "- SNBP: {:.2}% ({} accepted of {} applicants, selectivity {:.2}, reference {:.2})",
                snbp.chance_percent, snbp.accepted, snbp.applicants, snbp.selectivity, snbp.reference
            );
            let _ = writeln!(
                output,
                "- SNBT: {:.2}% ({} accepted of {} applicants, selectivity {:.2}, reference {:.2})",
                snbt.chance_percent, snbt.accepted, snbt.applicants, snbt.selectivity, snbt.reference
            );
        }
        _ => match prediction.reference {
            Some(reference) => {
                let _ = writeln!(output, "Manual reference score: {reference:.2}");
            }
            None => {
                let _ = writeln!(output, "No stats available for this program.");
            }
        },
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Suggestion");

    match prediction.required_increase {
        Some(_) if !prediction.targets.is_empty() => {
            let _ = writeln!(
                output,
                "You are currently in semester {}.",
                prediction.filled_semesters
            );
            for target in &prediction.targets {
                let _ = writeln!(
                    output,
                    "- Semester {}: score at least {:.2}",
                    target.semester, target.target
                );
            }
        }
        Some(increase) => {
            let _ = writeln!(
                output,
                "All {MAX_SEMESTERS} semesters are filled; an increase of {increase:.2} can no longer be reached through report-card grades."
            );
        }
        None if prediction.reference.is_some() => {
            let _ = writeln!(
                output,
                "Congratulations! Your average already meets the reference for this program. Keep it up."
            );
        }
        None => {
            let _ = writeln!(output, "Provide a reference score to get a target plan.");
        }
    }

    if let Some(safe_target) = prediction.safe_target {
        let _ = writeln!(
            output,
            "Safe target score for this program: {safe_target:.2}"
        );
    }

    output
}
