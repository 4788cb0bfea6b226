use cylinder_histories::{Contribution, Outcome, ReductionReport};
use std::fmt::Write;

/// Render a textual summary of a reduction run.
///
/// Every (group, motion) pair gets one line saying what happened to it.
/// Included submissions also list the computed integrals and, when the group
/// supplied its own, those values with the difference to the computed ones.
#[must_use]
pub fn render_summary(report: &ReductionReport) -> String {
    let mut output = String::new();

    for entry in &report.motions {
        writeln!(&mut output, "{} {}", report.geometry, entry.motion)
            .expect("writing to string cannot fail");

        for outcome in &entry.outcomes {
            let submission = outcome.submission();
            match outcome {
                Outcome::Included(contribution) => render_contribution(&mut output, contribution),
                Outcome::NotFound { path, .. } => {
                    writeln!(
                        &mut output,
                        "  {}: data not found ({})",
                        submission.group,
                        path.display()
                    )
                    .expect("writing to string cannot fail");
                }
                Outcome::Skipped { failures, .. } => {
                    let reasons: Vec<String> = failures.iter().map(ToString::to_string).collect();
                    writeln!(
                        &mut output,
                        "  {}: skipped {} ({})",
                        submission.group,
                        submission.file_name(),
                        reasons.join("; ")
                    )
                    .expect("writing to string cannot fail");
                }
                Outcome::Rejected { error, .. } => {
                    writeln!(
                        &mut output,
                        "  {}: rejected {} ({error})",
                        submission.group,
                        submission.file_name()
                    )
                    .expect("writing to string cannot fail");
                }
            }
        }
    }

    output
}

/// Append the integrals of one included submission.
fn render_contribution(output: &mut String, contribution: &Contribution) {
    writeln!(output, "  {}", contribution.label()).expect("writing to string cannot fail");

    let computed = contribution.integrals;
    let supplied = contribution.participant_integrals;
    let rows = [
        ("Y-Force", computed.y_force, supplied.map(|s| s.y_force)),
        ("Work", computed.work, supplied.map(|s| s.work)),
        ("Mass", computed.mass, supplied.map(|s| s.mass)),
    ];
    for (name, value, participant) in rows {
        let written = match participant {
            Some(participant) => writeln!(
                output,
                "    {name:<10} {value:+.6e}  participant {participant:+.6e}  difference {:+.3e}",
                value - participant
            ),
            None => writeln!(output, "    {name:<10} {value:+.6e}"),
        };
        written.expect("writing to string cannot fail");
    }

    // Mass error is not integrated locally, so only the supplied value exists.
    if let Some(supplied) = supplied {
        writeln!(
            output,
            "    {:<10} {:>13}  participant {:+.6e}",
            "Mass error", "-", supplied.mass_error
        )
        .expect("writing to string cannot fail");
    }
}
