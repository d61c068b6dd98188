use crate::core::batch::{BatchViewModel, FileView};
use crate::core::dispatch::RenderInstruction;
use crate::core::features::FeatureEntry;
use crate::core::heuristic::HeuristicPanel;
use crate::core::model::SuggestionKind;
use crate::core::present::{SingleViewModel, SkillPanel, SuggestionEntry};
use crate::core::session::ReportSession;
use colored::Colorize;
use serde::Serialize;
use std::fmt::{self, Write};

const BAR_WIDTH: usize = 20;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Success,
    Info,
    Warning,
    Danger,
    Primary,
    Secondary,
}

impl Tone {
    fn paint(self, text: &str) -> String {
        match self {
            Self::Success => text.green().bold().to_string(),
            Self::Info => text.cyan().bold().to_string(),
            Self::Warning => text.yellow().bold().to_string(),
            Self::Danger => text.red().bold().to_string(),
            Self::Primary => text.blue().bold().to_string(),
            Self::Secondary => text.bright_black().to_string(),
        }
    }
}

fn suggestion_tone(kind: SuggestionKind) -> Tone {
    match kind {
        SuggestionKind::Info => Tone::Info,
        SuggestionKind::Warning => Tone::Warning,
        SuggestionKind::Style => Tone::Primary,
        SuggestionKind::Documentation => Tone::Secondary,
    }
}

fn check_mark(met: bool) -> &'static str {
    if met { "✓" } else { "✗" }
}

pub fn print_human(session: &ReportSession) {
    print!("{}", render_human(session));
}

pub fn render_human(session: &ReportSession) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_session(&mut out, session);
    out
}

fn write_session(out: &mut String, session: &ReportSession) -> fmt::Result {
    if let Some(failure) = session.failure() {
        writeln!(out, "{}", Tone::Danger.paint(&failure.message))?;
        if session.report().is_some() {
            writeln!(out, "{}", "(showing the last successful report)".bright_black())?;
            writeln!(out)?;
        }
    }

    match session.report() {
        Some(RenderInstruction::Single(view)) => write_single(out, view),
        Some(RenderInstruction::Batch(view)) => write_batch(out, view),
        None => Ok(()),
    }
}

fn write_single(out: &mut String, view: &SingleViewModel) -> fmt::Result {
    writeln!(out, "{}", view.banner.tone.paint(&view.banner.title))?;
    writeln!(out, "{}", view.banner.message)?;
    write_panels(out, view, "")
}

fn write_batch(out: &mut String, view: &BatchViewModel) -> fmt::Result {
    writeln!(out, "{}", Tone::Primary.paint("Multiple File Analysis Results"))?;
    writeln!(out, "Total files analyzed: {}", view.total)?;
    writeln!(
        out,
        "Valid files: {} | Files with errors: {}",
        view.valid_count, view.invalid_count
    )?;

    for file in &view.files {
        writeln!(out)?;
        write_file_header(out, file)?;
        write_panels(out, &file.view, "  ")?;
    }
    Ok(())
}

fn write_file_header(out: &mut String, file: &FileView) -> fmt::Result {
    let tone = if file.view.valid { Tone::Success } else { Tone::Danger };
    write!(
        out,
        "{} [{}]",
        file.filename.bold(),
        tone.paint(file.status_label())
    )?;
    if let Some(link) = &file.detail_link {
        write!(out, "  details: {}", link.underline())?;
    }
    writeln!(out)
}

fn write_panels(out: &mut String, view: &SingleViewModel, indent: &str) -> fmt::Result {
    if let Some(error) = &view.error {
        writeln!(
            out,
            "{indent}{} {}",
            Tone::Danger.paint(&format!("Error on line {}:", error.line)),
            error.message
        )?;
    }

    if let Some(skill) = &view.skill {
        write_skill(out, skill, indent)?;
    }

    if let Some(entries) = &view.suggestions {
        writeln!(out, "{indent}{}", "Suggestions".bold())?;
        for entry in entries {
            match entry {
                SuggestionEntry::Suggestion {
                    line,
                    kind,
                    label,
                    message,
                } => writeln!(
                    out,
                    "{indent}  {} line {}: {}",
                    suggestion_tone(*kind).paint(&format!("[{label}]")),
                    line,
                    message
                )?,
                SuggestionEntry::NoSuggestions { message } => writeln!(
                    out,
                    "{indent}  {} {}",
                    Tone::Success.paint("No suggestions."),
                    message
                )?,
            }
        }
    }
    Ok(())
}

fn write_skill(out: &mut String, skill: &SkillPanel, indent: &str) -> fmt::Result {
    let tone = skill.class.tier.tone();
    let filled = usize::from(skill.class.percent) * BAR_WIDTH / 100;
    let bar = format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled));

    writeln!(
        out,
        "{indent}{} {}  score: {}",
        "Skill level:".bold(),
        tone.paint(&skill.level),
        skill.score
    )?;
    writeln!(
        out,
        "{indent}{} {}%",
        tone.paint(&bar),
        skill.class.percent
    )?;

    write_features(out, &skill.features, skill.features_note, indent)?;

    if let Some(panel) = &skill.heuristic {
        write_heuristic(out, panel, indent)?;
    }
    Ok(())
}

fn write_features(
    out: &mut String,
    features: &[FeatureEntry],
    note: Option<&str>,
    indent: &str,
) -> fmt::Result {
    writeln!(out, "{indent}{}", "Features".bold())?;
    if let Some(note) = note {
        return writeln!(out, "{indent}  {}", note.bright_black());
    }
    for feature in features {
        writeln!(
            out,
            "{indent}  {}: {}",
            feature.label,
            Tone::Info.paint(&feature.count.to_string())
        )?;
    }
    Ok(())
}

fn write_heuristic(out: &mut String, panel: &HeuristicPanel, indent: &str) -> fmt::Result {
    writeln!(
        out,
        "{indent}{} {}",
        "BMI calculator:".bold(),
        panel.tone.paint(&format!("Level: {}", panel.label))
    )?;
    let critical_tone = if panel.critical_met { Tone::Success } else { Tone::Danger };
    let desirable_tone = if panel.desirable_met { Tone::Success } else { Tone::Warning };
    writeln!(
        out,
        "{indent}  {}  {}",
        critical_tone.paint(&format!("Critical criterion {}", check_mark(panel.critical_met))),
        desirable_tone.paint(&format!(
            "Desirable criterion {}",
            check_mark(panel.desirable_met)
        ))
    )?;
    writeln!(out, "{indent}  {}", panel.description)
}
