//! File writing utilities for exporting derived results.
//!
//! Analyses and daily summaries are written as CSV (one row per record, list
//! fields joined with `;`) or as a pretty-printed JSON array.

use crate::error::Result;
use crate::models::{DailySummary, MessageAnalysis, OutputFormat};
use csv::Writer;
use serde::Serialize;
use std::fs::{File, create_dir_all};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Write analyses and summaries of a case into `output_dir`.
///
/// Creates `case_<id>_analysis.<ext>` and `case_<id>_daily.<ext>`.
///
/// # Returns
///
/// Paths of the created files
pub fn export_case(
    case_id: i64,
    analyses: &[MessageAnalysis],
    summaries: &[DailySummary],
    format: OutputFormat,
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    create_dir_all(output_dir)?;

    let analysis_path = output_dir.join(format!("case_{case_id}_analysis.{}", format.extension()));
    write_analyses_to_file(analyses, format, &analysis_path)?;

    let summary_path = output_dir.join(format!("case_{case_id}_daily.{}", format.extension()));
    write_summaries_to_file(summaries, format, &summary_path)?;

    Ok(vec![analysis_path, summary_path])
}

/// Write analyses to a file in the specified format.
///
/// # Errors
///
/// Returns an error if file creation or writing fails.
pub fn write_analyses_to_file(analyses: &[MessageAnalysis], format: OutputFormat, file_path: &Path) -> Result<()> {
    match format {
        OutputFormat::Csv => write_analyses_csv(analyses, File::create(file_path)?),
        OutputFormat::Json => write_json(analyses, file_path),
    }
}

/// Write daily summaries to a file in the specified format.
pub fn write_summaries_to_file(summaries: &[DailySummary], format: OutputFormat, file_path: &Path) -> Result<()> {
    match format {
        OutputFormat::Csv => write_summaries_csv(summaries, File::create(file_path)?),
        OutputFormat::Json => write_json(summaries, file_path),
    }
}

/// Write analyses as CSV.
///
/// Includes header row: `message_id, is_hurtful, severity, is_apology,
/// sentiment_score, patterns, keywords, supportive`
pub fn write_analyses_csv<W: Write>(analyses: &[MessageAnalysis], out: W) -> Result<()> {
    let mut writer = Writer::from_writer(out);
    writer.write_record([
        "message_id",
        "is_hurtful",
        "severity",
        "is_apology",
        "sentiment_score",
        "patterns",
        "keywords",
        "supportive",
    ])?;

    for analysis in analyses {
        writer.write_record([
            analysis.message_id.to_string(),
            analysis.is_hurtful.to_string(),
            analysis.severity.map(|s| s.as_str()).unwrap_or_default().to_string(),
            analysis.is_apology.to_string(),
            analysis.sentiment_score.to_string(),
            analysis.patterns.join(";"),
            analysis.keywords.join(";"),
            analysis.supportive.join(";"),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Write daily summaries as CSV, one row per day
pub fn write_summaries_csv<W: Write>(summaries: &[DailySummary], out: W) -> Result<()> {
    let mut writer = Writer::from_writer(out);
    for summary in summaries {
        writer.serialize(summary)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_json<T: Serialize>(records: &[T], file_path: &Path) -> Result<()> {
    let file = File::create(file_path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Severity;

    #[test]
    fn test_analysis_csv_joins_lists() {
        let mut analysis = MessageAnalysis::empty(3);
        analysis.is_hurtful = true;
        analysis.severity = Some(Severity::Moderate);
        analysis.patterns = vec!["deny".into(), "contempt".into()];

        let mut out = Vec::new();
        write_analyses_csv(&[analysis], &mut out).expect("Failed to write csv");
        let text = String::from_utf8(out).expect("utf-8");
        let mut lines = text.lines();

        assert!(lines.next().is_some_and(|h| h.starts_with("message_id,is_hurtful")));
        assert_eq!(lines.next(), Some("3,true,moderate,false,0,deny;contempt,,"));
    }
}
