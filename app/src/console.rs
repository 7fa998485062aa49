use std::io::{self, BufRead, Write};

use tqa_ai::answer::AnswerReport;
use tqa_ai::citation::{CitationOutcome, UncitedReason};
use tqa_core::error::AppError;
use tqa_core::query::{parse_result_count, Query};

pub const QUERY_PROMPT: &str = "Enter your query (or 'exit' to quit): ";
pub const COUNT_PROMPT: &str = "Enter number of results to return: ";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub answered: u32,
    pub failed: u32,
    pub rejected: u32,
}

fn read_trimmed<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn prompt<W: Write>(output: &mut W, text: &str) -> io::Result<()> {
    write!(output, "{text}")?;
    output.flush()
}

/// Interactive query loop. Ends on EOF, an empty query, or `exit` (any case).
///
/// Failures of a single query are reported and the loop keeps going.
pub fn run_console<R, W, F>(mut input: R, mut output: W, mut answer: F) -> io::Result<SessionStats>
where
    R: BufRead,
    W: Write,
    F: FnMut(&Query) -> Result<AnswerReport, AppError>,
{
    let mut stats = SessionStats::default();
    loop {
        prompt(&mut output, QUERY_PROMPT)?;
        let Some(text) = read_trimmed(&mut input)? else {
            break;
        };
        if text.is_empty() {
            break;
        }
        if text.eq_ignore_ascii_case("exit") {
            writeln!(output, "Exiting the program.")?;
            break;
        }

        prompt(&mut output, COUNT_PROMPT)?;
        let Some(raw_count) = read_trimmed(&mut input)? else {
            break;
        };
        let query = match parse_result_count(&raw_count).and_then(|n| Query::new(text, n)) {
            Ok(q) => q,
            Err(e) => {
                writeln!(output, "Invalid input: {e}")?;
                stats.rejected += 1;
                continue;
            }
        };

        match answer(&query) {
            Ok(report) => {
                write_report(&mut output, &report)?;
                stats.answered += 1;
            }
            Err(e) => {
                tracing::error!(code = %e.code, retryable = e.retryable, "query failed");
                writeln!(output, "Error: {e}")?;
                stats.failed += 1;
            }
        }
    }
    Ok(stats)
}

fn write_report<W: Write>(output: &mut W, report: &AnswerReport) -> io::Result<()> {
    match &report.citations {
        CitationOutcome::Cited(refs) => {
            writeln!(output, "References found:")?;
            for r in refs {
                writeln!(output, "  [{}] {}", r.key, r.text)?;
            }
        }
        CitationOutcome::Uncited(UncitedReason::NoKeysFound) => {
            writeln!(output, "No citations found for the query.")?;
        }
        CitationOutcome::Uncited(UncitedReason::NoReferencesResolved) => {
            writeln!(output, "No references found for the citation keys.")?;
        }
        CitationOutcome::Uncited(UncitedReason::NotRequired) => {}
    }
    writeln!(output, "Answer: {}", report.answer)
}
