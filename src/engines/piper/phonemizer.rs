use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use super::model::PiperError;

/// Location of the espeak-ng binary and its voice data.
///
/// Either path can be `None` to fall back to the system default.
#[derive(Debug, Clone, Default)]
pub struct EspeakConfig {
    pub bin_path: Option<PathBuf>,
    pub data_path: Option<PathBuf>,
}

impl EspeakConfig {
    fn command(&self) -> Command {
        let bin = self.bin_path.as_deref().unwrap_or(Path::new("espeak-ng"));
        let mut command = Command::new(bin);
        if let Some(data) = &self.data_path {
            command.arg(format!("--path={}", data.display()));
        }
        command
    }
}

/// A run of words and the punctuation mark that closed it, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Clause {
    words: String,
    terminator: Option<char>,
}

/// Convert text to IPA phonemes via espeak-ng.
///
/// espeak-ng drops punctuation from its IPA output, but Piper voices are
/// trained with it. The text is therefore cut into clauses, all clauses are
/// phonemized in one espeak-ng call (one per line), and each clause's
/// terminator is put back as its own phoneme followed by a space.
pub fn phonemize(text: &str, voice: &str, espeak: &EspeakConfig) -> Result<Vec<char>, PiperError> {
    let clauses = split_clauses(text);
    let spoken: Vec<&str> = clauses
        .iter()
        .map(|c| c.words.as_str())
        .filter(|w| !w.is_empty())
        .collect();

    let mut ipa = if spoken.is_empty() {
        Vec::new()
    } else {
        espeak_lines(&spoken, voice, espeak)?
    }
    .into_iter();

    let mut phonemes = Vec::new();
    for clause in &clauses {
        if !clause.words.is_empty() {
            phonemes.extend(ipa.next().unwrap_or_default());
        }
        if let Some(mark) = clause.terminator {
            phonemes.push(mark);
            phonemes.push(' ');
        }
    }

    while phonemes.last() == Some(&' ') {
        phonemes.pop();
    }
    Ok(phonemes)
}

/// Phoneme the model knows for a punctuation mark, if it closes a clause.
fn clause_terminator(ch: char) -> Option<char> {
    match ch {
        '.' | ',' | ';' | ':' | '!' | '?' | '"' | '(' | ')' | '—' | '…' => Some(ch),
        '\u{201c}' | '\u{201d}' => Some('"'),
        _ => None,
    }
}

fn split_clauses(text: &str) -> Vec<Clause> {
    let mut clauses = Vec::new();
    let mut words = String::new();
    let mut prev: Option<char> = None;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        // "2.5" and "1,000" stay whole so espeak-ng reads them as numbers.
        let inside_number = matches!(ch, '.' | ',')
            && prev.is_some_and(|p| p.is_ascii_digit())
            && chars.peek().is_some_and(|n| n.is_ascii_digit());

        match clause_terminator(ch) {
            Some(mark) if !inside_number => {
                clauses.push(Clause {
                    words: words.trim().to_string(),
                    terminator: Some(mark),
                });
                words.clear();
            }
            _ if ch.is_whitespace() => {
                if !words.is_empty() && !words.ends_with(' ') {
                    words.push(' ');
                }
            }
            _ => words.push(ch),
        }
        prev = Some(ch);
    }

    let rest = words.trim();
    if !rest.is_empty() {
        clauses.push(Clause {
            words: rest.to_string(),
            terminator: None,
        });
    }
    clauses
}

/// Phonemize each input line; falls back to one call per line if espeak-ng
/// merges or splits lines.
fn espeak_lines(
    lines: &[&str],
    voice: &str,
    espeak: &EspeakConfig,
) -> Result<Vec<Vec<char>>, PiperError> {
    let output = run_espeak(&lines.join("\n"), voice, espeak)?;
    let out_lines: Vec<&str> = output.lines().collect();
    if out_lines.len() == lines.len() {
        return Ok(out_lines.into_iter().map(ipa_to_phonemes).collect());
    }

    log::debug!(
        "espeak-ng returned {} lines for {} clauses, phonemizing one by one",
        out_lines.len(),
        lines.len()
    );
    lines
        .iter()
        .map(|line| run_espeak(line, voice, espeak).map(|ipa| ipa_to_phonemes(&ipa)))
        .collect()
}

fn run_espeak(input: &str, voice: &str, espeak: &EspeakConfig) -> Result<String, PiperError> {
    let mut child = espeak
        .command()
        .args(["--ipa", "-q", "--stdin", "-v", voice])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => PiperError::EspeakNotFound,
            _ => PiperError::Io(e),
        })?;

    if let Some(mut stdin) = child.stdin.take() {
        // The last line is under-processed without a terminator.
        stdin.write_all(input.as_bytes())?;
        if !input.ends_with('\n') {
            stdin.write_all(b"\n")?;
        }
    }

    let output = child.wait_with_output()?;
    if !output.status.success() {
        return Err(PiperError::PhonemizerFailed(format!(
            "espeak-ng exited with code {:?}: {}",
            output.status.code(),
            String::from_utf8_lossy(&output.stderr)
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// IPA characters of espeak-ng output, lines joined by a space, tie marks dropped.
fn ipa_to_phonemes(ipa: &str) -> Vec<char> {
    let mut phonemes = Vec::new();
    for line in ipa.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if !phonemes.is_empty() {
            phonemes.push(' ');
        }
        phonemes.extend(line.chars().filter(|&ch| ch != '_'));
    }
    phonemes
}
