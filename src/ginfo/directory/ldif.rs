//! LDIF snapshots as a directory.
//!
//! Supported syntax: `dn:` lines, `attr: value` and base64 `attr:: value` lines,
//! attribute options (`attr;lang-en:`) which are dropped, continuation lines starting
//! with a single space, `#` comments and a leading `version:` line. Lines that cannot
//! be understood are skipped with a warning; they never abort the read.

use super::{Directory, FetchRequest};
use crate::error::{GinfoError, Result};
use crate::model::RawEntry;
use base64::{engine::general_purpose, Engine as _};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;

/// A directory backed by an LDIF file.
#[derive(Debug, Clone)]
pub struct LdifDirectory {
    path: PathBuf,
}

impl LdifDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Directory for LdifDirectory {
    fn fetch(&self, request: &FetchRequest) -> Result<Vec<RawEntry>> {
        let (sender, receiver) = mpsc::channel();
        let path = self.path.clone();
        thread::spawn(move || {
            let parsed = std::fs::read_to_string(&path)
                .map(|text| parse(&text))
                .map_err(|e| format!("cannot read {}: {}", path.display(), e));
            // The receiver is gone once the fetch timed out.
            let _ = sender.send(parsed);
        });

        let entries = match receiver.recv_timeout(request.timeout) {
            Ok(Ok(entries)) => entries,
            Ok(Err(reason)) => {
                return Err(GinfoError::FetchFailure {
                    host: request.host.clone(),
                    reason,
                })
            }
            Err(RecvTimeoutError::Timeout) => {
                return Err(GinfoError::FetchTimeout {
                    host: request.host.clone(),
                    seconds: request.timeout.as_secs(),
                })
            }
            Err(RecvTimeoutError::Disconnected) => {
                return Err(GinfoError::FetchFailure {
                    host: request.host.clone(),
                    reason: "reader stopped unexpectedly".to_string(),
                })
            }
        };

        let total = entries.len();
        let selected: Vec<RawEntry> = entries
            .into_iter()
            .filter(|entry| request.selects(entry))
            .collect();
        log::debug!(
            "{}: {} of {} entries selected under {}",
            self.path.display(),
            selected.len(),
            total,
            request.bind
        );
        Ok(selected)
    }
}

/// Joins continuation lines and drops comments.
///
/// Returns `(line number, logical line)` pairs; blank lines are kept as entry
/// separators.
fn unfold(text: &str) -> Vec<(usize, String)> {
    let mut lines: Vec<(usize, String)> = Vec::new();
    let mut in_comment = false;
    for (index, raw) in text.lines().enumerate() {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        if let Some(rest) = line.strip_prefix(' ') {
            if in_comment {
                continue;
            }
            match lines.last_mut() {
                Some((_, current)) if !current.is_empty() => current.push_str(rest),
                _ => log::warn!("line {}: continuation without a preceding line", index + 1),
            }
            continue;
        }
        in_comment = line.starts_with('#');
        if !in_comment {
            lines.push((index + 1, line.to_string()));
        }
    }
    lines
}

fn decode_value(line_number: usize, rest: &str) -> Option<String> {
    if let Some(encoded) = rest.strip_prefix(':') {
        let decoded = general_purpose::STANDARD.decode(encoded.trim());
        return match decoded.map(String::from_utf8) {
            Ok(Ok(value)) => Some(value),
            _ => {
                log::warn!("line {}: invalid base64 value", line_number);
                None
            }
        };
    }
    if rest.starts_with('<') {
        log::warn!("line {}: URL values are not supported", line_number);
        return None;
    }
    Some(rest.trim_start().to_string())
}

/// Parses LDIF text into entries, in source order.
pub fn parse(text: &str) -> Vec<RawEntry> {
    let mut entries = Vec::new();
    let mut current = RawEntry::new(None);
    let mut seen_entry = false;

    for (line_number, line) in unfold(text) {
        if line.trim().is_empty() {
            if !current.is_empty() {
                entries.push(std::mem::take(&mut current));
            }
            continue;
        }
        if line == "-" {
            continue;
        }
        let Some((name, rest)) = line.split_once(':') else {
            log::warn!("line {}: expected 'attribute: value', skipping", line_number);
            continue;
        };
        let name = name.split(';').next().unwrap_or(name).trim();
        if name.is_empty() || name.contains(char::is_whitespace) {
            log::warn!("line {}: invalid attribute name {:?}, skipping", line_number, name);
            continue;
        }
        let Some(value) = decode_value(line_number, rest) else {
            continue;
        };

        if name.eq_ignore_ascii_case("version") && !seen_entry && current.is_empty() {
            continue;
        }
        seen_entry = true;
        if name.eq_ignore_ascii_case("dn") {
            if !current.is_empty() {
                entries.push(std::mem::take(&mut current));
            }
            current.dn = Some(value);
            continue;
        }
        current.push(name, value);
    }

    if !current.is_empty() {
        entries.push(current);
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ObjectType;
    use std::time::Duration;

    const SAMPLE: &str = "version: 1\n\
        \n\
        # a service\n\
        #  with a folded\n continued comment\n\
        dn: GLUE2ServiceID=s1,o=glue\n\
        objectClass: GLUE2Service\n\
        GLUE2ServiceID: s1\n\
        GLUE2ServiceType: very_long_\n type_name\n\
        \n\
        dn: GLUE2LocationID=l1,o=glue\n\
        objectClass: GLUE2Location\n\
        GLUE2LocationID: l1\n\
        GLUE2LocationCountry:: U3dpdHplcmxhbmQ=\n\
        GLUE2LocationName;lang-fr: Genève\n";

    #[test]
    fn parses_entries_in_order() {
        let entries = parse(SAMPLE);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].dn.as_deref(), Some("GLUE2ServiceID=s1,o=glue"));
        assert_eq!(entries[1].first("GLUE2LocationID"), Some("l1"));
        assert!(entries[0].get("version").is_none());
    }

    #[test]
    fn joins_continuation_lines() {
        let entries = parse(SAMPLE);
        assert_eq!(entries[0].first("GLUE2ServiceType"), Some("very_long_type_name"));
    }

    #[test]
    fn decodes_base64_and_strips_options() {
        let entries = parse(SAMPLE);
        assert_eq!(entries[1].first("GLUE2LocationCountry"), Some("Switzerland"));
        assert_eq!(entries[1].first("GLUE2LocationName"), Some("Genève"));
    }

    #[test]
    fn keeps_empty_values() {
        let entries = parse("dn: x,o=glue\nGLUE2ServiceAdminDomainForeignKey:\n");
        assert_eq!(entries[0].first("GLUE2ServiceAdminDomainForeignKey"), Some(""));
    }

    #[test]
    fn skips_malformed_lines() {
        let text = "dn: x,o=glue\r\n\
            objectClass: GLUE2Service\r\n\
            this line has no separator\r\n\
            bad name: value\r\n\
            GLUE2ServiceID:: not*base64\r\n\
            GLUE2ServiceType:< file:///etc/passwd\r\n\
            GLUE2ServiceID: x\r\n";
        let entries = parse(text);
        assert_eq!(entries.len(), 1);
        let names: Vec<_> = entries[0].attributes().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["objectClass", "GLUE2ServiceID"]);
        assert_eq!(entries[0].first("GLUE2ServiceID"), Some("x"));
    }

    #[test]
    fn dn_starts_a_new_entry_without_blank_line() {
        let entries = parse("dn: a,o=glue\nobjectClass: GLUE2Service\ndn: b,o=glue\nobjectClass: GLUE2Service\n");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].dn.as_deref(), Some("b,o=glue"));
    }

    #[test]
    fn fetch_selects_requested_objects() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bdii.ldif");
        std::fs::write(&path, SAMPLE).unwrap();

        let directory = LdifDirectory::new(&path);
        let request = FetchRequest::new("localhost:2170", vec![ObjectType::Location]);
        let entries = directory.fetch(&request).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].first("GLUE2LocationID"), Some("l1"));
    }

    #[test]
    fn fetch_reports_unreadable_files() {
        let dir = tempfile::tempdir().unwrap();
        let directory = LdifDirectory::new(dir.path().join("missing.ldif"));
        let request = FetchRequest::new("localhost:2170", vec![ObjectType::Service])
            .with_timeout(Duration::from_secs(5));
        match directory.fetch(&request) {
            Err(GinfoError::FetchFailure { host, reason }) => {
                assert_eq!(host, "localhost:2170");
                assert!(reason.contains("missing.ldif"));
            }
            other => panic!("expected fetch failure, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn fetch_times_out_when_the_snapshot_never_arrives() {
        let dir = tempfile::tempdir().unwrap();
        let fifo = dir.path().join("bdii.fifo");
        let status = std::process::Command::new("mkfifo")
            .arg(&fifo)
            .status()
            .unwrap();
        assert!(status.success());

        let directory = LdifDirectory::new(&fifo);
        let request = FetchRequest::new("h:2170", vec![ObjectType::Service])
            .with_timeout(Duration::from_secs(1));
        match directory.fetch(&request) {
            Err(GinfoError::FetchTimeout { host, seconds: 1 }) => assert_eq!(host, "h:2170"),
            other => panic!("expected fetch timeout, got {:?}", other),
        }

        // Opening the write end releases the reader still blocked on the fifo.
        drop(std::fs::OpenOptions::new().write(true).open(&fifo).unwrap());
    }
}
