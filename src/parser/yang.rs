//! Header scanner for YANG module files.
//!
//! Only statement headers matter here: the `module`/`submodule`
//! declaration, `import` and `include` statements, and `revision`
//! statements. Everything else in a file is skipped line by line, so the
//! scanner copes with any body syntax without a grammar.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::error::ScanError;
use crate::graph::types::{DependencyRef, ModuleKind, Relation};

static MODULE_HEADER: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r#"^\s*(module|submodule)\s+["']?([A-Za-z_][A-Za-z0-9_.\-]*)(?:@([0-9][0-9\-]*))?["']?\s*(.*)$"#,
    )
    .ok()
});

static MODULE_KEYWORD: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\s*(module|submodule)(\s|$)").ok());

static DEPENDENCY_HEADER: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r#"^\s*(import|include)\s+["']?([A-Za-z_][A-Za-z0-9_.\-]*)(?:@[0-9\-]*)?["']?\s*([{;])?"#,
    )
    .ok()
});

static REVISION_HEADER: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r#"^\s*revision\s+["']?([0-9]{4}-[0-9]{2}-[0-9]{2})["']?\s*([{;])?"#).ok()
});

/// What a module file declares, independent of where it lives on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDeclaration {
    pub name: String,
    pub kind: ModuleKind,
    /// Latest revision seen in the header or in `revision` statements.
    pub revision: Option<String>,
    /// Distinct dependencies in order of first declaration, each carrying
    /// the strongest relation declared for it.
    pub dependencies: Vec<DependencyRef>,
}

/// A line that survives comment and blank-line stripping, with comment
/// spans and continuation lines of multi-line strings removed.
struct SourceLine {
    number: usize,
    text: String,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Lexeme {
    Code,
    BlockComment,
    DoubleQuoted,
    SingleQuoted,
}

/// Strip `//` and `/* ... */` comments wherever they appear and drop the
/// lines that are left blank. Comment markers inside quoted strings are
/// text. A string that runs past the end of its line hides the following
/// lines until it closes, so prose in descriptions never reads as a header.
fn significant_lines(source: &str) -> Vec<SourceLine> {
    let mut lines = Vec::new();
    let mut state = Lexeme::Code;

    for (idx, raw) in source.lines().enumerate() {
        let mut hidden = matches!(state, Lexeme::DoubleQuoted | Lexeme::SingleQuoted);
        let mut text = String::with_capacity(raw.len());
        let mut chars = raw.chars().peekable();

        while let Some(c) = chars.next() {
            match state {
                Lexeme::BlockComment => {
                    if c == '*' && chars.peek() == Some(&'/') {
                        chars.next();
                        state = Lexeme::Code;
                        // keep the tokens on either side apart
                        text.push(' ');
                    }
                }
                Lexeme::DoubleQuoted | Lexeme::SingleQuoted => {
                    if !hidden {
                        text.push(c);
                    }
                    if state == Lexeme::DoubleQuoted && c == '\\' {
                        if let Some(escaped) = chars.next() {
                            if !hidden {
                                text.push(escaped);
                            }
                        }
                    } else if (state == Lexeme::DoubleQuoted && c == '"')
                        || (state == Lexeme::SingleQuoted && c == '\'')
                    {
                        state = Lexeme::Code;
                        hidden = false;
                    }
                }
                Lexeme::Code => match (c, chars.peek()) {
                    ('/', Some(&'/')) => break,
                    ('/', Some(&'*')) => {
                        chars.next();
                        state = Lexeme::BlockComment;
                    }
                    ('"', _) => {
                        text.push(c);
                        state = Lexeme::DoubleQuoted;
                    }
                    ('\'', _) => {
                        text.push(c);
                        state = Lexeme::SingleQuoted;
                    }
                    _ => text.push(c),
                },
            }
        }

        if !text.trim().is_empty() {
            lines.push(SourceLine {
                number: idx + 1,
                text,
            });
        }
    }

    lines
}

fn next_starts_with(lines: &[SourceLine], idx: usize, terminators: &[char]) -> bool {
    lines
        .get(idx + 1)
        .and_then(|line| line.text.trim_start().chars().next())
        .is_some_and(|c| terminators.contains(&c))
}

fn keep_latest(current: &mut Option<String>, candidate: &str) {
    if current.as_deref().map_or(true, |rev| candidate > rev) {
        *current = Some(candidate.to_string());
    }
}

/// Scan one file's text.
///
/// Returns [`ScanError::NotAModule`] when no declaration header exists and
/// [`ScanError::Malformed`] when the declaration header is unterminated or
/// has no name. Import and include lines that are never terminated by `{`
/// or `;` are treated as prose and ignored.
pub fn scan_module(source: &str) -> Result<ModuleDeclaration, ScanError> {
    let (Some(module_re), Some(keyword_re), Some(dep_re), Some(rev_re)) = (
        MODULE_HEADER.as_ref(),
        MODULE_KEYWORD.as_ref(),
        DEPENDENCY_HEADER.as_ref(),
        REVISION_HEADER.as_ref(),
    ) else {
        return Err(ScanError::NotAModule);
    };

    let lines = significant_lines(source);
    let mut header: Option<(String, ModuleKind)> = None;
    let mut revision: Option<String> = None;
    let mut dependencies: Vec<DependencyRef> = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();

    for (idx, line) in lines.iter().enumerate() {
        if header.is_none() {
            if let Some(caps) = module_re.captures(&line.text) {
                let tail = caps.get(4).map_or("", |m| m.as_str()).trim();
                let terminated = if tail.is_empty() {
                    next_starts_with(&lines, idx, &['{'])
                } else {
                    tail.starts_with('{')
                };
                if !terminated {
                    return Err(ScanError::Malformed {
                        line: line.number,
                        reason: "unterminated declaration header".into(),
                    });
                }
                let kind = if &caps[1] == "submodule" {
                    ModuleKind::Submodule
                } else {
                    ModuleKind::Module
                };
                if let Some(rev) = caps.get(3) {
                    keep_latest(&mut revision, rev.as_str());
                }
                header = Some((caps[2].to_string(), kind));
            } else if keyword_re.is_match(&line.text) {
                return Err(ScanError::Malformed {
                    line: line.number,
                    reason: "declaration header without a module name".into(),
                });
            }
            continue;
        }

        if let Some(caps) = dep_re.captures(&line.text) {
            if caps.get(3).is_none() && !next_starts_with(&lines, idx, &['{', ';']) {
                continue;
            }
            let relation = if &caps[1] == "include" {
                Relation::Include
            } else {
                Relation::Import
            };
            let name = &caps[2];
            match seen.get(name) {
                Some(&pos) => {
                    let dep = &mut dependencies[pos];
                    dep.relation = dep.relation.strongest(relation);
                }
                None => {
                    seen.insert(name.to_string(), dependencies.len());
                    dependencies.push(DependencyRef {
                        name: name.to_string(),
                        relation,
                    });
                }
            }
        } else if let Some(caps) = rev_re.captures(&line.text) {
            keep_latest(&mut revision, &caps[1]);
        }
    }

    let (name, kind) = header.ok_or(ScanError::NotAModule)?;
    Ok(ModuleDeclaration {
        name,
        kind,
        revision,
        dependencies,
    })
}
