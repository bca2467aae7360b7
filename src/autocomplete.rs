//! Tab-completion over the command table and the argument vocabularies.

/// Outcome of a completion query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Exactly one candidate matched; the full replacement input line.
    Completed(String),
    /// Several candidates matched, in registration order. The caller
    /// displays these and leaves the input untouched.
    Suggestions(Vec<String>),
    /// Nothing matched (or the input shape takes no completion).
    NoMatch,
}

/// Snapshot of everything completable. Built once by the interpreter since
/// none of the vocabularies change during a session.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    pub commands: Vec<String>,
    pub files: Vec<String>,
    pub projects: Vec<String>,
}

const DIR_TOKENS: &[&str] = &[".", "..", "~"];

/// Complete a partial input line.
///
/// A lone command token matches against the command vocabulary. A second
/// token is completed only for `cat` (file names), `project` (project
/// keys), and `ls` (directory tokens); anything else takes no completion.
pub fn complete(partial: &str, vocab: &Vocabulary) -> Completion {
    let mut tokens = partial.split_whitespace();
    let Some(first) = tokens.next() else {
        return Completion::NoMatch;
    };
    let second = tokens.next();
    if tokens.next().is_some() {
        return Completion::NoMatch;
    }

    // A trailing space moves completion on to the (empty) argument token.
    let argument = match second {
        Some(arg) => Some(arg),
        None if partial.ends_with(char::is_whitespace) => Some(""),
        None => None,
    };

    let command = first.to_lowercase();
    match argument {
        None => match_candidates(&command, vocab.commands.iter().map(String::as_str)),
        Some(arg) => {
            let matched = match command.as_str() {
                "cat" => match_candidates(arg, vocab.files.iter().map(String::as_str)),
                "project" => {
                    let key = arg.to_lowercase();
                    match_candidates(&key, vocab.projects.iter().map(String::as_str))
                }
                "ls" => match_candidates(arg, DIR_TOKENS.iter().copied()),
                _ => Completion::NoMatch,
            };
            // A singular argument match completes the whole line.
            match matched {
                Completion::Completed(arg) => {
                    Completion::Completed(format!("{} {}", command, arg))
                }
                other => other,
            }
        }
    }
}

fn match_candidates<'a>(
    prefix: &str,
    candidates: impl Iterator<Item = &'a str>,
) -> Completion {
    let matches: Vec<String> = candidates
        .filter(|c| c.starts_with(prefix))
        .map(str::to_string)
        .collect();
    match matches.len() {
        0 => Completion::NoMatch,
        1 => Completion::Completed(matches.into_iter().next().unwrap_or_default()),
        _ => Completion::Suggestions(matches),
    }
}
