//! The command interpreter: tokenizes input lines, dispatches them through
//! the command table, and produces tagged results for the front-end.
//!
//! Handlers never fail. Bad user input comes back as shell-style error
//! text, and the one handler that talks to the network (`scrape`) converts
//! collaborator failures into a readable summary instead of raising.

use crate::autocomplete::Vocabulary;
use crate::file_store::{FileStore, OwnerData};
use crate::profile_scraper::{
    GithubScraper, ProfileSnapshot, ProfileSource, SNAPSHOT_TTL,
};
use chrono::Local;
use log::warn;
use std::time::Instant;

/// External operation the interpreter asks the caller to perform. The
/// interpreter itself never touches windows, browsers, or the clipboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideEffect {
    OpenUrl(String),
    OpenEditor { filename: String, content: String },
}

/// Result of evaluating one input line. Exactly one per invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    Text(String),
    /// The caller must discard all prior output.
    ClearScreen,
    TextWithEffect { text: String, effect: SideEffect },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Basic,
    Files,
    Social,
    Data,
    System,
    Fun,
}

impl Section {
    fn heading(self) -> &'static str {
        match self {
            Section::Basic => "Basic Commands:",
            Section::Files => "File Operations:",
            Section::Social => "Social Links:",
            Section::Data => "Live Profile Data:",
            Section::System => "System Commands:",
            Section::Fun => "Easter Eggs:",
        }
    }
}

struct CommandSpec {
    name: &'static str,
    usage: &'static str,
    summary: &'static str,
    section: Section,
}

// Registration order is both the help display order and the order of
// autocomplete suggestions.
const COMMANDS: &[CommandSpec] = &[
    CommandSpec { name: "help", usage: "help", summary: "Show this help message", section: Section::Basic },
    CommandSpec { name: "about", usage: "about", summary: "Learn about me", section: Section::Basic },
    CommandSpec { name: "skills", usage: "skills", summary: "View my technical skills", section: Section::Basic },
    CommandSpec { name: "project", usage: "project <name>", summary: "Show details for one project", section: Section::Basic },
    CommandSpec { name: "projects", usage: "projects", summary: "See my projects", section: Section::Basic },
    CommandSpec { name: "contact", usage: "contact", summary: "Get my contact information", section: Section::Basic },
    CommandSpec { name: "education", usage: "education", summary: "View my educational background", section: Section::Basic },
    CommandSpec { name: "clear", usage: "clear", summary: "Clear the terminal", section: Section::Basic },
    CommandSpec { name: "ls", usage: "ls [dir]", summary: "List files and directories", section: Section::Files },
    CommandSpec { name: "cat", usage: "cat <file>", summary: "Display file contents", section: Section::Files },
    CommandSpec { name: "nano", usage: "nano <file>", summary: "Open a file in the editor", section: Section::Files },
    CommandSpec { name: "pwd", usage: "pwd", summary: "Show current directory", section: Section::Files },
    CommandSpec { name: "whoami", usage: "whoami", summary: "Display current user", section: Section::Files },
    CommandSpec { name: "github", usage: "github", summary: "Open my GitHub profile", section: Section::Social },
    CommandSpec { name: "linkedin", usage: "linkedin", summary: "Open my LinkedIn profile", section: Section::Social },
    CommandSpec { name: "kaggle", usage: "kaggle", summary: "Open my Kaggle profile", section: Section::Social },
    CommandSpec { name: "topmate", usage: "topmate", summary: "Book a session on Topmate", section: Section::Social },
    CommandSpec { name: "scrape", usage: "scrape", summary: "Refresh profile data from GitHub", section: Section::Data },
    CommandSpec { name: "repos", usage: "repos", summary: "List fetched repositories", section: Section::Data },
    CommandSpec { name: "stats", usage: "stats", summary: "Show fetched profile statistics", section: Section::Data },
    CommandSpec { name: "date", usage: "date", summary: "Show current date and time", section: Section::System },
    CommandSpec { name: "echo", usage: "echo <text>", summary: "Display text", section: Section::System },
    CommandSpec { name: "curl", usage: "curl -s wttr.in", summary: "Check the weather", section: Section::System },
    CommandSpec { name: "history", usage: "history", summary: "About command history", section: Section::System },
    CommandSpec { name: "exit", usage: "exit", summary: "Say goodbye", section: Section::System },
    CommandSpec { name: "sudo", usage: "sudo", summary: "Try it and see", section: Section::Fun },
    CommandSpec { name: "rm", usage: "rm", summary: "Try it and see", section: Section::Fun },
    CommandSpec { name: "vim", usage: "vim", summary: "Try it and see", section: Section::Fun },
];

struct ProjectInfo {
    key: &'static str,
    title: &'static str,
    detail: &'static str,
}

const PROJECTS: &[ProjectInfo] = &[
    ProjectInfo {
        key: "terminal",
        title: "Portfolio Terminal",
        detail: "The app you are using right now: a shell-style portfolio with a\n\
                 virtual filesystem, tab completion, and live GitHub statistics.\n\
                 Tech: Rust, egui, tokio, reqwest",
    },
    ProjectInfo {
        key: "notebooks",
        title: "Kaggle Notebooks",
        detail: "Competition entries and exploratory analysis notebooks, mostly\n\
                 tabular data and a little computer vision.\n\
                 Tech: Python, pandas, scikit-learn",
    },
    ProjectInfo {
        key: "webapps",
        title: "Web Applications",
        detail: "Full-stack applications for small businesses: booking, billing,\n\
                 and a deeply unglamorous amount of CSV import.\n\
                 Tech: TypeScript, React, PostgreSQL",
    },
    ProjectInfo {
        key: "mlkit",
        title: "ML Experiments",
        detail: "Predictive models and the training pipelines around them, from\n\
                 feature extraction to evaluation dashboards.\n\
                 Tech: Python, scikit-learn",
    },
];

const WEATHER_REPORT: &str = "🌤️  Weather Information:\n\
Location: Current Location\n\
Temperature: 24°C\n\
Condition: Partly Cloudy\n\
Humidity: 65%\n\
Wind: 8 km/h\n\
\n\
Note: This is a simulated weather response for demo purposes!";

// Fixed date shown in the fabricated `ls` metadata.
const LS_DATE: &str = "Jan 31 2025";

struct CachedSnapshot {
    data: ProfileSnapshot,
    fetched_at: Instant,
}

/// Owns the command table, the virtual files, the session history, and the
/// cached profile snapshot. One instance per session.
pub struct CommandProcessor {
    owner: OwnerData,
    files: FileStore,
    source: Box<dyn ProfileSource>,
    snapshot: Option<CachedSnapshot>,
    history: Vec<String>,
}

impl CommandProcessor {
    pub fn new(owner: OwnerData) -> Self {
        let source = GithubScraper::new(&owner.github_user, &owner.name);
        Self::with_source(owner, Box::new(source))
    }

    /// Construction seam for tests: any profile source can stand in for the
    /// GitHub scraper.
    pub fn with_source(owner: OwnerData, source: Box<dyn ProfileSource>) -> Self {
        let files = FileStore::seeded(&owner);
        Self {
            owner,
            files,
            source,
            snapshot: None,
            history: Vec::new(),
        }
    }

    pub fn owner(&self) -> &OwnerData {
        &self.owner
    }

    pub fn files(&self) -> &FileStore {
        &self.files
    }

    /// Accepted command lines, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Everything the Tab key can complete against.
    pub fn vocabulary(&self) -> Vocabulary {
        Vocabulary {
            commands: COMMANDS.iter().map(|c| c.name.to_string()).collect(),
            files: self.files.names().map(str::to_string).collect(),
            projects: PROJECTS.iter().map(|p| p.key.to_string()).collect(),
        }
    }

    /// Evaluate one input line.
    ///
    /// The command token is folded to lowercase; argument tokens pass
    /// through as typed. Whitespace-only lines produce empty text and are
    /// not recorded in the history. Only `scrape` actually suspends.
    pub async fn evaluate(&mut self, raw_line: &str) -> CommandResult {
        let line = raw_line.trim();
        if line.is_empty() {
            return CommandResult::Text(String::new());
        }
        self.history.push(line.to_string());

        let mut tokens = line.split_whitespace();
        let Some(first) = tokens.next() else {
            return CommandResult::Text(String::new());
        };
        let command = first.to_lowercase();
        let args: Vec<&str> = tokens.collect();

        match command.as_str() {
            "help" => CommandResult::Text(self.help_text()),
            "about" | "skills" | "projects" | "contact" | "education" => {
                CommandResult::Text(self.file_text(&format!("{command}.txt")))
            }
            "project" => CommandResult::Text(self.project_detail(args.first().copied())),
            "ls" => CommandResult::Text(self.list_files(args.first().copied())),
            "cat" => CommandResult::Text(self.read_file(args.first().copied())),
            "pwd" => CommandResult::Text(format!("/home/{}", self.owner.short_user())),
            "whoami" => CommandResult::Text(self.owner.name.clone()),
            "date" => CommandResult::Text(
                Local::now().format("%a %b %e %H:%M:%S %Y").to_string(),
            ),
            "clear" => CommandResult::ClearScreen,
            // Whitespace runs collapse: tokens rejoined with single spaces.
            "echo" => CommandResult::Text(args.join(" ")),
            "github" => self.open_link("GitHub", &self.owner.github_url),
            "linkedin" => self.open_link("LinkedIn", &self.owner.linkedin_url),
            "kaggle" => self.open_link("Kaggle", &self.owner.kaggle_url),
            "topmate" => self.open_link("Topmate", &self.owner.topmate_url),
            "curl" => CommandResult::Text(self.curl(&args)),
            "nano" => self.nano(args.first().copied()),
            "sudo" => CommandResult::Text(
                "Nice try! But you don't have sudo access to this portfolio 😄".to_string(),
            ),
            "rm" => CommandResult::Text(
                "rm: Permission denied. You cannot delete this portfolio! 😅".to_string(),
            ),
            "vim" => CommandResult::Text(
                "vim: Editor not available in this terminal. Try 'nano <file>' instead!"
                    .to_string(),
            ),
            "history" => CommandResult::Text(
                "Command history is managed by the terminal. Use ↑/↓ arrow keys!".to_string(),
            ),
            "exit" => CommandResult::Text("Thanks for visiting! Come back soon! 👋".to_string()),
            "scrape" => CommandResult::Text(self.scrape().await),
            "repos" => CommandResult::Text(self.repos()),
            "stats" => CommandResult::Text(self.stats()),
            _ => CommandResult::Text(format!(
                "Command '{}' not found. Type 'help' for available commands.",
                command
            )),
        }
    }

    fn file_text(&self, name: &str) -> String {
        self.files.get(name).map(str::to_string).unwrap_or_default()
    }

    fn help_text(&self) -> String {
        let mut out = String::from("Available Commands:\n");
        for section in [
            Section::Basic,
            Section::Files,
            Section::Social,
            Section::Data,
            Section::System,
            Section::Fun,
        ] {
            let entries: Vec<&CommandSpec> =
                COMMANDS.iter().filter(|c| c.section == section).collect();
            out.push('\n');
            out.push_str(section.heading());
            out.push('\n');
            for (i, spec) in entries.iter().enumerate() {
                let branch = if i + 1 == entries.len() { "└──" } else { "├──" };
                out.push_str(&format!("{} {:<16} {}\n", branch, spec.usage, spec.summary));
            }
        }
        out.push_str(
            "\nTips:\n\
             ├── Use ↑/↓ arrow keys for command history\n\
             ├── Use Tab for command auto-completion\n\
             └── Commands are case-insensitive",
        );
        out
    }

    fn project_detail(&self, key: Option<&str>) -> String {
        let keys = || {
            PROJECTS
                .iter()
                .map(|p| p.key)
                .collect::<Vec<_>>()
                .join(", ")
        };
        match key {
            None => format!(
                "Usage: project <name>\nKnown projects: {}",
                keys()
            ),
            Some(raw) => {
                let wanted = raw.to_lowercase();
                match PROJECTS.iter().find(|p| p.key == wanted) {
                    Some(project) => format!("{}\n\n{}", project.title, project.detail),
                    None => format!(
                        "project: '{}' not found. Known projects: {}",
                        raw,
                        keys()
                    ),
                }
            }
        }
    }

    fn list_files(&self, dir: Option<&str>) -> String {
        if let Some(dir) = dir {
            if dir != "." && dir != "~" {
                return format!("ls: cannot access '{}': No such file or directory", dir);
            }
        }
        let user = self.owner.short_user();
        let mut out = String::from("total 8\n");
        out.push_str(&format!("drwxr-xr-x 2 {user} {user} 4096 {LS_DATE} .\n"));
        out.push_str(&format!("drwxr-xr-x 3 {user} {user} 4096 {LS_DATE} ..\n"));
        for (name, size) in self.files.sizes() {
            out.push_str(&format!(
                "-rw-r--r-- 1 {user} {user} {size:>4} {LS_DATE} {name}\n"
            ));
        }
        out.pop();
        out
    }

    fn read_file(&self, filename: Option<&str>) -> String {
        match filename {
            None => "cat: missing file operand\nTry 'cat <filename>' or 'ls' to see available files."
                .to_string(),
            Some(name) => match self.files.get(name) {
                Some(content) => content.to_string(),
                None => format!("cat: {}: No such file or directory", name),
            },
        }
    }

    fn open_link(&self, label: &str, url: &str) -> CommandResult {
        CommandResult::TextWithEffect {
            text: format!("Opening {} profile: {}", label, url),
            effect: SideEffect::OpenUrl(url.to_string()),
        }
    }

    fn curl(&self, args: &[&str]) -> String {
        if args == ["-s", "wttr.in"] {
            WEATHER_REPORT.to_string()
        } else {
            format!("curl: {}: command not found", args.join(" "))
        }
    }

    fn nano(&self, filename: Option<&str>) -> CommandResult {
        match filename {
            None => CommandResult::Text(
                "nano: missing file operand\nTry 'nano <filename>' to open one of the files from 'ls'."
                    .to_string(),
            ),
            Some(name) => CommandResult::TextWithEffect {
                text: format!("Opening {} in the editor. Ctrl+X to close.", name),
                effect: SideEffect::OpenEditor {
                    filename: name.to_string(),
                    content: self.files.get(name).unwrap_or("").to_string(),
                },
            },
        }
    }

    /// Refresh the profile snapshot and rewrite the derived files.
    ///
    /// A snapshot younger than the TTL is reused without refetching, which
    /// makes back-to-back invocations idempotent. A failed fetch leaves the
    /// file store exactly as it was.
    async fn scrape(&mut self) -> String {
        if let Some(cached) = &self.snapshot {
            if cached.fetched_at.elapsed() < SNAPSHOT_TTL {
                let minutes = cached.fetched_at.elapsed().as_secs() / 60;
                return format!(
                    "Profile data is still fresh (fetched {} minute(s) ago). Using the cached snapshot.\n{}",
                    minutes,
                    scrape_summary(&cached.data)
                );
            }
        }

        match self.source.fetch().await {
            Ok(snapshot) => {
                self.files
                    .set("about.txt", refreshed_about(&self.owner, &snapshot));
                self.files
                    .set("projects.txt", refreshed_projects(&self.owner, &snapshot));
                let summary = format!("Profile refresh complete!\n{}", scrape_summary(&snapshot));
                self.snapshot = Some(CachedSnapshot {
                    data: snapshot,
                    fetched_at: Instant::now(),
                });
                summary
            }
            Err(err) => {
                warn!("profile refresh failed: {err:#}");
                format!(
                    "scrape: failed to refresh profile data: {}\nCached files are untouched. Try again later.",
                    err
                )
            }
        }
    }

    fn repos(&self) -> String {
        let Some(cached) = &self.snapshot else {
            return no_snapshot_hint();
        };
        let snapshot = &cached.data;
        let mut out = format!(
            "Public repositories ({} total, showing top {}):\n",
            snapshot.public_repos,
            snapshot.repositories.len()
        );
        if snapshot.repositories.is_empty() {
            out.push_str("(no public repositories found)");
            return out;
        }
        for (i, repo) in snapshot.repositories.iter().enumerate() {
            out.push_str(&format!(
                "\n{}. {} ({}) ★ {} ⑂ {}\n   └── {}\n   └── {}",
                i + 1,
                repo.name,
                repo.language,
                repo.stars,
                repo.forks,
                repo.description,
                repo.url
            ));
        }
        out
    }

    fn stats(&self) -> String {
        let Some(cached) = &self.snapshot else {
            return no_snapshot_hint();
        };
        let snapshot = &cached.data;
        let top = snapshot
            .repositories
            .first()
            .map(|r| format!("{} (★ {})", r.name, r.stars))
            .unwrap_or_else(|| "(none)".to_string());
        let minutes = cached.fetched_at.elapsed().as_secs() / 60;
        format!(
            "GitHub statistics for {}:\n\
             ├── Followers:    {}\n\
             ├── Following:    {}\n\
             ├── Public repos: {}\n\
             └── Top repository: {}\n\
             \n\
             Snapshot age: {} minute(s). 'scrape' refetches after 30 minutes.",
            snapshot.name,
            snapshot.followers,
            snapshot.following,
            snapshot.public_repos,
            top,
            minutes
        )
    }
}

fn no_snapshot_hint() -> String {
    "No profile data cached yet. Run 'scrape' to fetch it.".to_string()
}

fn scrape_summary(snapshot: &ProfileSnapshot) -> String {
    format!(
        "✓ GitHub: {} public repos, {} followers\n\
         ✓ Updated files: about.txt, projects.txt\n\
         Run 'repos' or 'stats' for details.",
        snapshot.public_repos, snapshot.followers
    )
}

fn refreshed_about(owner: &OwnerData, snapshot: &ProfileSnapshot) -> String {
    format!(
        "Name: {}\n\
         Title: {}\n\
         Location: {}\n\
         \n\
         {}\n\
         \n\
         GitHub: {} followers, {} following, {} public repositories",
        snapshot.name,
        owner.title,
        owner.location,
        snapshot.bio,
        snapshot.followers,
        snapshot.following,
        snapshot.public_repos
    )
}

fn refreshed_projects(owner: &OwnerData, snapshot: &ProfileSnapshot) -> String {
    let mut out = String::from("Top GitHub repositories:\n");
    if snapshot.repositories.is_empty() {
        out.push_str("\n(no public repositories found)\n");
    }
    for (i, repo) in snapshot.repositories.iter().enumerate() {
        out.push_str(&format!(
            "\n{}. {} ({}) ★ {}\n   └── {}\n   └── {}\n",
            i + 1,
            repo.name,
            repo.language,
            repo.stars,
            repo.description,
            repo.url
        ));
    }
    out.push_str(&format!("\nCheck out my GitHub for more: {}", owner.github_url));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct FakeSource {
        snapshot: ProfileSnapshot,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ProfileSource for FakeSource {
        async fn fetch(&self) -> anyhow::Result<ProfileSnapshot> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.snapshot.clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl ProfileSource for FailingSource {
        async fn fetch(&self) -> anyhow::Result<ProfileSnapshot> {
            bail!("network unreachable")
        }
    }

    fn sample_snapshot() -> ProfileSnapshot {
        ProfileSnapshot {
            name: "Alex Morgan".to_string(),
            bio: "Builds small, sharp tools.".to_string(),
            followers: 42,
            following: 7,
            public_repos: 19,
            repositories: vec![
                crate::profile_scraper::RepoInfo {
                    name: "portfolio-terminal".to_string(),
                    description: "Shell-style portfolio".to_string(),
                    language: "Rust".to_string(),
                    stars: 12,
                    forks: 3,
                    url: "https://github.com/alexmorgan-dev/portfolio-terminal".to_string(),
                },
                crate::profile_scraper::RepoInfo {
                    name: "csv-wrangler".to_string(),
                    description: "No description available".to_string(),
                    language: "Python".to_string(),
                    stars: 4,
                    forks: 0,
                    url: "https://github.com/alexmorgan-dev/csv-wrangler".to_string(),
                },
            ],
        }
    }

    fn processor() -> CommandProcessor {
        CommandProcessor::with_source(OwnerData::defaults(), Box::new(FailingSource))
    }

    fn processor_with_counting_source() -> (CommandProcessor, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = FakeSource {
            snapshot: sample_snapshot(),
            calls: Arc::clone(&calls),
        };
        (
            CommandProcessor::with_source(OwnerData::defaults(), Box::new(source)),
            calls,
        )
    }

    fn text(result: CommandResult) -> String {
        match result {
            CommandResult::Text(text) => text,
            other => panic!("expected plain text, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn unknown_command_reports_exact_text() {
        let mut p = processor();
        assert_eq!(
            text(p.evaluate("frobnicate").await),
            "Command 'frobnicate' not found. Type 'help' for available commands."
        );
        // The reported name is case-folded.
        assert_eq!(
            text(p.evaluate("FROBNICATE").await),
            "Command 'frobnicate' not found. Type 'help' for available commands."
        );
    }

    #[tokio::test]
    async fn blank_lines_are_no_ops_and_skip_history() {
        let mut p = processor();
        assert_eq!(text(p.evaluate("").await), "");
        assert_eq!(text(p.evaluate("   ").await), "");
        assert!(p.history().is_empty());
        p.evaluate("whoami").await;
        assert_eq!(p.history(), ["whoami"]);
    }

    #[tokio::test]
    async fn command_lookup_is_case_insensitive() {
        let mut p = processor();
        assert_eq!(p.evaluate("CLEAR").await, CommandResult::ClearScreen);
        assert_eq!(p.evaluate("Clear").await, CommandResult::ClearScreen);
    }

    #[tokio::test]
    async fn cat_returns_file_content_verbatim() {
        let mut p = processor();
        let expected = p.files().get("about.txt").unwrap().to_string();
        assert_eq!(text(p.evaluate("cat about.txt").await), expected);
    }

    #[tokio::test]
    async fn cat_errors_match_shell_conventions() {
        let mut p = processor();
        assert_eq!(
            text(p.evaluate("cat missing.txt").await),
            "cat: missing.txt: No such file or directory"
        );
        assert!(text(p.evaluate("cat").await).starts_with("cat: missing file operand"));
    }

    #[tokio::test]
    async fn ls_rejects_unknown_paths_and_lists_consistently() {
        let mut p = processor();
        assert_eq!(
            text(p.evaluate("ls badpath").await),
            "ls: cannot access 'badpath': No such file or directory"
        );
        let plain = text(p.evaluate("ls").await);
        assert_eq!(plain, text(p.evaluate("ls .").await));
        assert_eq!(plain, text(p.evaluate("ls ~").await));
        for name in p.files().names() {
            assert!(plain.contains(name), "listing is missing {name}");
        }
    }

    #[tokio::test]
    async fn echo_collapses_whitespace_runs() {
        let mut p = processor();
        assert_eq!(text(p.evaluate("echo a  b").await), "a b");
        assert_eq!(text(p.evaluate("echo   spaced   out  ").await), "spaced out");
    }

    #[tokio::test]
    async fn pwd_and_whoami_derive_from_owner() {
        let mut p = processor();
        assert_eq!(text(p.evaluate("pwd").await), "/home/alexmorgan");
        assert_eq!(text(p.evaluate("whoami").await), "Alex Morgan");
    }

    #[tokio::test]
    async fn social_commands_request_url_side_effect() {
        let mut p = processor();
        let url = p.owner().github_url.clone();
        match p.evaluate("github").await {
            CommandResult::TextWithEffect { text, effect } => {
                assert!(text.contains(&url));
                assert_eq!(effect, SideEffect::OpenUrl(url));
            }
            other => panic!("expected side effect, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn curl_only_supports_simulated_weather() {
        let mut p = processor();
        assert!(text(p.evaluate("curl -s wttr.in").await).contains("Weather Information"));
        assert_eq!(
            text(p.evaluate("curl -s example.com").await),
            "curl: -s example.com: command not found"
        );
    }

    #[tokio::test]
    async fn nano_opens_editor_with_seed_content() {
        let mut p = processor();
        let seed = p.files().get("about.txt").unwrap().to_string();
        match p.evaluate("nano about.txt").await {
            CommandResult::TextWithEffect { effect, .. } => {
                assert_eq!(
                    effect,
                    SideEffect::OpenEditor {
                        filename: "about.txt".to_string(),
                        content: seed,
                    }
                );
            }
            other => panic!("expected editor side effect, got {:?}", other),
        }
        // Unknown names open an empty buffer.
        match p.evaluate("nano notes.txt").await {
            CommandResult::TextWithEffect { effect, .. } => {
                assert_eq!(
                    effect,
                    SideEffect::OpenEditor {
                        filename: "notes.txt".to_string(),
                        content: String::new(),
                    }
                );
            }
            other => panic!("expected editor side effect, got {:?}", other),
        }
        assert!(text(p.evaluate("nano").await).starts_with("nano: missing file operand"));
    }

    #[tokio::test]
    async fn project_lookup_handles_usage_known_and_unknown() {
        let mut p = processor();
        assert!(text(p.evaluate("project").await).starts_with("Usage: project <name>"));
        let detail = text(p.evaluate("project TERMINAL").await);
        assert!(detail.contains("Portfolio Terminal"));
        let missing = text(p.evaluate("project blockchain").await);
        assert!(missing.contains("'blockchain' not found"));
        assert!(missing.contains("terminal"));
    }

    #[tokio::test]
    async fn canned_commands_keep_their_scripts() {
        let mut p = processor();
        assert!(text(p.evaluate("sudo make me a sandwich").await).contains("Nice try"));
        assert!(text(p.evaluate("rm -rf /").await).contains("Permission denied"));
        assert!(text(p.evaluate("vim about.txt").await).contains("nano"));
        assert!(text(p.evaluate("history").await).contains("arrow keys"));
        assert!(text(p.evaluate("exit").await).contains("Thanks for visiting"));
    }

    #[tokio::test]
    async fn help_lists_every_command() {
        let mut p = processor();
        let help = text(p.evaluate("help").await);
        for spec in COMMANDS {
            assert!(help.contains(spec.name), "help is missing '{}'", spec.name);
        }
    }

    #[tokio::test]
    async fn scrape_overwrites_files_and_reuses_fresh_snapshot() {
        let (mut p, calls) = processor_with_counting_source();
        let summary = text(p.evaluate("scrape").await);
        assert!(summary.contains("Profile refresh complete"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let projects = p.files().get("projects.txt").unwrap().to_string();
        assert!(projects.contains("portfolio-terminal"));
        let about = p.files().get("about.txt").unwrap().to_string();
        assert!(about.contains("42 followers"));

        // Within the TTL a second scrape reuses the cache: no new fetch and
        // identical store content.
        let again = text(p.evaluate("scrape").await);
        assert!(again.contains("still fresh"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(p.files().get("projects.txt"), Some(projects.as_str()));
        assert_eq!(p.files().get("about.txt"), Some(about.as_str()));
    }

    #[tokio::test]
    async fn scrape_failure_degrades_without_touching_store() {
        let mut p = processor();
        let before: Vec<String> = p
            .files()
            .names()
            .map(|n| p.files().get(n).unwrap().to_string())
            .collect();
        let result = text(p.evaluate("scrape").await);
        assert!(result.contains("scrape: failed to refresh profile data"));
        assert!(result.contains("network unreachable"));
        let after: Vec<String> = p
            .files()
            .names()
            .map(|n| p.files().get(n).unwrap().to_string())
            .collect();
        assert_eq!(before, after);
        // The failed attempt caches nothing.
        assert_eq!(
            text(p.evaluate("stats").await),
            "No profile data cached yet. Run 'scrape' to fetch it."
        );
    }

    #[tokio::test]
    async fn repos_and_stats_require_a_snapshot() {
        let mut p = processor();
        assert_eq!(
            text(p.evaluate("repos").await),
            "No profile data cached yet. Run 'scrape' to fetch it."
        );
        assert_eq!(
            text(p.evaluate("stats").await),
            "No profile data cached yet. Run 'scrape' to fetch it."
        );
    }

    #[tokio::test]
    async fn repos_and_stats_render_the_snapshot() {
        let (mut p, _calls) = processor_with_counting_source();
        p.evaluate("scrape").await;
        let repos = text(p.evaluate("repos").await);
        assert!(repos.contains("portfolio-terminal"));
        assert!(repos.contains("csv-wrangler"));
        let stats = text(p.evaluate("stats").await);
        assert!(stats.contains("Followers:    42"));
        assert!(stats.contains("portfolio-terminal (★ 12)"));
    }

    #[tokio::test]
    async fn history_records_commands_in_order() {
        let mut p = processor();
        p.evaluate("whoami").await;
        p.evaluate("ls").await;
        p.evaluate("nonsense").await;
        assert_eq!(p.history(), ["whoami", "ls", "nonsense"]);
    }

    #[tokio::test]
    async fn vocabulary_covers_commands_files_and_projects() {
        let p = processor();
        let vocab = p.vocabulary();
        assert!(vocab.commands.iter().any(|c| c == "scrape"));
        assert!(vocab.files.iter().any(|f| f == "education.txt"));
        assert!(vocab.projects.iter().any(|k| k == "terminal"));
    }

    #[test]
    fn ambiguous_project_prefix_suggests_in_registration_order() {
        use crate::autocomplete::{complete, Completion};
        let vocab = processor().vocabulary();
        assert_eq!(
            complete("pro", &vocab),
            Completion::Suggestions(vec!["project".to_string(), "projects".to_string()])
        );
    }
}
