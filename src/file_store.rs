//! In-memory virtual filesystem backing the portfolio commands.

use log::warn;
use std::env;

/// Identity of the portfolio owner. Seeds the virtual files and the
/// social-link commands.
#[derive(Debug, Clone)]
pub struct OwnerData {
    pub name: String,
    pub title: String,
    pub location: String,
    pub email: String,
    pub github_user: String,
    pub github_url: String,
    pub linkedin_url: String,
    pub kaggle_url: String,
    pub topmate_url: String,
}

impl OwnerData {
    pub fn defaults() -> Self {
        Self {
            name: "Alex Morgan".to_string(),
            title: "Software Developer".to_string(),
            location: "Portland, OR".to_string(),
            email: "alex.morgan.dev@gmail.com".to_string(),
            github_user: "alexmorgan-dev".to_string(),
            github_url: "https://github.com/alexmorgan-dev".to_string(),
            linkedin_url: "https://www.linkedin.com/in/alex-morgan-dev/".to_string(),
            kaggle_url: "https://www.kaggle.com/alexmorgandev".to_string(),
            topmate_url: "https://topmate.io/alexmorgan".to_string(),
        }
    }

    /// Defaults overridden by `PORTFOLIO_*` environment variables, so the
    /// binary can be rebranded without a rebuild.
    pub fn from_env() -> Self {
        let mut owner = Self::defaults();
        if let Ok(v) = env::var("PORTFOLIO_NAME") {
            owner.name = v;
        }
        if let Ok(v) = env::var("PORTFOLIO_TITLE") {
            owner.title = v;
        }
        if let Ok(v) = env::var("PORTFOLIO_LOCATION") {
            owner.location = v;
        }
        if let Ok(v) = env::var("PORTFOLIO_EMAIL") {
            owner.email = v;
        }
        if let Ok(v) = env::var("PORTFOLIO_GITHUB_USER") {
            owner.github_url = format!("https://github.com/{}", v);
            owner.github_user = v;
        }
        if let Ok(v) = env::var("PORTFOLIO_LINKEDIN_URL") {
            owner.linkedin_url = v;
        }
        if let Ok(v) = env::var("PORTFOLIO_KAGGLE_URL") {
            owner.kaggle_url = v;
        }
        if let Ok(v) = env::var("PORTFOLIO_TOPMATE_URL") {
            owner.topmate_url = v;
        }
        owner
    }

    /// Unix-style short user name: display name lowercased, spaces stripped.
    pub fn short_user(&self) -> String {
        self.name
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("")
    }
}

struct VirtualFile {
    name: String,
    content: String,
}

/// Fixed set of text files simulating a tiny read-mostly filesystem.
///
/// The file names are decided at startup. `set` only replaces the content
/// of an existing entry, which keeps the `ls` listing stable for the whole
/// session.
pub struct FileStore {
    files: Vec<VirtualFile>,
}

impl FileStore {
    pub fn seeded(owner: &OwnerData) -> Self {
        let files = vec![
            ("about.txt", about_text(owner)),
            ("skills.txt", skills_text()),
            ("projects.txt", projects_text(owner)),
            ("contact.txt", contact_text(owner)),
            ("education.txt", education_text()),
        ];
        Self {
            files: files
                .into_iter()
                .map(|(name, content)| VirtualFile {
                    name: name.to_string(),
                    content,
                })
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.files
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.content.as_str())
    }

    /// File names in seeding order. This is the `ls` display order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|f| f.name.as_str())
    }

    pub fn sizes(&self) -> impl Iterator<Item = (&str, usize)> {
        self.files.iter().map(|f| (f.name.as_str(), f.content.len()))
    }

    /// Replace the content of an existing file. Updating a name outside the
    /// seeded set is a programming error: it trips an assertion in debug
    /// builds and is a logged no-op in release builds.
    pub fn set(&mut self, name: &str, content: String) {
        match self.files.iter_mut().find(|f| f.name == name) {
            Some(file) => file.content = content,
            None => {
                debug_assert!(false, "set on unknown virtual file '{name}'");
                warn!("ignoring content update for unknown virtual file '{name}'");
            }
        }
    }
}

fn about_text(owner: &OwnerData) -> String {
    format!(
        "Name: {}\n\
         Title: {}\n\
         Location: {}\n\
         \n\
         I am a software developer who enjoys building small, sharp tools\n\
         and the occasional over-engineered side project. Most of my recent\n\
         work lives somewhere between systems programming and data plumbing.\n\
         \n\
         \"Code is like humor. When you have to explain it, it's bad.\" - Cory House",
        owner.name, owner.title, owner.location
    )
}

fn skills_text() -> String {
    "Programming Languages:\n\
     ├── Rust\n\
     ├── Python\n\
     ├── TypeScript\n\
     ├── Go\n\
     └── SQL\n\
     \n\
     Frameworks & Libraries:\n\
     ├── tokio\n\
     ├── egui\n\
     ├── React\n\
     ├── FastAPI\n\
     └── PostgreSQL\n\
     \n\
     Tools & Technologies:\n\
     ├── Git & GitHub\n\
     ├── Docker\n\
     ├── AWS\n\
     ├── Redis\n\
     └── Linux\n\
     \n\
     Data Science & ML:\n\
     ├── pandas\n\
     ├── NumPy\n\
     ├── scikit-learn\n\
     └── Jupyter notebooks"
        .to_string()
}

fn projects_text(owner: &OwnerData) -> String {
    format!(
        "Notable Projects:\n\
         \n\
         1. Portfolio Terminal\n\
         \u{20}  └── This app: an interactive shell-style portfolio\n\
         \u{20}  └── Tech: Rust, egui, tokio\n\
         \n\
         2. Kaggle Notebooks\n\
         \u{20}  └── Competition entries and exploratory data analysis\n\
         \u{20}  └── Tech: Python, pandas, scikit-learn\n\
         \n\
         3. Web Applications\n\
         \u{20}  └── Full-stack apps for small businesses\n\
         \u{20}  └── Tech: TypeScript, React, PostgreSQL\n\
         \n\
         4. ML Experiments\n\
         \u{20}  └── Predictive models and training pipelines\n\
         \u{20}  └── Tech: Python, scikit-learn\n\
         \n\
         Check out my GitHub for more: {}",
        owner.github_url
    )
}

fn contact_text(owner: &OwnerData) -> String {
    format!(
        "Get in Touch:\n\
         \n\
         Email: {}\n\
         GitHub: {}\n\
         LinkedIn: {}\n\
         Kaggle: {}\n\
         \n\
         Feel free to reach out for:\n\
         ├── Collaboration opportunities\n\
         ├── Technical discussions\n\
         ├── Project ideas\n\
         └── Just to say hi! 👋\n\
         \n\
         \"The best way to predict the future is to create it.\" - Peter Drucker",
        owner.email, owner.github_url, owner.linkedin_url, owner.kaggle_url
    )
}

fn education_text() -> String {
    "Education:\n\
     \n\
     Bachelor's Degree in Computer Science\n\
     └── Focus on systems programming and databases\n\
     \n\
     Certifications & Courses:\n\
     ├── Cloud computing fundamentals\n\
     ├── Data science specializations\n\
     └── Assorted deep dives into distributed systems\n\
     \n\
     Self-taught:\n\
     ├── Rust (the borrow checker and I are on speaking terms now)\n\
     ├── DevOps practices\n\
     └── Frontend frameworks"
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> FileStore {
        FileStore::seeded(&OwnerData::defaults())
    }

    #[test]
    fn seeded_names_keep_order() {
        let store = store();
        let names: Vec<&str> = store.names().collect();
        assert_eq!(
            names,
            vec![
                "about.txt",
                "skills.txt",
                "projects.txt",
                "contact.txt",
                "education.txt"
            ]
        );
    }

    #[test]
    fn get_returns_seeded_content() {
        let store = store();
        let about = store.get("about.txt").unwrap();
        assert!(about.contains("Alex Morgan"));
        assert!(store.get("nope.txt").is_none());
    }

    #[test]
    fn set_replaces_existing_content() {
        let mut store = store();
        store.set("about.txt", "rewritten".to_string());
        assert_eq!(store.get("about.txt"), Some("rewritten"));
        // The listing is unchanged by content updates.
        assert_eq!(store.names().count(), 5);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "unknown virtual file")]
    fn set_unknown_name_asserts_in_debug() {
        store().set("intruder.txt", "nope".to_string());
    }

    #[test]
    fn short_user_strips_spaces() {
        assert_eq!(OwnerData::defaults().short_user(), "alexmorgan");
    }
}
