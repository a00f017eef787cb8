//! Integration tests for mdcredits

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use git2::{Repository, Signature, Time};
    use predicates::prelude::*;
    use std::path::Path;
    use tempfile::TempDir;

    /// Scratch workspace: a git repository plus an isolated config file
    struct Workspace {
        dir: TempDir,
    }

    impl Workspace {
        fn new(authors: &[(&str, &str)]) -> Self {
            let dir = TempDir::new().unwrap();
            let repo = Repository::init(dir.path().join("repo")).unwrap();

            for (i, (name, email)) in authors.iter().enumerate() {
                let time = Time::new(1_600_000_000 + i as i64 * 86_400, 0);
                let sig = Signature::new(name, email, &time).unwrap();
                let tree_id = repo.index().unwrap().write_tree().unwrap();
                let tree = repo.find_tree(tree_id).unwrap();
                let parent = repo.head().ok().map(|h| h.peel_to_commit().unwrap());
                let parents: Vec<&git2::Commit> = parent.iter().collect();
                repo.commit(Some("HEAD"), &sig, &sig, "change", &tree, &parents)
                    .unwrap();
            }

            Self { dir }
        }

        fn root(&self) -> &Path {
            self.dir.path()
        }

        fn config(&self) -> std::path::PathBuf {
            self.root().join("config.toml")
        }

        fn mdcredits(&self) -> Command {
            let mut cmd = cargo_bin_cmd!("mdcredits");
            cmd.env("MDCREDITS_CONFIG", self.config())
                .env_remove("RUST_LOG");
            cmd
        }

        /// Generating command run against the workspace repository
        fn generate(&self, args: &[&str]) -> Command {
            let mut cmd = self.mdcredits();
            cmd.args(args).arg("-C").arg(self.root().join("repo"));
            cmd
        }
    }

    fn mdcredits() -> Command {
        cargo_bin_cmd!("mdcredits")
    }

    fn crew() -> Workspace {
        Workspace::new(&[
            ("Arthur Dent", "arthur@earth.example"),
            ("Ford Prefect", "ford@betelgeuse.sid"),
        ])
    }

    #[test]
    fn help_displays() {
        mdcredits()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("contributor lists"));
    }

    #[test]
    fn version_displays() {
        mdcredits()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("mdcredits"));
    }

    #[test]
    fn print_lists_history() {
        let ws = crew();
        ws.generate(&["print", "--forge", "none"])
            .assert()
            .success()
            .stdout("1. Arthur Dent\n2. Ford Prefect\n");
    }

    #[test]
    fn print_with_classic_format() {
        let ws = crew();
        ws.generate(&["print", "--forge", "none", "-f", "classic"])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "- Arthur Dent (<arthur@earth.example>)\n",
            ));
    }

    #[test]
    fn print_append_reads_stdin() {
        let ws = crew();
        ws.generate(&["print", "--forge", "none", "--append"])
            .write_stdin("1. Arthur Dent\n")
            .assert()
            .success()
            .stdout("2. Ford Prefect\n");
    }

    #[test]
    fn print_ignores_listed_authors() {
        let ws = crew();
        ws.generate(&["print", "--forge", "none", "-x", "ford@betelgeuse.sid"])
            .assert()
            .success()
            .stdout("1. Arthur Dent\n");
    }

    #[test]
    fn update_fills_block() {
        let ws = crew();
        let doc = ws.root().join("AUTHORS.md");
        std::fs::write(&doc, "# Authors\n\n<!-- authors -->\n<!-- endauthors -->\n").unwrap();

        ws.generate(&["update", "--forge", "none"])
            .arg(&doc)
            .assert()
            .success()
            .stderr(predicate::str::contains("added 2 author(s)"));

        assert_eq!(
            std::fs::read_to_string(&doc).unwrap(),
            "# Authors\n\n<!-- authors -->\n\n1. Arthur Dent\n2. Ford Prefect\n\n<!-- endauthors -->\n"
        );
    }

    #[test]
    fn update_append_keeps_manual_entries() {
        let ws = crew();
        let doc = ws.root().join("AUTHORS.md");
        std::fs::write(
            &doc,
            "<!-- authors -->\n1. Zaphod Beeblebrox\n2. Arthur Dent\n<!-- endauthors -->\n",
        )
        .unwrap();

        ws.generate(&["update", "--forge", "none", "-a"])
            .arg(&doc)
            .assert()
            .success();

        assert_eq!(
            std::fs::read_to_string(&doc).unwrap(),
            "<!-- authors -->\n\n1. Zaphod Beeblebrox\n2. Arthur Dent\n3. Ford Prefect\n\n<!-- endauthors -->\n"
        );
    }

    #[test]
    fn update_reports_unpaired_marker() {
        let ws = crew();
        let doc = ws.root().join("AUTHORS.md");
        std::fs::write(&doc, "intro\n<!-- authors -->\n").unwrap();

        ws.generate(&["update", "--forge", "none"])
            .arg(&doc)
            .assert()
            .failure()
            .stderr(predicate::str::contains("unpaired").and(predicate::str::contains("line 2")));
    }

    #[test]
    fn unknown_format_fails_with_hint() {
        let ws = crew();
        ws.generate(&["print", "--forge", "none", "-f", "fancy"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown format").and(predicate::str::contains("mdcredits formats")));
    }

    #[test]
    fn configured_format_is_used() {
        let ws = crew();
        std::fs::write(ws.config(), "[formats]\nshort = \"* {name}\"\n").unwrap();

        ws.generate(&["print", "--forge", "none", "-f", "short"])
            .assert()
            .success()
            .stdout("* Arthur Dent\n* Ford Prefect\n");
    }

    #[test]
    fn formats_lists_builtins() {
        let ws = crew();
        ws.mdcredits()
            .arg("formats")
            .assert()
            .success()
            .stdout(predicate::str::contains("modern").and(predicate::str::contains("classic")));
    }

    #[test]
    fn config_path_honors_env() {
        let ws = crew();
        ws.mdcredits()
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        let ws = crew();
        ws.mdcredits()
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[general]"));
    }

    #[test]
    fn config_init_writes_defaults() {
        let ws = crew();
        ws.mdcredits().args(["config", "init"]).assert().success();

        let written = std::fs::read_to_string(ws.config()).unwrap();
        assert!(written.contains("[forge]"));
    }

    #[test]
    fn cache_path_follows_config() {
        let ws = crew();
        let cache = ws.root().join("lookups.json");
        std::fs::write(
            ws.config(),
            format!("[cache]\npath = {:?}\n", cache.display().to_string()),
        )
        .unwrap();

        ws.mdcredits()
            .args(["cache", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("lookups.json"));
    }

    #[test]
    fn cache_clear_removes_file() {
        let ws = crew();
        let cache = ws.root().join("lookups.json");
        std::fs::write(&cache, "{}").unwrap();
        std::fs::write(
            ws.config(),
            format!("[cache]\npath = {:?}\n", cache.display().to_string()),
        )
        .unwrap();

        ws.mdcredits().args(["cache", "clear"]).assert().success();
        assert!(!cache.exists());
    }

    #[test]
    fn invalid_config_fails() {
        let ws = crew();
        std::fs::write(ws.config(), "[general\n").unwrap();

        ws.mdcredits()
            .arg("formats")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid configuration"));
    }
}
