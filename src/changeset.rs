use anyhow::Result;
use std::path::PathBuf;
use std::process::Command;

use crate::naming::{self, TEMPLATE_EXT};
use crate::store::TemplateStore;

/// How the set of templates to push is determined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeScope {
    /// Push every template in the store.
    Full,
    /// Push only templates that differ between two revisions of the store.
    Incremental { from: String, to: String },
}

/// A local template tagged for a pending push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSetEntry {
    pub template_id: u64,
    pub filename: String,
    pub path: PathBuf,
}

/// Resolve the set of templates to push.
///
/// Incremental detection never fails the run: if the revision diff cannot be
/// computed, or yields nothing, the resolver falls back to the full store
/// inventory. A missed sync is worse than a redundant one, since the remote
/// update is idempotent per template.
pub fn resolve_change_set(store: &TemplateStore, scope: &ChangeScope) -> Result<Vec<ChangeSetEntry>> {
    if let ChangeScope::Incremental { from, to } = scope {
        match diff_changed_templates(store, from, to) {
            Ok(entries) if !entries.is_empty() => return Ok(entries),
            Ok(_) => {
                log::debug!("No changed templates between {from} and {to}, syncing all");
            }
            Err(e) => {
                // Visible in logs so a permanently broken trigger environment
                // (full resync on every push) can be spotted.
                log::warn!("Could not detect changed templates ({e}), syncing all");
            }
        }
    }

    Ok(store
        .list_all()?
        .into_iter()
        .map(|t| ChangeSetEntry {
            template_id: t.template_id,
            filename: t.filename,
            path: t.path,
        })
        .collect())
}

/// List template files under the store directory that differ between two
/// revisions, via `git diff --name-only`.
fn diff_changed_templates(
    store: &TemplateStore,
    from: &str,
    to: &str,
) -> Result<Vec<ChangeSetEntry>> {
    let output = Command::new("git")
        .args(["diff", "--name-only", "--relative", from, to, "--", "."])
        .current_dir(store.dir())
        .output()
        .map_err(|e| anyhow::anyhow!("failed to run git diff: {e}"))?;

    if !output.status.success() {
        anyhow::bail!(
            "git diff failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let mut entries = Vec::new();

    for line in stdout.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if !line.ends_with(TEMPLATE_EXT) {
            continue;
        }

        let path = store.dir().join(line);
        let filename = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name.to_string(),
            None => continue,
        };

        match naming::decode(&filename) {
            Some(template_id) => entries.push(ChangeSetEntry {
                template_id,
                filename,
                path,
            }),
            None => log::debug!("Ignoring changed non-template file: {line}"),
        }
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_templates(dir: &Path) {
        fs::write(dir.join("template_1_a.html"), "<p>a</p>").unwrap();
        fs::write(dir.join("template_2_b.html"), "<p>b</p>").unwrap();
        fs::write(dir.join("readme.html"), "nope").unwrap();
    }

    #[test]
    fn full_scope_lists_whole_store() {
        let temp = TempDir::new().unwrap();
        write_templates(temp.path());
        let store = TemplateStore::new(temp.path());

        let mut ids: Vec<u64> = resolve_change_set(&store, &ChangeScope::Full)
            .unwrap()
            .iter()
            .map(|e| e.template_id)
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn incremental_without_repository_falls_back_to_full() {
        let temp = TempDir::new().unwrap();
        write_templates(temp.path());
        let store = TemplateStore::new(temp.path());

        let scope = ChangeScope::Incremental {
            from: "HEAD~1".to_string(),
            to: "HEAD".to_string(),
        };
        let mut ids: Vec<u64> = resolve_change_set(&store, &scope)
            .unwrap()
            .iter()
            .map(|e| e.template_id)
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2]);
    }

    fn git(dir: &Path, args: &[&str]) {
        let status = Command::new("git")
            .args(args)
            .current_dir(dir)
            .output()
            .unwrap();
        assert!(
            status.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&status.stderr)
        );
    }

    #[test]
    fn incremental_selects_only_changed_templates() {
        let temp = TempDir::new().unwrap();
        let repo = temp.path();
        git(repo, &["init"]);
        git(repo, &["config", "user.name", "Template Sync"]);
        git(repo, &["config", "user.email", "template-sync@local"]);

        write_templates(repo);
        git(repo, &["add", "."]);
        git(repo, &["commit", "-m", "initial"]);

        fs::write(repo.join("template_2_b.html"), "<p>changed</p>").unwrap();
        fs::write(repo.join("readme.html"), "changed too").unwrap();
        git(repo, &["add", "."]);
        git(repo, &["commit", "-m", "update"]);

        let store = TemplateStore::new(repo);
        let scope = ChangeScope::Incremental {
            from: "HEAD~1".to_string(),
            to: "HEAD".to_string(),
        };
        let entries = resolve_change_set(&store, &scope).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].template_id, 2);
        assert_eq!(entries[0].filename, "template_2_b.html");
    }

    #[test]
    fn incremental_with_no_diff_falls_back_to_full() {
        let temp = TempDir::new().unwrap();
        let repo = temp.path();
        git(repo, &["init"]);
        git(repo, &["config", "user.name", "Template Sync"]);
        git(repo, &["config", "user.email", "template-sync@local"]);

        write_templates(repo);
        git(repo, &["add", "."]);
        git(repo, &["commit", "-m", "initial"]);

        let store = TemplateStore::new(repo);
        let scope = ChangeScope::Incremental {
            from: "HEAD".to_string(),
            to: "HEAD".to_string(),
        };
        let mut ids: Vec<u64> = resolve_change_set(&store, &scope)
            .unwrap()
            .iter()
            .map(|e| e.template_id)
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2]);
    }
}
