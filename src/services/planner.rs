use indexmap::IndexSet;

use crate::models::{CopyPlan, CopyPlanEntry, FileRole, ResolvedFile};

/// Rename `name` to embed `parent_dir` ahead of its extension.
///
/// Splits at the first `.`: `pic.final.png` in `images` becomes
/// `pic_images.final.png`; a name without a dot just gets the suffix.
pub fn disambiguate(name: &str, parent_dir: &str) -> String {
    match name.split_once('.') {
        Some((stem, rest)) => format!("{}_{}.{}", stem, parent_dir, rest),
        None => format!("{}_{}", name, parent_dir),
    }
}

/// Assigns flat output names for one export run.
///
/// The first file to claim a name keeps it. A later file with the same name
/// is renamed once with [`disambiguate`]; if that name is taken too, the later
/// file still uses it and overwrites the earlier copy on disk.
#[derive(Debug, Default)]
pub struct CopyPlanner {
    claimed: IndexSet<String>,
    entries: Vec<CopyPlanEntry>,
}

impl CopyPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plan the target, then linked files, then assets, each in given order.
    pub fn plan(target: &ResolvedFile, linked: &[ResolvedFile], assets: &[ResolvedFile]) -> CopyPlan {
        let mut planner = Self::new();
        planner.claim(target, FileRole::Target);
        for file in linked {
            planner.claim(file, FileRole::Linked);
        }
        for file in assets {
            planner.claim(file, FileRole::Asset);
        }
        planner.finish()
    }

    pub fn is_claimed(&self, name: &str) -> bool {
        self.claimed.contains(name)
    }

    /// Claim an output name for `file` and record the entry.
    pub fn claim(&mut self, file: &ResolvedFile, role: FileRole) -> &CopyPlanEntry {
        let original = file.file_name.as_str();

        let (output_name, overwrites_earlier) = if role == FileRole::Target || !self.is_claimed(original) {
            (original.to_string(), false)
        } else {
            let renamed = disambiguate(original, &file.parent_dir_name);
            let taken = self.is_claimed(&renamed);
            if taken {
                tracing::warn!(
                    "Output name {} is already used; {} will overwrite it",
                    renamed,
                    file.source
                );
            }
            (renamed, taken)
        };

        self.claimed.insert(output_name.clone());
        self.entries.push(CopyPlanEntry {
            file: file.clone(),
            role,
            renamed: output_name != original,
            output_name,
            overwrites_earlier,
        });

        &self.entries[self.entries.len() - 1]
    }

    pub fn finish(self) -> CopyPlan {
        CopyPlan {
            entries: self.entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disambiguate_with_extension() {
        assert_eq!(disambiguate("pic.png", "images"), "pic_images.png");
        assert_eq!(disambiguate("archive.tar.gz", "dl"), "archive_dl.tar.gz");
        assert_eq!(disambiguate(".hidden", "dir"), "_dir.hidden");
    }

    #[test]
    fn test_disambiguate_without_extension() {
        assert_eq!(disambiguate("README", "docs"), "README_docs");
    }

    #[test]
    fn test_target_keeps_name_and_is_first() {
        let target = ResolvedFile::new("vault/note.md");
        let linked = vec![ResolvedFile::new("vault/sub/note.md")];
        let plan = CopyPlanner::plan(&target, &linked, &[]);

        assert_eq!(plan.output_names(), vec!["note.md", "note_sub.md"]);
        assert_eq!(plan.entries[0].role, FileRole::Target);
        assert!(!plan.entries[0].renamed);
        assert!(plan.entries[1].renamed);
    }

    #[test]
    fn test_first_claim_wins_second_gets_parent() {
        let target = ResolvedFile::new("vault/note.md");
        let assets = vec![
            ResolvedFile::new("vault/A/pic.png"),
            ResolvedFile::new("vault/B/pic.png"),
        ];
        let plan = CopyPlanner::plan(&target, &[], &assets);

        assert_eq!(plan.output_names(), vec!["note.md", "pic.png", "pic_B.png"]);
        assert_eq!(plan.count(FileRole::Asset), 2);
    }

    #[test]
    fn test_linked_before_assets() {
        let target = ResolvedFile::new("vault/note.md");
        let linked = vec![ResolvedFile::new("vault/docs/spec")];
        let assets = vec![ResolvedFile::new("vault/files/spec")];
        let plan = CopyPlanner::plan(&target, &linked, &assets);

        assert_eq!(plan.output_names(), vec!["note.md", "spec", "spec_files"]);
        assert_eq!(plan.entries[1].role, FileRole::Linked);
    }

    #[test]
    fn test_second_collision_overwrites() {
        let target = ResolvedFile::new("vault/note.md");
        let linked = vec![
            ResolvedFile::new("vault/x/page.md"),
            ResolvedFile::new("vault/y/page.md"),
            ResolvedFile::new("other/y/page.md"),
        ];
        let plan = CopyPlanner::plan(&target, &linked, &[]);

        assert_eq!(
            plan.output_names(),
            vec!["note.md", "page.md", "page_y.md", "page_y.md"]
        );
        assert!(!plan.entries[2].overwrites_earlier);
        assert!(plan.entries[3].overwrites_earlier);
    }

    #[test]
    fn test_same_file_twice_is_planned_twice() {
        let target = ResolvedFile::new("vault/note.md");
        let linked = vec![
            ResolvedFile::new("vault/Other.md"),
            ResolvedFile::new("vault/Other.md"),
        ];
        let plan = CopyPlanner::plan(&target, &linked, &[]);
        assert_eq!(plan.output_names(), vec!["note.md", "Other.md", "Other_vault.md"]);
    }
}
