//! Import rewriting for relocated tests
//!
//! A generated file starts with:
//! 1. a wildcard import of the originating module (what `use super::*;` gave)
//! 2. the ambient imports of the module's import profile
//! 3. the block's own `use` declarations, re-rooted for the new location
//!
//! Unused imports are not pruned; only exact duplicates are dropped.

use crate::config::{ImportProfile, DEFAULT_IMPORT_KIND};
use crate::module_path::ModulePath;

/// Declarative table of ambient imports, keyed by module path prefix
#[derive(Debug, Clone, Default)]
pub struct ImportTable {
    profiles: Vec<(Option<ModulePath>, ImportProfile)>,
}

impl ImportTable {
    pub fn new(profiles: &[ImportProfile], separator: &str) -> Self {
        let profiles = profiles
            .iter()
            .map(|profile| {
                let prefix = profile
                    .path_prefix
                    .as_deref()
                    .map(|p| ModulePath::from_namespace(&p.replace('/', separator), separator));
                (prefix, profile.clone())
            })
            .collect();
        Self { profiles }
    }

    /// Profile whose prefix is the longest match for `module`, else the default one
    pub fn profile_for(&self, module: &ModulePath) -> Option<&ImportProfile> {
        self.profiles
            .iter()
            .filter_map(|(prefix, profile)| {
                prefix
                    .as_ref()
                    .filter(|p| module.starts_with(p))
                    .map(|p| (p.segments().len(), profile))
            })
            .max_by_key(|(len, _)| *len)
            .map(|(_, profile)| profile)
            .or_else(|| {
                self.profiles
                    .iter()
                    .map(|(_, profile)| profile)
                    .find(|profile| profile.kind == DEFAULT_IMPORT_KIND)
            })
    }
}

/// Where the relocated code comes from, for re-rooting paths
#[derive(Debug, Clone, Copy)]
pub struct ImportContext<'a> {
    pub crate_name: &'a str,
    pub module: &'a ModulePath,
    pub separator: &'a str,
}

impl ImportContext<'_> {
    /// `<crate>::<segments>` for a module path
    fn qualify(&self, module: &ModulePath) -> String {
        if module.is_root() {
            self.crate_name.to_string()
        } else {
            format!(
                "{}{}{}",
                self.crate_name,
                self.separator,
                module.to_namespace(self.separator)
            )
        }
    }

    /// Wildcard import of the originating module's public surface
    pub fn module_import(&self) -> String {
        format!("use {}{}*;", self.qualify(self.module), self.separator)
    }

    /// Rewrite the first line of a `use` declaration taken from the test block.
    ///
    /// Returns `None` for `use super::*;`, which the module import replaces.
    /// `super::` is resolved against the originating module (the test block's
    /// parent) and `crate::` becomes the crate name.
    pub fn rewrite_use(&self, line: &str) -> Option<String> {
        let indent_len = line.len() - line.trim_start().len();
        let (indent, rest) = line.split_at(indent_len);
        let (visibility, rest) = match rest.strip_prefix("pub ") {
            Some(tail) => ("pub ", tail),
            None => ("", rest),
        };
        let Some(path) = rest.strip_prefix("use ") else {
            return Some(line.to_string());
        };
        let path = path.trim_start();

        let super_prefix = format!("super{}", self.separator);
        let crate_prefix = format!("crate{}", self.separator);

        let rewritten = if path.starts_with(&super_prefix) {
            let mut target = self.module.clone();
            let mut tail = path;
            let mut first = true;
            while let Some(stripped) = tail.strip_prefix(&super_prefix) {
                // the first `super` is the originating module itself
                if !first {
                    target = target.parent();
                }
                first = false;
                tail = stripped;
            }
            let code = tail.split("//").next().unwrap_or(tail);
            if code.trim_end() == "*;" && target == *self.module {
                return None;
            }
            format!("{}{}{}", self.qualify(&target), self.separator, tail)
        } else if let Some(tail) = path.strip_prefix(&crate_prefix) {
            format!("{}{}{}", self.crate_name, self.separator, tail)
        } else {
            path.to_string()
        };

        Some(format!("{indent}{visibility}use {rewritten}"))
    }
}

/// Build the header lines of a destination file.
///
/// `body_uses` are the block's `use` declarations, already re-indented; each
/// entry is one declaration, possibly spanning several lines.
pub fn build_header(
    ctx: &ImportContext<'_>,
    table: &ImportTable,
    body_uses: &[Vec<String>],
) -> Vec<String> {
    let mut header = vec![ctx.module_import()];

    if let Some(profile) = table.profile_for(ctx.module) {
        for path in &profile.uses {
            let line = if path.starts_with("use ") {
                path.clone()
            } else {
                format!("use {};", path.trim_end_matches(';'))
            };
            if !header.contains(&line) {
                header.push(line);
            }
        }
    }

    for decl in body_uses {
        let Some((first, rest)) = decl.split_first() else {
            continue;
        };
        let Some(first) = ctx.rewrite_use(first) else {
            continue;
        };
        if rest.is_empty() && header.contains(&first) {
            continue;
        }
        header.push(first);
        header.extend(rest.iter().cloned());
    }

    header
}
