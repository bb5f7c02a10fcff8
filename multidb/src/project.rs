//! Locating the Go project around a reference `querier.go`.

use std::{
    fs,
    path::{Path, PathBuf},
};

use eyre::{Context, Result, bail, eyre};
use multidb_codegen::PackageInfo;
use tracing::debug;

/// Directories derived from the reference querier path.
///
/// `db/postgresdb/querier.go` makes `db/postgresdb` the source package and
/// `db` the target: generated files land there and engine packages are its
/// subdirectories.
#[derive(Debug, Clone)]
pub struct Project {
    pub querier: PathBuf,
    pub source_dir: PathBuf,
    pub target_dir: PathBuf,
}

impl Project {
    pub fn discover(querier: &Path) -> Result<Self> {
        let querier = fs::canonicalize(querier)
            .wrap_err_with(|| format!("querier file {} not found", querier.display()))?;
        let source_dir = querier
            .parent()
            .ok_or_else(|| eyre!("{} has no parent directory", querier.display()))?
            .to_path_buf();
        let target_dir = source_dir
            .parent()
            .ok_or_else(|| eyre!("{} has no parent directory", source_dir.display()))?
            .to_path_buf();
        debug!(
            source = %source_dir.display(),
            target = %target_dir.display(),
            "discovered project"
        );

        Ok(Self {
            querier,
            source_dir,
            target_dir,
        })
    }

    /// Package clause and import path for the generated files. Files
    /// starting with `generated_prefix` are skipped so a stale output
    /// cannot decide the package name.
    pub fn package_info(&self, generated_prefix: &str) -> Result<PackageInfo> {
        let name = detect_package_name(&self.target_dir, generated_prefix)?;
        let import_base = find_import_base(&self.target_dir)?;
        debug!(package = %name, import_base = %import_base, "resolved package");
        Ok(PackageInfo::new(name, import_base))
    }
}

fn detect_package_name(dir: &Path, generated_prefix: &str) -> Result<String> {
    let mut sources: Vec<PathBuf> = fs::read_dir(dir)
        .wrap_err_with(|| format!("reading {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                return false;
            };
            path.is_file()
                && name.ends_with(".go")
                && !name.ends_with("_test.go")
                && !name.starts_with(generated_prefix)
        })
        .collect();
    sources.sort();

    for path in &sources {
        let content =
            fs::read_to_string(path).wrap_err_with(|| format!("reading {}", path.display()))?;
        if let Some(name) = package_clause(&content) {
            return Ok(name.to_string());
        }
    }

    dir.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| eyre!("cannot name the package in {}", dir.display()))
}

fn package_clause(content: &str) -> Option<&str> {
    content.lines().find_map(|line| {
        let rest = line.trim().strip_prefix("package ")?;
        rest.split_whitespace().next()
    })
}

/// Module path from the nearest `go.mod` joined with the path from there.
fn find_import_base(dir: &Path) -> Result<String> {
    for root in dir.ancestors() {
        let go_mod = root.join("go.mod");
        if !go_mod.is_file() {
            continue;
        }
        let content = fs::read_to_string(&go_mod)
            .wrap_err_with(|| format!("reading {}", go_mod.display()))?;
        let Some(module) = module_path(&content) else {
            bail!("{} has no module line", go_mod.display());
        };

        let relative: Vec<String> = dir
            .strip_prefix(root)
            .wrap_err("project directory is outside its module")?
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        if relative.is_empty() {
            return Ok(module.to_string());
        }
        return Ok(format!("{}/{}", module, relative.join("/")));
    }

    bail!("no go.mod found in {} or any parent", dir.display())
}

fn module_path(content: &str) -> Option<&str> {
    content.lines().find_map(|line| {
        let rest = line.trim().strip_prefix("module")?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let module = rest.split("//").next()?.trim().trim_matches('"');
        (!module.is_empty()).then_some(module)
    })
}
