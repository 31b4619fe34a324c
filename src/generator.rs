use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::GenerateError;
use crate::model::fs_tree;

/// Kinds of boilerplate `generate` knows how to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorKind {
    View,
    List,
    Show,
    Filter,
    Function,
    Vendor,
    Update,
    Spatial,
}

impl GeneratorKind {
    pub const ALL: [GeneratorKind; 8] = [
        GeneratorKind::View,
        GeneratorKind::List,
        GeneratorKind::Show,
        GeneratorKind::Filter,
        GeneratorKind::Function,
        GeneratorKind::Vendor,
        GeneratorKind::Update,
        GeneratorKind::Spatial,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            GeneratorKind::View => "view",
            GeneratorKind::List => "list",
            GeneratorKind::Show => "show",
            GeneratorKind::Filter => "filter",
            GeneratorKind::Function => "function",
            GeneratorKind::Vendor => "vendor",
            GeneratorKind::Update => "update",
            GeneratorKind::Spatial => "spatial",
        }
    }
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for GeneratorKind {
    type Err = GenerateError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.label() == value)
            .ok_or_else(|| GenerateError::UnknownKind(value.to_string()))
    }
}

/// Write boilerplate for `kind`/`name` into `app_dir`, copied from
/// `templates_root/<template>` or `templates_root/functions`.
/// Returns the files and directories written.
pub fn generate(
    app_dir: &Path,
    kind: GeneratorKind,
    name: &str,
    template: Option<&str>,
    templates_root: &Path,
) -> Result<Vec<PathBuf>, GenerateError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(GenerateError::MissingName(kind.to_string()));
    }

    if !templates_root.is_dir() {
        return Err(GenerateError::TemplatesNotFound(templates_root.to_path_buf()));
    }

    let source_dir = match template {
        Some(template) => template_path(templates_root, template),
        None => templates_root.join("functions"),
    };

    let (target_dir, files) = match kind {
        GeneratorKind::View => {
            let dir = app_dir.join("views").join(name);
            if dir.exists() {
                return Err(GenerateError::ViewExists(name.to_string()));
            }
            (
                dir,
                vec![
                    ("map.js".to_string(), "map.js".to_string()),
                    ("reduce.js".to_string(), "reduce.js".to_string()),
                ],
            )
        }
        GeneratorKind::Function => (
            app_dir.to_path_buf(),
            vec![(format!("{name}.js"), format!("{name}.js"))],
        ),
        GeneratorKind::Spatial => (
            app_dir.join("spatial"),
            vec![("spatial.js".to_string(), format!("{name}.js"))],
        ),
        GeneratorKind::Vendor => {
            let template = template.ok_or(GenerateError::MissingTemplate)?;
            return generate_vendor(app_dir, name, &template_path(templates_root, template));
        }
        GeneratorKind::List | GeneratorKind::Show | GeneratorKind::Filter | GeneratorKind::Update => (
            app_dir.join(format!("{kind}s")),
            vec![(format!("{kind}.js"), format!("{name}.js"))],
        ),
    };

    fs::create_dir_all(&target_dir).map_err(|source| GenerateError::Io {
        operation: "create directory",
        path: target_dir.clone(),
        source,
    })?;

    let mut written = Vec::new();
    for (template_file, target_file) in files {
        let source = source_dir.join(&template_file);
        let target = target_dir.join(&target_file);

        if !source.is_file() {
            tracing::warn!("{template_file} not found in {}", source_dir.display());
            continue;
        }

        fs::copy(&source, &target).map_err(|err| GenerateError::Io {
            operation: "copy template",
            path: target.clone(),
            source: err,
        })?;
        tracing::info!(kind = %kind, "generated {}", target.display());
        written.push(target);
    }

    Ok(written)
}

fn generate_vendor(
    app_dir: &Path,
    name: &str,
    template_dir: &Path,
) -> Result<Vec<PathBuf>, GenerateError> {
    if !template_dir.is_dir() {
        return Err(GenerateError::TemplatesNotFound(template_dir.to_path_buf()));
    }

    let dest = app_dir.join("vendor").join(name);
    fs_tree::copy_tree(template_dir, &dest).map_err(|source| GenerateError::Io {
        operation: "copy vendor template",
        path: dest.clone(),
        source,
    })?;
    tracing::info!(vendor = %name, "generated vendor skeleton in {}", dest.display());

    Ok(vec![dest])
}

/// Templates are addressed with `/` regardless of platform.
fn template_path(root: &Path, template: &str) -> PathBuf {
    template
        .split('/')
        .filter(|part| !part.is_empty())
        .fold(root.to_path_buf(), |path, part| path.join(part))
}
