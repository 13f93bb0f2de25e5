//! Manifest formats and version extraction.

use serde::Deserialize;
use std::path::Path;

/// Supported manifest formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    /// npm `package.json`
    PackageJson,
    /// Cargo `Cargo.toml`
    CargoToml,
}

#[derive(Deserialize)]
struct PackageJson {
    version: Option<String>,
}

#[derive(Deserialize)]
struct CargoManifest {
    package: Option<CargoPackage>,
    workspace: Option<CargoWorkspace>,
}

#[derive(Deserialize)]
struct CargoPackage {
    // `version.workspace = true` is a table, not a string
    version: Option<toml::Value>,
}

#[derive(Deserialize)]
struct CargoWorkspace {
    package: Option<CargoWorkspacePackage>,
}

#[derive(Deserialize)]
struct CargoWorkspacePackage {
    version: Option<String>,
}

impl ManifestFormat {
    /// Pick a format from the manifest file name
    pub fn from_path(path: &str) -> Option<Self> {
        let name = Path::new(path).file_name()?.to_str()?;
        if name == "Cargo.toml" || name.ends_with(".toml") {
            Some(Self::CargoToml)
        } else if name == "package.json" || name.ends_with(".json") {
            Some(Self::PackageJson)
        } else {
            None
        }
    }

    /// Extract the declared version string from manifest content
    pub fn declared_version(&self, content: &str) -> Result<String, String> {
        match self {
            ManifestFormat::PackageJson => {
                let manifest: PackageJson = serde_json::from_str(content)
                    .map_err(|e| format!("invalid JSON: {}", e))?;
                manifest
                    .version
                    .ok_or_else(|| "no \"version\" field".to_string())
            }
            ManifestFormat::CargoToml => {
                let manifest: CargoManifest =
                    toml::from_str(content).map_err(|e| format!("invalid TOML: {}", e))?;

                let package_version = manifest
                    .package
                    .and_then(|p| p.version)
                    .and_then(|v| v.as_str().map(str::to_string));
                let workspace_version = manifest
                    .workspace
                    .and_then(|w| w.package)
                    .and_then(|p| p.version);

                package_version
                    .or(workspace_version)
                    .ok_or_else(|| "no package.version or workspace.package.version".to_string())
            }
        }
    }
}
