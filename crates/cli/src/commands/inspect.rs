use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use implgen_core::{
    Config, SemanticModel,
    pipeline::{Introspector, resolve_candidates, select_candidates, unit_identifier},
};
use serde::Serialize;

use crate::display::print_inspection;
use crate::utils::{find_source_files, load_config, read_sources};

/// What generation would do for one marked type.
#[derive(Debug, Clone, Serialize)]
pub struct TypeInspection {
    pub type_name: String,
    pub identifier: String,
    pub interfaces: Vec<InterfaceInspection>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InterfaceInspection {
    pub interface: String,
    /// Stub headers in declaration order
    pub members: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<String>,
}

pub fn inspect_command(paths: &[PathBuf], json: bool, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let files = find_source_files(paths, &config.output_extension)?;
    if files.is_empty() {
        bail!("No C# source files found");
    }

    let sources = read_sources(&files)?;
    let semantic = implgen_core::Generator::new(config.clone())
        .context("Invalid configuration")?
        .semantic_model(&sources)
        .context("Failed to parse sources")?;
    let inspections = inspect(&semantic, &config);

    if json {
        println!("{}", serde_json::to_string_pretty(&inspections)?);
    } else {
        print_inspection(&inspections);
    }
    Ok(())
}

pub fn inspect(semantic: &SemanticModel, config: &Config) -> Vec<TypeInspection> {
    let marker = config.marker_spec();
    let candidates = select_candidates(semantic, &marker);
    let introspector =
        Introspector::new(semantic).allow_synchronous_members(config.allow_synchronous_members);

    resolve_candidates(semantic, &candidates, &marker)
        .into_iter()
        .map(|annotated| TypeInspection {
            type_name: annotated.qualified_name(),
            identifier: unit_identifier(&annotated.resolved, &config.output_extension),
            interfaces: annotated
                .interfaces()
                .iter()
                .map(|interface| match introspector.introspect(interface) {
                    Ok(contract) => InterfaceInspection {
                        interface: interface.to_string(),
                        members: contract
                            .signatures()
                            .map(|signature| {
                                format!(
                                    "{} {}.{}({})",
                                    signature.return_type,
                                    signature.declaring_interface,
                                    signature.method_name(),
                                    signature.parameter_list()
                                )
                            })
                            .collect(),
                        diagnostics: contract.diagnostics().map(ToString::to_string).collect(),
                    },
                    Err(diagnostic) => InterfaceInspection {
                        interface: interface.to_string(),
                        members: Vec::new(),
                        diagnostics: vec![diagnostic.to_string()],
                    },
                })
                .collect(),
        })
        .collect()
}
