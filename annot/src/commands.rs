use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::debug;

use annot_config::cli::AnnotationArgs;
use annot_config::{
    get_profile_names, AnnotatedRecord, ConfigurationArgument, InstanceSummary, PluginInstance,
    ResolvedSet, ToolProfile,
};
use annot_messages::{msg, MESSAGES};
use annot_plugin::{ArgumentSpec, Capability, Catalog, GroupRegistry, VariantRecord};

use crate::cli::{Args, Command, OutputFormat};

pub fn execute_command(
    args: Args,
    catalog: &Catalog,
    plugin_arguments: Vec<ConfigurationArgument>,
) -> Result<()> {
    match args.command {
        Command::Resolve {
            profile,
            format,
            record,
            annotations,
        } => handle_resolve(
            catalog,
            &profile,
            format,
            record.as_deref(),
            annotations,
            plugin_arguments,
        ),
        Command::List { format } => handle_list(catalog, format),
        Command::Profiles => handle_profiles(),
    }
}

#[derive(Serialize)]
struct ResolveReport<'a> {
    profile: &'a str,
    defaults_disabled: bool,
    annotations: Vec<InstanceSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    record: Option<AnnotatedRecord>,
}

fn handle_resolve(
    catalog: &Catalog,
    profile_name: &str,
    format: OutputFormat,
    record: Option<&Path>,
    annotations: AnnotationArgs,
    plugin_arguments: Vec<ConfigurationArgument>,
) -> Result<()> {
    let context = ToolProfile::load(profile_name)?.into_context(catalog)?;
    let directives = annotations.into_directives(plugin_arguments);
    debug!(?directives, "Parsed annotation directives");

    let resolved = context.resolve(&directives)?;
    let annotated = record.map(|path| annotate_file(&resolved, path)).transpose()?;

    match format {
        OutputFormat::Json => {
            let report = ResolveReport {
                profile: profile_name,
                defaults_disabled: directives.defaults_disabled(),
                annotations: resolved.summary(),
                record: annotated,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Human => {
            if directives.defaults_disabled() {
                println!(
                    "{}",
                    msg!(MESSAGES.resolve.defaults_disabled).as_str().yellow()
                );
            }
            print_resolved(&resolved, profile_name);
            if let Some(annotated) = annotated {
                println!();
                println!("{}", serde_json::to_string_pretty(&annotated)?);
            }
        }
    }
    Ok(())
}

fn annotate_file(resolved: &ResolvedSet, path: &Path) -> Result<AnnotatedRecord> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read variant record {}", path.display()))?;
    let record: VariantRecord = serde_json::from_str(&content)
        .with_context(|| format!("Invalid variant record in {}", path.display()))?;
    Ok(resolved.annotate(&record))
}

fn entry(instance: &PluginInstance) -> String {
    if instance.arguments().is_empty() {
        msg!(MESSAGES.resolve.entry, name = instance.name())
    } else {
        msg!(
            MESSAGES.resolve.entry_with_arguments,
            name = instance.name(),
            arguments = instance.arguments().to_string()
        )
    }
}

fn print_resolved(resolved: &ResolvedSet, profile: &str) {
    if resolved.is_empty() {
        println!("{}", msg!(MESSAGES.resolve.empty, profile = profile));
        return;
    }

    println!(
        "{}",
        msg!(
            MESSAGES.resolve.summary,
            count = resolved.len().to_string(),
            profile = profile
        )
        .as_str()
        .green()
    );

    let (info, genotype): (Vec<&PluginInstance>, Vec<&PluginInstance>) = resolved
        .iter()
        .partition(|i| i.annotator().as_info().is_some());

    for (header, instances) in [
        (MESSAGES.resolve.info_header, info),
        (MESSAGES.resolve.genotype_header, genotype),
    ] {
        if instances.is_empty() {
            continue;
        }
        println!("{}", msg!(header).as_str().bold());
        for instance in instances {
            println!("{}", entry(instance));
        }
    }
}

#[derive(Serialize)]
struct GroupListing<'a> {
    group: &'a str,
    members: &'a [String],
}

#[derive(Serialize)]
struct CatalogListing<'a> {
    annotations: Vec<PluginListing<'a>>,
    groups: Vec<GroupListing<'a>>,
}

#[derive(Serialize)]
struct PluginListing<'a> {
    name: &'a str,
    capability: Option<Capability>,
    description: &'a str,
    groups: Vec<&'a str>,
    arguments: &'a [ArgumentSpec],
}

fn handle_list(catalog: &Catalog, format: OutputFormat) -> Result<()> {
    let groups = GroupRegistry::build(catalog)?;

    if format == OutputFormat::Json {
        let annotations: Vec<PluginListing> = catalog
            .executable()
            .map(|class| PluginListing {
                name: class.name(),
                capability: class.capability(),
                description: class.description(),
                groups: class.groups().iter().map(|g| g.as_str()).collect(),
                arguments: class.arguments(),
            })
            .collect();
        let listing = CatalogListing {
            annotations,
            groups: groups
                .tags()
                .map(|tag| GroupListing {
                    group: tag.as_str(),
                    members: groups.members(tag.as_str()),
                })
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    println!("{}", MESSAGES.catalog.plugins_header.bold());
    for class in catalog.executable() {
        let capability = class
            .capability()
            .map(|c| c.to_string())
            .unwrap_or_default();
        println!(
            "{}",
            msg!(
                MESSAGES.catalog.plugin_entry,
                name = class.name().cyan().to_string(),
                capability = capability
            )
        );
        if !class.description().is_empty() {
            println!("    {}", class.description());
        }
        let tags: Vec<&str> = class.groups().iter().map(|g| g.as_str()).collect();
        let tags = if tags.is_empty() {
            msg!(MESSAGES.common.none)
        } else {
            tags.join(", ")
        };
        println!("{}", msg!(MESSAGES.catalog.plugin_groups, groups = tags));
        for spec in class.arguments() {
            println!(
                "{}",
                msg!(
                    MESSAGES.catalog.argument_entry,
                    argument = spec.name.as_str(),
                    kind = spec.kind.to_string(),
                    required = if spec.required { " (required)" } else { "" },
                    description = spec.description.as_str()
                )
            );
        }
    }

    println!("{}", MESSAGES.catalog.groups_header.bold());
    for tag in groups.tags() {
        println!(
            "{}",
            msg!(
                MESSAGES.catalog.group_entry,
                group = tag.as_str(),
                members = groups.members(tag.as_str()).join(", ")
            )
        );
    }
    Ok(())
}

fn handle_profiles() -> Result<()> {
    println!("{}", MESSAGES.catalog.profiles_header.bold());
    for name in get_profile_names() {
        let profile = ToolProfile::load(name)?;
        println!(
            "{}",
            msg!(
                MESSAGES.catalog.profile_entry,
                name = name,
                description = profile.description
            )
        );
    }
    Ok(())
}
