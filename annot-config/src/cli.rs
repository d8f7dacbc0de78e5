// Command-line directive parsing

use annot_core::{AnnotError, Result};
use annot_plugin::{ArgumentKind, Catalog};
use clap::Args;

use crate::directives::{ConfigurationArgument, Directive, Directives};

const EXCLUDE_LONG: &str = "--annotationsToExclude";
const EXCLUDE_SHORT: &str = "-AX";

/// Annotation selection flags, flattened into the host tool's own parser.
#[derive(Debug, Clone, Default, Args)]
pub struct AnnotationArgs {
    /// Enable an annotation by name (repeatable)
    #[arg(short = 'A', long = "annotation", value_name = "NAME")]
    pub annotations: Vec<String>,

    /// Disable an annotation by name, however it was enabled (repeatable, also -AX)
    #[arg(long = "annotationsToExclude", value_name = "NAME")]
    pub excluded: Vec<String>,

    /// Enable every annotation in a group (repeatable)
    #[arg(short = 'G', long = "annotation-group", value_name = "GROUP")]
    pub groups: Vec<String>,

    /// Start from an empty set instead of the tool's default annotations
    #[arg(long = "disable-tool-default-annotations")]
    pub disable_tool_defaults: bool,
}

impl AnnotationArgs {
    pub fn into_directives(self, plugin_arguments: Vec<ConfigurationArgument>) -> Directives {
        let mut directives = Directives::new();
        if self.disable_tool_defaults {
            directives.push(Directive::DisableToolDefaults);
        }
        for tag in self.groups {
            directives.push(Directive::IncludeByGroup(tag.into()));
        }
        for name in self.annotations {
            directives.push(Directive::IncludeByName(name));
        }
        for name in self.excluded {
            directives.push(Directive::ExcludeByName(name));
        }
        for argument in plugin_arguments {
            directives.push_argument(argument);
        }
        directives
    }
}

/// Rewrites `-AX NAME` and `-AX=NAME` to the long exclusion flag.
///
/// clap reads `-AX` as `-A` with the value `X`, so this must run before
/// parsing. Arguments after `--` are left alone.
pub fn normalize_argv<I, S>(argv: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut out = Vec::new();
    let mut passthrough = false;

    for arg in argv.into_iter().map(Into::into) {
        if passthrough {
            out.push(arg);
            continue;
        }
        if arg == "--" {
            passthrough = true;
            out.push(arg);
        } else if arg == EXCLUDE_SHORT {
            out.push(EXCLUDE_LONG.to_string());
        } else if let Some(value) = arg.strip_prefix("-AX=") {
            out.push(format!("{}={}", EXCLUDE_LONG, value));
        } else {
            out.push(arg);
        }
    }

    out
}

/// argv with plugin-specific flags taken out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitArgs {
    /// What the tool's own parser should see.
    pub remaining: Vec<String>,
    pub plugin_arguments: Vec<ConfigurationArgument>,
}

/// Moves `--<argument>` flags declared by any catalog plugin out of `argv`.
///
/// Flag-kind arguments take no value unless written `--flag=false`; other
/// kinds take the next token or an inline `=value`. Unrecognised flags stay
/// in `remaining` for the tool's parser to reject.
pub fn split_plugin_arguments(argv: Vec<String>, catalog: &Catalog) -> Result<SplitArgs> {
    let mut split = SplitArgs::default();
    let mut tokens = argv.into_iter();

    while let Some(token) = tokens.next() {
        if token == "--" {
            split.remaining.push(token);
            split.remaining.extend(tokens.by_ref());
            break;
        }

        let Some(flag) = token.strip_prefix("--") else {
            split.remaining.push(token);
            continue;
        };
        let (name, inline) = match flag.split_once('=') {
            Some((name, value)) => (name, Some(value.to_string())),
            None => (flag, None),
        };
        let Some(owner) = catalog.argument_owner(name) else {
            split.remaining.push(token);
            continue;
        };
        let Some(spec) = owner.argument(name) else {
            split.remaining.push(token);
            continue;
        };

        let value = match (inline, spec.kind) {
            (Some(value), _) => value,
            (None, ArgumentKind::Flag) => "true".to_string(),
            (None, _) => tokens.next().ok_or_else(|| {
                AnnotError::Config(format!("Argument '--{}' requires a value", name))
            })?,
        };

        split
            .plugin_arguments
            .push(ConfigurationArgument::new(owner.name(), name, value));
    }

    Ok(split)
}
